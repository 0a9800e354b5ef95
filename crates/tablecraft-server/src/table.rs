//! Server table loader
//!
//! A [`ServerTable`] is the server half of one entity's table: its columns,
//! filter definitions, data sources and actions. [`ServerTable::load`] turns
//! search parameters into a serializable [`LoadResult`].
//!
//! # Example
//!
//! ```
//! use tablecraft_core::columns::{ColumnDef, ColumnFilter};
//! use tablecraft_core::error::TableError;
//! use tablecraft_core::filters::{FilterMap, FilterVariant};
//! use tablecraft_core::query::{ListResult, Query};
//! use tablecraft_server::fetcher::row_fetcher;
//! use tablecraft_server::table::ServerTable;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let table: ServerTable<u32> = ServerTable::builder(
//!     "users",
//!     row_fetcher(|query: Query<FilterMap>| async move {
//!         let rows: Vec<u32> = (0..query.pagination.per_page).collect();
//!         Ok::<_, TableError>(ListResult::<u32>::new(rows).with_total(95))
//!     }),
//! )
//! .columns(vec![ColumnDef::new("name").filter(ColumnFilter::new(FilterVariant::Text))])
//! .build();
//!
//! let result = table.load("page=2").await.unwrap();
//! assert_eq!(result.page_count, 10);
//! assert_eq!(result.rows.len(), 10);
//! # }
//! ```

use crate::counts::{CountFetchers, resolve_counts};
use crate::fetcher::{CountFetcher, FilterTransform, IdentityTransform, RowFetcher};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tablecraft_core::columns::{
	ColumnDef, Columns, ColumnsContext, collect_column_ids, resolve_filter_definitions,
};
use tablecraft_core::error::Result;
use tablecraft_core::features::{FeatureDescriptor, FeatureRegistry};
use tablecraft_core::filters::{FilterDefinition, FilterMap};
use tablecraft_core::params::SearchParams;
use tablecraft_core::query::{Query, build_query};
use tablecraft_core::settings::TableSettings;
use tablecraft_core::state::{InitialState, StateParser};

/// Derives the number of pages.
///
/// An explicit `page_count` wins and is clamped to at least 1. Otherwise the
/// page count is `ceil(total / per_page)`, also at least 1. With neither,
/// there is one page.
///
/// # Examples
///
/// ```
/// use tablecraft_server::table::resolve_page_count;
///
/// assert_eq!(resolve_page_count(None, Some(95), 10), 10);
/// assert_eq!(resolve_page_count(Some(3), Some(95), 10), 3);
/// assert_eq!(resolve_page_count(None, None, 10), 1);
/// ```
pub fn resolve_page_count(page_count: Option<i64>, total: Option<u64>, per_page: u32) -> u64 {
	if let Some(page_count) = page_count {
		return page_count.max(1) as u64;
	}
	match total {
		Some(total) => total.div_ceil(u64::from(per_page.max(1))).max(1),
		None => 1,
	}
}

/// Query plus the raw filters it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadState<F> {
	#[serde(flatten)]
	pub query: Query<F>,
	pub raw_filters: FilterMap,
}

/// Everything the renderer needs for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResult<R, F = FilterMap, C = (), M = ()> {
	pub entity: String,
	pub rows: Vec<R>,
	pub page_count: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub total: Option<u64>,
	pub counts: BTreeMap<String, C>,
	pub features: Vec<FeatureDescriptor>,
	pub state: LoadState<F>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub meta: Option<M>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub initial_state: Option<InitialState>,
}

/// Server-side definition of one entity's table.
pub struct ServerTable<R, F = FilterMap, C = (), M = ()> {
	entity: String,
	columns: Columns<C>,
	filter_definitions: Option<Vec<FilterDefinition>>,
	default_page_size: Option<u32>,
	initial_state: Option<InitialState>,
	settings: TableSettings,
	transform: Arc<dyn FilterTransform<F>>,
	fetcher: Arc<dyn RowFetcher<F, R, M>>,
	counts: CountFetchers<F, C>,
	features: FeatureRegistry,
}

impl<R, C, M> ServerTable<R, FilterMap, C, M> {
	/// Starts a table whose fetchers receive the raw filter map
	pub fn builder(
		entity: impl Into<String>,
		fetcher: impl RowFetcher<FilterMap, R, M> + 'static,
	) -> ServerTableBuilder<R, FilterMap, C, M> {
		ServerTableBuilder::new(entity, IdentityTransform, fetcher)
	}
}

impl<R, F, C, M> ServerTable<R, F, C, M> {
	/// Starts a table whose raw filters go through `transform`
	pub fn builder_with_transform(
		entity: impl Into<String>,
		transform: impl FilterTransform<F> + 'static,
		fetcher: impl RowFetcher<F, R, M> + 'static,
	) -> ServerTableBuilder<R, F, C, M> {
		ServerTableBuilder::new(entity, transform, fetcher)
	}

	pub fn entity(&self) -> &str {
		&self.entity
	}

	pub fn features(&self) -> &FeatureRegistry {
		&self.features
	}

	pub fn settings(&self) -> &TableSettings {
		&self.settings
	}

	pub fn initial_state(&self) -> Option<&InitialState> {
		self.initial_state.as_ref()
	}

	/// Page size used when the URL carries none
	///
	/// The explicit default wins, then the initial state's page size, then
	/// the settings default.
	pub fn default_page_size(&self) -> u32 {
		self.default_page_size
			.or_else(|| self.initial_state.as_ref().and_then(|state| state.page_size))
			.unwrap_or(self.settings.default_page_size)
			.max(1)
	}

	/// Resolves the columns, handing facet counts to a column factory
	pub fn columns(&self, counts: &BTreeMap<String, C>) -> Vec<ColumnDef> {
		let features = self.features.names();
		self.columns.resolve(&ColumnsContext {
			counts,
			features: &features,
		})
	}

	/// Explicit filter definitions, or those inferred from the columns
	pub fn filter_definitions(&self) -> Vec<FilterDefinition> {
		let columns = self.columns(&BTreeMap::new());
		resolve_filter_definitions(self.filter_definitions.as_deref(), &columns)
	}
}

impl<R, F, C, M> ServerTable<R, F, C, M>
where
	R: Send + 'static,
	F: Clone + Send + Sync + 'static,
	C: Send + 'static,
	M: Send + 'static,
{
	/// Loads one page for the given search parameters.
	///
	/// The row fetcher and every count fetcher run concurrently. Any failure
	/// rejects the whole load with the fetcher's own error.
	pub async fn load(&self, search_params: impl Into<SearchParams>) -> Result<LoadResult<R, F, C, M>> {
		let columns = self.columns(&BTreeMap::new());
		let definitions = resolve_filter_definitions(self.filter_definitions.as_deref(), &columns);
		let column_ids = collect_column_ids(&columns);

		let mut parser = StateParser::from_settings(&self.settings)
			.default_page_size(self.default_page_size())
			.filter_definitions(&definitions);
		if !column_ids.is_empty() {
			parser = parser.column_ids(&column_ids);
		}
		let state = parser.parse(search_params);

		let filters = self.transform.transform(state.raw_filters.clone()).await?;
		let query = build_query(&state, filters);
		let per_page = query.pagination.per_page;

		let (list, counts) = futures::try_join!(
			self.fetcher.fetch(query.clone()),
			resolve_counts(&self.counts, &query)
		)
		.inspect_err(|err| {
			tracing::warn!(entity = %self.entity, error = %err, "table load failed");
		})?;

		let page_count = resolve_page_count(list.page_count, list.total, per_page);
		tracing::debug!(
			entity = %self.entity,
			page = query.pagination.page,
			per_page,
			rows = list.rows.len(),
			page_count,
			"loaded table page"
		);

		Ok(LoadResult {
			entity: self.entity.clone(),
			rows: list.rows,
			page_count,
			total: list.total,
			counts,
			features: self.features.controls(),
			state: LoadState {
				query,
				raw_filters: state.raw_filters,
			},
			meta: list.meta,
			initial_state: self.initial_state.clone(),
		})
	}
}

impl<R, F, C, M> fmt::Debug for ServerTable<R, F, C, M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServerTable")
			.field("entity", &self.entity)
			.field("columns", &self.columns)
			.field("filter_definitions", &self.filter_definitions)
			.field("default_page_size", &self.default_page_size)
			.field("counts", &self.counts.keys().collect::<Vec<_>>())
			.field("features", &self.features)
			.finish_non_exhaustive()
	}
}

/// Builder for [`ServerTable`].
pub struct ServerTableBuilder<R, F = FilterMap, C = (), M = ()> {
	table: ServerTable<R, F, C, M>,
}

impl<R, F, C, M> ServerTableBuilder<R, F, C, M> {
	fn new(
		entity: impl Into<String>,
		transform: impl FilterTransform<F> + 'static,
		fetcher: impl RowFetcher<F, R, M> + 'static,
	) -> Self {
		Self {
			table: ServerTable {
				entity: entity.into(),
				columns: Columns::Static(Vec::new()),
				filter_definitions: None,
				default_page_size: None,
				initial_state: None,
				settings: TableSettings::default(),
				transform: Arc::new(transform),
				fetcher: Arc::new(fetcher),
				counts: BTreeMap::new(),
				features: FeatureRegistry::new(),
			},
		}
	}

	/// Static columns or a column factory
	pub fn columns(mut self, columns: impl Into<Columns<C>>) -> Self {
		self.table.columns = columns.into();
		self
	}

	/// Explicit filter definitions, replacing inference from columns
	pub fn filter_definitions(mut self, definitions: Vec<FilterDefinition>) -> Self {
		self.table.filter_definitions = Some(definitions);
		self
	}

	pub fn default_page_size(mut self, page_size: u32) -> Self {
		self.table.default_page_size = Some(page_size);
		self
	}

	pub fn initial_state(mut self, initial_state: InitialState) -> Self {
		self.table.initial_state = Some(initial_state);
		self
	}

	pub fn settings(mut self, settings: TableSettings) -> Self {
		self.table.settings = settings;
		self
	}

	/// Adds a named count fetcher
	pub fn count(mut self, name: impl Into<String>, fetcher: impl CountFetcher<F, C> + 'static) -> Self {
		self.table.counts.insert(name.into(), Arc::new(fetcher));
		self
	}

	pub fn features(mut self, features: FeatureRegistry) -> Self {
		self.table.features = features;
		self
	}

	pub fn build(self) -> ServerTable<R, F, C, M> {
		self.table
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(None, Some(95), 10, 10)]
	#[case(None, Some(100), 10, 10)]
	#[case(None, Some(101), 10, 11)]
	#[case(None, Some(0), 10, 1)]
	#[case(Some(3), Some(95), 10, 3)]
	#[case(Some(0), None, 10, 1)]
	#[case(Some(-4), Some(50), 10, 1)]
	#[case(None, None, 25, 1)]
	fn test_resolve_page_count(
		#[case] page_count: Option<i64>,
		#[case] total: Option<u64>,
		#[case] per_page: u32,
		#[case] expected: u64,
	) {
		assert_eq!(resolve_page_count(page_count, total, per_page), expected);
	}
}
