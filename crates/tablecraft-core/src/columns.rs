//! Typed column configuration and filter definition resolution
//!
//! Columns are plain data owned by this crate. A renderer reads what it
//! needs (id, label, sort/hide flags); the URL layer reads the optional
//! [`ColumnFilter`] descriptor to derive filter definitions.
//!
//! # Example
//!
//! ```
//! use tablecraft_core::columns::{ColumnDef, ColumnFilter, FilterOption, infer_filter_definitions};
//! use tablecraft_core::filters::FilterVariant;
//!
//! let columns = vec![
//!     ColumnDef::new("title").filter(ColumnFilter::new(FilterVariant::Text)),
//!     ColumnDef::new("status").filter(
//!         ColumnFilter::new(FilterVariant::MultiSelect)
//!             .options(vec![FilterOption::new("Done", "done")]),
//!     ),
//! ];
//!
//! let definitions = infer_filter_definitions(&columns);
//! assert_eq!(definitions.len(), 2);
//! assert!(!definitions[0].is_array());
//! assert!(definitions[1].is_array());
//! ```

use crate::filters::{FilterDefinition, FilterVariant};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A selectable value for select-like filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
	/// Display label
	pub label: String,
	/// Value written to the URL
	pub value: String,
	/// Facet count for this value, when known
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub count: Option<u64>,
}

impl FilterOption {
	/// Creates an option without a count
	pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			value: value.into(),
			count: None,
		}
	}

	/// Attaches a facet count
	pub fn with_count(mut self, count: u64) -> Self {
		self.count = Some(count);
		self
	}
}

/// Filter descriptor attached to a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnFilter {
	/// Filter control kind
	pub variant: FilterVariant,
	/// Whether the client exposes a per-column URL filter for this column
	pub enabled: bool,
	/// Option list for select-like filters
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub options: Option<Vec<FilterOption>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub placeholder: Option<String>,
	/// Bounds for range filters
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub range: Option<(f64, f64)>,
	/// Unit suffix for numeric filters (e.g. "hr")
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unit: Option<String>,
}

impl ColumnFilter {
	/// An enabled filter of the given variant
	pub fn new(variant: FilterVariant) -> Self {
		Self {
			variant,
			enabled: true,
			options: None,
			placeholder: None,
			range: None,
			unit: None,
		}
	}

	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	pub fn options(mut self, options: Vec<FilterOption>) -> Self {
		self.options = Some(options);
		self
	}

	pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}

	pub fn range(mut self, min: f64, max: f64) -> Self {
		self.range = Some((min, max));
		self
	}

	pub fn unit(mut self, unit: impl Into<String>) -> Self {
		self.unit = Some(unit.into());
		self
	}

	/// List-valued when the variant is multi-valued or an option list exists
	pub fn is_array(&self) -> bool {
		self.options.is_some() || self.variant.is_multi_valued()
	}
}

/// One column, possibly grouping child columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
	/// Column id; also the sort id and default filter key
	pub id: String,
	/// Header label
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	pub enable_sorting: bool,
	pub enable_hiding: bool,
	/// Filter descriptor; `None` for columns that cannot be filtered
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub filter: Option<ColumnFilter>,
	/// Child columns of a group
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub columns: Vec<ColumnDef>,
}

impl ColumnDef {
	/// A sortable, hideable leaf column without a filter
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: None,
			enable_sorting: true,
			enable_hiding: true,
			filter: None,
			columns: Vec::new(),
		}
	}

	/// A column group
	pub fn group(id: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
		Self {
			columns,
			enable_sorting: false,
			..Self::new(id)
		}
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn sortable(mut self, sortable: bool) -> Self {
		self.enable_sorting = sortable;
		self
	}

	pub fn hideable(mut self, hideable: bool) -> Self {
		self.enable_hiding = hideable;
		self
	}

	pub fn filter(mut self, filter: ColumnFilter) -> Self {
		self.filter = Some(filter);
		self
	}

	/// Whether the client should expose a per-column URL filter
	pub fn is_filterable(&self) -> bool {
		self.filter.as_ref().is_some_and(|filter| filter.enabled)
	}

	/// Whether this column groups other columns
	pub fn is_group(&self) -> bool {
		!self.columns.is_empty()
	}
}

/// Visits every column in declaration order, parents before children.
pub fn walk_columns<'a>(columns: &'a [ColumnDef], visit: &mut impl FnMut(&'a ColumnDef)) {
	for column in columns {
		visit(column);
		walk_columns(&column.columns, visit);
	}
}

/// Collects every column id in the tree (groups included)
pub fn collect_column_ids(columns: &[ColumnDef]) -> BTreeSet<String> {
	let mut ids = BTreeSet::new();
	walk_columns(columns, &mut |column| {
		ids.insert(column.id.clone());
	});
	ids
}

/// Derives filter definitions from column filter descriptors.
///
/// Children of a group are emitted before the group itself.
pub fn infer_filter_definitions(columns: &[ColumnDef]) -> Vec<FilterDefinition> {
	fn visit(columns: &[ColumnDef], out: &mut Vec<FilterDefinition>) {
		for column in columns {
			visit(&column.columns, out);
			if let Some(filter) = &column.filter {
				out.push(
					FilterDefinition::new(column.id.clone(), filter.variant)
						.with_expects_array(filter.is_array()),
				);
			}
		}
	}

	let mut definitions = Vec::new();
	visit(columns, &mut definitions);
	definitions
}

/// Explicit definitions when non-empty, otherwise inferred from columns
pub fn resolve_filter_definitions(
	explicit: Option<&[FilterDefinition]>,
	columns: &[ColumnDef],
) -> Vec<FilterDefinition> {
	match explicit {
		Some(definitions) if !definitions.is_empty() => definitions.to_vec(),
		_ => infer_filter_definitions(columns),
	}
}

/// What a column factory sees when building columns.
#[derive(Debug, Clone)]
pub struct ColumnsContext<'a, C> {
	/// Facet counts from the last load, keyed by count name
	pub counts: &'a std::collections::BTreeMap<String, C>,
	/// Names of the registered actions
	pub features: &'a [String],
}

type ColumnsFn<C> = Arc<dyn Fn(&ColumnsContext<'_, C>) -> Vec<ColumnDef> + Send + Sync>;

/// Static columns or a factory that can use facet counts.
pub enum Columns<C> {
	Static(Vec<ColumnDef>),
	Factory(ColumnsFn<C>),
}

impl<C> Columns<C> {
	/// Wraps a column factory
	pub fn factory<F>(factory: F) -> Self
	where
		F: Fn(&ColumnsContext<'_, C>) -> Vec<ColumnDef> + Send + Sync + 'static,
	{
		Self::Factory(Arc::new(factory))
	}

	/// Resolves the column list for a context
	pub fn resolve(&self, context: &ColumnsContext<'_, C>) -> Vec<ColumnDef> {
		match self {
			Self::Static(columns) => columns.clone(),
			Self::Factory(factory) => factory(context),
		}
	}
}

impl<C> Clone for Columns<C> {
	fn clone(&self) -> Self {
		match self {
			Self::Static(columns) => Self::Static(columns.clone()),
			Self::Factory(factory) => Self::Factory(Arc::clone(factory)),
		}
	}
}

impl<C> From<Vec<ColumnDef>> for Columns<C> {
	fn from(columns: Vec<ColumnDef>) -> Self {
		Self::Static(columns)
	}
}

impl<C> fmt::Debug for Columns<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Static(columns) => f.debug_tuple("Static").field(columns).finish(),
			Self::Factory(_) => f.write_str("Factory(..)"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use std::collections::BTreeMap;

	#[fixture]
	fn grouped_columns() -> Vec<ColumnDef> {
		vec![
			ColumnDef::new("select").sortable(false).hideable(false),
			ColumnDef::new("title").filter(ColumnFilter::new(FilterVariant::Text)),
			ColumnDef::group(
				"planning",
				vec![
					ColumnDef::new("status").filter(ColumnFilter::new(FilterVariant::MultiSelect)),
					ColumnDef::new("assignee").filter(
						ColumnFilter::new(FilterVariant::Text)
							.options(vec![FilterOption::new("Alex", "alex")]),
					),
					ColumnDef::new("dueDate").filter(ColumnFilter::new(FilterVariant::Date)),
				],
			),
			ColumnDef::new("estimatedHours")
				.filter(ColumnFilter::new(FilterVariant::Number).enabled(false)),
		]
	}

	#[rstest]
	fn test_collect_ids_recurses_into_groups(grouped_columns: Vec<ColumnDef>) {
		let ids = collect_column_ids(&grouped_columns);
		let expected: BTreeSet<String> = [
			"select",
			"title",
			"planning",
			"status",
			"assignee",
			"dueDate",
			"estimatedHours",
		]
		.into_iter()
		.map(String::from)
		.collect();
		assert_eq!(ids, expected);
	}

	#[rstest]
	fn test_infer_visits_nested_leaves(grouped_columns: Vec<ColumnDef>) {
		// Act
		let definitions = infer_filter_definitions(&grouped_columns);

		// Assert
		let summary: Vec<(&str, bool)> = definitions
			.iter()
			.map(|def| (def.id.as_str(), def.is_array()))
			.collect();
		assert_eq!(
			summary,
			vec![
				("title", false),
				("status", true),
				("assignee", true),
				("dueDate", false),
				("estimatedHours", false),
			]
		);
	}

	#[rstest]
	fn test_explicit_definitions_used_verbatim(grouped_columns: Vec<ColumnDef>) {
		let explicit = vec![FilterDefinition::new("priority", FilterVariant::Select).with_key("p")];
		let resolved = resolve_filter_definitions(Some(&explicit), &grouped_columns);
		assert_eq!(resolved, explicit);
	}

	#[rstest]
	fn test_empty_explicit_definitions_fall_back_to_inference(grouped_columns: Vec<ColumnDef>) {
		let resolved = resolve_filter_definitions(Some(&[]), &grouped_columns);
		assert_eq!(resolved.len(), 5);
	}

	#[rstest]
	fn test_filterable_respects_enabled_flag(grouped_columns: Vec<ColumnDef>) {
		assert!(grouped_columns[1].is_filterable());
		assert!(!grouped_columns[3].is_filterable());
		assert!(!grouped_columns[0].is_filterable());
	}

	#[rstest]
	fn test_factory_receives_counts() {
		// Arrange
		let columns: Columns<u64> = Columns::factory(|ctx| {
			let total = ctx.counts.get("status").copied().unwrap_or_default();
			vec![ColumnDef::new("status").label(format!("Status ({total})"))]
		});
		let mut counts = BTreeMap::new();
		counts.insert("status".to_string(), 7u64);

		// Act
		let resolved = columns.resolve(&ColumnsContext {
			counts: &counts,
			features: &[],
		});

		// Assert
		assert_eq!(resolved[0].label.as_deref(), Some("Status (7)"));
	}
}
