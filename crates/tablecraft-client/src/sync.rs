//! Client state synchronizer
//!
//! [`TableStateSync`] mirrors URL state into the controlled state a table
//! renderer needs and writes user changes back through a [`Navigator`]:
//!
//! - pagination is exposed zero-based and written back one-based,
//! - sorting round-trips through the JSON `sort` key,
//! - per-column filters are debounced and reset the page to 1,
//! - row selection and column visibility are local and start from the
//!   initial state every time a synchronizer is built.
//!
//! Sort and advanced filter ids are checked against the column ids. A
//! synchronizer built without columns accepts any id, as the server does.
//!
//! Updater functions run without any internal lock held, so they may read
//! the synchronizer.
//!
//! Every URL write goes through a [`Throttle`], so bursts of writes are
//! coalesced into at most one navigation per throttle interval.

use crate::debounce::{PendingWrite, Throttle};
use crate::navigation::{NavigateOptions, Navigator, ParamUpdates, apply_updates};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tablecraft_core::columns::{ColumnDef, collect_column_ids, walk_columns};
use tablecraft_core::filters::{
	AdvancedFilter, FilterDefinition, FilterValue, FilterVariant, JoinOperator,
	decode_advanced_filters, decode_join_operator, encode_advanced_filters,
};
use tablecraft_core::params::SearchParams;
use tablecraft_core::settings::TableSettings;
use tablecraft_core::sorting::{SortDescriptor, decode_sorting, encode_sorting};
use tablecraft_core::state::{InitialState, StateParser, read_filter_with_separator};

/// A new value, or a function of the previous one.
pub enum Updater<T> {
	Value(T),
	Function(Box<dyn FnOnce(&T) -> T + Send>),
}

impl<T> Updater<T> {
	/// Wraps a function of the previous value
	pub fn with(f: impl FnOnce(&T) -> T + Send + 'static) -> Self {
		Self::Function(Box::new(f))
	}

	pub fn apply(self, previous: &T) -> T {
		match self {
			Self::Value(value) => value,
			Self::Function(f) => f(previous),
		}
	}
}

impl<T> From<T> for Updater<T> {
	fn from(value: T) -> Self {
		Self::Value(value)
	}
}

impl<T: fmt::Debug> fmt::Debug for Updater<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
			Self::Function(_) => f.write_str("Function(..)"),
		}
	}
}

/// Zero-based pagination as a renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationIndex {
	pub page_index: u32,
	pub page_size: u32,
}

/// One active column filter in renderer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilterState {
	pub id: String,
	pub value: FilterValue,
}

impl ColumnFilterState {
	pub fn new(id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
		Self {
			id: id.into(),
			value: value.into(),
		}
	}
}

/// Row id to selected/visible flag
pub type FlagMap = BTreeMap<String, bool>;

#[derive(Debug, Clone)]
struct FilterableColumn {
	id: String,
	is_array: bool,
}

#[derive(Debug, Default)]
struct LocalState {
	column_filters: Vec<ColumnFilterState>,
	advanced_filters: Vec<AdvancedFilter>,
	row_selection: FlagMap,
	column_visibility: FlagMap,
}

/// Writes URL updates, spacing navigations by the throttle interval.
struct UrlWriter {
	navigator: Arc<dyn Navigator>,
	throttle: Arc<Throttle>,
	deferred: PendingWrite<String, Option<String>>,
}

impl UrlWriter {
	fn new(navigator: Arc<dyn Navigator>, options: NavigateOptions, throttle: Throttle) -> Self {
		let throttle = Arc::new(throttle);
		let deferred = {
			let navigator = Arc::clone(&navigator);
			let throttle = Arc::clone(&throttle);
			PendingWrite::new(throttle.interval(), move |updates: ParamUpdates| {
				navigator.navigate(&updates, &options);
				throttle.mark();
			})
		};
		Self {
			navigator,
			throttle,
			deferred,
		}
	}

	fn write(&self, updates: ParamUpdates, options: &NavigateOptions) {
		if updates.is_empty() {
			return;
		}
		let wait = self.throttle.remaining();
		if wait.is_zero() && !self.deferred.is_pending() {
			self.navigator.navigate(&updates, options);
			self.throttle.mark();
		} else {
			tracing::debug!(wait_ms = wait.as_millis() as u64, "throttling URL write");
			self.deferred.schedule_within(updates, wait);
		}
	}

	/// Current parameters with throttled writes applied
	fn current(&self) -> SearchParams {
		apply_updates(&self.navigator.search_params(), &self.deferred.pending())
	}

	fn flush(&self) {
		self.deferred.flush();
	}
}

/// Controlled table state backed by the URL.
pub struct TableStateSync {
	settings: TableSettings,
	options: NavigateOptions,
	initial_state: InitialState,
	column_ids: BTreeSet<String>,
	filterable: Vec<FilterableColumn>,
	writer: Arc<UrlWriter>,
	filter_writes: PendingWrite<String, Option<String>>,
	local: Mutex<LocalState>,
}

impl TableStateSync {
	pub fn builder(navigator: Arc<dyn Navigator>) -> TableStateSyncBuilder {
		TableStateSyncBuilder {
			navigator,
			columns: Vec::new(),
			settings: TableSettings::default(),
			initial_state: InitialState::default(),
		}
	}

	fn new(
		navigator: Arc<dyn Navigator>,
		columns: &[ColumnDef],
		settings: TableSettings,
		initial_state: InitialState,
	) -> Self {
		let options = NavigateOptions::from(&settings.navigation);
		let writer = Arc::new(UrlWriter::new(
			navigator,
			options,
			Throttle::new(settings.navigation.throttle()),
		));

		let filter_writes = {
			let writer = Arc::clone(&writer);
			PendingWrite::new(settings.navigation.debounce(), move |updates: ParamUpdates| {
				writer.write(updates, &options);
			})
		};

		let mut filterable = Vec::new();
		if !settings.enable_advanced_filters {
			walk_columns(columns, &mut |column: &ColumnDef| {
				if let Some(filter) = column.filter.as_ref().filter(|filter| filter.enabled) {
					filterable.push(FilterableColumn {
						id: column.id.clone(),
						is_array: filter.options.is_some(),
					});
				}
			});
		}

		let sync = Self {
			column_ids: collect_column_ids(columns),
			options,
			filterable,
			writer,
			filter_writes,
			local: Mutex::new(LocalState {
				row_selection: initial_state.row_selection.clone(),
				column_visibility: initial_state.column_visibility.clone(),
				..LocalState::default()
			}),
			settings,
			initial_state,
		};

		let params = sync.search_params();
		let seeded = sync.seed_column_filters(&params);
		let advanced = sync.read_advanced_filters(&params);
		{
			let mut local = sync.local.lock();
			local.column_filters = seeded;
			local.advanced_filters = advanced;
		}
		sync
	}

	/// Current URL parameters, including writes not yet navigated
	pub fn search_params(&self) -> SearchParams {
		self.writer.current()
	}

	pub fn settings(&self) -> &TableSettings {
		&self.settings
	}

	fn default_page_size(&self) -> u32 {
		self.initial_state
			.page_size
			.unwrap_or(self.settings.default_page_size)
			.max(1)
	}

	/// Column allow-list; `None` when the synchronizer has no columns
	fn allowed_ids(&self) -> Option<&BTreeSet<String>> {
		(!self.column_ids.is_empty()).then_some(&self.column_ids)
	}

	fn parser(&self) -> StateParser<'_> {
		let parser = StateParser::from_settings(&self.settings).default_page_size(self.default_page_size());
		match self.allowed_ids() {
			Some(ids) => parser.column_ids(ids),
			None => parser,
		}
	}

	// ------------------------------------------------------------------
	// Pagination
	// ------------------------------------------------------------------

	/// Zero-based pagination read from the URL
	pub fn pagination(&self) -> PaginationIndex {
		let state = self.parser().parse(self.search_params());
		PaginationIndex {
			page_index: state.pagination.page - 1,
			page_size: state.pagination.per_page,
		}
	}

	/// Writes pagination back one-based
	pub fn set_pagination(&self, updater: impl Into<Updater<PaginationIndex>>) {
		let next = updater.into().apply(&self.pagination());
		let page = next.page_index.saturating_add(1);
		let page_size = next.page_size.max(1);

		let mut updates = ParamUpdates::new();
		updates.insert(self.settings.keys.page.clone(), self.encode_default(page, 1));
		updates.insert(
			self.settings.keys.per_page.clone(),
			self.encode_default(page_size, self.default_page_size()),
		);
		self.writer.write(updates, &self.options);
	}

	// ------------------------------------------------------------------
	// Sorting
	// ------------------------------------------------------------------

	/// Sort list from the URL, or the initial sort when absent or invalid
	pub fn sorting(&self) -> Vec<SortDescriptor> {
		self.search_params()
			.get(&self.settings.keys.sort)
			.filter(|raw| !raw.is_empty())
			.and_then(|raw| decode_sorting(raw, self.allowed_ids()))
			.unwrap_or_else(|| self.initial_state.sorting.clone())
	}

	pub fn set_sorting(&self, updater: impl Into<Updater<Vec<SortDescriptor>>>) {
		let next = updater.into().apply(&self.sorting());
		let value = if self.settings.navigation.clear_on_default && next == self.initial_state.sorting {
			None
		} else {
			Some(encode_sorting(&next))
		};

		let mut updates = ParamUpdates::new();
		updates.insert(self.settings.keys.sort.clone(), value);
		self.writer.write(updates, &self.options);
	}

	// ------------------------------------------------------------------
	// Simple filters
	// ------------------------------------------------------------------

	/// Active column filters
	pub fn column_filters(&self) -> Vec<ColumnFilterState> {
		self.local.lock().column_filters.clone()
	}

	/// Ids of columns that own a URL filter key
	pub fn filterable_column_ids(&self) -> Vec<&str> {
		self.filterable.iter().map(|column| column.id.as_str()).collect()
	}

	/// Updates column filters and schedules the debounced URL write.
	///
	/// Filters on filterable columns are written under the column id; filters
	/// that disappeared are written as removals. The page resets to 1 in the
	/// same write. Ignored when advanced filters are enabled.
	pub fn set_column_filters(&self, updater: impl Into<Updater<Vec<ColumnFilterState>>>) {
		if self.settings.enable_advanced_filters {
			return;
		}

		let previous = self.column_filters();
		let next = updater.into().apply(&previous);

		let mut updates = ParamUpdates::new();
		for filter in &next {
			if self.filterable.iter().any(|column| column.id == filter.id) {
				updates.insert(filter.id.clone(), self.encode_filter_value(&filter.value));
			}
		}
		for filter in &previous {
			if !next.iter().any(|candidate| candidate.id == filter.id) {
				updates.insert(filter.id.clone(), None);
			}
		}
		updates.insert(self.settings.keys.page.clone(), self.encode_default(1, 1));

		self.local.lock().column_filters = next;

		tracing::debug!(keys = updates.len(), "scheduling filter write");
		self.filter_writes.schedule_all(updates);
	}

	/// Sets or clears one column filter
	pub fn set_column_filter(&self, id: &str, value: Option<FilterValue>) {
		let id = id.to_string();
		self.set_column_filters(Updater::with(move |previous: &Vec<ColumnFilterState>| {
			let mut next: Vec<ColumnFilterState> = previous
				.iter()
				.filter(|filter| filter.id != id)
				.cloned()
				.collect();
			if let Some(value) = value.and_then(FilterValue::non_empty) {
				next.push(ColumnFilterState { id, value });
			}
			next
		}));
	}

	/// Whether a debounced filter write is waiting
	pub fn has_pending_filters(&self) -> bool {
		self.filter_writes.is_pending()
	}

	fn encode_filter_value(&self, value: &FilterValue) -> Option<String> {
		let separator = self.settings.separator.as_str();
		let encoded = match value {
			FilterValue::Text(text) => text.clone(),
			FilterValue::List(values) => values.join(separator),
			FilterValue::Number(number) => number.to_string(),
			FilterValue::Numbers(numbers) => numbers
				.iter()
				.map(f64::to_string)
				.collect::<Vec<_>>()
				.join(separator),
		};
		if encoded.is_empty() { None } else { Some(encoded) }
	}

	/// Column filters as first seen in the URL.
	///
	/// List columns split on the separator. Scalar values are split on runs of
	/// non-alphanumeric characters.
	fn seed_column_filters(&self, params: &SearchParams) -> Vec<ColumnFilterState> {
		self.filterable
			.iter()
			.filter_map(|column| {
				let definition = FilterDefinition::new(column.id.clone(), FilterVariant::Text)
					.with_expects_array(column.is_array);
				let value = match read_filter_with_separator(params, &definition, &self.settings.separator)? {
					FilterValue::Text(text) => FilterValue::List(split_scalar(&text)),
					other => other,
				};
				value
					.non_empty()
					.map(|value| ColumnFilterState::new(column.id.clone(), value))
			})
			.collect()
	}

	// ------------------------------------------------------------------
	// Advanced filters
	// ------------------------------------------------------------------

	/// Advanced filters, when enabled
	pub fn advanced_filters(&self) -> Vec<AdvancedFilter> {
		self.local.lock().advanced_filters.clone()
	}

	pub fn join_operator(&self) -> JoinOperator {
		decode_join_operator(self.search_params().get(&self.settings.keys.join_operator))
	}

	/// Replaces the advanced filters and schedules the debounced URL write
	pub fn set_advanced_filters(&self, updater: impl Into<Updater<Vec<AdvancedFilter>>>) {
		if !self.settings.enable_advanced_filters {
			return;
		}

		let next: Vec<AdvancedFilter> = updater.into().apply(&self.advanced_filters());
		let valid: Vec<AdvancedFilter> = next.iter().filter(|f| f.is_valid()).cloned().collect();
		self.local.lock().advanced_filters = next;

		let mut updates = ParamUpdates::new();
		updates.insert(
			self.settings.keys.filters.clone(),
			(!valid.is_empty()).then(|| encode_advanced_filters(&valid)),
		);
		updates.insert(self.settings.keys.page.clone(), self.encode_default(1, 1));
		self.filter_writes.schedule_all(updates);
	}

	pub fn set_join_operator(&self, operator: JoinOperator) {
		let value = if self.settings.navigation.clear_on_default && operator == JoinOperator::default() {
			None
		} else {
			Some(operator.to_string())
		};
		let mut updates = ParamUpdates::new();
		updates.insert(self.settings.keys.join_operator.clone(), value);
		self.writer.write(updates, &self.options);
	}

	fn read_advanced_filters(&self, params: &SearchParams) -> Vec<AdvancedFilter> {
		if !self.settings.enable_advanced_filters {
			return Vec::new();
		}
		params
			.get(&self.settings.keys.filters)
			.filter(|raw| !raw.is_empty())
			.map(|raw| decode_advanced_filters(raw, self.allowed_ids()))
			.unwrap_or_default()
	}

	// ------------------------------------------------------------------
	// Local state
	// ------------------------------------------------------------------

	pub fn row_selection(&self) -> FlagMap {
		self.local.lock().row_selection.clone()
	}

	pub fn set_row_selection(&self, updater: impl Into<Updater<FlagMap>>) {
		let next = updater.into().apply(&self.row_selection());
		self.local.lock().row_selection = next;
	}

	/// Ids of selected rows, in id order
	pub fn selected_ids(&self) -> Vec<String> {
		self.local
			.lock()
			.row_selection
			.iter()
			.filter(|(_, selected)| **selected)
			.map(|(id, _)| id.clone())
			.collect()
	}

	pub fn clear_selection(&self) {
		self.local.lock().row_selection.clear();
	}

	pub fn column_visibility(&self) -> FlagMap {
		self.local.lock().column_visibility.clone()
	}

	pub fn set_column_visibility(&self, updater: impl Into<Updater<FlagMap>>) {
		let next = updater.into().apply(&self.column_visibility());
		self.local.lock().column_visibility = next;
	}

	// ------------------------------------------------------------------
	// Lifecycle
	// ------------------------------------------------------------------

	/// Commits every pending write now
	pub fn flush(&self) {
		self.filter_writes.flush();
		self.writer.flush();
	}

	/// Flushes pending writes and releases the synchronizer
	pub fn unmount(self) {
		self.flush();
	}

	fn encode_default(&self, value: u32, default: u32) -> Option<String> {
		if self.settings.navigation.clear_on_default && value == default {
			None
		} else {
			Some(value.to_string())
		}
	}
}

impl Drop for TableStateSync {
	fn drop(&mut self) {
		self.flush();
	}
}

impl fmt::Debug for TableStateSync {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableStateSync")
			.field("settings", &self.settings)
			.field("filterable", &self.filterable)
			.field("filter_writes", &self.filter_writes)
			.finish_non_exhaustive()
	}
}

/// Splits a scalar URL value on runs of non-alphanumeric characters
///
/// # Examples
///
/// ```
/// use tablecraft_client::sync::split_scalar;
///
/// assert_eq!(split_scalar("hello world"), vec!["hello", "world"]);
/// assert_eq!(split_scalar("plain"), vec!["plain"]);
/// ```
pub fn split_scalar(value: &str) -> Vec<String> {
	value
		.split(|c: char| !c.is_ascii_alphanumeric())
		.filter(|part| !part.is_empty())
		.map(str::to_string)
		.collect()
}

/// Builder for [`TableStateSync`].
pub struct TableStateSyncBuilder {
	navigator: Arc<dyn Navigator>,
	columns: Vec<ColumnDef>,
	settings: TableSettings,
	initial_state: InitialState,
}

impl TableStateSyncBuilder {
	pub fn columns(mut self, columns: Vec<ColumnDef>) -> Self {
		self.columns = columns;
		self
	}

	pub fn settings(mut self, settings: TableSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn initial_state(mut self, initial_state: InitialState) -> Self {
		self.initial_state = initial_state;
		self
	}

	/// Mounts the synchronizer, seeding local state from the URL
	pub fn build(self) -> TableStateSync {
		TableStateSync::new(self.navigator, &self.columns, self.settings, self.initial_state)
	}
}
