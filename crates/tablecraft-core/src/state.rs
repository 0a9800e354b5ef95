//! URL state parsing
//!
//! [`StateParser`] turns search parameters into typed table state:
//! pagination, sorting, raw simple filters and (optionally) advanced
//! filters. Parsing never fails. Malformed values fall back to defaults and
//! are logged at `debug` level.
//!
//! # Example
//!
//! ```
//! use tablecraft_core::filters::{FilterDefinition, FilterValue, FilterVariant};
//! use tablecraft_core::state::StateParser;
//!
//! let definitions = vec![FilterDefinition::new("status", FilterVariant::MultiSelect)];
//! let state = StateParser::new()
//!     .filter_definitions(&definitions)
//!     .parse("page=2&status=done,todo");
//!
//! assert_eq!(state.pagination.page, 2);
//! assert_eq!(state.pagination.per_page, 10);
//! assert_eq!(
//!     state.raw_filters["status"],
//!     Some(FilterValue::from(vec!["done", "todo"]))
//! );
//! ```

use crate::constants::ARRAY_SEPARATOR;
use crate::filters::{
	AdvancedFilter, FilterDefinition, FilterMap, FilterValue, JoinOperator, RawFilterValue,
	decode_advanced_filters, decode_join_operator,
};
use crate::pagination::{PaginationState, clamp_to_minimum, parse_integer};
use crate::params::SearchParams;
use crate::settings::{QueryKeys, TableSettings};
use crate::sorting::{SortDescriptor, decode_sorting};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Everything read from the URL for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedState {
	pub pagination: PaginationState,
	pub sorting: Vec<SortDescriptor>,
	/// Simple filters keyed by definition id; every definition is present
	pub raw_filters: FilterMap,
	pub advanced_filters: Vec<AdvancedFilter>,
	pub join_operator: JoinOperator,
	/// Normalized copy of the input parameters
	pub search_params: SearchParams,
}

/// Reads table state from search parameters.
///
/// The parser borrows its configuration, so building one per request is
/// cheap.
#[derive(Debug, Clone)]
pub struct StateParser<'a> {
	keys: QueryKeys,
	default_page_size: u32,
	separator: String,
	column_ids: Option<&'a BTreeSet<String>>,
	filter_definitions: &'a [FilterDefinition],
	enable_advanced_filters: bool,
}

impl Default for StateParser<'_> {
	fn default() -> Self {
		Self::new()
	}
}

impl<'a> StateParser<'a> {
	/// A parser with default keys and page size and no filters
	pub fn new() -> Self {
		Self::from_settings(&TableSettings::default())
	}

	/// A parser using the keys, page size, list separator and advanced-filter
	/// switch of `settings`
	pub fn from_settings(settings: &TableSettings) -> Self {
		Self {
			keys: settings.keys.clone(),
			default_page_size: settings.default_page_size.max(1),
			separator: settings.separator.clone(),
			column_ids: None,
			filter_definitions: &[],
			enable_advanced_filters: settings.enable_advanced_filters,
		}
	}

	/// Page size used when `perPage` is missing or too small
	pub fn default_page_size(mut self, page_size: u32) -> Self {
		self.default_page_size = page_size.max(1);
		self
	}

	/// List separator for definitions that do not set their own
	pub fn separator(mut self, separator: impl Into<String>) -> Self {
		self.separator = separator.into();
		self
	}

	/// Restricts sort and advanced filter ids to these columns
	pub fn column_ids(mut self, column_ids: &'a BTreeSet<String>) -> Self {
		self.column_ids = Some(column_ids);
		self
	}

	/// Simple filters to read
	pub fn filter_definitions(mut self, definitions: &'a [FilterDefinition]) -> Self {
		self.filter_definitions = definitions;
		self
	}

	/// Enables reading the advanced filter key
	pub fn advanced_filters(mut self, enabled: bool) -> Self {
		self.enable_advanced_filters = enabled;
		self
	}

	/// Overrides the query key names
	pub fn keys(mut self, keys: QueryKeys) -> Self {
		self.keys = keys;
		self
	}

	/// Parses any search parameter source
	pub fn parse(&self, input: impl Into<SearchParams>) -> ParsedState {
		let params: SearchParams = input.into();

		let pagination = self.parse_pagination(&params);
		let sorting = self.parse_sorting(&params);
		let raw_filters = self.parse_filters(&params);

		let (advanced_filters, join_operator) = if self.enable_advanced_filters {
			let filters = params
				.get(&self.keys.filters)
				.filter(|raw| !raw.is_empty())
				.map(|raw| decode_advanced_filters(raw, self.column_ids))
				.unwrap_or_default();
			(filters, decode_join_operator(params.get(&self.keys.join_operator)))
		} else {
			(Vec::new(), JoinOperator::And)
		};

		ParsedState {
			pagination,
			sorting,
			raw_filters,
			advanced_filters,
			join_operator,
			search_params: params,
		}
	}

	fn parse_pagination(&self, params: &SearchParams) -> PaginationState {
		PaginationState {
			page: clamp_to_minimum(parse_integer(params.get(&self.keys.page)), 1),
			per_page: clamp_to_minimum(
				parse_integer(params.get(&self.keys.per_page)),
				self.default_page_size,
			),
		}
	}

	fn parse_sorting(&self, params: &SearchParams) -> Vec<SortDescriptor> {
		match params.get(&self.keys.sort) {
			Some(raw) if !raw.is_empty() => decode_sorting(raw, self.column_ids).unwrap_or_default(),
			_ => Vec::new(),
		}
	}

	fn parse_filters(&self, params: &SearchParams) -> FilterMap {
		self.filter_definitions
			.iter()
			.map(|definition| {
				let value = read_filter_with_separator(params, definition, &self.separator);
				(definition.id.clone(), value)
			})
			.collect::<BTreeMap<_, _>>()
	}
}

/// Reads one simple filter.
///
/// Repeated keys form a list. A single value is split on the separator when
/// the definition is list-shaped. Scalar definitions keep only the first list
/// element. Empty results become `None`.
pub fn read_filter(params: &SearchParams, definition: &FilterDefinition) -> Option<FilterValue> {
	read_filter_with_separator(params, definition, ARRAY_SEPARATOR)
}

/// Like [`read_filter`], splitting on `default_separator` unless the
/// definition sets its own separator
pub fn read_filter_with_separator(
	params: &SearchParams,
	definition: &FilterDefinition,
	default_separator: &str,
) -> Option<FilterValue> {
	let values = params.get_all(definition.query_key());
	let expects_array = definition.is_array();
	let separator = definition.separator.as_deref().unwrap_or(default_separator);

	let raw = match values.as_slice() {
		[] => None,
		[single] if expects_array => Some(RawFilterValue::List(split_list(single, separator))),
		[single] => Some(RawFilterValue::Text((*single).to_string())),
		many => Some(RawFilterValue::List(many.iter().map(|v| v.to_string()).collect())),
	};

	let normalized = match raw {
		Some(RawFilterValue::List(values)) if !expects_array => values.into_iter().next().map(RawFilterValue::Text),
		other => other,
	};

	definition
		.parse_value(normalized)
		.and_then(FilterValue::non_empty)
}

/// Splits a separated list, trimming entries and dropping empty ones
pub fn split_list(raw: &str, separator: &str) -> Vec<String> {
	if separator.is_empty() {
		let trimmed = raw.trim();
		return if trimmed.is_empty() {
			Vec::new()
		} else {
			vec![trimmed.to_string()]
		};
	}
	raw.split(separator)
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.map(str::to_string)
		.collect()
}

/// Client-side starting state supplied with a table definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialState {
	/// Sort applied when the URL carries none
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub sorting: Vec<SortDescriptor>,
	/// Initial column visibility (`false` hides)
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub column_visibility: BTreeMap<String, bool>,
	/// Initially selected row ids
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub row_selection: BTreeMap<String, bool>,
	/// Page size used when the URL carries none
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_size: Option<u32>,
}
