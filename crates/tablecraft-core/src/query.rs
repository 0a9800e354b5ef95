//! Query assembly
//!
//! A [`Query`] is the immutable unit handed to row and count fetchers. It is
//! built from [`ParsedState`] plus the filters produced by the table's filter
//! transform.

use crate::filters::{AdvancedFilter, JoinOperator};
use crate::pagination::PaginationState;
use crate::params::SearchParams;
use crate::sorting::SortDescriptor;
use crate::state::ParsedState;
use serde::{Deserialize, Serialize};

/// Everything a fetcher needs to produce one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query<F> {
	pub pagination: PaginationState,
	pub sorting: Vec<SortDescriptor>,
	/// Filters after the table's transform
	pub filters: F,
	pub advanced_filters: Vec<AdvancedFilter>,
	pub join_operator: JoinOperator,
	pub search_params: SearchParams,
}

impl<F> Query<F> {
	/// Replaces the filters, keeping everything else
	pub fn map_filters<G>(self, f: impl FnOnce(F) -> G) -> Query<G> {
		Query {
			pagination: self.pagination,
			sorting: self.sorting,
			filters: f(self.filters),
			advanced_filters: self.advanced_filters,
			join_operator: self.join_operator,
			search_params: self.search_params,
		}
	}
}

/// Builds the fetcher query from parsed state and transformed filters
pub fn build_query<F>(state: &ParsedState, filters: F) -> Query<F> {
	Query {
		pagination: state.pagination,
		sorting: state.sorting.clone(),
		filters,
		advanced_filters: state.advanced_filters.clone(),
		join_operator: state.join_operator,
		search_params: state.search_params.clone(),
	}
}

/// One page of rows returned by a row fetcher.
///
/// When both are present, `page_count` wins over `total` for page-count
/// derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<R, M = ()> {
	pub rows: Vec<R>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub page_count: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<M>,
}

impl<R, M> ListResult<R, M> {
	pub fn new(rows: Vec<R>) -> Self {
		Self {
			rows,
			page_count: None,
			total: None,
			meta: None,
		}
	}

	pub fn with_total(mut self, total: u64) -> Self {
		self.total = Some(total);
		self
	}

	pub fn with_page_count(mut self, page_count: i64) -> Self {
		self.page_count = Some(page_count);
		self
	}

	pub fn with_meta(mut self, meta: M) -> Self {
		self.meta = Some(meta);
		self
	}
}
