//! Task data source
//!
//! Filtering, multi-column sorting, pagination and facet counts over
//! [`TASKS`]. Facet counts for a dimension ignore that dimension's own filter,
//! so every option of an active filter keeps a meaningful count.

use crate::data::{FieldValue, TASKS, Task, assignee_options, priority_options, status_options};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tablecraft_core::columns::FilterOption;
use tablecraft_core::error::Result;
use tablecraft_core::filters::{FilterMap, FilterValue};
use tablecraft_core::query::{ListResult, Query};
use tablecraft_core::sorting::SortDescriptor;
use tablecraft_server::{CountFetcher, FilterTransform, RowFetcher};

/// Typed task filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilters {
	/// Case-insensitive search over title, id and assignee
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub status: Vec<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub priority: Vec<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub assignee: Vec<String>,
}

/// Aggregates over every filtered task, not just the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTableMeta {
	pub total_estimated_hours: f64,
	/// Mean completion, rounded to two decimals
	pub average_completion: f64,
}

/// Option value to number of matching tasks
pub type FacetCounts = BTreeMap<String, u64>;

/// A facet dimension of the task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskDimension {
	Status,
	Priority,
	Assignee,
}

impl TaskDimension {
	pub const ALL: [TaskDimension; 3] = [Self::Status, Self::Priority, Self::Assignee];

	/// Count name and column id
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Status => "status",
			Self::Priority => "priority",
			Self::Assignee => "assignee",
		}
	}

	pub fn options(self) -> Vec<FilterOption> {
		match self {
			Self::Status => status_options(),
			Self::Priority => priority_options(),
			Self::Assignee => assignee_options(),
		}
	}

	fn value(self, task: &Task) -> &str {
		match self {
			Self::Status => &task.status,
			Self::Priority => &task.priority,
			Self::Assignee => &task.assignee,
		}
	}

	fn clear(self, filters: &mut TaskFilters) {
		match self {
			Self::Status => filters.status.clear(),
			Self::Priority => filters.priority.clear(),
			Self::Assignee => filters.assignee.clear(),
		}
	}
}

// ============================================================================
// Filter transform
// ============================================================================

/// Converts raw URL filters into [`TaskFilters`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilterTransform;

fn text_filter(raw: &FilterMap, key: &str) -> Option<String> {
	match raw.get(key)? {
		Some(FilterValue::Text(text)) if !text.is_empty() => Some(text.clone()),
		_ => None,
	}
}

fn list_filter(raw: &FilterMap, key: &str) -> Vec<String> {
	match raw.get(key) {
		Some(Some(FilterValue::List(values))) => values
			.iter()
			.filter(|value| !value.is_empty())
			.cloned()
			.collect(),
		_ => Vec::new(),
	}
}

#[async_trait]
impl FilterTransform<TaskFilters> for TaskFilterTransform {
	async fn transform(&self, raw: FilterMap) -> Result<TaskFilters> {
		Ok(TaskFilters {
			title: text_filter(&raw, "title"),
			status: list_filter(&raw, "status"),
			priority: list_filter(&raw, "priority"),
			assignee: list_filter(&raw, "assignee"),
		})
	}
}

// ============================================================================
// Rows
// ============================================================================

fn matches(task: &Task, filters: &TaskFilters) -> bool {
	if let Some(search) = &filters.title {
		let search = search.to_lowercase();
		let hit = [&task.title, &task.id, &task.assignee]
			.iter()
			.any(|field| field.to_lowercase().contains(&search));
		if !hit {
			return false;
		}
	}

	let within = |selected: &[String], value: &str| selected.is_empty() || selected.iter().any(|s| s == value);
	within(&filters.status, &task.status)
		&& within(&filters.priority, &task.priority)
		&& within(&filters.assignee, &task.assignee)
}

/// Tasks matching `filters`, in dataset order
pub fn apply_filters<'a>(tasks: &'a [Task], filters: &TaskFilters) -> Vec<&'a Task> {
	tasks.iter().filter(|task| matches(task, filters)).collect()
}

fn compare_fields(a: Option<FieldValue>, b: Option<FieldValue>) -> Ordering {
	match (a, b) {
		(Some(FieldValue::Number(a)), Some(FieldValue::Number(b))) => a.total_cmp(&b),
		(Some(FieldValue::Text(a)), Some(FieldValue::Text(b))) => a.to_lowercase().cmp(&b.to_lowercase()),
		_ => Ordering::Equal,
	}
}

/// Sorts by each descriptor in turn; later descriptors break ties
pub fn apply_sorting(tasks: &mut [&Task], sorting: &[SortDescriptor]) {
	if sorting.is_empty() {
		return;
	}
	tasks.sort_by(|a, b| {
		sorting
			.iter()
			.map(|sort| {
				let ordering = compare_fields(a.field(&sort.id), b.field(&sort.id));
				if sort.desc { ordering.reverse() } else { ordering }
			})
			.find(|ordering| ordering.is_ne())
			.unwrap_or(Ordering::Equal)
	});
}

fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

fn summarize(tasks: &[&Task]) -> TaskTableMeta {
	let total_estimated_hours = tasks.iter().map(|task| task.estimated_hours).sum();
	let average_completion = if tasks.is_empty() {
		0.0
	} else {
		let sum: f64 = tasks.iter().map(|task| f64::from(task.completed_percentage)).sum();
		round2(sum / tasks.len() as f64)
	};
	TaskTableMeta {
		total_estimated_hours,
		average_completion,
	}
}

/// Serves pages of [`TASKS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFetcher;

#[async_trait]
impl RowFetcher<TaskFilters, Task, TaskTableMeta> for TaskFetcher {
	async fn fetch(&self, query: Query<TaskFilters>) -> Result<ListResult<Task, TaskTableMeta>> {
		let mut filtered = apply_filters(&TASKS, &query.filters);
		apply_sorting(&mut filtered, &query.sorting);

		let meta = summarize(&filtered);
		let total = filtered.len() as u64;
		let rows: Vec<Task> = filtered
			.into_iter()
			.skip(query.pagination.offset())
			.take(query.pagination.limit())
			.cloned()
			.collect();

		tracing::debug!(total, rows = rows.len(), page = query.pagination.page, "fetched tasks");
		Ok(ListResult::new(rows).with_total(total).with_meta(meta))
	}
}

// ============================================================================
// Facet counts
// ============================================================================

/// Counts tasks per option of one dimension.
///
/// Every option starts at zero; values outside the option list are not
/// counted.
pub fn facet_counts(dimension: TaskDimension, filters: &TaskFilters) -> FacetCounts {
	let mut counts: FacetCounts = dimension
		.options()
		.into_iter()
		.map(|option| (option.value, 0))
		.collect();

	let mut filters = filters.clone();
	dimension.clear(&mut filters);
	for task in apply_filters(&TASKS, &filters) {
		if let Some(count) = counts.get_mut(dimension.value(task)) {
			*count += 1;
		}
	}
	counts
}

/// [`CountFetcher`] for one dimension.
#[derive(Debug, Clone, Copy)]
pub struct FacetCount(pub TaskDimension);

#[async_trait]
impl CountFetcher<TaskFilters, FacetCounts> for FacetCount {
	async fn count(&self, query: Query<TaskFilters>) -> Result<FacetCounts> {
		Ok(facet_counts(self.0, &query.filters))
	}
}
