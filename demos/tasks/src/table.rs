//! Task table definition

use crate::actions::task_features;
use crate::data::Task;
use crate::fetch::{FacetCount, FacetCounts, TaskDimension, TaskFetcher, TaskFilterTransform, TaskFilters, TaskTableMeta};
use std::collections::BTreeMap;
use tablecraft_core::columns::{ColumnDef, ColumnFilter, Columns, ColumnsContext};
use tablecraft_core::filters::FilterVariant;
use tablecraft_core::sorting::SortDescriptor;
use tablecraft_core::state::InitialState;
use tablecraft_server::ServerTable;

/// The task table's server half
pub type TasksTable = ServerTable<Task, TaskFilters, FacetCounts, TaskTableMeta>;

/// Entity name of the task table
pub const TASK_ENTITY: &str = "task";

fn facet_filter(dimension: TaskDimension, counts: &BTreeMap<String, FacetCounts>) -> ColumnFilter {
	let counts = counts.get(dimension.as_str());
	let options = dimension
		.options()
		.into_iter()
		.map(|option| {
			let count = counts
				.and_then(|counts| counts.get(&option.value))
				.copied()
				.unwrap_or(0);
			option.with_count(count)
		})
		.collect();
	ColumnFilter::new(FilterVariant::MultiSelect).options(options)
}

/// Task columns, with facet counts attached to the option lists
pub fn task_columns(context: &ColumnsContext<'_, FacetCounts>) -> Vec<ColumnDef> {
	vec![
		ColumnDef::new("select").sortable(false).hideable(false),
		ColumnDef::new("id").label("Task").hideable(false),
		ColumnDef::new("title").label("Title").filter(
			ColumnFilter::new(FilterVariant::Text).placeholder("Search tasks..."),
		),
		ColumnDef::new("status")
			.label("Status")
			.filter(facet_filter(TaskDimension::Status, context.counts)),
		ColumnDef::new("priority")
			.label("Priority")
			.filter(facet_filter(TaskDimension::Priority, context.counts)),
		ColumnDef::new("assignee")
			.label("Assignee")
			.filter(facet_filter(TaskDimension::Assignee, context.counts)),
		ColumnDef::new("dueDate")
			.label("Due")
			.filter(ColumnFilter::new(FilterVariant::Date)),
		ColumnDef::new("estimatedHours")
			.label("Estimate")
			.filter(ColumnFilter::new(FilterVariant::Number).unit("h")),
		ColumnDef::new("completedPercentage").label("Progress"),
	]
}

/// Builds the task table
///
/// # Examples
///
/// ```
/// use tablecraft_demo_tasks::tasks_table;
///
/// # #[tokio::main]
/// # async fn main() {
/// let table = tasks_table();
/// let result = table.load("status=done&perPage=5").await.unwrap();
/// assert!(result.rows.iter().all(|task| task.status == "done"));
/// assert!(result.rows.len() <= 5);
/// # }
/// ```
pub fn tasks_table() -> TasksTable {
	let mut builder = ServerTable::builder_with_transform(TASK_ENTITY, TaskFilterTransform, TaskFetcher)
		.columns(Columns::factory(task_columns))
		.default_page_size(10)
		.initial_state(InitialState {
			sorting: vec![SortDescriptor::asc("dueDate")],
			column_visibility: BTreeMap::from([("estimatedHours".to_string(), true)]),
			..InitialState::default()
		})
		.features(task_features());

	for dimension in TaskDimension::ALL {
		builder = builder.count(dimension.as_str(), FacetCount(dimension));
	}
	builder.build()
}
