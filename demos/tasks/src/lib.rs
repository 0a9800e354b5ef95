//! Task tracker demo
//!
//! An in-memory task list served through a tablecraft [`ServerTable`]:
//! text search, status/priority/assignee facets with counts, multi-column
//! sorting, summary metadata and create/update/delete actions.
//!
//! [`ServerTable`]: tablecraft_server::ServerTable

pub mod actions;
pub mod data;
pub mod fetch;
pub mod table;

pub use actions::{
	ACTION_LATENCY, CreateTaskInput, DeleteTasksInput, DeleteTasksOutput, TaskPatch, UpdateTaskInput,
	task_features,
};
pub use data::{TASK_COUNT, TASKS, Task};
pub use fetch::{
	FacetCount, FacetCounts, TaskDimension, TaskFetcher, TaskFilterTransform, TaskFilters,
	TaskTableMeta, facet_counts,
};
pub use table::{TASK_ENTITY, TasksTable, task_columns, tasks_table};
