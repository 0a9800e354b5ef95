//! Task mutations
//!
//! The dataset is read-only: create and update echo the resulting task, and
//! delete reports what would remain. Each action waits [`ACTION_LATENCY`]
//! before answering.

use crate::data::{TASKS, Task, find_task};
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tablecraft_core::error::{Result, TableError};
use tablecraft_core::features::{ActionConfig, FeatureKey, FeatureRegistry};

/// Simulated round trip of every action
pub const ACTION_LATENCY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
	pub title: String,
	pub status: String,
	pub priority: String,
	pub assignee: String,
	pub due_date: NaiveDate,
	pub estimated_hours: f64,
}

/// Fields to overwrite on an existing task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
	pub title: Option<String>,
	pub status: Option<String>,
	pub priority: Option<String>,
	pub assignee: Option<String>,
	pub due_date: Option<NaiveDate>,
	pub estimated_hours: Option<f64>,
	pub completed_percentage: Option<u8>,
}

impl TaskPatch {
	fn apply(self, mut task: Task) -> Task {
		if let Some(title) = self.title {
			task.title = title;
		}
		if let Some(status) = self.status {
			task.status = status;
		}
		if let Some(priority) = self.priority {
			task.priority = priority;
		}
		if let Some(assignee) = self.assignee {
			task.assignee = assignee;
		}
		if let Some(due_date) = self.due_date {
			task.due_date = due_date;
		}
		if let Some(hours) = self.estimated_hours {
			task.estimated_hours = hours;
		}
		if let Some(completed) = self.completed_percentage {
			task.completed_percentage = completed.min(100);
		}
		task
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskInput {
	pub id: String,
	#[serde(default)]
	pub patch: TaskPatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTasksInput {
	pub ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTasksOutput {
	pub deleted: Vec<String>,
	/// Tasks left after removing `deleted`
	pub remaining: usize,
}

async fn simulate_latency() {
	tokio::time::sleep(ACTION_LATENCY).await;
}

pub async fn create_task(input: CreateTaskInput) -> Result<Task> {
	simulate_latency().await;
	let id = format!("T-{}", rand::thread_rng().gen_range(0..10_000));
	tracing::info!(%id, title = %input.title, "created task");
	Ok(Task {
		id,
		title: input.title,
		status: input.status,
		priority: input.priority,
		assignee: input.assignee,
		due_date: input.due_date,
		estimated_hours: input.estimated_hours,
		completed_percentage: 0,
	})
}

pub async fn update_task(input: UpdateTaskInput) -> Result<Task> {
	simulate_latency().await;
	let existing = find_task(&input.id).ok_or_else(|| TableError::not_found("task", &input.id))?;
	tracing::info!(id = %input.id, "updated task");
	Ok(input.patch.apply(existing.clone()))
}

pub async fn delete_tasks(input: DeleteTasksInput) -> Result<DeleteTasksOutput> {
	simulate_latency().await;
	let remaining = TASKS
		.iter()
		.filter(|task| !input.ids.contains(&task.id))
		.count();
	tracing::info!(deleted = input.ids.len(), remaining, "deleted tasks");
	Ok(DeleteTasksOutput {
		deleted: input.ids,
		remaining,
	})
}

/// Create, update and delete registered with their UI text
pub fn task_features() -> FeatureRegistry {
	FeatureRegistry::new()
		.with(
			FeatureKey::Create,
			ActionConfig::typed(create_task)
				.label("Create task")
				.description("Create a new task record.")
				.success_message("Task created"),
		)
		.with(
			FeatureKey::Update,
			ActionConfig::typed(update_task)
				.label("Update task")
				.description("Update the selected task.")
				.success_message("Task updated"),
		)
		.with(
			FeatureKey::Delete,
			ActionConfig::typed(delete_tasks)
				.label("Delete tasks")
				.description("Remove selected tasks.")
				.confirmation_message("This will permanently delete the selected tasks.")
				.success_message("Tasks deleted"),
		)
}
