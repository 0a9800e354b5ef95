//! Task dataset
//!
//! A fixed, deterministic set of tasks held in memory for the lifetime of the
//! process.

use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tablecraft_core::columns::FilterOption;

/// Number of tasks in [`TASKS`]
pub const TASK_COUNT: usize = 60;

/// One task row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
	pub id: String,
	pub title: String,
	pub status: String,
	pub priority: String,
	pub assignee: String,
	pub due_date: NaiveDate,
	pub estimated_hours: f64,
	/// 0 to 100
	pub completed_percentage: u8,
}

/// A sortable field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
	Number(f64),
	Text(String),
}

impl Task {
	/// Value of the column `id`, if the task has one
	pub fn field(&self, id: &str) -> Option<FieldValue> {
		let value = match id {
			"id" => FieldValue::Text(self.id.clone()),
			"title" => FieldValue::Text(self.title.clone()),
			"status" => FieldValue::Text(self.status.clone()),
			"priority" => FieldValue::Text(self.priority.clone()),
			"assignee" => FieldValue::Text(self.assignee.clone()),
			"dueDate" => FieldValue::Text(self.due_date.to_string()),
			"estimatedHours" => FieldValue::Number(self.estimated_hours),
			"completedPercentage" => FieldValue::Number(f64::from(self.completed_percentage)),
			_ => return None,
		};
		Some(value)
	}
}

const STATUSES: [(&str, &str); 5] = [
	("Todo", "todo"),
	("In progress", "in-progress"),
	("In review", "review"),
	("Blocked", "blocked"),
	("Done", "done"),
];

const PRIORITIES: [(&str, &str); 4] = [
	("Low", "low"),
	("Medium", "medium"),
	("High", "high"),
	("Critical", "critical"),
];

const ASSIGNEES: [(&str, &str); 6] = [
	("Ada Park", "ada"),
	("Bruno Silva", "bruno"),
	("Chen Wei", "chen"),
	("Dana Ortiz", "dana"),
	("Emeka Obi", "emeka"),
	("Farah Haddad", "farah"),
];

const VERBS: [&str; 8] = [
	"Draft", "Review", "Migrate", "Audit", "Refactor", "Document", "Benchmark", "Ship",
];

const SUBJECTS: [&str; 10] = [
	"billing export",
	"onboarding flow",
	"search index",
	"quarterly report",
	"audit log",
	"release notes",
	"cache layer",
	"status page",
	"invoice templates",
	"access policies",
];

fn options(entries: &[(&str, &str)]) -> Vec<FilterOption> {
	entries
		.iter()
		.map(|(label, value)| FilterOption::new(*label, *value))
		.collect()
}

/// Status filter options
pub fn status_options() -> Vec<FilterOption> {
	options(&STATUSES)
}

/// Priority filter options
pub fn priority_options() -> Vec<FilterOption> {
	options(&PRIORITIES)
}

/// Assignee filter options
pub fn assignee_options() -> Vec<FilterOption> {
	options(&ASSIGNEES)
}

fn generate(index: usize) -> Task {
	let base = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap_or_default();
	let (_, status) = STATUSES[index % STATUSES.len()];
	let (_, priority) = PRIORITIES[(index * 3 + index / 5) % PRIORITIES.len()];
	let (_, assignee) = ASSIGNEES[(index * 7) % ASSIGNEES.len()];

	let completed_percentage = match status {
		"todo" => 0,
		"done" => 100,
		_ => ((index * 13) % 90 + 5) as u8,
	};

	Task {
		id: format!("T-{:04}", 1001 + index),
		title: format!(
			"{} {}",
			VERBS[index % VERBS.len()],
			SUBJECTS[(index / VERBS.len() + index) % SUBJECTS.len()]
		),
		status: status.to_string(),
		priority: priority.to_string(),
		assignee: assignee.to_string(),
		due_date: base + Days::new(((index * 11) % 120) as u64),
		estimated_hours: ((index * 7) % 16 + 1) as f64 / 2.0,
		completed_percentage,
	}
}

/// The demo dataset
pub static TASKS: Lazy<Vec<Task>> = Lazy::new(|| (0..TASK_COUNT).map(generate).collect());

/// Finds a task by id
pub fn find_task(id: &str) -> Option<&'static Task> {
	TASKS.iter().find(|task| task.id == id)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::BTreeSet;

	#[rstest]
	fn test_dataset_is_deterministic() {
		let again: Vec<Task> = (0..TASK_COUNT).map(generate).collect();
		assert_eq!(*TASKS, again);
	}

	#[rstest]
	fn test_ids_are_unique() {
		let ids: BTreeSet<&str> = TASKS.iter().map(|task| task.id.as_str()).collect();
		assert_eq!(ids.len(), TASK_COUNT);
	}

	#[rstest]
	fn test_every_option_value_is_used() {
		for option in status_options() {
			assert!(TASKS.iter().any(|task| task.status == option.value), "{}", option.value);
		}
		for option in priority_options() {
			assert!(TASKS.iter().any(|task| task.priority == option.value), "{}", option.value);
		}
		for option in assignee_options() {
			assert!(TASKS.iter().any(|task| task.assignee == option.value), "{}", option.value);
		}
	}

	#[rstest]
	#[case("dueDate", Some(FieldValue::Text("2024-01-08".to_string())))]
	#[case("estimatedHours", Some(FieldValue::Number(0.5)))]
	#[case("unknown", None)]
	fn test_field_lookup(#[case] id: &str, #[case] expected: Option<FieldValue>) {
		assert_eq!(TASKS[0].field(id), expected);
	}
}
