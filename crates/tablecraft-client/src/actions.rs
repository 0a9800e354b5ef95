//! Action triggers
//!
//! [`TableActions`] connects the renderer's create/delete controls to a
//! table's [`FeatureRegistry`]. Controls are only offered for registered
//! actions.

use crate::sync::TableStateSync;
use serde_json::{Value, json};
use tablecraft_core::error::Result;
use tablecraft_core::features::{FeatureDescriptor, FeatureKey, FeatureRegistry};

/// Create/update/delete triggers for one table.
#[derive(Debug, Clone)]
pub struct TableActions {
	registry: FeatureRegistry,
	create_payload: Value,
}

impl TableActions {
	pub fn new(registry: FeatureRegistry) -> Self {
		Self {
			registry,
			create_payload: json!({}),
		}
	}

	/// Payload sent by the create control
	pub fn with_create_payload(mut self, payload: Value) -> Self {
		self.create_payload = payload;
		self
	}

	pub fn registry(&self) -> &FeatureRegistry {
		&self.registry
	}

	/// Whether the control for `key` should be shown
	pub fn can(&self, key: &FeatureKey) -> bool {
		self.registry.is_available(key)
	}

	/// Descriptors of the controls to render
	pub fn controls(&self) -> Vec<FeatureDescriptor> {
		self.registry.controls()
	}

	/// Runs the create action with the default payload
	pub async fn create(&self) -> Result<Value> {
		self.registry
			.invoke(&FeatureKey::Create, self.create_payload.clone())
			.await
	}

	/// Runs the update action
	pub async fn update(&self, payload: Value) -> Result<Value> {
		self.registry.invoke(&FeatureKey::Update, payload).await
	}

	/// Deletes the selected rows and clears the selection on success
	///
	/// Returns `Ok(None)` without calling the action when nothing is selected.
	pub async fn delete_selected(&self, sync: &TableStateSync) -> Result<Option<Value>> {
		let ids = sync.selected_ids();
		if ids.is_empty() {
			return Ok(None);
		}

		let output = self
			.registry
			.invoke(&FeatureKey::Delete, json!({ "ids": ids }))
			.await?;
		sync.clear_selection();
		Ok(Some(output))
	}

	/// Runs any registered action
	pub async fn run(&self, key: &FeatureKey, payload: Value) -> Result<Value> {
		self.registry.invoke(key, payload).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::navigation::MemoryNavigator;
	use parking_lot::Mutex;
	use rstest::rstest;
	use std::sync::Arc;
	use tablecraft_core::error::TableError;
	use tablecraft_core::features::ActionConfig;

	fn recording_registry(calls: Arc<Mutex<Vec<(String, Value)>>>) -> FeatureRegistry {
		let create_calls = Arc::clone(&calls);
		let delete_calls = calls;
		FeatureRegistry::new()
			.with(
				FeatureKey::Create,
				ActionConfig::new(move |input| {
					create_calls.lock().push(("create".into(), input.clone()));
					async move { Ok(input) }
				}),
			)
			.with(
				FeatureKey::Delete,
				ActionConfig::new(move |input| {
					delete_calls.lock().push(("delete".into(), input));
					async { Ok(json!({ "deleted": 2 })) }
				}),
			)
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_sends_default_payload() {
		// Arrange
		let calls = Arc::new(Mutex::new(Vec::new()));
		let actions = TableActions::new(recording_registry(Arc::clone(&calls)))
			.with_create_payload(json!({ "title": "Untitled task" }));

		// Act
		let output = actions.create().await.unwrap();

		// Assert
		assert_eq!(output["title"], "Untitled task");
		assert_eq!(calls.lock()[0].0, "create");
	}

	#[rstest]
	#[tokio::test]
	async fn test_delete_selected_sends_ids_and_clears_selection() {
		// Arrange
		let calls = Arc::new(Mutex::new(Vec::new()));
		let actions = TableActions::new(recording_registry(Arc::clone(&calls)));
		let sync = TableStateSync::builder(Arc::new(MemoryNavigator::default())).build();
		sync.set_row_selection(
			[("T-2".to_string(), true), ("T-1".to_string(), true), ("T-3".to_string(), false)]
				.into_iter()
				.collect::<crate::sync::FlagMap>(),
		);

		// Act
		let output = actions.delete_selected(&sync).await.unwrap();

		// Assert
		assert_eq!(output, Some(json!({ "deleted": 2 })));
		assert_eq!(calls.lock()[0].1, json!({ "ids": ["T-1", "T-2"] }));
		assert!(sync.selected_ids().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_delete_without_selection_is_noop() {
		let calls = Arc::new(Mutex::new(Vec::new()));
		let actions = TableActions::new(recording_registry(Arc::clone(&calls)));
		let sync = TableStateSync::builder(Arc::new(MemoryNavigator::default())).build();

		assert_eq!(actions.delete_selected(&sync).await.unwrap(), None);
		assert!(calls.lock().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_failed_delete_keeps_selection() {
		// Arrange
		let registry = FeatureRegistry::new().with(
			FeatureKey::Delete,
			ActionConfig::new(|_| async { Err(TableError::not_found("task", "T-1")) }),
		);
		let actions = TableActions::new(registry);
		let sync = TableStateSync::builder(Arc::new(MemoryNavigator::default())).build();
		sync.set_row_selection(crate::sync::FlagMap::from([("T-1".to_string(), true)]));

		// Act
		let result = actions.delete_selected(&sync).await;

		// Assert
		assert!(result.is_err());
		assert_eq!(sync.selected_ids(), vec!["T-1"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_unregistered_control_is_hidden_and_fails() {
		let actions = TableActions::new(FeatureRegistry::new());

		assert!(!actions.can(&FeatureKey::Update));
		assert!(actions.controls().is_empty());
		assert!(matches!(
			actions.update(json!({})).await,
			Err(TableError::UnknownAction(_))
		));
	}
}
