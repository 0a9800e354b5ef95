//! Feature/action registry
//!
//! Tables expose named actions (create, update, delete, or custom ones)
//! bound to async handlers. A registry is static configuration: it is built
//! once per table definition and invoked per user trigger. Actions that are
//! not registered are not offered to the renderer.
//!
//! # Example
//!
//! ```
//! use serde_json::{Value, json};
//! use tablecraft_core::features::{ActionConfig, FeatureKey, FeatureRegistry};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let registry = FeatureRegistry::new().with(
//!     FeatureKey::Create,
//!     ActionConfig::new(|input: Value| async move { Ok(json!({ "created": input })) })
//!         .label("New task"),
//! );
//!
//! assert!(registry.is_available(&FeatureKey::Create));
//! assert!(!registry.is_available(&FeatureKey::Delete));
//!
//! let output = registry.invoke(&FeatureKey::Create, json!({ "title": "x" })).await.unwrap();
//! assert_eq!(output["created"]["title"], "x");
//! # }
//! ```

use crate::error::{Result, TableError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Name of a table action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKey {
	Create,
	Update,
	Delete,
	Custom(String),
}

impl FeatureKey {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Create => "create",
			Self::Update => "update",
			Self::Delete => "delete",
			Self::Custom(name) => name,
		}
	}
}

impl From<&str> for FeatureKey {
	fn from(name: &str) -> Self {
		match name {
			"create" => Self::Create,
			"update" => Self::Update,
			"delete" => Self::Delete,
			other => Self::Custom(other.to_string()),
		}
	}
}

impl From<String> for FeatureKey {
	fn from(name: String) -> Self {
		Self::from(name.as_str())
	}
}

impl fmt::Display for FeatureKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for FeatureKey {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for FeatureKey {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		String::deserialize(deserializer).map(Self::from)
	}
}

/// An async action handler working on JSON payloads.
#[async_trait]
pub trait Action: Send + Sync {
	async fn call(&self, input: Value) -> Result<Value>;
}

struct FnAction<F>(F);

#[async_trait]
impl<F, Fut> Action for FnAction<F>
where
	F: Fn(Value) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Value>> + Send,
{
	async fn call(&self, input: Value) -> Result<Value> {
		(self.0)(input).await
	}
}

struct TypedAction<F, I, O> {
	handler: F,
	_types: PhantomData<fn(I) -> O>,
}

#[async_trait]
impl<F, Fut, I, O> Action for TypedAction<F, I, O>
where
	F: Fn(I) -> Fut + Send + Sync,
	Fut: Future<Output = Result<O>> + Send,
	I: DeserializeOwned + Send,
	O: Serialize + Send,
{
	async fn call(&self, input: Value) -> Result<Value> {
		let input: I = serde_json::from_value(input)?;
		let output = (self.handler)(input).await?;
		Ok(serde_json::to_value(output)?)
	}
}

/// An action handler plus the text the renderer shows for it.
#[derive(Clone)]
pub struct ActionConfig {
	action: Arc<dyn Action>,
	pub label: Option<String>,
	pub description: Option<String>,
	pub success_message: Option<String>,
	pub confirmation_message: Option<String>,
}

impl ActionConfig {
	/// Wraps an async function over JSON values
	pub fn new<F, Fut>(handler: F) -> Self
	where
		F: Fn(Value) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Value>> + Send + 'static,
	{
		Self::from_action(Arc::new(FnAction(handler)))
	}

	/// Wraps an async function over typed input and output
	///
	/// The JSON payload is deserialized into `I`; decoding failures surface as
	/// [`TableError::Payload`].
	pub fn typed<F, Fut, I, O>(handler: F) -> Self
	where
		F: Fn(I) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<O>> + Send + 'static,
		I: DeserializeOwned + Send + 'static,
		O: Serialize + Send + 'static,
	{
		Self::from_action(Arc::new(TypedAction {
			handler,
			_types: PhantomData,
		}))
	}

	pub fn from_action(action: Arc<dyn Action>) -> Self {
		Self {
			action,
			label: None,
			description: None,
			success_message: None,
			confirmation_message: None,
		}
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn success_message(mut self, message: impl Into<String>) -> Self {
		self.success_message = Some(message.into());
		self
	}

	pub fn confirmation_message(mut self, message: impl Into<String>) -> Self {
		self.confirmation_message = Some(message.into());
		self
	}

	/// Runs the handler
	pub async fn call(&self, input: Value) -> Result<Value> {
		self.action.call(input).await
	}
}

impl fmt::Debug for ActionConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActionConfig")
			.field("label", &self.label)
			.field("description", &self.description)
			.field("success_message", &self.success_message)
			.field("confirmation_message", &self.confirmation_message)
			.finish_non_exhaustive()
	}
}

/// Serializable view of a registered action, without its handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDescriptor {
	pub name: FeatureKey,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub success_message: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub confirmation_message: Option<String>,
}

/// Named actions of one table.
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
	actions: BTreeMap<FeatureKey, ActionConfig>,
}

impl FeatureRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an action, replacing any previous one under the same key
	pub fn register(&mut self, key: impl Into<FeatureKey>, config: ActionConfig) -> &mut Self {
		self.actions.insert(key.into(), config);
		self
	}

	/// Builder form of [`register`](Self::register)
	pub fn with(mut self, key: impl Into<FeatureKey>, config: ActionConfig) -> Self {
		self.register(key, config);
		self
	}

	pub fn get(&self, key: &FeatureKey) -> Option<&ActionConfig> {
		self.actions.get(key)
	}

	/// Whether the renderer should offer this action
	pub fn is_available(&self, key: &FeatureKey) -> bool {
		self.actions.contains_key(key)
	}

	/// Invokes an action by name
	///
	/// Handler errors are returned unchanged. A missing action fails with
	/// [`TableError::UnknownAction`].
	pub async fn invoke(&self, key: &FeatureKey, input: Value) -> Result<Value> {
		let config = self
			.actions
			.get(key)
			.ok_or_else(|| TableError::UnknownAction(key.to_string()))?;

		tracing::info!(action = %key, "invoking table action");
		match config.call(input).await {
			Ok(output) => Ok(output),
			Err(err) => {
				tracing::warn!(action = %key, error = %err, "table action failed");
				Err(err)
			}
		}
	}

	/// Registered action names, in key order
	pub fn names(&self) -> Vec<String> {
		self.actions.keys().map(|key| key.to_string()).collect()
	}

	/// Descriptors for every registered action
	pub fn controls(&self) -> Vec<FeatureDescriptor> {
		self.actions
			.iter()
			.map(|(name, config)| FeatureDescriptor {
				name: name.clone(),
				label: config.label.clone(),
				description: config.description.clone(),
				success_message: config.success_message.clone(),
				confirmation_message: config.confirmation_message.clone(),
			})
			.collect()
	}

	pub fn len(&self) -> usize {
		self.actions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.actions.is_empty()
	}
}

impl Serialize for FeatureRegistry {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		self.controls().serialize(serializer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Deserialize)]
	struct DeleteInput {
		ids: Vec<String>,
	}

	#[derive(Serialize)]
	struct DeleteOutput {
		deleted: usize,
	}

	#[fixture]
	fn registry() -> FeatureRegistry {
		FeatureRegistry::new()
			.with(
				FeatureKey::Create,
				ActionConfig::new(|input| async move { Ok(json!({ "echo": input })) })
					.label("Create")
					.success_message("Created"),
			)
			.with(
				FeatureKey::Delete,
				ActionConfig::typed(|input: DeleteInput| async move {
					Ok(DeleteOutput {
						deleted: input.ids.len(),
					})
				})
				.confirmation_message("Delete selected rows?"),
			)
	}

	#[rstest]
	fn test_feature_key_names() {
		assert_eq!(FeatureKey::from("create"), FeatureKey::Create);
		assert_eq!(FeatureKey::from("archive"), FeatureKey::Custom("archive".into()));
		assert_eq!(FeatureKey::Custom("archive".into()).to_string(), "archive");
	}

	#[rstest]
	fn test_availability(registry: FeatureRegistry) {
		assert!(registry.is_available(&FeatureKey::Create));
		assert!(registry.is_available(&FeatureKey::Delete));
		assert!(!registry.is_available(&FeatureKey::Update));
		assert_eq!(registry.names(), vec!["create", "delete"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_invoke_json_action(registry: FeatureRegistry) {
		let output = registry.invoke(&FeatureKey::Create, json!(1)).await.unwrap();
		assert_eq!(output, json!({ "echo": 1 }));
	}

	#[rstest]
	#[tokio::test]
	async fn test_invoke_typed_action(registry: FeatureRegistry) {
		let output = registry
			.invoke(&FeatureKey::Delete, json!({ "ids": ["a", "b"] }))
			.await
			.unwrap();
		assert_eq!(output, json!({ "deleted": 2 }));
	}

	#[rstest]
	#[tokio::test]
	async fn test_typed_action_rejects_bad_payload(registry: FeatureRegistry) {
		let result = registry.invoke(&FeatureKey::Delete, json!({ "ids": 3 })).await;
		assert!(matches!(result, Err(TableError::Payload(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_action_is_unknown(registry: FeatureRegistry) {
		let result = registry.invoke(&FeatureKey::Update, json!({})).await;
		assert!(matches!(result, Err(TableError::UnknownAction(name)) if name == "update"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_handler_error_propagates_unchanged() {
		// Arrange
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		let registry = FeatureRegistry::new().with(
			FeatureKey::Update,
			ActionConfig::new(move |_| {
				counter.fetch_add(1, Ordering::SeqCst);
				async { Err(TableError::not_found("task", "T-9")) }
			}),
		);

		// Act
		let result = registry.invoke(&FeatureKey::Update, json!({})).await;

		// Assert
		assert!(matches!(result, Err(TableError::NotFound { ref id, .. }) if id == "T-9"));
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	fn test_serializes_without_handlers(registry: FeatureRegistry) {
		let json = serde_json::to_value(&registry).unwrap();
		assert_eq!(
			json,
			json!([
				{ "name": "create", "label": "Create", "successMessage": "Created" },
				{ "name": "delete", "confirmationMessage": "Delete selected rows?" }
			])
		);
	}
}
