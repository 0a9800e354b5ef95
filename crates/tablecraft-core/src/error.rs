//! Error types for tablecraft
//!
//! URL parsing never fails: malformed state falls back to defaults. Errors
//! only come from injected collaborators (fetchers, transforms, actions) and
//! from loading settings.

use std::error::Error as StdError;

/// Boxed error produced by an injected collaborator.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type alias for table operations
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors surfaced by loads and actions
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TableError {
	/// A row or count fetcher failed
	#[error("Fetch error: {0}")]
	Fetch(#[source] BoxError),

	/// The filter transform rejected the raw filter map
	#[error("Filter transform error: {0}")]
	Transform(#[source] BoxError),

	/// A registered action handler failed
	#[error("Action `{action}` failed: {source}")]
	Action {
		/// Name of the failing action
		action: String,
		/// Error raised by the handler
		#[source]
		source: BoxError,
	},

	/// An update or delete referenced a record that does not exist
	#[error("{entity} not found: {id}")]
	NotFound {
		/// Entity name (e.g. "task")
		entity: String,
		/// Identifier that could not be resolved
		id: String,
	},

	/// No handler is registered under this action name
	#[error("Action `{0}` is not registered")]
	UnknownAction(String),

	/// An action payload could not be converted to or from JSON
	#[error("Payload error: {0}")]
	Payload(#[from] serde_json::Error),
}

impl TableError {
	/// Wraps any error as a fetch failure
	pub fn fetch(err: impl Into<BoxError>) -> Self {
		Self::Fetch(err.into())
	}

	/// Wraps any error as a transform failure
	pub fn transform(err: impl Into<BoxError>) -> Self {
		Self::Transform(err.into())
	}

	/// Wraps any error as a failure of the named action
	pub fn action(action: impl Into<String>, err: impl Into<BoxError>) -> Self {
		Self::Action {
			action: action.into(),
			source: err.into(),
		}
	}

	/// Creates a not-found error for `entity` with identifier `id`
	pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
		Self::NotFound {
			entity: entity.into(),
			id: id.into(),
		}
	}
}

/// Errors raised while loading [`TableSettings`](crate::settings::TableSettings)
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid setting: {0}")]
	Invalid(String),
}
