//! Table settings
//!
//! Settings control the URL key names, list separator, default page size and
//! the client navigation behavior. Every field has a default, so a settings
//! file only needs the values it changes:
//!
//! ```toml
//! default_page_size = 20
//!
//! [keys]
//! per_page = "size"
//!
//! [navigation]
//! history = "push"
//! debounce_ms = 500
//! ```

use crate::constants::{
	ARRAY_SEPARATOR, DEFAULT_DEBOUNCE_MS, DEFAULT_PAGE_SIZE, DEFAULT_THROTTLE_MS, FILTERS_KEY,
	JOIN_OPERATOR_KEY, PAGE_KEY, PER_PAGE_KEY, SORT_KEY,
};
use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// URL key names for table state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryKeys {
	pub page: String,
	pub per_page: String,
	pub sort: String,
	pub filters: String,
	pub join_operator: String,
}

impl Default for QueryKeys {
	fn default() -> Self {
		Self {
			page: PAGE_KEY.to_string(),
			per_page: PER_PAGE_KEY.to_string(),
			sort: SORT_KEY.to_string(),
			filters: FILTERS_KEY.to_string(),
			join_operator: JOIN_OPERATOR_KEY.to_string(),
		}
	}
}

/// Whether URL writes add a history entry or replace the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
	Push,
	#[default]
	Replace,
}

/// How the client writes state back to the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
	pub history: HistoryMode,
	/// Update the URL without refetching server data
	pub shallow: bool,
	/// Scroll to top after navigation
	pub scroll: bool,
	/// Remove keys whose value equals the default instead of writing them
	pub clear_on_default: bool,
	/// Delay before a filter change is written
	pub debounce_ms: u64,
	/// Minimum interval between URL writes
	pub throttle_ms: u64,
}

impl Default for NavigationSettings {
	fn default() -> Self {
		Self {
			history: HistoryMode::Replace,
			shallow: true,
			scroll: false,
			clear_on_default: false,
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			throttle_ms: DEFAULT_THROTTLE_MS,
		}
	}
}

impl NavigationSettings {
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	pub fn throttle(&self) -> Duration {
		Duration::from_millis(self.throttle_ms)
	}
}

/// Top-level table settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
	pub keys: QueryKeys,
	/// Separator for list-valued filters
	pub separator: String,
	pub default_page_size: u32,
	pub enable_advanced_filters: bool,
	pub navigation: NavigationSettings,
}

impl Default for TableSettings {
	fn default() -> Self {
		Self {
			keys: QueryKeys::default(),
			separator: ARRAY_SEPARATOR.to_string(),
			default_page_size: DEFAULT_PAGE_SIZE,
			enable_advanced_filters: false,
			navigation: NavigationSettings::default(),
		}
	}
}

impl TableSettings {
	/// Parses settings from a TOML document
	pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(content)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Loads settings from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path)?;
		let settings = Self::from_toml_str(&content)?;
		tracing::debug!(path = %path.display(), "loaded table settings");
		Ok(settings)
	}

	/// Checks values that deserialization cannot reject
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.default_page_size == 0 {
			return Err(SettingsError::Invalid(
				"default_page_size must be at least 1".to_string(),
			));
		}

		let keys = [
			&self.keys.page,
			&self.keys.per_page,
			&self.keys.sort,
			&self.keys.filters,
			&self.keys.join_operator,
		];
		if keys.iter().any(|key| key.is_empty()) {
			return Err(SettingsError::Invalid("query keys must not be empty".to_string()));
		}
		for (i, key) in keys.iter().enumerate() {
			if keys[i + 1..].contains(key) {
				return Err(SettingsError::Invalid(format!("duplicate query key: {key}")));
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	fn test_defaults() {
		let settings = TableSettings::default();
		assert_eq!(settings.keys.page, "page");
		assert_eq!(settings.keys.per_page, "perPage");
		assert_eq!(settings.separator, ",");
		assert_eq!(settings.default_page_size, 10);
		assert_eq!(settings.navigation.history, HistoryMode::Replace);
		assert!(settings.navigation.shallow);
		assert_eq!(settings.navigation.debounce(), Duration::from_millis(300));
		assert_eq!(settings.navigation.throttle(), Duration::from_millis(50));
	}

	#[rstest]
	fn test_partial_toml_keeps_defaults() {
		// Arrange
		let content = r#"
default_page_size = 20

[keys]
per_page = "size"

[navigation]
history = "push"
"#;

		// Act
		let settings = TableSettings::from_toml_str(content).unwrap();

		// Assert
		assert_eq!(settings.default_page_size, 20);
		assert_eq!(settings.keys.per_page, "size");
		assert_eq!(settings.keys.page, "page");
		assert_eq!(settings.navigation.history, HistoryMode::Push);
		assert_eq!(settings.navigation.debounce_ms, 300);
	}

	#[rstest]
	#[case("default_page_size = 0")]
	#[case("[keys]\npage = \"\"")]
	#[case("[keys]\nsort = \"page\"")]
	fn test_invalid_settings_rejected(#[case] content: &str) {
		let result = TableSettings::from_toml_str(content);
		assert!(matches!(result, Err(SettingsError::Invalid(_))));
	}

	#[rstest]
	fn test_malformed_toml() {
		let result = TableSettings::from_toml_str("default_page_size = [");
		assert!(matches!(result, Err(SettingsError::Toml(_))));
	}

	#[rstest]
	fn test_from_file() {
		// Arrange
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "enable_advanced_filters = true").unwrap();

		// Act
		let settings = TableSettings::from_file(file.path()).unwrap();

		// Assert
		assert!(settings.enable_advanced_filters);
	}

	#[rstest]
	fn test_missing_file_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let result = TableSettings::from_file(dir.path().join("missing.toml"));
		assert!(matches!(result, Err(SettingsError::Io(_))));
	}
}
