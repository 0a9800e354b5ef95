//! Filter values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values read from the URL for one filter, before any custom parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFilterValue {
	/// A single string value
	Text(String),
	/// A list, from repeated keys or a separated value
	List(Vec<String>),
}

/// A parsed filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
	Text(String),
	List(Vec<String>),
	Number(f64),
	Numbers(Vec<f64>),
}

impl FilterValue {
	/// Empty strings and empty lists count as "no filter"
	///
	/// # Examples
	///
	/// ```
	/// use tablecraft_core::filters::FilterValue;
	///
	/// assert!(FilterValue::from("").is_empty());
	/// assert!(FilterValue::List(vec![]).is_empty());
	/// assert!(!FilterValue::Number(0.0).is_empty());
	/// ```
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Text(text) => text.is_empty(),
			Self::List(values) => values.is_empty(),
			Self::Numbers(values) => values.is_empty(),
			Self::Number(_) => false,
		}
	}

	/// Returns the string value, if this is a scalar string
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Returns the string list, if this is a list of strings
	pub fn as_list(&self) -> Option<&[String]> {
		match self {
			Self::List(values) => Some(values),
			_ => None,
		}
	}

	/// Returns the number, if this is a scalar number
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(value) => Some(*value),
			_ => None,
		}
	}

	/// Returns the number list, if this is a list of numbers
	pub fn as_numbers(&self) -> Option<&[f64]> {
		match self {
			Self::Numbers(values) => Some(values),
			_ => None,
		}
	}

	/// Wraps the value as `Some` unless it is empty
	pub fn non_empty(self) -> Option<Self> {
		if self.is_empty() { None } else { Some(self) }
	}
}

impl From<&str> for FilterValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for FilterValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<Vec<String>> for FilterValue {
	fn from(values: Vec<String>) -> Self {
		Self::List(values)
	}
}

impl From<Vec<&str>> for FilterValue {
	fn from(values: Vec<&str>) -> Self {
		Self::List(values.into_iter().map(str::to_string).collect())
	}
}

impl From<f64> for FilterValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<Vec<f64>> for FilterValue {
	fn from(values: Vec<f64>) -> Self {
		Self::Numbers(values)
	}
}

impl From<RawFilterValue> for FilterValue {
	fn from(raw: RawFilterValue) -> Self {
		match raw {
			RawFilterValue::Text(text) => Self::Text(text),
			RawFilterValue::List(values) => Self::List(values),
		}
	}
}

/// Filter id to parsed value; `None` means the filter is not applied.
pub type FilterMap = BTreeMap<String, Option<FilterValue>>;
