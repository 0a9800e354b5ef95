//! Filter definitions
//!
//! A [`FilterDefinition`] tells the URL parser how to read one simple filter:
//! which key to look at, whether the value is list-shaped, which separator
//! splits a single list value, and an optional custom parser.

use super::value::{FilterValue, RawFilterValue};
use crate::constants::ARRAY_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Kind of filter control a field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterVariant {
	Text,
	Number,
	Range,
	Date,
	DateRange,
	Boolean,
	Select,
	MultiSelect,
}

impl FilterVariant {
	/// Variants whose value is inherently a list or a range
	///
	/// # Examples
	///
	/// ```
	/// use tablecraft_core::filters::FilterVariant;
	///
	/// assert!(FilterVariant::MultiSelect.is_multi_valued());
	/// assert!(FilterVariant::DateRange.is_multi_valued());
	/// assert!(!FilterVariant::Text.is_multi_valued());
	/// ```
	pub fn is_multi_valued(self) -> bool {
		matches!(
			self,
			Self::MultiSelect | Self::Select | Self::Range | Self::DateRange
		)
	}

	/// The camelCase name used in URLs and JSON
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Number => "number",
			Self::Range => "range",
			Self::Date => "date",
			Self::DateRange => "dateRange",
			Self::Boolean => "boolean",
			Self::Select => "select",
			Self::MultiSelect => "multiSelect",
		}
	}
}

impl fmt::Display for FilterVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Custom conversion from URL values to a filter value.
pub type FilterParseFn = Arc<dyn Fn(Option<RawFilterValue>) -> Option<FilterValue> + Send + Sync>;

/// How one simple filter is read from the URL.
#[derive(Clone)]
pub struct FilterDefinition {
	/// Filter id, used as the key of the parsed filter map
	pub id: String,
	/// URL key alias; defaults to `id`
	pub key: Option<String>,
	/// Filter control kind
	pub variant: FilterVariant,
	/// Separator for list values; defaults to `,`
	pub separator: Option<String>,
	/// Explicit list-shape override; defaults to [`FilterVariant::is_multi_valued`]
	pub expects_array: Option<bool>,
	parse: Option<FilterParseFn>,
}

impl FilterDefinition {
	/// Creates a definition reading `id` from the URL key of the same name
	pub fn new(id: impl Into<String>, variant: FilterVariant) -> Self {
		Self {
			id: id.into(),
			key: None,
			variant,
			separator: None,
			expects_array: None,
			parse: None,
		}
	}

	/// Reads the filter from a different URL key
	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Uses a custom list separator
	pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
		self.separator = Some(separator.into());
		self
	}

	/// Overrides whether the value is list-shaped
	pub fn with_expects_array(mut self, expects_array: bool) -> Self {
		self.expects_array = Some(expects_array);
		self
	}

	/// Installs a custom parser applied after list normalization
	pub fn with_parser<F>(mut self, parse: F) -> Self
	where
		F: Fn(Option<RawFilterValue>) -> Option<FilterValue> + Send + Sync + 'static,
	{
		self.parse = Some(Arc::new(parse));
		self
	}

	/// The URL key this filter is read from
	pub fn query_key(&self) -> &str {
		self.key.as_deref().unwrap_or(&self.id)
	}

	/// The list separator in effect
	pub fn separator(&self) -> &str {
		self.separator.as_deref().unwrap_or(ARRAY_SEPARATOR)
	}

	/// Whether the value is list-shaped, after applying the override
	pub fn is_array(&self) -> bool {
		self.expects_array
			.unwrap_or_else(|| self.variant.is_multi_valued())
	}

	/// Whether a custom parser is installed
	pub fn has_parser(&self) -> bool {
		self.parse.is_some()
	}

	/// Converts normalized URL values into the filter value
	///
	/// Without a custom parser the raw value passes through unchanged.
	pub fn parse_value(&self, raw: Option<RawFilterValue>) -> Option<FilterValue> {
		match &self.parse {
			Some(parse) => parse(raw),
			None => raw.map(FilterValue::from),
		}
	}
}

impl fmt::Debug for FilterDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FilterDefinition")
			.field("id", &self.id)
			.field("key", &self.key)
			.field("variant", &self.variant)
			.field("separator", &self.separator)
			.field("expects_array", &self.expects_array)
			.field("has_parser", &self.parse.is_some())
			.finish()
	}
}

impl PartialEq for FilterDefinition {
	/// Parsers are compared by identity.
	fn eq(&self, other: &Self) -> bool {
		let same_parser = match (&self.parse, &other.parse) {
			(Some(a), Some(b)) => Arc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		};
		self.id == other.id
			&& self.key == other.key
			&& self.variant == other.variant
			&& self.separator == other.separator
			&& self.expects_array == other.expects_array
			&& same_parser
	}
}

/// Parses a scalar number filter; unparseable input means "no filter".
///
/// # Examples
///
/// ```
/// use tablecraft_core::filters::{FilterDefinition, FilterValue, FilterVariant, parse_number};
///
/// let hours = FilterDefinition::new("estimatedHours", FilterVariant::Number).with_parser(parse_number);
/// # let _ = hours;
/// ```
pub fn parse_number(raw: Option<RawFilterValue>) -> Option<FilterValue> {
	let text = match raw? {
		RawFilterValue::Text(text) => text,
		RawFilterValue::List(values) => values.into_iter().next()?,
	};
	text.trim().parse::<f64>().ok().map(FilterValue::Number)
}

/// Parses a list of numbers (e.g. a range), dropping unparseable entries.
pub fn parse_numbers(raw: Option<RawFilterValue>) -> Option<FilterValue> {
	let values = match raw? {
		RawFilterValue::Text(text) => vec![text],
		RawFilterValue::List(values) => values,
	};
	let numbers: Vec<f64> = values
		.iter()
		.filter_map(|value| value.trim().parse::<f64>().ok())
		.collect();
	FilterValue::Numbers(numbers).non_empty()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(FilterVariant::Text, false)]
	#[case(FilterVariant::Number, false)]
	#[case(FilterVariant::Date, false)]
	#[case(FilterVariant::Boolean, false)]
	#[case(FilterVariant::Select, true)]
	#[case(FilterVariant::MultiSelect, true)]
	#[case(FilterVariant::Range, true)]
	#[case(FilterVariant::DateRange, true)]
	fn test_expects_array_follows_variant(#[case] variant: FilterVariant, #[case] expected: bool) {
		assert_eq!(FilterDefinition::new("f", variant).is_array(), expected);
	}

	#[rstest]
	fn test_explicit_override_wins() {
		let def = FilterDefinition::new("status", FilterVariant::MultiSelect).with_expects_array(false);
		assert!(!def.is_array());
		let def = FilterDefinition::new("title", FilterVariant::Text).with_expects_array(true);
		assert!(def.is_array());
	}

	#[rstest]
	fn test_query_key_and_separator_defaults() {
		let def = FilterDefinition::new("status", FilterVariant::MultiSelect);
		assert_eq!(def.query_key(), "status");
		assert_eq!(def.separator(), ",");

		let def = def.with_key("s").with_separator("|");
		assert_eq!(def.query_key(), "s");
		assert_eq!(def.separator(), "|");
	}

	#[rstest]
	fn test_variant_serde_names() {
		assert_eq!(
			serde_json::to_string(&FilterVariant::MultiSelect).unwrap(),
			r#""multiSelect""#
		);
		let parsed: FilterVariant = serde_json::from_str(r#""dateRange""#).unwrap();
		assert_eq!(parsed, FilterVariant::DateRange);
	}

	#[rstest]
	fn test_parse_number() {
		assert_eq!(
			parse_number(Some(RawFilterValue::Text(" 4.5 ".into()))),
			Some(FilterValue::Number(4.5))
		);
		assert_eq!(parse_number(Some(RawFilterValue::Text("x".into()))), None);
		assert_eq!(parse_number(None), None);
	}

	#[rstest]
	fn test_parse_numbers_drops_garbage() {
		let raw = RawFilterValue::List(vec!["1".into(), "x".into(), "8".into()]);
		assert_eq!(parse_numbers(Some(raw)), Some(FilterValue::Numbers(vec![1.0, 8.0])));
		let raw = RawFilterValue::List(vec!["x".into()]);
		assert_eq!(parse_numbers(Some(raw)), None);
	}
}
