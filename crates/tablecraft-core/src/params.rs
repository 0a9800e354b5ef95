//! Ordered multi-valued search parameters
//!
//! [`SearchParams`] keeps every `key=value` pair in its original order, so a
//! key may appear several times (`?status=done&status=todo`). It can be built
//! from a raw query string, from a map of `key -> one | many` values, or from
//! any iterator of pairs.
//!
//! # Example
//!
//! ```
//! use tablecraft_core::params::SearchParams;
//!
//! let params = SearchParams::parse("?page=2&status=done&status=todo");
//! assert_eq!(params.get("page"), Some("2"));
//! assert_eq!(params.get_all("status"), vec!["done", "todo"]);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use url::form_urlencoded;

/// A value in a parsed parameter map: a single string or a repeated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
	/// `key=value`
	One(String),
	/// `key=a&key=b`
	Many(Vec<String>),
}

impl From<&str> for ParamValue {
	fn from(value: &str) -> Self {
		Self::One(value.to_string())
	}
}

impl From<String> for ParamValue {
	fn from(value: String) -> Self {
		Self::One(value)
	}
}

impl From<Vec<String>> for ParamValue {
	fn from(values: Vec<String>) -> Self {
		Self::Many(values)
	}
}

impl From<Vec<&str>> for ParamValue {
	fn from(values: Vec<&str>) -> Self {
		Self::Many(values.into_iter().map(str::to_string).collect())
	}
}

/// Ordered collection of URL search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
	pairs: Vec<(String, String)>,
}

impl SearchParams {
	/// Creates an empty parameter set
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a query string, with or without the leading `?`
	///
	/// # Examples
	///
	/// ```
	/// use tablecraft_core::params::SearchParams;
	///
	/// let params = SearchParams::parse("title=hello%20world&page=3");
	/// assert_eq!(params.get("title"), Some("hello world"));
	/// ```
	pub fn parse(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);
		let pairs = form_urlencoded::parse(query.as_bytes())
			.map(|(key, value)| (key.into_owned(), value.into_owned()))
			.collect();
		Self { pairs }
	}

	/// Builds parameters from a map of optional values
	///
	/// `None` entries are skipped; [`ParamValue::Many`] entries append one
	/// pair per element. Keys are emitted in iteration order.
	pub fn from_map<I, K>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, Option<ParamValue>)>,
		K: Into<String>,
	{
		let mut params = Self::new();
		for (key, value) in entries {
			let key = key.into();
			match value {
				Some(ParamValue::One(value)) => params.append(key, value),
				Some(ParamValue::Many(values)) => {
					for value in values {
						params.append(key.clone(), value);
					}
				}
				None => {}
			}
		}
		params
	}

	/// Returns the first value for `key`
	pub fn get(&self, key: &str) -> Option<&str> {
		self.pairs
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Returns every value for `key` in order of appearance
	pub fn get_all(&self, key: &str) -> Vec<&str> {
		self.pairs
			.iter()
			.filter(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
			.collect()
	}

	/// Returns whether `key` appears at least once
	pub fn contains_key(&self, key: &str) -> bool {
		self.pairs.iter().any(|(k, _)| k == key)
	}

	/// Appends a pair, keeping existing values for the same key
	pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.pairs.push((key.into(), value.into()));
	}

	/// Replaces every value of `key` with a single value
	///
	/// The new pair takes the position of the first existing occurrence, or
	/// is appended when the key is new.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();
		match self.pairs.iter().position(|(k, _)| *k == key) {
			Some(index) => {
				self.pairs[index].1 = value;
				let mut seen = false;
				self.pairs.retain(|(k, _)| {
					if *k != key {
						return true;
					}
					let keep = !seen;
					seen = true;
					keep
				});
			}
			None => self.pairs.push((key, value)),
		}
	}

	/// Removes every value of `key`
	pub fn remove(&mut self, key: &str) {
		self.pairs.retain(|(k, _)| k != key);
	}

	/// Iterates over the pairs in order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Number of pairs (repeated keys count once per value)
	pub fn len(&self) -> usize {
		self.pairs.len()
	}

	/// Returns whether there are no pairs
	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	/// Serializes back to an `application/x-www-form-urlencoded` string
	pub fn to_query_string(&self) -> String {
		form_urlencoded::Serializer::new(String::new())
			.extend_pairs(self.pairs.iter())
			.finish()
	}
}

impl fmt::Display for SearchParams {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_query_string())
	}
}

impl From<&str> for SearchParams {
	fn from(query: &str) -> Self {
		Self::parse(query)
	}
}

impl From<String> for SearchParams {
	fn from(query: String) -> Self {
		Self::parse(&query)
	}
}

impl From<&String> for SearchParams {
	fn from(query: &String) -> Self {
		Self::parse(query)
	}
}

impl From<&SearchParams> for SearchParams {
	fn from(params: &SearchParams) -> Self {
		params.clone()
	}
}

impl<K: Into<String>> From<BTreeMap<K, Option<ParamValue>>> for SearchParams {
	fn from(map: BTreeMap<K, Option<ParamValue>>) -> Self {
		Self::from_map(map)
	}
}

impl<K: Into<String>> From<BTreeMap<K, ParamValue>> for SearchParams {
	fn from(map: BTreeMap<K, ParamValue>) -> Self {
		Self::from_map(map.into_iter().map(|(k, v)| (k, Some(v))))
	}
}

impl<K: Into<String> + Ord> From<HashMap<K, Option<ParamValue>>> for SearchParams {
	fn from(map: HashMap<K, Option<ParamValue>>) -> Self {
		// HashMap order is unspecified; sort keys so parsing stays deterministic.
		let sorted: BTreeMap<K, Option<ParamValue>> = map.into_iter().collect();
		Self::from_map(sorted)
	}
}

impl<K, V> FromIterator<(K, V)> for SearchParams
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = Self::new();
		for (key, value) in iter {
			params.append(key, value);
		}
		params
	}
}

impl Serialize for SearchParams {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for SearchParams {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let query = String::deserialize(deserializer)?;
		Ok(Self::parse(&query))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_parse_strips_question_mark() {
		let params = SearchParams::parse("?page=2");
		assert_eq!(params.get("page"), Some("2"));
		assert_eq!(params.len(), 1);
	}

	#[rstest]
	fn test_repeated_keys_keep_order() {
		let params = SearchParams::parse("status=done&page=1&status=todo");
		assert_eq!(params.get_all("status"), vec!["done", "todo"]);
		assert_eq!(params.get("status"), Some("done"));
	}

	#[rstest]
	fn test_from_map_skips_absent_and_expands_many() {
		// Arrange
		let mut map = BTreeMap::new();
		map.insert("page", Some(ParamValue::from("3")));
		map.insert("status", Some(ParamValue::from(vec!["done", "todo"])));
		map.insert("title", None);

		// Act
		let params = SearchParams::from(map);

		// Assert
		assert_eq!(params.get("page"), Some("3"));
		assert_eq!(params.get_all("status"), vec!["done", "todo"]);
		assert!(!params.contains_key("title"));
	}

	#[rstest]
	fn test_set_collapses_repeated_key_in_place() {
		let mut params = SearchParams::parse("a=1&b=2&a=3");
		params.set("a", "9");
		assert_eq!(params.to_query_string(), "a=9&b=2");
	}

	#[rstest]
	fn test_remove_drops_every_value() {
		let mut params = SearchParams::parse("a=1&b=2&a=3");
		params.remove("a");
		assert_eq!(params.to_query_string(), "b=2");
	}

	#[rstest]
	fn test_query_string_encodes_json() {
		let mut params = SearchParams::new();
		params.append("sort", r#"[{"id":"title","desc":true}]"#);
		let reparsed = SearchParams::parse(&params.to_query_string());
		assert_eq!(reparsed.get("sort"), Some(r#"[{"id":"title","desc":true}]"#));
	}

	#[rstest]
	fn test_serializes_as_query_string() {
		let params = SearchParams::parse("page=2&perPage=20");
		let json = serde_json::to_string(&params).unwrap();
		assert_eq!(json, r#""page=2&perPage=20""#);
		let back: SearchParams = serde_json::from_str(&json).unwrap();
		assert_eq!(back, params);
	}
}
