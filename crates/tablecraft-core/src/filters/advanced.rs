//! Advanced (operator-bearing) filters
//!
//! Advanced filters travel as a JSON array under one URL key:
//!
//! ```text
//! filters=[{"id":"title","value":"report","variant":"text","operator":"iLike","filterId":"a1"}]
//! joinOperator=or
//! ```
//!
//! Decoding is lenient: entries that fail to decode, reference unknown
//! columns or fail [`AdvancedFilter::is_valid`] are dropped one by one.
//!
//! Validity is stricter than an empty-value check. An entry whose operator is
//! outside its variant's operator set (`lt` on a text column, for instance) is
//! dropped even when it carries a value.

use super::definition::FilterVariant;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Comparison applied by an advanced filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
	ILike,
	NotILike,
	Eq,
	Ne,
	InArray,
	NotInArray,
	IsEmpty,
	IsNotEmpty,
	Lt,
	Lte,
	Gt,
	Gte,
	IsBetween,
	IsRelativeToToday,
}

impl FilterOperator {
	/// Operators offered for a filter variant
	pub fn for_variant(variant: FilterVariant) -> &'static [FilterOperator] {
		use FilterOperator::*;
		match variant {
			FilterVariant::Text => &[ILike, NotILike, Eq, Ne, IsEmpty, IsNotEmpty],
			FilterVariant::Number | FilterVariant::Range => {
				&[Eq, Ne, Lt, Lte, Gt, Gte, IsBetween, IsEmpty, IsNotEmpty]
			}
			FilterVariant::Date | FilterVariant::DateRange => &[
				Eq,
				Ne,
				Lt,
				Gt,
				Lte,
				Gte,
				IsBetween,
				IsRelativeToToday,
				IsEmpty,
				IsNotEmpty,
			],
			FilterVariant::Boolean => &[Eq, Ne],
			FilterVariant::Select => &[Eq, Ne, IsEmpty, IsNotEmpty],
			FilterVariant::MultiSelect => &[InArray, NotInArray, IsEmpty, IsNotEmpty],
		}
	}

	/// `isEmpty`/`isNotEmpty` ignore the filter value
	pub fn needs_value(self) -> bool {
		!matches!(self, Self::IsEmpty | Self::IsNotEmpty)
	}
}

/// How multiple advanced filters combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinOperator {
	#[default]
	And,
	Or,
}

impl fmt::Display for JoinOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::And => "and",
			Self::Or => "or",
		})
	}
}

/// Value of an advanced filter entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterItemValue {
	Text(String),
	List(Vec<String>),
}

impl FilterItemValue {
	fn is_empty(&self) -> bool {
		match self {
			Self::Text(text) => text.is_empty(),
			Self::List(values) => values.is_empty(),
		}
	}
}

/// One advanced filter entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedFilter {
	/// Column id
	pub id: String,
	/// Comparison value
	pub value: FilterItemValue,
	/// Filter control kind
	pub variant: FilterVariant,
	/// Comparison operator
	pub operator: FilterOperator,
	/// Client-side identifier of this entry
	pub filter_id: String,
}

impl AdvancedFilter {
	/// Whether this entry should be applied
	///
	/// Two checks apply. The operator must belong to
	/// [`FilterOperator::for_variant`] for the entry's variant, so a supported
	/// operator on the wrong variant is rejected regardless of its value. The
	/// value must then be non-empty unless the operator ignores it
	/// (`isEmpty`, `isNotEmpty`).
	pub fn is_valid(&self) -> bool {
		FilterOperator::for_variant(self.variant).contains(&self.operator)
			&& (!self.operator.needs_value() || !self.value.is_empty())
	}
}

/// Encodes advanced filters into their URL value
pub fn encode_advanced_filters(filters: &[AdvancedFilter]) -> String {
	serde_json::to_string(filters).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes the advanced filter URL value, dropping invalid entries
pub fn decode_advanced_filters(raw: &str, column_ids: Option<&BTreeSet<String>>) -> Vec<AdvancedFilter> {
	let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
		Ok(entries) => entries,
		Err(err) => {
			tracing::debug!(error = %err, "ignoring malformed advanced filter payload");
			return Vec::new();
		}
	};

	entries
		.into_iter()
		.filter_map(|entry| match serde_json::from_value::<AdvancedFilter>(entry) {
			Ok(filter) => Some(filter),
			Err(err) => {
				tracing::debug!(error = %err, "dropping undecodable advanced filter");
				None
			}
		})
		.filter(|filter| match column_ids {
			Some(ids) if !ids.contains(&filter.id) => {
				tracing::debug!(column = %filter.id, "dropping advanced filter on unknown column");
				false
			}
			_ => true,
		})
		.filter(AdvancedFilter::is_valid)
		.collect()
}

/// Reads the join operator, defaulting to `and` for anything unrecognized
pub fn decode_join_operator(raw: Option<&str>) -> JoinOperator {
	match raw.map(str::trim) {
		Some(value) if value.eq_ignore_ascii_case("or") => JoinOperator::Or,
		_ => JoinOperator::And,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn ids(values: &[&str]) -> BTreeSet<String> {
		values.iter().map(|v| v.to_string()).collect()
	}

	#[rstest]
	fn test_decode_valid_entry() {
		let raw = r#"[{"id":"title","value":"report","variant":"text","operator":"iLike","filterId":"a1"}]"#;
		let filters = decode_advanced_filters(raw, None);
		assert_eq!(filters.len(), 1);
		assert_eq!(filters[0].operator, FilterOperator::ILike);
		assert_eq!(filters[0].value, FilterItemValue::Text("report".into()));
	}

	#[rstest]
	fn test_invalid_entries_are_dropped_individually() {
		// Arrange
		let raw = r#"[
			{"id":"title","value":"a","variant":"text","operator":"iLike","filterId":"1"},
			{"id":"title","value":"a","variant":"text","operator":"bogus","filterId":"2"},
			{"id":"secret","value":"a","variant":"text","operator":"eq","filterId":"3"},
			{"id":"status","value":[],"variant":"multiSelect","operator":"inArray","filterId":"4"},
			{"id":"status","value":[],"variant":"multiSelect","operator":"isEmpty","filterId":"5"},
			{"id":"status","value":["done"],"variant":"multiSelect","operator":"lt","filterId":"6"}
		]"#;

		// Act
		let filters = decode_advanced_filters(raw, Some(&ids(&["title", "status"])));

		// Assert
		let kept: Vec<&str> = filters.iter().map(|f| f.filter_id.as_str()).collect();
		assert_eq!(kept, vec!["1", "5"]);
	}

	#[rstest]
	#[case(FilterVariant::Text, FilterOperator::Lt, FilterItemValue::Text("b".into()), false)]
	#[case(FilterVariant::Text, FilterOperator::ILike, FilterItemValue::Text("b".into()), true)]
	#[case(FilterVariant::Text, FilterOperator::ILike, FilterItemValue::Text(String::new()), false)]
	#[case(FilterVariant::Text, FilterOperator::IsEmpty, FilterItemValue::Text(String::new()), true)]
	#[case(FilterVariant::Number, FilterOperator::Lt, FilterItemValue::Text("4".into()), true)]
	fn test_is_valid_checks_operator_set_before_value(
		#[case] variant: FilterVariant,
		#[case] operator: FilterOperator,
		#[case] value: FilterItemValue,
		#[case] expected: bool,
	) {
		let filter = AdvancedFilter {
			id: "title".into(),
			value,
			variant,
			operator,
			filter_id: "v1".into(),
		};
		assert_eq!(filter.is_valid(), expected);
	}

	#[rstest]
	fn test_malformed_payload_yields_empty() {
		assert!(decode_advanced_filters("{oops", None).is_empty());
		assert!(decode_advanced_filters(r#"{"id":"x"}"#, None).is_empty());
	}

	#[rstest]
	fn test_encode_round_trip() {
		let filter = AdvancedFilter {
			id: "estimatedHours".into(),
			value: FilterItemValue::List(vec!["2".into(), "8".into()]),
			variant: FilterVariant::Range,
			operator: FilterOperator::IsBetween,
			filter_id: "r1".into(),
		};
		let encoded = encode_advanced_filters(std::slice::from_ref(&filter));
		assert_eq!(decode_advanced_filters(&encoded, None), vec![filter]);
	}

	#[rstest]
	#[case(None, JoinOperator::And)]
	#[case(Some("or"), JoinOperator::Or)]
	#[case(Some("OR"), JoinOperator::Or)]
	#[case(Some("and"), JoinOperator::And)]
	#[case(Some("xor"), JoinOperator::And)]
	fn test_decode_join_operator(#[case] raw: Option<&str>, #[case] expected: JoinOperator) {
		assert_eq!(decode_join_operator(raw), expected);
	}
}
