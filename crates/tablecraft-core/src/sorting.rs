//! Sorting state carried in the URL
//!
//! The sort list is stored under a single key as a JSON array:
//! `sort=[{"id":"dueDate","desc":false},{"id":"title","desc":true}]`.
//! Order matters: later descriptors only break ties left by earlier ones.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One sorted column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDescriptor {
	/// Column id
	pub id: String,
	/// Descending when true
	pub desc: bool,
}

impl SortDescriptor {
	/// Ascending sort on `id`
	pub fn asc(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			desc: false,
		}
	}

	/// Descending sort on `id`
	pub fn desc(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			desc: true,
		}
	}
}

/// Encodes a sort list into its URL value.
///
/// # Examples
///
/// ```
/// use tablecraft_core::sorting::{encode_sorting, SortDescriptor};
///
/// let raw = encode_sorting(&[SortDescriptor::asc("dueDate")]);
/// assert_eq!(raw, r#"[{"id":"dueDate","desc":false}]"#);
/// ```
pub fn encode_sorting(sorting: &[SortDescriptor]) -> String {
	// A Vec of two-field structs cannot fail to serialize.
	serde_json::to_string(sorting).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a URL sort value.
///
/// Returns `None` when the payload is not a valid sort list, or when
/// `column_ids` is given and any descriptor names a column outside it.
pub fn decode_sorting(raw: &str, column_ids: Option<&BTreeSet<String>>) -> Option<Vec<SortDescriptor>> {
	let parsed: Vec<SortDescriptor> = match serde_json::from_str(raw) {
		Ok(parsed) => parsed,
		Err(err) => {
			tracing::debug!(error = %err, "ignoring malformed sort payload");
			return None;
		}
	};

	if let Some(ids) = column_ids
		&& let Some(unknown) = parsed.iter().find(|sort| !ids.contains(&sort.id))
	{
		tracing::debug!(column = %unknown.id, "ignoring sort on unknown column");
		return None;
	}

	Some(parsed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn ids(values: &[&str]) -> BTreeSet<String> {
		values.iter().map(|v| v.to_string()).collect()
	}

	#[rstest]
	fn test_round_trip() {
		// Arrange
		let sorting = vec![SortDescriptor::asc("dueDate")];

		// Act
		let decoded = decode_sorting(&encode_sorting(&sorting), None);

		// Assert
		assert_eq!(decoded, Some(sorting));
	}

	#[rstest]
	fn test_multi_column_order_preserved() {
		let raw = r#"[{"id":"status","desc":true},{"id":"title","desc":false}]"#;
		let decoded = decode_sorting(raw, None).unwrap();
		assert_eq!(
			decoded,
			vec![SortDescriptor::desc("status"), SortDescriptor::asc("title")]
		);
	}

	#[rstest]
	#[case("not json")]
	#[case(r#"{"id":"title","desc":true}"#)]
	#[case(r#"[{"id":"title"}]"#)]
	#[case(r#"[{"id":1,"desc":true}]"#)]
	fn test_malformed_payload_is_rejected(#[case] raw: &str) {
		assert_eq!(decode_sorting(raw, None), None);
	}

	#[rstest]
	fn test_unknown_column_rejects_whole_list() {
		let raw = r#"[{"id":"title","desc":false},{"id":"secret","desc":true}]"#;
		assert_eq!(decode_sorting(raw, Some(&ids(&["title", "status"]))), None);
	}

	#[rstest]
	fn test_known_columns_pass_allow_list() {
		let raw = r#"[{"id":"title","desc":false}]"#;
		let decoded = decode_sorting(raw, Some(&ids(&["title"])));
		assert_eq!(decoded, Some(vec![SortDescriptor::asc("title")]));
	}
}
