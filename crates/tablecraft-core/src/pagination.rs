//! Pagination state carried in the URL

use serde::{Deserialize, Serialize};

/// One-based page number and page size.
///
/// Both values are always at least 1; parsing clamps anything smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
	/// Current page (1-indexed)
	pub page: u32,
	/// Number of rows per page
	pub per_page: u32,
}

impl PaginationState {
	/// Creates a pagination state, clamping both values to at least 1
	pub fn new(page: u32, per_page: u32) -> Self {
		Self {
			page: page.max(1),
			per_page: per_page.max(1),
		}
	}

	/// Zero-based index of the first row on this page
	///
	/// # Examples
	///
	/// ```
	/// use tablecraft_core::pagination::PaginationState;
	///
	/// let state = PaginationState::new(3, 10);
	/// assert_eq!(state.offset(), 20);
	/// ```
	pub fn offset(&self) -> usize {
		(self.page.saturating_sub(1) as usize) * self.per_page as usize
	}

	/// Number of rows to fetch
	pub fn limit(&self) -> usize {
		self.per_page as usize
	}
}

/// Parses a URL integer the way a lenient `parseInt` does.
///
/// Leading whitespace and an optional sign are accepted, then the longest run
/// of ASCII digits; trailing garbage is ignored (`"12abc"` is 12). Returns
/// `None` when no digits are found.
pub fn parse_integer(raw: Option<&str>) -> Option<i64> {
	let raw = raw?.trim_start();
	if raw.is_empty() {
		return None;
	}
	let (negative, digits) = match raw.as_bytes()[0] {
		b'-' => (true, &raw[1..]),
		b'+' => (false, &raw[1..]),
		_ => (false, raw),
	};
	let end = digits
		.bytes()
		.position(|b| !b.is_ascii_digit())
		.unwrap_or(digits.len());
	if end == 0 {
		return None;
	}
	// Values beyond i64 saturate; they are clamped again by the caller.
	let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
	Some(if negative { -value } else { value })
}

/// Returns `value` unless it is missing or below `minimum`.
pub fn clamp_to_minimum(value: Option<i64>, minimum: u32) -> u32 {
	match value {
		Some(v) if v >= i64::from(minimum) => u32::try_from(v).unwrap_or(u32::MAX),
		_ => minimum,
	}
}
