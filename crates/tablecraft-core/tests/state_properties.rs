//! URL state parser property-based tests
//!
//! Properties that must hold for any search parameters, not just the
//! hand-picked cases in the unit tests.

use proptest::prelude::*;
use tablecraft_core::filters::{FilterDefinition, FilterValue, FilterVariant};
use tablecraft_core::sorting::{SortDescriptor, decode_sorting, encode_sorting};
use tablecraft_core::state::StateParser;
use tablecraft_core::SearchParams;

fn definitions() -> Vec<FilterDefinition> {
	vec![
		FilterDefinition::new("title", FilterVariant::Text),
		FilterDefinition::new("status", FilterVariant::MultiSelect),
	]
}

// ============================================================================
// Property-Based Tests: Pagination
// ============================================================================

proptest! {
	/// Test: valid page numbers are read back unchanged
	///
	/// Category: Property
	#[test]
	fn prop_page_reads_back(page in 1u32..1_000_000) {
		let state = StateParser::new().parse(format!("page={page}"));
		prop_assert_eq!(state.pagination.page, page);
	}

	/// Test: pagination never drops below its minimums
	///
	/// Category: Property
	/// Verifies that any page/perPage text yields page >= 1 and
	/// perPage >= the default page size.
	#[test]
	fn prop_pagination_minimums(page in ".{0,12}", per_page in ".{0,12}", default in 1u32..100) {
		let mut params = SearchParams::new();
		params.append("page", page);
		params.append("perPage", per_page);

		let state = StateParser::new().default_page_size(default).parse(params);

		prop_assert!(state.pagination.page >= 1);
		prop_assert!(state.pagination.per_page >= default);
	}
}

// ============================================================================
// Property-Based Tests: Filters and sorting
// ============================================================================

proptest! {
	/// Test: separated lists split into their non-empty entries
	///
	/// Category: Property
	#[test]
	fn prop_list_filter_split(values in prop::collection::vec("[a-z]{1,6}", 1..8), trailing in any::<bool>()) {
		let mut raw = values.join(",");
		if trailing {
			raw.push(',');
		}
		let mut params = SearchParams::new();
		params.append("status", raw);
		let definitions = definitions();

		let state = StateParser::new().filter_definitions(&definitions).parse(params);

		prop_assert_eq!(&state.raw_filters["status"], &Some(FilterValue::List(values)));
	}

	/// Test: sort lists survive encode/decode
	///
	/// Category: Property
	#[test]
	fn prop_sort_round_trip(entries in prop::collection::vec(("[a-zA-Z]{1,8}", any::<bool>()), 0..5)) {
		let sorting: Vec<SortDescriptor> = entries
			.into_iter()
			.map(|(id, desc)| SortDescriptor { id, desc })
			.collect();

		let decoded = decode_sorting(&encode_sorting(&sorting), None);

		prop_assert_eq!(decoded, Some(sorting));
	}

	/// Test: parsing is idempotent
	///
	/// Category: Property
	/// Verifies that parsing the same input twice, or re-parsing the
	/// normalized parameters, yields equal state.
	#[test]
	fn prop_parse_idempotent(query in "[a-zA-Z0-9=&,%\\[\\]{}\":]{0,60}") {
		let definitions = definitions();
		let parser = StateParser::new().filter_definitions(&definitions);

		let first = parser.parse(query.as_str());
		let second = parser.parse(query.as_str());
		let reparsed = parser.parse(first.search_params.to_query_string());

		prop_assert_eq!(&first, &second);
		prop_assert_eq!(&first, &reparsed);
	}
}
