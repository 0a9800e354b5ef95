//! Filter model
//!
//! - [`value`]: parsed filter values and the raw filter map
//! - [`definition`]: per-field filter definitions (variant, key alias, separator)
//! - [`advanced`]: operator-bearing filters encoded under a single URL key

pub mod advanced;
pub mod definition;
pub mod value;

pub use advanced::{
	AdvancedFilter, FilterItemValue, FilterOperator, JoinOperator, decode_advanced_filters,
	decode_join_operator, encode_advanced_filters,
};
pub use definition::{FilterDefinition, FilterParseFn, FilterVariant, parse_number, parse_numbers};
pub use value::{FilterMap, FilterValue, RawFilterValue};
