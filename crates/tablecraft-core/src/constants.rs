//! Default query keys and limits shared by the server and client sides.

/// Query key holding the one-based page number.
pub const PAGE_KEY: &str = "page";
/// Query key holding the page size.
pub const PER_PAGE_KEY: &str = "perPage";
/// Query key holding the JSON-encoded sort list.
pub const SORT_KEY: &str = "sort";
/// Query key holding the JSON-encoded advanced filter list.
pub const FILTERS_KEY: &str = "filters";
/// Query key holding the advanced filter join operator.
pub const JOIN_OPERATOR_KEY: &str = "joinOperator";
/// Separator used for list-valued simple filters.
pub const ARRAY_SEPARATOR: &str = ",";
/// Page size used when neither the URL nor the table configures one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Delay before a burst of filter edits is written to the URL.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
/// Minimum spacing between two URL writes.
pub const DEFAULT_THROTTLE_MS: u64 = 50;
