//! Server-side loading for tablecraft tables
//!
//! A [`ServerTable`] parses the request's search parameters, transforms the
//! raw filters, builds the query and runs the row fetcher together with every
//! named count fetcher. The result is a serializable [`LoadResult`].
//!
//! # Architecture
//!
//! ```mermaid
//! graph LR
//!     A[SearchParams] --> B[StateParser]
//!     B --> C[FilterTransform]
//!     C --> D[Query]
//!     D --> E[RowFetcher]
//!     D --> F[CountFetchers]
//!     E --> G[LoadResult]
//!     F --> G
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

pub mod counts;
pub mod fetcher;
pub mod table;

// Re-exports for convenience
pub use counts::{CountFetchers, resolve_counts};
pub use fetcher::{
	CountFetcher, FilterTransform, IdentityTransform, RowFetcher, count_fetcher, filter_transform,
	row_fetcher,
};
pub use table::{LoadResult, LoadState, ServerTable, ServerTableBuilder, resolve_page_count};
