//! # Tablecraft
//!
//! Server-driven data tables for Rust.
//!
//! Tablecraft keeps a table's pagination, sorting and filters in the URL. The
//! server parses them into a typed query and loads rows and facet counts
//! concurrently; the client mirrors the same URL state into the controlled
//! state a table renderer needs and writes changes back.
//!
//! ## Feature Flags
//!
//! URL parsing, columns, query building, settings and the action registry
//! are always available. Optional features:
//!
//! - `server` - [`ServerTable`] loading with row and count fetchers
//! - `client` - [`TableStateSync`] and [`TableActions`]
//! - `full` (default) - everything
//!
//! ## Quick Example
//!
//! ```rust
//! use tablecraft::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let table: ServerTable<u32> = ServerTable::builder(
//!     "numbers",
//!     row_fetcher(|query: Query<FilterMap>| async move {
//!         let rows = (0..query.pagination.per_page).collect();
//!         Ok::<_, TableError>(ListResult::<u32>::new(rows).with_total(42))
//!     }),
//! )
//! .build();
//!
//! let result = table.load("page=2&perPage=20").await.unwrap();
//! assert_eq!(result.page_count, 3);
//! # }
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

#[cfg(feature = "client")]
pub mod client;
pub mod core;
#[cfg(feature = "server")]
pub mod server;

// Re-export core types
pub use tablecraft_core::{
	ActionConfig, AdvancedFilter, ColumnDef, ColumnFilter, Columns, ColumnsContext,
	FeatureDescriptor, FeatureKey, FeatureRegistry, FilterDefinition, FilterMap, FilterOperator,
	FilterOption, FilterValue, FilterVariant, HistoryMode, InitialState, JoinOperator, ListResult,
	NavigationSettings, PaginationState, ParsedState, Query, QueryKeys, Result, SearchParams,
	SettingsError, SortDescriptor, StateParser, TableError, TableSettings, build_query,
};

// Re-export server loading
#[cfg(feature = "server")]
pub use tablecraft_server::{
	CountFetcher, FilterTransform, IdentityTransform, LoadResult, LoadState, RowFetcher,
	ServerTable, ServerTableBuilder, count_fetcher, filter_transform, row_fetcher,
};

// Re-export client synchronization
#[cfg(feature = "client")]
pub use tablecraft_client::{
	MemoryNavigator, NavigateOptions, Navigator, PaginationIndex, TableActions, TableStateSync,
	Updater,
};

// Re-export common external dependencies
pub use async_trait::async_trait;

pub mod prelude {
	// Core types - always available
	pub use crate::{
		ActionConfig, ColumnDef, ColumnFilter, FeatureKey, FeatureRegistry, FilterMap,
		FilterOption, FilterValue, FilterVariant, InitialState, ListResult, Query, Result,
		SearchParams, SortDescriptor, TableError, TableSettings,
	};

	// External
	pub use async_trait::async_trait;

	// Server feature
	#[cfg(feature = "server")]
	pub use crate::{
		CountFetcher, FilterTransform, LoadResult, RowFetcher, ServerTable, count_fetcher,
		filter_transform, row_fetcher,
	};

	// Client feature
	#[cfg(feature = "client")]
	pub use crate::{MemoryNavigator, Navigator, PaginationIndex, TableActions, TableStateSync, Updater};
}
