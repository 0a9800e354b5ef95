//! Client-side state synchronization for tablecraft tables
//!
//! The URL is the source of truth for pagination, sorting and simple
//! filters. [`TableStateSync`] reads those from a [`Navigator`], exposes them
//! in the shape a renderer controls, and writes changes back with debounce
//! and throttle applied. Row selection and column visibility stay local.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tablecraft_client::navigation::{MemoryNavigator, Navigator};
//! use tablecraft_client::sync::{PaginationIndex, TableStateSync};
//!
//! let navigator = Arc::new(MemoryNavigator::new("page=3&perPage=20"));
//! let sync = TableStateSync::builder(navigator.clone()).build();
//!
//! assert_eq!(sync.pagination(), PaginationIndex { page_index: 2, page_size: 20 });
//!
//! sync.set_pagination(PaginationIndex { page_index: 0, page_size: 20 });
//! assert_eq!(navigator.search_params().get("page"), Some("1"));
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

pub mod actions;
pub mod debounce;
pub mod navigation;
pub mod sync;

// Re-exports for convenience
pub use actions::TableActions;
pub use debounce::{PendingWrite, Throttle};
pub use navigation::{
	MemoryNavigator, NavigateOptions, NavigationRecord, Navigator, ParamUpdates, apply_updates,
};
pub use sync::{
	ColumnFilterState, FlagMap, PaginationIndex, TableStateSync, TableStateSyncBuilder, Updater,
};
