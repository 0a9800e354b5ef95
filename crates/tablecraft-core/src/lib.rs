//! Core types for server-driven data tables
//!
//! This crate turns URL query parameters into typed table state and back.
//! It has no runtime of its own: loading lives in `tablecraft-server` and URL
//! synchronization in `tablecraft-client`.
//!
//! # Features
//!
//! - **URL State Parser**: pagination, sorting, simple and advanced filters
//!   read leniently from search parameters ([`state`])
//! - **Filter Definitions**: explicit or inferred from typed column
//!   configuration ([`columns`], [`filters`])
//! - **Query Builder**: the immutable query handed to fetchers ([`query`])
//! - **Actions**: named async handlers for create/update/delete ([`features`])
//! - **Settings**: key names and defaults, loadable from TOML ([`settings`])
//!
//! # Architecture
//!
//! ```mermaid
//! graph LR
//!     A[SearchParams] --> B[StateParser]
//!     C[ColumnDef] --> D[FilterDefinition]
//!     D --> B
//!     B --> E[ParsedState]
//!     E --> F[Query]
//! ```
//!
//! # Example
//!
//! ```rust
//! use tablecraft_core::columns::{ColumnDef, ColumnFilter, collect_column_ids, resolve_filter_definitions};
//! use tablecraft_core::filters::FilterVariant;
//! use tablecraft_core::query::build_query;
//! use tablecraft_core::state::StateParser;
//!
//! let columns = vec![
//!     ColumnDef::new("title").filter(ColumnFilter::new(FilterVariant::Text)),
//!     ColumnDef::new("status").filter(ColumnFilter::new(FilterVariant::MultiSelect)),
//! ];
//! let definitions = resolve_filter_definitions(None, &columns);
//! let ids = collect_column_ids(&columns);
//!
//! let state = StateParser::new()
//!     .column_ids(&ids)
//!     .filter_definitions(&definitions)
//!     .parse(r#"page=2&sort=[{"id":"title","desc":false}]&status=todo"#);
//! let query = build_query(&state, state.raw_filters.clone());
//!
//! assert_eq!(query.pagination.page, 2);
//! assert_eq!(query.sorting[0].id, "title");
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

pub mod columns;
pub mod constants;
pub mod error;
pub mod features;
pub mod filters;
pub mod pagination;
pub mod params;
pub mod query;
pub mod settings;
pub mod sorting;
pub mod state;

// Re-exports for convenience
pub use columns::{ColumnDef, ColumnFilter, Columns, ColumnsContext, FilterOption};
pub use error::{BoxError, Result, SettingsError, TableError};
pub use features::{Action, ActionConfig, FeatureDescriptor, FeatureKey, FeatureRegistry};
pub use filters::{
	AdvancedFilter, FilterDefinition, FilterMap, FilterOperator, FilterValue, FilterVariant,
	JoinOperator,
};
pub use pagination::PaginationState;
pub use params::{ParamValue, SearchParams};
pub use query::{ListResult, Query, build_query};
pub use settings::{HistoryMode, NavigationSettings, QueryKeys, TableSettings};
pub use sorting::SortDescriptor;
pub use state::{InitialState, ParsedState, StateParser};
