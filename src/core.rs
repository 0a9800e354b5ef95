//! URL state, columns, queries and actions.
//!
//! # Examples
//!
//! ```rust
//! use tablecraft::core::state::StateParser;
//!
//! let state = StateParser::new().parse("page=0&perPage=25");
//! assert_eq!(state.pagination.page, 1);
//! assert_eq!(state.pagination.per_page, 25);
//! ```

pub use tablecraft_core::*;
