//! Server-side table loading.

#[cfg(feature = "server")]
pub use tablecraft_server::*;
