//! Client-side URL synchronization and action triggers.

#[cfg(feature = "client")]
pub use tablecraft_client::*;
