//! URL navigation seam
//!
//! The synchronizer never touches a browser history directly. It reads and
//! writes search parameters through a [`Navigator`]; [`MemoryNavigator`] keeps
//! an in-process history for tests and non-browser hosts.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use tablecraft_core::params::SearchParams;
use tablecraft_core::settings::{HistoryMode, NavigationSettings};

/// Key to new value; `None` removes the key.
pub type ParamUpdates = BTreeMap<String, Option<String>>;

/// How a URL write is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
	pub history: HistoryMode,
	/// Update the URL without refetching server data
	pub shallow: bool,
	/// Scroll to top after navigation
	pub scroll: bool,
}

impl Default for NavigateOptions {
	fn default() -> Self {
		Self::from(&NavigationSettings::default())
	}
}

impl From<&NavigationSettings> for NavigateOptions {
	fn from(settings: &NavigationSettings) -> Self {
		Self {
			history: settings.history,
			shallow: settings.shallow,
			scroll: settings.scroll,
		}
	}
}

/// Reads and writes the current URL's search parameters.
pub trait Navigator: Send + Sync {
	/// Current search parameters
	fn search_params(&self) -> SearchParams;

	/// Applies `updates` to the current parameters
	fn navigate(&self, updates: &ParamUpdates, options: &NavigateOptions);
}

/// Applies updates to a copy of `params`, keeping the order of untouched keys
///
/// # Examples
///
/// ```
/// use tablecraft_client::navigation::{ParamUpdates, apply_updates};
/// use tablecraft_core::params::SearchParams;
///
/// let params = SearchParams::parse("page=3&status=done");
/// let mut updates = ParamUpdates::new();
/// updates.insert("page".into(), Some("1".into()));
/// updates.insert("status".into(), None);
///
/// assert_eq!(apply_updates(&params, &updates).to_query_string(), "page=1");
/// ```
pub fn apply_updates(params: &SearchParams, updates: &ParamUpdates) -> SearchParams {
	let mut next = params.clone();
	for (key, value) in updates {
		match value {
			Some(value) => next.set(key.clone(), value.clone()),
			None => next.remove(key),
		}
	}
	next
}

/// One write received by a [`MemoryNavigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRecord {
	pub updates: ParamUpdates,
	pub options: NavigateOptions,
}

#[derive(Debug)]
struct MemoryHistory {
	entries: Vec<SearchParams>,
	records: Vec<NavigationRecord>,
}

/// In-memory history stack.
///
/// `push` writes append an entry; `replace` writes overwrite the current one.
#[derive(Debug)]
pub struct MemoryNavigator {
	history: Mutex<MemoryHistory>,
}

impl MemoryNavigator {
	pub fn new(initial: impl Into<SearchParams>) -> Self {
		Self {
			history: Mutex::new(MemoryHistory {
				entries: vec![initial.into()],
				records: Vec::new(),
			}),
		}
	}

	/// Every history entry, oldest first
	pub fn entries(&self) -> Vec<SearchParams> {
		self.history.lock().entries.clone()
	}

	/// Every write received, oldest first
	pub fn records(&self) -> Vec<NavigationRecord> {
		self.history.lock().records.clone()
	}

	/// Number of writes received
	pub fn write_count(&self) -> usize {
		self.history.lock().records.len()
	}

	/// Simulates a user editing the URL
	pub fn set_search_params(&self, params: impl Into<SearchParams>) {
		let mut history = self.history.lock();
		let params = params.into();
		match history.entries.last_mut() {
			Some(current) => *current = params,
			None => history.entries.push(params),
		}
	}
}

impl Default for MemoryNavigator {
	fn default() -> Self {
		Self::new(SearchParams::new())
	}
}

impl Navigator for MemoryNavigator {
	fn search_params(&self) -> SearchParams {
		self.history.lock().entries.last().cloned().unwrap_or_default()
	}

	fn navigate(&self, updates: &ParamUpdates, options: &NavigateOptions) {
		let mut history = self.history.lock();
		let current = history.entries.last().cloned().unwrap_or_default();
		let next = apply_updates(&current, updates);
		tracing::debug!(query = %next, history = ?options.history, "navigating");

		match options.history {
			HistoryMode::Push => history.entries.push(next),
			HistoryMode::Replace => match history.entries.last_mut() {
				Some(entry) => *entry = next,
				None => history.entries.push(next),
			},
		}
		history.records.push(NavigationRecord {
			updates: updates.clone(),
			options: *options,
		});
	}
}
