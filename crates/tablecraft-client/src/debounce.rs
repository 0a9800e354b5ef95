//! Deferred URL writes
//!
//! [`PendingWrite`] collects keyed values and commits them together once a
//! timer fires. Scheduling a value for a key that is already pending replaces
//! it, so the last write per key wins and no key is lost. A pending batch is
//! committed on timeout, on [`PendingWrite::flush`], or never if
//! [`PendingWrite::cancel`] is called.
//!
//! [`Throttle`] tracks the minimum spacing between commits.
//!
//! Timers run on the ambient tokio runtime; scheduling outside a runtime
//! commits immediately.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

type CommitFn<K, V> = Box<dyn Fn(BTreeMap<K, V>) + Send + Sync>;

struct PendingState<K, V> {
	values: BTreeMap<K, V>,
	/// Bumped whenever the batch is replaced, committed or cancelled
	generation: u64,
	deadline: Option<Instant>,
	timer: Option<JoinHandle<()>>,
}

struct Shared<K, V> {
	state: Mutex<PendingState<K, V>>,
	commit: CommitFn<K, V>,
}

impl<K: Ord, V> Shared<K, V> {
	/// Takes the batch if `generation` is still current
	fn take_if_current(&self, generation: u64) -> Option<BTreeMap<K, V>> {
		let mut state = self.state.lock();
		if state.generation != generation {
			return None;
		}
		state.generation += 1;
		state.deadline = None;
		state.timer = None;
		Some(std::mem::take(&mut state.values))
	}

	fn take_all(&self) -> BTreeMap<K, V> {
		let mut state = self.state.lock();
		state.generation += 1;
		state.deadline = None;
		if let Some(timer) = state.timer.take() {
			timer.abort();
		}
		std::mem::take(&mut state.values)
	}
}

/// A cancellable, keyed, deferred write.
pub struct PendingWrite<K, V> {
	delay: Duration,
	shared: Arc<Shared<K, V>>,
}

impl<K, V> PendingWrite<K, V>
where
	K: Ord + Send + 'static,
	V: Send + 'static,
{
	/// Creates a writer whose [`schedule`](Self::schedule) waits `delay`
	pub fn new<F>(delay: Duration, commit: F) -> Self
	where
		F: Fn(BTreeMap<K, V>) + Send + Sync + 'static,
	{
		Self {
			delay,
			shared: Arc::new(Shared {
				state: Mutex::new(PendingState {
					values: BTreeMap::new(),
					generation: 0,
					deadline: None,
					timer: None,
				}),
				commit: Box::new(commit),
			}),
		}
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Debounced write: merges the value and restarts the timer
	pub fn schedule(&self, key: K, value: V) {
		self.schedule_all([(key, value)]);
	}

	/// Debounced write of several keys at once
	pub fn schedule_all(&self, entries: impl IntoIterator<Item = (K, V)>) {
		self.enqueue(entries, self.delay, true);
	}

	/// Merges the value, committing no later than `wait` from now
	///
	/// An already pending deadline is kept, so repeated calls do not push the
	/// commit further out.
	pub fn schedule_within(&self, entries: impl IntoIterator<Item = (K, V)>, wait: Duration) {
		self.enqueue(entries, wait, false);
	}

	fn enqueue(&self, entries: impl IntoIterator<Item = (K, V)>, wait: Duration, restart: bool) {
		let Ok(runtime) = tokio::runtime::Handle::try_current() else {
			tracing::debug!("no async runtime, committing deferred write immediately");
			let mut state = self.shared.state.lock();
			state.values.extend(entries);
			drop(state);
			self.flush();
			return;
		};

		let mut state = self.shared.state.lock();
		state.values.extend(entries);
		if !restart && state.timer.is_some() {
			return;
		}

		if let Some(timer) = state.timer.take() {
			timer.abort();
		}
		state.generation += 1;
		let generation = state.generation;
		let deadline = Instant::now() + wait;
		state.deadline = Some(deadline);

		let shared = Arc::clone(&self.shared);
		state.timer = Some(runtime.spawn(async move {
			tokio::time::sleep_until(deadline).await;
			if let Some(values) = shared.take_if_current(generation)
				&& !values.is_empty()
			{
				(shared.commit)(values);
			}
		}));
	}

	/// Commits the pending batch now, if any
	pub fn flush(&self) {
		let values = self.shared.take_all();
		if !values.is_empty() {
			(self.shared.commit)(values);
		}
	}

	/// Drops the pending batch without committing
	pub fn cancel(&self) {
		let dropped = self.shared.take_all();
		if !dropped.is_empty() {
			tracing::debug!(keys = dropped.len(), "cancelled pending write");
		}
	}

	/// Whether a batch is waiting to be committed
	pub fn is_pending(&self) -> bool {
		!self.shared.state.lock().values.is_empty()
	}

	/// When the pending batch will be committed
	pub fn deadline(&self) -> Option<Instant> {
		self.shared.state.lock().deadline
	}
}

impl<K: Clone + Ord, V: Clone> PendingWrite<K, V> {
	/// Copy of the pending batch
	pub fn pending(&self) -> BTreeMap<K, V> {
		self.shared.state.lock().values.clone()
	}
}

impl<K, V> fmt::Debug for PendingWrite<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.shared.state.lock();
		f.debug_struct("PendingWrite")
			.field("delay", &self.delay)
			.field("pending", &state.values.len())
			.field("deadline", &state.deadline)
			.finish()
	}
}

/// Minimum interval between commits.
#[derive(Debug)]
pub struct Throttle {
	interval: Duration,
	last: Mutex<Option<Instant>>,
}

impl Throttle {
	pub fn new(interval: Duration) -> Self {
		Self {
			interval,
			last: Mutex::new(None),
		}
	}

	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Time left before the next commit is allowed
	pub fn remaining(&self) -> Duration {
		match *self.last.lock() {
			Some(last) => self.interval.saturating_sub(last.elapsed()),
			None => Duration::ZERO,
		}
	}

	/// Records a commit at the current instant
	pub fn mark(&self) {
		*self.last.lock() = Some(Instant::now());
	}
}
