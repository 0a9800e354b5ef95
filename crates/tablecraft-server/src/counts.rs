//! Facet count resolution

use crate::fetcher::CountFetcher;
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tablecraft_core::error::Result;
use tablecraft_core::query::Query;

/// Named count fetchers of one table
pub type CountFetchers<F, C> = BTreeMap<String, Arc<dyn CountFetcher<F, C>>>;

/// Runs every count fetcher concurrently against `query`.
///
/// Results are keyed by count name. The first failure completes the join
/// immediately, drops the remaining fetches and is returned as is; there is
/// no partial map.
pub async fn resolve_counts<F, C>(
	fetchers: &CountFetchers<F, C>,
	query: &Query<F>,
) -> Result<BTreeMap<String, C>>
where
	F: Clone + Send + Sync + 'static,
	C: Send + 'static,
{
	if fetchers.is_empty() {
		return Ok(BTreeMap::new());
	}

	let pending = fetchers.iter().map(|(name, fetcher)| {
		let query = query.clone();
		async move {
			match fetcher.count(query).await {
				Ok(value) => Ok((name.clone(), value)),
				Err(err) => {
					tracing::warn!(count = %name, error = %err, "count fetcher failed");
					Err(err)
				}
			}
		}
	});

	let counts = try_join_all(pending).await?;
	Ok(counts.into_iter().collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fetcher::count_fetcher;
	use rstest::rstest;
	use std::sync::atomic::{AtomicBool, Ordering};
	use std::time::Duration;
	use tablecraft_core::query::build_query;
	use tablecraft_core::state::StateParser;
	use tablecraft_core::TableError;

	fn query() -> Query<()> {
		build_query(&StateParser::new().parse("page=3"), ())
	}

	#[rstest]
	#[tokio::test]
	async fn test_counts_keyed_by_name() {
		// Arrange
		let mut fetchers: CountFetchers<(), u32> = BTreeMap::new();
		fetchers.insert(
			"pages".into(),
			Arc::new(count_fetcher(|q: Query<()>| async move { Ok::<_, TableError>(q.pagination.page) })),
		);
		fetchers.insert(
			"fixed".into(),
			Arc::new(count_fetcher(|_: Query<()>| async { Ok::<_, TableError>(42u32) })),
		);

		// Act
		let counts = resolve_counts(&fetchers, &query()).await.unwrap();

		// Assert
		assert_eq!(counts.len(), 2);
		assert_eq!(counts["pages"], 3);
		assert_eq!(counts["fixed"], 42);
	}

	#[rstest]
	#[tokio::test]
	async fn test_no_fetchers_yields_empty_map() {
		let fetchers: CountFetchers<(), u32> = BTreeMap::new();
		assert!(resolve_counts(&fetchers, &query()).await.unwrap().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_first_failure_fails_all_and_cancels_siblings() {
		// Arrange
		let finished = Arc::new(AtomicBool::new(false));
		let flag = Arc::clone(&finished);
		let mut fetchers: CountFetchers<(), u32> = BTreeMap::new();
		fetchers.insert(
			"broken".into(),
			Arc::new(count_fetcher(|_: Query<()>| async {
				Err::<u32, _>(TableError::fetch("count backend down"))
			})),
		);
		fetchers.insert(
			"slow".into(),
			Arc::new(count_fetcher(move |_: Query<()>| {
				let flag = Arc::clone(&flag);
				async move {
					tokio::time::sleep(Duration::from_millis(200)).await;
					flag.store(true, Ordering::SeqCst);
					Ok::<_, TableError>(1u32)
				}
			})),
		);

		// Act
		let result = resolve_counts(&fetchers, &query()).await;
		tokio::time::sleep(Duration::from_millis(300)).await;

		// Assert
		assert!(matches!(result, Err(TableError::Fetch(_))));
		assert!(!finished.load(Ordering::SeqCst));
	}
}
