//! Data source seams
//!
//! A table loads through three injected collaborators:
//!
//! - a [`RowFetcher`] producing one page of rows,
//! - any number of named [`CountFetcher`]s producing facet counts,
//! - a [`FilterTransform`] turning the raw filter map into the typed filters
//!   the fetchers expect.
//!
//! Implement the traits directly, or wrap async closures with
//! [`row_fetcher`], [`count_fetcher`] and [`filter_transform`].

use async_trait::async_trait;
use std::future::Future;
use tablecraft_core::error::Result;
use tablecraft_core::filters::FilterMap;
use tablecraft_core::query::{ListResult, Query};

/// Fetches one page of rows for a query.
#[async_trait]
pub trait RowFetcher<F, R, M = ()>: Send + Sync {
	async fn fetch(&self, query: Query<F>) -> Result<ListResult<R, M>>;
}

/// Computes one named facet count for a query.
#[async_trait]
pub trait CountFetcher<F, C>: Send + Sync {
	async fn count(&self, query: Query<F>) -> Result<C>;
}

/// Converts raw URL filters into the fetchers' filter type.
#[async_trait]
pub trait FilterTransform<F>: Send + Sync {
	async fn transform(&self, raw: FilterMap) -> Result<F>;
}

/// Passes the raw filter map through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

#[async_trait]
impl FilterTransform<FilterMap> for IdentityTransform {
	async fn transform(&self, raw: FilterMap) -> Result<FilterMap> {
		Ok(raw)
	}
}

/// [`RowFetcher`] backed by an async function
pub struct RowFetcherFn<Func>(Func);

/// Wraps an async function as a [`RowFetcher`]
pub fn row_fetcher<Func>(func: Func) -> RowFetcherFn<Func> {
	RowFetcherFn(func)
}

#[async_trait]
impl<Func, Fut, F, R, M> RowFetcher<F, R, M> for RowFetcherFn<Func>
where
	Func: Fn(Query<F>) -> Fut + Send + Sync,
	Fut: Future<Output = Result<ListResult<R, M>>> + Send,
	F: Send + 'static,
	R: Send + 'static,
	M: Send + 'static,
{
	async fn fetch(&self, query: Query<F>) -> Result<ListResult<R, M>> {
		(self.0)(query).await
	}
}

/// [`CountFetcher`] backed by an async function
pub struct CountFetcherFn<Func>(Func);

/// Wraps an async function as a [`CountFetcher`]
pub fn count_fetcher<Func>(func: Func) -> CountFetcherFn<Func> {
	CountFetcherFn(func)
}

#[async_trait]
impl<Func, Fut, F, C> CountFetcher<F, C> for CountFetcherFn<Func>
where
	Func: Fn(Query<F>) -> Fut + Send + Sync,
	Fut: Future<Output = Result<C>> + Send,
	F: Send + 'static,
	C: Send + 'static,
{
	async fn count(&self, query: Query<F>) -> Result<C> {
		(self.0)(query).await
	}
}

/// [`FilterTransform`] backed by an async function
pub struct FilterTransformFn<Func>(Func);

/// Wraps an async function as a [`FilterTransform`]
pub fn filter_transform<Func>(func: Func) -> FilterTransformFn<Func> {
	FilterTransformFn(func)
}

#[async_trait]
impl<Func, Fut, F> FilterTransform<F> for FilterTransformFn<Func>
where
	Func: Fn(FilterMap) -> Fut + Send + Sync,
	Fut: Future<Output = Result<F>> + Send,
	F: Send + 'static,
{
	async fn transform(&self, raw: FilterMap) -> Result<F> {
		(self.0)(raw).await
	}
}
