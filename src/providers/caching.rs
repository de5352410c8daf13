use crate::core::error::FetchError;
use crate::core::quote::{QuoteSnapshot, RateSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

/// Memoizes successful fetches per timestamp bucket.
///
/// Calls whose `at` falls into the same `bucket_secs` window share one network
/// request. Only the most recent bucket is kept and failures are never cached.
pub struct MemoizedRateSource<T: RateSource> {
    inner: T,
    bucket_secs: i64,
    cache: Mutex<Option<(i64, QuoteSnapshot)>>,
}

impl<T: RateSource> MemoizedRateSource<T> {
    pub fn new(inner: T, bucket_secs: u64) -> Self {
        Self {
            inner,
            bucket_secs: bucket_secs.max(1) as i64,
            cache: Mutex::new(None),
        }
    }

    fn bucket(&self, at: DateTime<Utc>) -> i64 {
        at.timestamp().div_euclid(self.bucket_secs)
    }
}

#[async_trait]
impl<T: RateSource> RateSource for MemoizedRateSource<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, at: DateTime<Utc>) -> Result<QuoteSnapshot, FetchError> {
        let bucket = self.bucket(at);
        let mut cache = self.cache.lock().await;
        if let Some((cached_bucket, snapshot)) = cache.as_ref()
            && *cached_bucket == bucket
        {
            debug!("Cache hit for quotes bucket: {}", bucket);
            return Ok(snapshot.clone());
        }
        debug!("Cache miss for quotes bucket: {}", bucket);
        let snapshot = self.inner.fetch(at).await?;
        *cache = Some((bucket, snapshot.clone()));
        Ok(snapshot)
    }
}
