pub mod caching;
pub mod criptoya;
pub mod dolarapi;
pub mod fallback;
pub mod util;

use crate::core::config::AppConfig;
use anyhow::Result;
use caching::MemoizedRateSource;
use criptoya::CriptoYaProvider;
use dolarapi::DolarApiProvider;
use fallback::FallbackRateSource;
use std::time::Duration;
use util::RetryPolicy;

/// DolarApi first, CriptoYa as fallback, memoized per timestamp bucket.
pub type DefaultRateSource =
    MemoizedRateSource<FallbackRateSource<DolarApiProvider, CriptoYaProvider>>;

pub fn build_rate_source(config: &AppConfig) -> Result<DefaultRateSource> {
    let refresh = &config.refresh;
    let timeout = Duration::from_secs(refresh.request_timeout_secs);

    let primary = DolarApiProvider::new(
        config.dolarapi_base_url(),
        timeout,
        RetryPolicy::new(
            refresh.retry_attempts,
            Duration::from_millis(refresh.retry_backoff_ms),
        ),
    )?;
    let secondary = CriptoYaProvider::new(
        config.criptoya_base_url(),
        timeout,
        RetryPolicy::new(
            refresh.fallback_attempts,
            Duration::from_millis(refresh.retry_backoff_ms),
        ),
    )?;

    let fallback = FallbackRateSource::new(
        primary,
        secondary,
        Duration::from_secs(refresh.deadline_secs),
    );
    Ok(MemoizedRateSource::new(fallback, refresh.memo_bucket_secs))
}
