use crate::core::error::FetchError;
use crate::core::quote::{QuoteSnapshot, RateSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{error, warn};

/// Tries the primary source within `deadline`, then the secondary one.
///
/// The deadline covers the primary's whole retry sequence, so a provider that
/// keeps timing out cannot hold the dashboard for attempts × timeout seconds.
/// The secondary is bounded by its own request timeout.
pub struct FallbackRateSource<P: RateSource, S: RateSource> {
    primary: P,
    secondary: S,
    deadline: Duration,
}

impl<P: RateSource, S: RateSource> FallbackRateSource<P, S> {
    pub fn new(primary: P, secondary: S, deadline: Duration) -> Self {
        Self {
            primary,
            secondary,
            deadline,
        }
    }
}

#[async_trait]
impl<P: RateSource, S: RateSource> RateSource for FallbackRateSource<P, S> {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn fetch(&self, at: DateTime<Utc>) -> Result<QuoteSnapshot, FetchError> {
        let primary_error = match tokio::time::timeout(self.deadline, self.primary.fetch(at)).await
        {
            Ok(Ok(snapshot)) => return Ok(snapshot),
            Ok(Err(e)) => e,
            Err(_) => FetchError::transient(
                self.primary.name(),
                format!("Deadline of {:?} exceeded", self.deadline),
            ),
        };

        warn!(
            primary = self.primary.name(),
            secondary = self.secondary.name(),
            error = %primary_error,
            "Primary quote source failed, trying fallback"
        );

        self.secondary.fetch(at).await.map_err(|secondary_error| {
            error!(error = %secondary_error, "Fallback quote source failed");
            FetchError::Unavailable {
                primary: primary_error.to_string(),
                secondary: secondary_error.to_string(),
            }
        })
    }
}
