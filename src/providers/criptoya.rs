use super::util::{RetryPolicy, build_client, get_text, with_retry};
use crate::core::error::FetchError;
use crate::core::quote::{Quote, QuoteKind, QuoteSnapshot, RateSource};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER: &str = "criptoya";

/// Fallback quote source: `GET {base_url}/v1/ar/dolar`.
pub struct CriptoYaProvider {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl CriptoYaProvider {
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        Ok(CriptoYaProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(timeout)?,
            retry,
        })
    }
}

#[derive(Deserialize, Debug)]
struct CriptoYaQuote {
    bid: Option<f64>,
    ask: Option<f64>,
}

fn parse_quotes(body: &str, at: DateTime<Utc>) -> Result<QuoteSnapshot, FetchError> {
    let data: Map<String, Value> = serde_json::from_str(body).map_err(|e| {
        FetchError::permanent(PROVIDER, format!("Failed to parse JSON response: {e}"))
    })?;

    let quotes = data.into_iter().filter_map(|(key, value)| {
        let kind = key.parse::<QuoteKind>().ok()?;
        // Kinds nested per instrument upstream have no flat bid/ask and stay empty
        match serde_json::from_value::<CriptoYaQuote>(value) {
            Ok(quote) => Some(Quote::new(kind, quote.bid, quote.ask)),
            Err(e) => {
                debug!(%kind, error = %e, "No flat bid/ask for quote type");
                None
            }
        }
    });

    Ok(QuoteSnapshot::new(at, PROVIDER, quotes))
}

#[async_trait]
impl RateSource for CriptoYaProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(name = "CriptoYaFetch", skip(self))]
    async fn fetch(&self, at: DateTime<Utc>) -> Result<QuoteSnapshot, FetchError> {
        let url = format!("{}/v1/ar/dolar", self.base_url);
        let body = with_retry(PROVIDER, self.retry, || async {
            get_text(&self.client, PROVIDER, &url).await
        })
        .await?;

        parse_quotes(&body, at)
    }
}
