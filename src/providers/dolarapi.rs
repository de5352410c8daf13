use super::util::{RetryPolicy, build_client, get_text, with_retry};
use crate::core::error::FetchError;
use crate::core::quote::{Quote, QuoteKind, QuoteSnapshot, RateSource};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER: &str = "dolarapi";

/// Primary quote source: `GET {base_url}/v1/dolares`.
pub struct DolarApiProvider {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl DolarApiProvider {
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        Ok(DolarApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(timeout)?,
            retry,
        })
    }
}

#[derive(Deserialize, Debug)]
struct DolarApiQuote {
    casa: String,
    compra: Option<f64>,
    venta: Option<f64>,
}

fn kind_for_casa(casa: &str) -> Option<QuoteKind> {
    match casa {
        "blue" => Some(QuoteKind::Blue),
        "oficial" => Some(QuoteKind::Oficial),
        "bolsa" => Some(QuoteKind::Mep),
        "contadoconliqui" => Some(QuoteKind::Ccl),
        "cripto" => Some(QuoteKind::Cripto),
        _ => None,
    }
}

fn parse_quotes(body: &str, at: DateTime<Utc>) -> Result<QuoteSnapshot, FetchError> {
    let items: Vec<DolarApiQuote> = serde_json::from_str(body).map_err(|e| {
        FetchError::permanent(PROVIDER, format!("Failed to parse JSON response: {e}"))
    })?;

    let quotes = items.into_iter().filter_map(|item| match kind_for_casa(&item.casa) {
        Some(kind) => Some(Quote::new(kind, item.compra, item.venta)),
        None => {
            debug!(casa = %item.casa, "Ignoring unknown quote type");
            None
        }
    });

    Ok(QuoteSnapshot::new(at, PROVIDER, quotes))
}

#[async_trait]
impl RateSource for DolarApiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    #[instrument(name = "DolarApiFetch", skip(self))]
    async fn fetch(&self, at: DateTime<Utc>) -> Result<QuoteSnapshot, FetchError> {
        let url = format!("{}/v1/dolares", self.base_url);
        let body = with_retry(PROVIDER, self.retry, || async {
            get_text(&self.client, PROVIDER, &url).await
        })
        .await?;

        parse_quotes(&body, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"[
        {"moneda": "USD", "casa": "oficial", "nombre": "Oficial", "compra": 1010.5, "venta": 1050.5, "fechaActualizacion": "2025-06-30T15:00:00.000Z"},
        {"moneda": "USD", "casa": "blue", "nombre": "Blue", "compra": 1180, "venta": 1200, "fechaActualizacion": "2025-06-30T15:00:00.000Z"},
        {"moneda": "USD", "casa": "bolsa", "nombre": "Bolsa", "compra": 1190.2, "venta": 1195.8, "fechaActualizacion": "2025-06-30T15:00:00.000Z"},
        {"moneda": "USD", "casa": "contadoconliqui", "nombre": "Contado con liquidación", "compra": 1200.1, "venta": 1210.9, "fechaActualizacion": "2025-06-30T15:00:00.000Z"},
        {"moneda": "USD", "casa": "mayorista", "nombre": "Mayorista", "compra": 1000, "venta": 1010, "fechaActualizacion": "2025-06-30T15:00:00.000Z"},
        {"moneda": "USD", "casa": "cripto", "nombre": "Cripto", "compra": 1215, "venta": 1225.5, "fechaActualizacion": "2025-06-30T15:00:00.000Z"},
        {"moneda": "USD", "casa": "tarjeta", "nombre": "Tarjeta", "compra": null, "venta": 1365.6, "fechaActualizacion": "2025-06-30T15:00:00.000Z"}
    ]"#;

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/dolares"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_successful_quotes_fetch() {
        let mock_server = create_mock_server(200, MOCK_JSON).await;
        let provider =
            DolarApiProvider::new(&mock_server.uri(), Duration::from_secs(5), fast_retry()).unwrap();

        let at = Utc::now();
        let snapshot = provider.fetch(at).await.unwrap();

        assert_eq!(snapshot.timestamp(), at);
        assert_eq!(snapshot.source(), "dolarapi");
        assert_eq!(snapshot.quote(QuoteKind::Blue).buy, Some(1180.0));
        assert_eq!(snapshot.quote(QuoteKind::Blue).sell, Some(1200.0));
        assert_eq!(snapshot.quote(QuoteKind::Oficial).sell, Some(1050.5));
        // bolsa and contadoconliqui are renamed
        assert_eq!(snapshot.quote(QuoteKind::Mep).buy, Some(1190.2));
        assert_eq!(snapshot.quote(QuoteKind::Ccl).sell, Some(1210.9));
        assert_eq!(snapshot.quote(QuoteKind::Cripto).sell, Some(1225.5));
    }

    #[test]
    fn test_missing_kinds_are_empty() {
        let body = r#"[{"casa": "blue", "compra": 1180, "venta": null}]"#;
        let snapshot = parse_quotes(body, Utc::now()).unwrap();
        assert_eq!(snapshot.quote(QuoteKind::Blue).buy, Some(1180.0));
        assert!(snapshot.quote(QuoteKind::Blue).sell.is_none());
        assert!(snapshot.quote(QuoteKind::Mep).buy.is_none());
        assert_eq!(snapshot.quotes().count(), 5);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_permanent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/dolares"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"error": "nope"}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider =
            DolarApiProvider::new(&mock_server.uri(), Duration::from_secs(5), fast_retry()).unwrap();
        let err = provider.fetch(Utc::now()).await.unwrap_err();
        assert!(!err.is_transient());
        assert!(err.to_string().contains("Failed to parse JSON response"));
    }

    #[tokio::test]
    async fn test_service_unavailable_is_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/dolares"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&mock_server)
            .await;

        let provider =
            DolarApiProvider::new(&mock_server.uri(), Duration::from_secs(5), fast_retry()).unwrap();
        let err = provider.fetch(Utc::now()).await.unwrap_err();
        assert!(err.is_transient());
        assert!(
            err.to_string()
                .contains("HTTP error: 503 Service Unavailable")
        );
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/dolares"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider =
            DolarApiProvider::new(&mock_server.uri(), Duration::from_secs(5), fast_retry()).unwrap();
        let err = provider.fetch(Utc::now()).await.unwrap_err();
        assert!(!err.is_transient());
    }
}
