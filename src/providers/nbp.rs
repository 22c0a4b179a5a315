use super::throttle::Throttle;
use crate::core::currency::Currency;
use crate::core::rates::{RateProvider, RateRecord, RateWindow};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

const RATES_ENDPOINT: &str = "/api/exchangerates/rates/A";
const REQUESTS_PER_SECOND: u32 = 2;

#[derive(Debug, Deserialize)]
struct NbpRatesResponse {
    rates: Vec<RateRecord>,
}

/// Builds the request path for a rate series ending at `today`.
pub fn rates_path(currency: Currency, window: RateWindow, today: NaiveDate) -> String {
    match window.date_range(today) {
        Some((start, end)) => format!(
            "{RATES_ENDPOINT}/{}/{}/{}/",
            currency.code(),
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ),
        None => format!(
            "{RATES_ENDPOINT}/{}/last/{}/",
            currency.code(),
            window.count()
        ),
    }
}

/// Client for the NBP table A mid rates.
pub struct NbpProvider {
    base_url: String,
    throttle: Throttle,
}

impl NbpProvider {
    pub fn new(base_url: &str) -> Self {
        NbpProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            throttle: Throttle::per_second(REQUESTS_PER_SECOND),
        }
    }

    /// GETs `path` and decodes the rate list. Any status other than 200
    /// yields `None`.
    async fn get_rates(&self, path: &str) -> Result<Option<Vec<RateRecord>>> {
        self.throttle.wait().await;

        let url = format!("{}{}", self.base_url, path);
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(concat!("ratewatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let response = client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for {}", e, url))?;

        if response.status() != StatusCode::OK {
            warn!(status = %response.status(), %url, "Rate request was not successful");
            return Ok(None);
        }

        let text = response
            .text()
            .await
            .context("Failed to get response text")?;

        match serde_json::from_str::<NbpRatesResponse>(&text) {
            Ok(data) => Ok(Some(data.rates)),
            Err(e) => {
                error!(
                    error = ?e,
                    response = %text,
                    "Failed to parse rates response"
                );
                Err(e).with_context(|| format!("Failed to parse rates response from {url}"))
            }
        }
    }
}

#[async_trait]
impl RateProvider for NbpProvider {
    #[instrument(skip(self))]
    async fn fetch_rates(
        &self,
        currency: Currency,
        window: RateWindow,
    ) -> Result<Vec<RateRecord>> {
        let path = rates_path(currency, window, Local::now().date_naive());
        let rates = self.get_rates(&path).await?.unwrap_or_default();
        debug!(count = rates.len(), "Received rates");
        Ok(rates)
    }

    #[instrument(skip(self))]
    async fn fetch_current_rate(&self, currency: Currency) -> Result<Option<f64>> {
        let path = format!("{RATES_ENDPOINT}/{}/", currency.code());
        let rates = self.get_rates(&path).await?;
        Ok(rates.and_then(|r| r.first().map(|record| record.mid)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"{
        "table": "A",
        "currency": "euro",
        "code": "EUR",
        "rates": [
            {"no": "001/A/NBP/2024", "effectiveDate": "2024-01-02", "mid": 4.3434},
            {"no": "002/A/NBP/2024", "effectiveDate": "2024-01-03", "mid": 4.3594},
            {"no": "003/A/NBP/2024", "effectiveDate": "2024-01-04", "mid": 4.3492}
        ]
    }"#;

    async fn create_mock_server(request_path: &str, template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rates_path_with_date_range() {
        let path = rates_path(Currency::Usd, RateWindow::Days(365), date(2025, 1, 15));
        assert_eq!(path, "/api/exchangerates/rates/A/USD/2024-01-16/2025-01-15/");
    }

    #[test]
    fn test_rates_path_with_last_shorthand() {
        let path = rates_path(Currency::Eur, RateWindow::Last(365), date(2025, 1, 15));
        assert_eq!(path, "/api/exchangerates/rates/A/EUR/last/365/");
    }

    #[tokio::test]
    async fn test_fetch_rates_last_window() {
        let mock_server = create_mock_server(
            "/api/exchangerates/rates/A/EUR/last/3/",
            ResponseTemplate::new(200).set_body_string(MOCK_JSON),
        )
        .await;
        let provider = NbpProvider::new(&mock_server.uri());

        let rates = provider
            .fetch_rates(Currency::Eur, RateWindow::Last(3))
            .await
            .unwrap();

        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0].effective_date, date(2024, 1, 2));
        assert_eq!(rates[0].mid, 4.3434);
        assert_eq!(rates[2].effective_date, date(2024, 1, 4));
        assert_eq!(rates[2].mid, 4.3492);
    }

    #[tokio::test]
    async fn test_fetch_rates_date_range_uses_today() {
        let today = Local::now().date_naive();
        let expected = rates_path(Currency::Usd, RateWindow::Days(30), today);
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(expected.as_str()))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MOCK_JSON))
            .expect(1)
            .mount(&mock_server)
            .await;
        let provider = NbpProvider::new(&mock_server.uri());

        let rates = provider
            .fetch_rates(Currency::Usd, RateWindow::Days(30))
            .await
            .unwrap();
        assert_eq!(rates.len(), 3);
    }

    #[tokio::test]
    async fn test_non_success_status_yields_empty_series() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/api/exchangerates/rates/A/UAH/.*"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("404 NotFound - Not Found - Brak danych"),
            )
            .mount(&mock_server)
            .await;
        let provider = NbpProvider::new(&mock_server.uri());

        let rates = provider
            .fetch_rates(Currency::Uah, RateWindow::Days(7))
            .await
            .unwrap();
        assert!(rates.is_empty());

        let current = provider.fetch_current_rate(Currency::Uah).await.unwrap();
        assert!(current.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let mock_server = create_mock_server(
            "/api/exchangerates/rates/A/EUR/last/3/",
            ResponseTemplate::new(200).set_body_string(r#"{"table": "A"}"#),
        )
        .await;
        let provider = NbpProvider::new(&mock_server.uri());

        let result = provider.fetch_rates(Currency::Eur, RateWindow::Last(3)).await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse rates response")
        );
    }

    #[tokio::test]
    async fn test_fetch_current_rate() {
        let mock_server = create_mock_server(
            "/api/exchangerates/rates/A/EUR/",
            ResponseTemplate::new(200).set_body_string(
                r#"{"code":"EUR","rates":[{"no":"201/A/NBP/2025","effectiveDate":"2025-10-16","mid":4.2489}]}"#,
            ),
        )
        .await;
        let provider = NbpProvider::new(&format!("{}/", mock_server.uri()));

        let rate = provider.fetch_current_rate(Currency::Eur).await.unwrap();
        assert_eq!(rate, Some(4.2489));
    }

    #[tokio::test]
    async fn test_connection_failure_is_an_error() {
        // Nothing listens on the discard port.
        let provider = NbpProvider::new("http://127.0.0.1:9");
        let result = provider.fetch_rates(Currency::Usd, RateWindow::Last(1)).await;
        assert!(result.is_err());
    }
}
