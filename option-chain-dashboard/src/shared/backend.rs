/// HTTP client for the option chain analytics backend
///
/// Performs one-shot reads of the backend's JSON endpoints. Scheduling refreshes is left to
/// whoever drives the client.
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::shared::error::DashboardError;
use crate::shared::types::SymbolSnapshot;

/// Backend client configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend base URL
    pub base_url: String,
    /// Timeout applied to every request
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl BackendConfig {
    /// Create a new configuration with custom URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Client for the analytics backend REST API
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, DashboardError> {
        let mut base_url = Url::parse(&config.base_url)?;

        // Url::join replaces the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        info!(%base_url, "analytics backend client configured");
        Ok(Self { http, base_url })
    }

    /// Resolve an API path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, DashboardError> {
        Ok(self.base_url.join(path)?)
    }

    /// Fetch the latest snapshot for one symbol from `/api/data/<symbol>`
    pub async fn fetch_symbol(&self, symbol: &str) -> Result<SymbolSnapshot, DashboardError> {
        let payload: Value = self.get_json(&format!("api/data/{symbol}")).await?;
        Ok(snapshot_from_payload(payload)?)
    }

    /// Fetch every analysed symbol from `/api/dashboard`
    pub async fn fetch_dashboard(&self) -> Result<IndexMap<String, SymbolSnapshot>, DashboardError> {
        let payload: IndexMap<String, Value> = self.get_json("api/dashboard").await?;
        Ok(snapshots_from_map(payload))
    }

    /// Fetch the backend health report from `/api/health`
    pub async fn health(&self) -> Result<Value, DashboardError> {
        self.get_json("api/health").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        let url = self.endpoint(path)?;
        debug!(%url, "requesting analytics backend");

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Normalise a backend payload into a [`SymbolSnapshot`].
///
/// Payloads carrying an `analysis` key are snapshots already. Anything else is a bare analysis
/// object (the shape `/api/data/<symbol>` and `/api/dashboard` return) and is wrapped so its
/// nested strike data and spot price are promoted.
pub fn snapshot_from_payload(payload: Value) -> Result<SymbolSnapshot, serde_json::Error> {
    if payload.get("analysis").is_some() {
        serde_json::from_value(payload)
    } else {
        serde_json::from_value(serde_json::json!({ "analysis": payload }))
    }
}

/// Normalise a `symbol -> payload` map, such as `/api/dashboard` or a snapshot file.
///
/// Each symbol is decoded on its own; a malformed payload is logged and dropped so the
/// remaining symbols still render.
pub fn snapshots_from_map(payload: IndexMap<String, Value>) -> IndexMap<String, SymbolSnapshot> {
    payload
        .into_iter()
        .filter_map(|(symbol, value)| match snapshot_from_payload(value) {
            Ok(snapshot) => Some((symbol, snapshot)),
            Err(error) => {
                warn!(%symbol, %error, "dropping malformed snapshot");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_joins_base_path() {
        struct TestCase {
            base_url: &'static str,
            path: &'static str,
            expected: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: bare host
                base_url: "http://127.0.0.1:5000",
                path: "api/data/NIFTY",
                expected: "http://127.0.0.1:5000/api/data/NIFTY",
            },
            TestCase {
                // TC1: base path without trailing slash is kept
                base_url: "https://example.com/option-chain",
                path: "api/dashboard",
                expected: "https://example.com/option-chain/api/dashboard",
            },
            TestCase {
                // TC2: base path with trailing slash
                base_url: "https://example.com/option-chain/",
                path: "api/health",
                expected: "https://example.com/option-chain/api/health",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let client = BackendClient::new(BackendConfig::new(test.base_url)).unwrap();
            let actual = client.endpoint(test.path).unwrap();
            assert_eq!(actual.as_str(), test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let result = BackendClient::new(BackendConfig::new("not a url"));
        assert!(matches!(result, Err(DashboardError::Url(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = BackendConfig::new("http://10.0.0.2:5000")
            .with_request_timeout(Duration::from_secs(3));
        assert_eq!(config.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(BackendConfig::default().request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_snapshot_from_flat_analysis_payload() {
        let snapshot = snapshot_from_payload(json!({
            "pcr": { "pcr_oi": 0.87, "pcr_volume": 0.91 },
            "max_pain": 47500,
            "skew_patterns": { "bullish_skew": false },
            "strike_data": [
                { "strike": 47600, "ce_oi": 9000, "pe_oi": 4000, "oi_skew": 0.38 },
                { "strike": 47400, "ce_oi": 3000, "pe_oi": 7000, "oi_skew": -0.4 }
            ],
            "spot_price": 47512.3,
            "timestamp": "05-Jan-2024 15:30:00"
        }))
        .unwrap();

        assert_eq!(snapshot.spot_price, 47512.3);
        assert_eq!(snapshot.strike_data[0].strike, 47400.0);
        let analysis = snapshot.analysis.unwrap();
        assert_eq!(analysis.max_pain, Some(47500.0));
        assert_eq!(analysis.pcr.unwrap().pcr_volume, 0.91);
        assert_eq!(analysis.sentiment_score, None);
        assert_eq!(
            analysis.timestamp.map(|time| time.to_rfc3339()),
            Some("2024-01-05T15:30:00+00:00".to_string())
        );
    }

    #[test]
    fn test_snapshot_from_wrapped_payload() {
        let snapshot = snapshot_from_payload(json!({
            "analysis": { "sentiment_score": 65, "spot_price": 22150.75, "strike_data": [] },
            "signals": { "overall_bias": "NEUTRAL" }
        }))
        .unwrap();

        assert_eq!(snapshot.sentiment_score(), Some(65.0));
        assert_eq!(snapshot.spot_price, 22150.75);
    }

    #[test]
    fn test_snapshots_from_map_keeps_order() {
        let payload: IndexMap<String, Value> = serde_json::from_value(json!({
            "NIFTY": { "spot_price": 22150.75 },
            "BANKNIFTY": { "spot_price": 47512.3 }
        }))
        .unwrap();

        let snapshots = snapshots_from_map(payload);
        let symbols: Vec<&str> = snapshots.keys().map(String::as_str).collect();
        assert_eq!(symbols, vec!["NIFTY", "BANKNIFTY"]);
        assert_eq!(snapshots["BANKNIFTY"].spot_price, 47512.3);
        assert!(snapshots["NIFTY"].analysis.is_some());
    }

    #[test]
    fn test_snapshots_from_map_drops_malformed_symbol() {
        let payload: IndexMap<String, Value> = serde_json::from_value(json!({
            "NIFTY": {
                "spot_price": 22150.75,
                "strike_data": [{ "strike": 22100, "ce_oi": 88000, "pe_oi": 91000 }]
            },
            "BANKNIFTY": {
                "spot_price": 47512.3,
                "strike_data": [{ "ce_oi": 30000, "pe_oi": 70000 }]
            },
            "FINNIFTY": "not an object"
        }))
        .unwrap();

        let snapshots = snapshots_from_map(payload);
        let symbols: Vec<&str> = snapshots.keys().map(String::as_str).collect();
        assert_eq!(symbols, vec!["NIFTY"]);
        assert_eq!(snapshots["NIFTY"].strike_data.len(), 1);
    }
}
