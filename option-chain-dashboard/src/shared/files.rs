//! Snapshot and history files for rendering without a live backend.

use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

use super::backend::snapshots_from_map;
use super::error::DashboardError;
use super::types::{HistoricalPoint, SymbolSnapshot};

/// Load a `symbol -> snapshot` file in the `/api/dashboard` shape
pub fn load_snapshot_file(
    path: impl AsRef<Path>,
) -> Result<IndexMap<String, SymbolSnapshot>, DashboardError> {
    let path = path.as_ref();
    let payload: IndexMap<String, Value> = serde_json::from_slice(&std::fs::read(path)?)?;
    debug!(path = %path.display(), symbols = payload.len(), "loaded snapshot file");
    Ok(snapshots_from_map(payload))
}

/// Load a `symbol -> [HistoricalPoint]` file.
///
/// A symbol whose history does not decode is logged and dropped; its trend panel then shows the
/// no-history placeholder.
pub fn load_history_file(
    path: impl AsRef<Path>,
) -> Result<IndexMap<String, Vec<HistoricalPoint>>, DashboardError> {
    let path = path.as_ref();
    let payload: IndexMap<String, Value> = serde_json::from_slice(&std::fs::read(path)?)?;
    debug!(path = %path.display(), symbols = payload.len(), "loaded history file");

    Ok(payload
        .into_iter()
        .filter_map(
            |(symbol, value)| match serde_json::from_value::<Vec<HistoricalPoint>>(value) {
                Ok(points) => Some((symbol, points)),
                Err(error) => {
                    warn!(%symbol, %error, "dropping malformed history");
                    None
                }
            },
        )
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO_DASHBOARD: &str = include_str!("../../fixtures/demo_dashboard.json");
    const DEMO_HISTORY: &str = include_str!("../../fixtures/demo_history.json");

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_demo_snapshot_file() {
        let path = write_temp("demo_dashboard.json", DEMO_DASHBOARD);
        let snapshots = load_snapshot_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let symbols: Vec<&str> = snapshots.keys().map(String::as_str).collect();
        assert_eq!(symbols, vec!["NIFTY", "BANKNIFTY"]);

        let nifty = &snapshots["NIFTY"];
        assert_eq!(nifty.spot_price, 22150.75);
        assert!(!nifty.strike_data.is_empty());
        assert!(
            nifty
                .strike_data
                .windows(2)
                .all(|pair| pair[0].strike < pair[1].strike)
        );
        assert_eq!(nifty.sentiment_score(), Some(65.0));
        assert_eq!(
            nifty.signals.as_ref().and_then(|signals| signals.overall_bias.as_deref()),
            Some("BULLISH")
        );

        let banknifty = &snapshots["BANKNIFTY"];
        assert!(banknifty.analysis.is_some());
        assert_eq!(banknifty.sentiment_score(), None);
    }

    #[test]
    fn test_load_demo_history_file() {
        let path = write_temp("demo_history.json", DEMO_HISTORY);
        let history = load_history_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(history["NIFTY"].len() > 1);
        assert!(history["BANKNIFTY"].is_empty());
    }

    #[test]
    fn test_snapshot_file_keeps_valid_symbols() {
        let path = write_temp(
            "partial_dashboard.json",
            r#"{
                "NIFTY": { "spot_price": 22150.75, "strike_data": [{ "strike": 22100 }] },
                "BANKNIFTY": { "spot_price": 47512.3, "strike_data": [{ "ce_oi": 30000 }] }
            }"#,
        );
        let snapshots = load_snapshot_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let symbols: Vec<&str> = snapshots.keys().map(String::as_str).collect();
        assert_eq!(symbols, vec!["NIFTY"]);
    }

    #[test]
    fn test_history_file_keeps_valid_symbols() {
        let path = write_temp(
            "partial_history.json",
            r#"{
                "NIFTY": [{ "timestamp": "2024-01-05T15:05:00", "pcr_oi": 1.02 }],
                "BANKNIFTY": [{ "timestamp": "05-Jan-2024 15:30:00", "pcr_oi": 0.87 }],
                "FINNIFTY": [{ "timestamp": "after lunch", "pcr_oi": 0.95 }]
            }"#,
        );
        let history = load_history_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let symbols: Vec<&str> = history.keys().map(String::as_str).collect();
        assert_eq!(symbols, vec!["NIFTY", "BANKNIFTY"]);
        assert_eq!(
            history["BANKNIFTY"][0].timestamp.to_rfc3339(),
            "2024-01-05T15:30:00+00:00"
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_snapshot_file("/nonexistent/option-chain/snapshot.json");
        assert!(matches!(result, Err(DashboardError::Io(_))));
    }
}
