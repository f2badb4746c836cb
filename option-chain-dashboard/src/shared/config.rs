/// Dashboard configuration read from environment variables
///
/// | Variable                  | Default                  |
/// |---------------------------|--------------------------|
/// | `OC_BACKEND_URL`          | `http://127.0.0.1:5000`  |
/// | `OC_SYMBOLS`              | `NIFTY,BANKNIFTY`        |
/// | `OC_OUTPUT`               | `dashboard.html`         |
/// | `OC_SNAPSHOT_FILE`        | unset (use the backend)  |
/// | `OC_HISTORY_FILE`         | unset (no PCR history)   |
/// | `OC_REQUEST_TIMEOUT_SECS` | `15`                     |
/// | `OC_PLOTLY_URL`           | Plotly.js CDN bundle     |
use std::path::PathBuf;
use std::time::Duration;

use super::backend::BackendConfig;
use super::charts::DEFAULT_PLOTLY_SRC;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub backend: BackendConfig,
    /// Symbols rendered, in page order
    pub symbols: Vec<String>,
    /// HTML file written by `render-dashboard`
    pub output: PathBuf,
    /// Render from this `/api/dashboard`-shaped file instead of the backend
    pub snapshot_file: Option<PathBuf>,
    /// `symbol -> [HistoricalPoint]` file feeding the PCR trend panels
    pub history_file: Option<PathBuf>,
    pub plotly_src: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            symbols: vec!["NIFTY".to_string(), "BANKNIFTY".to_string()],
            output: PathBuf::from("dashboard.html"),
            snapshot_file: None,
            history_file: None,
            plotly_src: DEFAULT_PLOTLY_SRC.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for unset or blank values
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let mut backend = match get("OC_BACKEND_URL") {
            Some(url) => BackendConfig::new(url),
            None => defaults.backend,
        };
        if let Some(secs) = get("OC_REQUEST_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            backend = backend.with_request_timeout(Duration::from_secs(secs));
        }

        let symbols = get("OC_SYMBOLS")
            .map(|value| parse_symbols(&value))
            .filter(|symbols| !symbols.is_empty())
            .unwrap_or(defaults.symbols);

        Self {
            backend,
            symbols,
            output: get("OC_OUTPUT").map(PathBuf::from).unwrap_or(defaults.output),
            snapshot_file: get("OC_SNAPSHOT_FILE").map(PathBuf::from),
            history_file: get("OC_HISTORY_FILE").map(PathBuf::from),
            plotly_src: get("OC_PLOTLY_URL").unwrap_or(defaults.plotly_src),
        }
    }
}

/// Parse a comma separated symbol list, e.g. `nifty, BANKNIFTY`
fn parse_symbols(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
