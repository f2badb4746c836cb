use thiserror::Error;

/// All errors generated by the dashboard outer surfaces (backend client, files, launcher).
///
/// Chart rendering itself never fails: degenerate inputs render as degenerate panels.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),

    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("empty launch command configured in {0}")]
    EmptyCommand(String),
}

impl DashboardError {
    /// Determine if the error is scoped to a single symbol, so the remaining symbols can still
    /// be rendered.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_symbol_scoped(&self) -> bool {
        match self {
            DashboardError::Status { status, .. } => *status == 404,
            DashboardError::Decode(_) => true,
            _ => false,
        }
    }
}
