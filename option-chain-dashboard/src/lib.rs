/// Option Chain Dashboard - Shared Library
///
/// This library provides the pieces behind the two binaries:
/// - render-dashboard: renders analytics snapshots into a Plotly HTML page
/// - oc-launch: starts the analytics backend for the current environment
///
/// The library includes:
/// - Snapshot data model and backend JSON ingestion
/// - Chart renderer mapping snapshots onto Plotly trace/layout descriptors
/// - HTML dashboard document acting as the render target
/// - HTTP client for the analytics backend
pub mod shared;

// Re-export commonly used types for convenience
pub use shared::types::{
    Analysis, Buildup, HistoricalPoint, PcrSummary, StrikeRow, SupportResistance,
    SymbolSnapshot, TradingSignals,
};

pub use shared::backend::{
    BackendClient, BackendConfig, snapshot_from_payload, snapshots_from_map,
};
pub use shared::config::DashboardConfig;
pub use shared::error::DashboardError;
pub use shared::files::{load_history_file, load_snapshot_file};
pub use shared::launch::{Environment, LaunchCommand, LaunchConfig};
pub use shared::logging::init_logging;

// Chart rendering
pub use shared::charts::{
    Chart, ChartRenderer, ContainerId, DashboardDocument, Palette, Panel, PanelContent,
    RenderTarget,
};
