//! Dashboard chart rendering
//!
//! Provides:
//! - Plotly.js trace and layout descriptors
//! - Read-only colour palette
//! - Render target capability and panel container naming
//! - Chart renderer mapping snapshots onto panels
//! - HTML dashboard document implementing the render target

pub mod descriptor;
mod document;
mod palette;
mod renderer;
mod target;

pub use descriptor::{Chart, Coord, Trace};
pub use document::{DEFAULT_PLOTLY_SRC, DashboardDocument, PanelContent};
pub use palette::Palette;
pub use renderer::{
    ChartRenderer, NO_HISTORY_MARKUP, NO_SENTIMENT_MARKUP, NO_SNAPSHOT_MARKUP, PCR_OVERBOUGHT,
    PCR_OVERSOLD, SENTIMENT_BANDS, SPOT_LABEL_HEIGHT,
};
pub use target::{ContainerId, Panel, RenderTarget};
