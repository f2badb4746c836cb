//! Colour palette shared by every dashboard panel.

/// Read-only colour configuration, fixed when the [`ChartRenderer`](super::ChartRenderer) is
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    // OI skew diverging scale
    pub bearish: &'static str,
    pub neutral: &'static str,
    pub bullish: &'static str,

    // Call / put series
    pub call: &'static str,
    pub put: &'static str,

    // Buildup series
    pub ce_long: &'static str,
    pub ce_short: &'static str,
    pub pe_long: &'static str,
    pub pe_short: &'static str,

    // Reference markers
    pub spot: &'static str,
    pub trend: &'static str,
    pub overbought: &'static str,
    pub oversold: &'static str,

    // Sentiment gauge bands
    pub gauge_low: &'static str,
    pub gauge_mid: &'static str,
    pub gauge_high: &'static str,
    pub gauge_bar: &'static str,
    pub needle: &'static str,
}

impl Palette {
    pub const DEFAULT: Palette = Palette {
        bearish: "#dc2626",
        neutral: "#facc15",
        bullish: "#16a34a",
        call: "#2563eb",
        put: "#ea580c",
        ce_long: "#16a34a",
        ce_short: "#86efac",
        pe_long: "#dc2626",
        pe_short: "#fca5a5",
        spot: "#6b7280",
        trend: "#7c3aed",
        overbought: "#dc2626",
        oversold: "#16a34a",
        gauge_low: "#ef4444",
        gauge_mid: "#facc15",
        gauge_high: "#22c55e",
        gauge_bar: "#1f2937",
        needle: "#111827",
    };

    /// Three-stop diverging colour scale: bearish (0.0), neutral (0.5), bullish (1.0)
    pub fn diverging_scale(&self) -> Vec<(f64, String)> {
        vec![
            (0.0, self.bearish.to_string()),
            (0.5, self.neutral.to_string()),
            (1.0, self.bullish.to_string()),
        ]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::DEFAULT
    }
}
