/// Core data types for option chain analytics snapshots
///
/// These types match the JSON produced by the analytics backend at
/// http://127.0.0.1:5000/api/data/<symbol>. Wire types (`Raw*`) keep every optional field
/// as an `Option`; conversion into the domain types applies the default rules once, so
/// rendering code never deals with missing values.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de::{de_opt_timestamp, de_timestamp};

/// Buildup classification for one side (CE or PE) of a strike
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "Option<String>", rename_all = "UPPERCASE")]
pub enum Buildup {
    Long,
    Short,
    /// Anything that is neither LONG nor SHORT, e.g. "NEUTRAL" or a missing tag
    #[default]
    Unknown,
}

impl Buildup {
    /// Parse a backend buildup tag
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            tag if tag.eq_ignore_ascii_case("LONG") => Buildup::Long,
            tag if tag.eq_ignore_ascii_case("SHORT") => Buildup::Short,
            _ => Buildup::Unknown,
        }
    }

    /// Convert to display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Buildup::Long => "LONG",
            Buildup::Short => "SHORT",
            Buildup::Unknown => "UNKNOWN",
        }
    }

    /// Split a change in OI into its (long, short) contributions.
    ///
    /// A strike contributes to exactly one of the two series; unknown tags contribute to neither.
    pub fn split_change(&self, change_oi: i64) -> (i64, i64) {
        match self {
            Buildup::Long => (change_oi, 0),
            Buildup::Short => (0, change_oi),
            Buildup::Unknown => (0, 0),
        }
    }
}

impl From<Option<String>> for Buildup {
    fn from(tag: Option<String>) -> Self {
        tag.as_deref().map(Buildup::from_tag).unwrap_or_default()
    }
}

impl std::fmt::Display for Buildup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-strike analytics row
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "RawStrikeRow")]
pub struct StrikeRow {
    /// Strike price
    pub strike: f64,
    /// (ce_oi - pe_oi) / (ce_oi + pe_oi), roughly -1.0 to +1.0
    pub oi_skew: f64,
    /// Call open interest
    pub ce_oi: u64,
    /// Put open interest
    pub pe_oi: u64,
    /// Call volume / call OI
    pub ce_volume_oi_ratio: f64,
    /// Put volume / put OI
    pub pe_volume_oi_ratio: f64,
    pub ce_buildup: Buildup,
    pub pe_buildup: Buildup,
    /// Change in call OI since the previous snapshot
    pub ce_change_oi: i64,
    /// Change in put OI since the previous snapshot
    pub pe_change_oi: i64,
}

/// Strike row as emitted by the backend.
///
/// Counts arrive as JSON floats when the backend builds them through pandas, so every numeric
/// field is read as `f64` and narrowed during conversion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStrikeRow {
    pub strike: f64,
    pub oi_skew: Option<f64>,
    pub ce_oi: Option<f64>,
    pub pe_oi: Option<f64>,
    pub ce_volume_oi_ratio: Option<f64>,
    pub pe_volume_oi_ratio: Option<f64>,
    #[serde(default)]
    pub ce_buildup: Buildup,
    #[serde(default)]
    pub pe_buildup: Buildup,
    pub ce_change_oi: Option<f64>,
    pub pe_change_oi: Option<f64>,
}

impl From<RawStrikeRow> for StrikeRow {
    fn from(raw: RawStrikeRow) -> Self {
        Self {
            strike: raw.strike,
            oi_skew: raw.oi_skew.unwrap_or(0.0),
            ce_oi: to_count(raw.ce_oi),
            pe_oi: to_count(raw.pe_oi),
            ce_volume_oi_ratio: raw.ce_volume_oi_ratio.unwrap_or(0.0),
            pe_volume_oi_ratio: raw.pe_volume_oi_ratio.unwrap_or(0.0),
            ce_buildup: raw.ce_buildup,
            pe_buildup: raw.pe_buildup,
            ce_change_oi: to_change(raw.ce_change_oi),
            pe_change_oi: to_change(raw.pe_change_oi),
        }
    }
}

fn to_count(value: Option<f64>) -> u64 {
    value
        .filter(|value| value.is_finite())
        .map(|value| value.max(0.0).round() as u64)
        .unwrap_or(0)
}

fn to_change(value: Option<f64>) -> i64 {
    value
        .filter(|value| value.is_finite())
        .map(|value| value.round() as i64)
        .unwrap_or(0)
}

/// Aggregate put-call ratio figures reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PcrSummary {
    pub pcr_oi: f64,
    pub pcr_volume: f64,
    pub total_ce_oi: f64,
    pub total_pe_oi: f64,
}

/// OI-derived support and resistance levels
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SupportResistance {
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
    pub strong_support: Option<f64>,
    pub strong_resistance: Option<f64>,
}

/// Trading signals as reported by the backend. Displayed only, never computed here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TradingSignals {
    pub signals: Vec<String>,
    pub confidence: Option<f64>,
    pub overall_bias: Option<String>,
}

/// Scalar analysis summary for one symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Market sentiment score, 0 (bearish) to 100 (bullish), clamped by the producer.
    /// Absent when the backend does not score sentiment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcr: Option<PcrSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_resistance: Option<SupportResistance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Analysis object as emitted by the backend.
///
/// Some backend entry points nest the strike data and spot price inside the analysis object
/// rather than next to it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnalysis {
    pub sentiment_score: Option<f64>,
    pub pcr: Option<PcrSummary>,
    pub max_pain: Option<f64>,
    pub support_resistance: Option<SupportResistance>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    pub strike_data: Option<Vec<StrikeRow>>,
    pub spot_price: Option<f64>,
}

/// Analytics snapshot for one underlying, consumed once per render
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "RawSnapshot")]
pub struct SymbolSnapshot {
    /// Per-strike rows, ascending by strike
    pub strike_data: Vec<StrikeRow>,
    /// Current underlying price
    pub spot_price: f64,
    /// Scalar analysis, absent when the backend has not analysed the symbol yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    /// Backend trading signals, when the payload carries them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signals: Option<TradingSignals>,
}

/// Snapshot envelope as emitted by the backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSnapshot {
    pub strike_data: Option<Vec<StrikeRow>>,
    pub spot_price: Option<f64>,
    pub analysis: Option<RawAnalysis>,
    pub signals: Option<TradingSignals>,
}

impl From<RawSnapshot> for SymbolSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        let (analysis, nested_strikes, nested_spot) = match raw.analysis {
            Some(raw_analysis) => (
                Some(Analysis {
                    sentiment_score: raw_analysis.sentiment_score,
                    pcr: raw_analysis.pcr,
                    max_pain: raw_analysis.max_pain,
                    support_resistance: raw_analysis.support_resistance,
                    timestamp: raw_analysis.timestamp,
                }),
                raw_analysis.strike_data,
                raw_analysis.spot_price,
            ),
            None => (None, None, None),
        };

        let mut strike_data = raw.strike_data.or(nested_strikes).unwrap_or_default();
        strike_data.sort_by(|a, b| a.strike.total_cmp(&b.strike));

        Self {
            strike_data,
            spot_price: raw.spot_price.or(nested_spot).unwrap_or(0.0),
            analysis,
            signals: raw.signals,
        }
    }
}

impl SymbolSnapshot {
    /// Sentiment score, if the snapshot has been analysed and scored
    pub fn sentiment_score(&self) -> Option<f64> {
        self.analysis
            .as_ref()
            .and_then(|analysis| analysis.sentiment_score)
    }
}

/// One point of the put-call ratio history
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistoricalPoint {
    #[serde(deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub pcr_oi: f64,
}
