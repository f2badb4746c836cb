//! Chart renderer: maps analytics snapshots onto Plotly panel descriptors.
//!
//! Every operation runs to completion synchronously and never fails. Degenerate inputs
//! (empty strike lists, equal skew values, missing history) render as degenerate but valid
//! panels, so one bad snapshot cannot take down a live dashboard.

use itertools::{Itertools, MinMaxResult};
use tracing::debug;

use super::descriptor::{
    Annotation, BarMode, BarTrace, Chart, ColorBar, Coord, Font, Gauge, GaugeAxis, GaugeBar,
    GaugeStep, IndicatorTrace, Layout, Line, Marker, MarkerColor, ScatterMode, ScatterTrace,
    Shape, Threshold, Title, Trace,
};
use super::document::escape_html;
use super::palette::Palette;
use super::target::{ContainerId, Panel, RenderTarget};
use crate::shared::types::{HistoricalPoint, StrikeRow, SupportResistance, SymbolSnapshot};

/// PCR above this level is drawn as overbought
pub const PCR_OVERBOUGHT: f64 = 1.4;
/// PCR below this level is drawn as oversold
pub const PCR_OVERSOLD: f64 = 0.6;

/// Sentiment gauge band edges: red [0, 30), yellow [30, 70), green [70, 100]
pub const SENTIMENT_BANDS: [f64; 4] = [0.0, 30.0, 70.0, 100.0];

/// Fraction of the largest open interest at which the OI distribution spot label sits
pub const SPOT_LABEL_HEIGHT: f64 = 0.9;

/// Markup written into the PCR trend container when there is no history yet
pub const NO_HISTORY_MARKUP: &str = r#"<p class="no-data">No historical data yet</p>"#;

/// Markup written into the sentiment container when the backend reports no score
pub const NO_SENTIMENT_MARKUP: &str = r#"<p class="no-data">No sentiment score yet</p>"#;

/// Markup written into every panel of a symbol with no usable snapshot
pub const NO_SNAPSHOT_MARKUP: &str = r#"<p class="no-data">No analysis available</p>"#;

/// Fixed colour range of the OI skew scale; never derived from the data so equal skew
/// values cannot collapse it.
const SKEW_COLOR_RANGE: (f64, f64) = (-1.0, 1.0);

/// Renders dashboard panels into a [`RenderTarget`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRenderer {
    palette: Palette,
}

impl ChartRenderer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Update every snapshot-driven panel under `prefix`.
    ///
    /// Writes `<prefix>-oi-skew`, `-volume-oi`, `-oi-dist`, `-buildup` and `-sentiment`. A missing
    /// snapshot, or one without analysis, leaves every panel untouched. An unscored snapshot gets
    /// [`NO_SENTIMENT_MARKUP`] instead of a gauge.
    pub fn update_all(
        &self,
        target: &mut impl RenderTarget,
        snapshot: Option<&SymbolSnapshot>,
        prefix: &str,
    ) {
        let Some((snapshot, analysis)) =
            snapshot.and_then(|snapshot| Some((snapshot, snapshot.analysis.as_ref()?)))
        else {
            debug!(prefix, "snapshot has no analysis, skipping panel update");
            return;
        };

        let strikes = snapshot.strike_data.as_slice();
        let spot_price = snapshot.spot_price;

        for panel in Panel::BATCH {
            let container = ContainerId::for_panel(prefix, panel);
            match panel {
                Panel::OiSkew => self.render_oi_skew(target, &container, strikes, spot_price),
                Panel::VolumeOi => self.render_volume_oi(target, &container, strikes),
                Panel::OiDistribution => {
                    self.render_oi_distribution(target, &container, strikes, spot_price)
                }
                Panel::Buildup => self.render_buildup(target, &container, strikes),
                Panel::Sentiment => match analysis.sentiment_score {
                    Some(score) => self.render_sentiment(target, &container, score),
                    None => target.set_message(&container, NO_SENTIMENT_MARKUP),
                },
                Panel::PcrTrend | Panel::Summary => {}
            }
        }

        debug!(prefix, strikes = strikes.len(), "updated snapshot panels");
    }

    /// Write [`NO_SNAPSHOT_MARKUP`] into every snapshot-driven panel and the summary
    pub fn render_unavailable(&self, target: &mut impl RenderTarget, prefix: &str) {
        for panel in Panel::BATCH.into_iter().chain([Panel::Summary]) {
            target.set_message(&ContainerId::for_panel(prefix, panel), NO_SNAPSHOT_MARKUP);
        }
    }

    /// Write the key figures and backend signals of `snapshot` as markup
    pub fn render_summary(
        &self,
        target: &mut impl RenderTarget,
        container: &ContainerId,
        snapshot: &SymbolSnapshot,
    ) {
        target.set_message(container, &self.summary_markup(snapshot));
    }

    pub fn render_oi_skew(
        &self,
        target: &mut impl RenderTarget,
        container: &ContainerId,
        strikes: &[StrikeRow],
        spot_price: f64,
    ) {
        target.set_chart(container, self.oi_skew_chart(strikes, spot_price));
    }

    pub fn render_volume_oi(
        &self,
        target: &mut impl RenderTarget,
        container: &ContainerId,
        strikes: &[StrikeRow],
    ) {
        target.set_chart(container, self.volume_oi_chart(strikes));
    }

    pub fn render_oi_distribution(
        &self,
        target: &mut impl RenderTarget,
        container: &ContainerId,
        strikes: &[StrikeRow],
        spot_price: f64,
    ) {
        target.set_chart(container, self.oi_distribution_chart(strikes, spot_price));
    }

    pub fn render_buildup(
        &self,
        target: &mut impl RenderTarget,
        container: &ContainerId,
        strikes: &[StrikeRow],
    ) {
        target.set_chart(container, self.buildup_chart(strikes));
    }

    /// Render the PCR history, or a placeholder message when there is none.
    pub fn render_pcr_trend(
        &self,
        target: &mut impl RenderTarget,
        container: &ContainerId,
        history: Option<&[HistoricalPoint]>,
    ) {
        match history.and_then(|history| self.pcr_trend_chart(history)) {
            Some(chart) => target.set_chart(container, chart),
            None => {
                debug!(%container, "no PCR history, writing placeholder");
                target.set_message(container, NO_HISTORY_MARKUP);
            }
        }
    }

    pub fn render_sentiment(
        &self,
        target: &mut impl RenderTarget,
        container: &ContainerId,
        sentiment_score: f64,
    ) {
        target.set_chart(container, self.sentiment_chart(sentiment_score));
    }

    /// Scatter of OI skew per strike on the diverging scale, with a spot marker spanning the
    /// observed skew range.
    pub fn oi_skew_chart(&self, strikes: &[StrikeRow], spot_price: f64) -> Chart {
        let skews: Vec<f64> = strikes.iter().map(|row| row.oi_skew).collect();
        let (min_skew, max_skew) = extent(skews.iter().copied());
        let (cmin, cmax) = SKEW_COLOR_RANGE;

        let trace = Trace::Scatter(ScatterTrace {
            x: strike_axis(strikes),
            y: skews.clone(),
            mode: ScatterMode::Markers,
            name: Some("OI Skew".to_string()),
            marker: Some(Marker {
                color: Some(MarkerColor::Scaled(skews)),
                size: Some(10.0),
                colorscale: Some(self.palette.diverging_scale()),
                cmin: Some(cmin),
                cmax: Some(cmax),
                showscale: Some(true),
                colorbar: Some(ColorBar {
                    title: Title::from("Skew"),
                }),
            }),
            line: None,
        });

        let layout = Layout {
            shapes: vec![Shape::vertical(
                spot_price,
                min_skew,
                max_skew,
                Line::new(self.palette.spot, 2.0).dashed(),
            )],
            annotations: vec![self.spot_label(spot_price, max_skew)],
            ..Layout::titled("OI Skew by Strike").with_axes("Strike", "OI Skew (CE - PE)")
        };

        Chart::new(vec![trace], layout)
    }

    /// Grouped CE/PE volume-to-OI bars, one pair per strike
    pub fn volume_oi_chart(&self, strikes: &[StrikeRow]) -> Chart {
        let x = strike_axis(strikes);

        let ce = Trace::Bar(BarTrace {
            x: x.clone(),
            y: strikes.iter().map(|row| row.ce_volume_oi_ratio).collect(),
            name: "CE Volume/OI".to_string(),
            marker: Some(Marker::solid(self.palette.call)),
            opacity: None,
        });
        let pe = Trace::Bar(BarTrace {
            x,
            y: strikes.iter().map(|row| row.pe_volume_oi_ratio).collect(),
            name: "PE Volume/OI".to_string(),
            marker: Some(Marker::solid(self.palette.put)),
            opacity: None,
        });

        let layout = Layout {
            barmode: Some(BarMode::Group),
            ..Layout::titled("Volume / OI Efficiency").with_axes("Strike", "Volume / OI")
        };

        Chart::new(vec![ce, pe], layout)
    }

    /// Overlaid CE/PE open interest bars with a spot marker. The spot label sits at
    /// [`SPOT_LABEL_HEIGHT`] of the largest OI across both series.
    pub fn oi_distribution_chart(&self, strikes: &[StrikeRow], spot_price: f64) -> Chart {
        let x = strike_axis(strikes);
        let max_oi = strikes
            .iter()
            .flat_map(|row| [row.ce_oi, row.pe_oi])
            .max()
            .unwrap_or(0) as f64;

        let ce = Trace::Bar(BarTrace {
            x: x.clone(),
            y: strikes.iter().map(|row| row.ce_oi as f64).collect(),
            name: "CE OI".to_string(),
            marker: Some(Marker::solid(self.palette.call)),
            opacity: Some(0.7),
        });
        let pe = Trace::Bar(BarTrace {
            x,
            y: strikes.iter().map(|row| row.pe_oi as f64).collect(),
            name: "PE OI".to_string(),
            marker: Some(Marker::solid(self.palette.put)),
            opacity: Some(0.7),
        });

        let layout = Layout {
            barmode: Some(BarMode::Overlay),
            shapes: vec![Shape::vertical(
                spot_price,
                0.0,
                max_oi,
                Line::new(self.palette.spot, 2.0).dashed(),
            )],
            annotations: vec![self.spot_label(spot_price, SPOT_LABEL_HEIGHT * max_oi)],
            ..Layout::titled("Open Interest Distribution").with_axes("Strike", "Open Interest")
        };

        Chart::new(vec![ce, pe], layout)
    }

    /// Stacked change-in-OI bars split into CE long/short and PE long/short series
    pub fn buildup_chart(&self, strikes: &[StrikeRow]) -> Chart {
        let x = strike_axis(strikes);

        let (ce_long, ce_short): (Vec<f64>, Vec<f64>) = strikes
            .iter()
            .map(|row| {
                let (long, short) = row.ce_buildup.split_change(row.ce_change_oi);
                (long as f64, short as f64)
            })
            .unzip();
        let (pe_long, pe_short): (Vec<f64>, Vec<f64>) = strikes
            .iter()
            .map(|row| {
                let (long, short) = row.pe_buildup.split_change(row.pe_change_oi);
                (long as f64, short as f64)
            })
            .unzip();

        let series = [
            ("CE Long Buildup", ce_long, self.palette.ce_long),
            ("CE Short Buildup", ce_short, self.palette.ce_short),
            ("PE Long Buildup", pe_long, self.palette.pe_long),
            ("PE Short Buildup", pe_short, self.palette.pe_short),
        ];

        let data = series
            .into_iter()
            .map(|(name, y, color)| {
                Trace::Bar(BarTrace {
                    x: x.clone(),
                    y,
                    name: name.to_string(),
                    marker: Some(Marker::solid(color)),
                    opacity: None,
                })
            })
            .collect();

        let layout = Layout {
            barmode: Some(BarMode::Stack),
            ..Layout::titled("Long / Short Buildup").with_axes("Strike", "Change in OI")
        };

        Chart::new(data, layout)
    }

    /// PCR history line with overbought/oversold reference lines, `None` without history
    pub fn pcr_trend_chart(&self, history: &[HistoricalPoint]) -> Option<Chart> {
        let last = history.last()?;

        let trace = Trace::Scatter(ScatterTrace {
            x: history
                .iter()
                .map(|point| Coord::from(point.timestamp))
                .collect(),
            y: history.iter().map(|point| point.pcr_oi).collect(),
            mode: ScatterMode::LinesMarkers,
            name: Some("PCR (OI)".to_string()),
            marker: Some(Marker::solid(self.palette.trend)),
            line: Some(Line::new(self.palette.trend, 2.0)),
        });

        let references = [
            (PCR_OVERBOUGHT, "Overbought (1.4)", self.palette.overbought),
            (PCR_OVERSOLD, "Oversold (0.6)", self.palette.oversold),
        ];

        let layout = Layout {
            shapes: references
                .iter()
                .map(|(level, _, color)| Shape::horizontal(*level, Line::new(*color, 1.5).dashed()))
                .collect(),
            annotations: references
                .iter()
                .map(|(level, text, color)| Annotation {
                    xanchor: Some("right".to_string()),
                    yshift: Some(10.0),
                    font: Some(Font {
                        color: color.to_string(),
                        size: None,
                    }),
                    ..Annotation::label(last.timestamp, *level, *text)
                })
                .collect(),
            ..Layout::titled("Put-Call Ratio Trend").with_axes("Time", "PCR (OI)")
        };

        Some(Chart::new(vec![trace], layout))
    }

    /// Sentiment gauge with red/yellow/green bands and a needle at the score.
    ///
    /// The score is displayed as given; clamping to [0, 100] is the producer's job.
    pub fn sentiment_chart(&self, sentiment_score: f64) -> Chart {
        let band_colors = [
            self.palette.gauge_low,
            self.palette.gauge_mid,
            self.palette.gauge_high,
        ];
        let steps = SENTIMENT_BANDS
            .windows(2)
            .zip(band_colors)
            .map(|(edges, color)| GaugeStep {
                range: [edges[0], edges[1]],
                color: color.to_string(),
            })
            .collect();

        let trace = Trace::Indicator(IndicatorTrace {
            mode: "gauge+number".to_string(),
            value: sentiment_score,
            title: Some(Title::from("Market Sentiment")),
            gauge: Gauge {
                axis: GaugeAxis {
                    range: [SENTIMENT_BANDS[0], SENTIMENT_BANDS[3]],
                },
                bar: Some(GaugeBar {
                    color: self.palette.gauge_bar.to_string(),
                }),
                steps,
                threshold: Some(Threshold {
                    line: Line::new(self.palette.needle, 4.0),
                    thickness: 0.75,
                    value: sentiment_score,
                }),
            },
        });

        Chart::new(
            vec![trace],
            Layout {
                height: Some(300),
                ..Layout::default()
            },
        )
    }

    /// Summary markup: spot, PCR, max pain, levels, last update, then the backend's bias and
    /// signal list. Backend text is escaped; missing figures are omitted.
    pub fn summary_markup(&self, snapshot: &SymbolSnapshot) -> String {
        let mut rows = vec![("Spot", format!("{:.2}", snapshot.spot_price))];

        if let Some(analysis) = &snapshot.analysis {
            if let Some(pcr) = analysis.pcr {
                rows.push(("PCR (OI)", format!("{:.2}", pcr.pcr_oi)));
                rows.push(("PCR (Volume)", format!("{:.2}", pcr.pcr_volume)));
            }
            if let Some(max_pain) = analysis.max_pain {
                rows.push(("Max Pain", format!("{max_pain:.2}")));
            }
            if let Some(levels) = &analysis.support_resistance {
                rows.extend(level_rows(levels));
            }
            if let Some(timestamp) = analysis.timestamp {
                rows.push((
                    "Last Update",
                    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                ));
            }
        }

        let mut markup = format!(
            "<dl class=\"summary\">{}</dl>",
            rows.iter()
                .map(|(label, value)| format!("<dt>{label}</dt><dd>{value}</dd>"))
                .join("")
        );

        if let Some(signals) = &snapshot.signals {
            if let Some(bias) = &signals.overall_bias {
                let confidence = signals
                    .confidence
                    .map(|confidence| format!(" ({confidence:.0}% confidence)"))
                    .unwrap_or_default();
                markup.push_str(&format!(
                    "<p class=\"bias bias-{}\">Bias: {}{confidence}</p>",
                    escape_html(&bias.to_lowercase()),
                    escape_html(bias),
                ));
            }
            if !signals.signals.is_empty() {
                markup.push_str(&format!(
                    "<ul class=\"signals\">{}</ul>",
                    signals
                        .signals
                        .iter()
                        .map(|signal| format!("<li>{}</li>", escape_html(signal)))
                        .join("")
                ));
            }
        }

        markup
    }

    fn spot_label(&self, spot_price: f64, y: f64) -> Annotation {
        Annotation {
            yshift: Some(10.0),
            font: Some(Font {
                color: self.palette.spot.to_string(),
                size: Some(12.0),
            }),
            ..Annotation::label(spot_price, y, format!("Spot: {spot_price:.2}"))
        }
    }
}

fn level_rows(levels: &SupportResistance) -> Vec<(&'static str, String)> {
    let join = |values: &[f64]| values.iter().map(|value| format!("{value:.2}")).join(", ");

    let mut rows = Vec::new();
    if !levels.support.is_empty() {
        rows.push(("Support", join(&levels.support)));
    }
    if !levels.resistance.is_empty() {
        rows.push(("Resistance", join(&levels.resistance)));
    }
    if let Some(level) = levels.strong_support {
        rows.push(("Strong Support", format!("{level:.2}")));
    }
    if let Some(level) = levels.strong_resistance {
        rows.push(("Strong Resistance", format!("{level:.2}")));
    }
    rows
}

fn strike_axis(strikes: &[StrikeRow]) -> Vec<Coord> {
    strikes.iter().map(|row| Coord::from(row.strike)).collect()
}

/// (min, max) of `values`, collapsing to (0, 0) when empty
fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    match values.minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => (0.0, 0.0),
        MinMaxResult::OneElement(value) => (value, value),
        MinMaxResult::MinMax(min, max) => (min, max),
    }
}
