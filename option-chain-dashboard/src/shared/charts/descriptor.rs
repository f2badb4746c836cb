//! Declarative Plotly.js trace and layout descriptors.
//!
//! Only the subset of the Plotly schema the dashboard panels use is modelled. Every struct
//! serialises to exactly the JSON object `Plotly.newPlot` expects, omitting unset options.

use chrono::{DateTime, Utc};
use derive_more::{Constructor, From};
use serde::Serialize;

/// A complete chart: the traces and the layout handed to `Plotly.newPlot`
#[derive(Debug, Clone, PartialEq, Serialize, Constructor)]
pub struct Chart {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// Axis coordinate, either numeric (strikes, paper fractions) or temporal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, From)]
#[serde(untagged)]
pub enum Coord {
    Number(f64),
    Time(DateTime<Utc>),
}

impl Coord {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Coord::Number(value) => Some(*value),
            Coord::Time(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(ScatterTrace),
    Bar(BarTrace),
    Indicator(IndicatorTrace),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScatterMode {
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub x: Vec<Coord>,
    pub y: Vec<f64>,
    pub mode: ScatterMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub x: Vec<Coord>,
    pub y: Vec<f64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Marker colour: one colour for the whole trace, or one value per point mapped through
/// the marker colour scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Single(String),
    Scaled(Vec<f64>),
}

/// Colour scale stops, serialised as `[[fraction, colour], ...]`
pub type ColorScale = Vec<(f64, String)>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<ColorScale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar: Option<ColorBar>,
}

impl Marker {
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            color: Some(MarkerColor::Single(color.into())),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dash {
    Solid,
    Dash,
    Dot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<Dash>,
}

impl Line {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width: Some(width),
            dash: None,
        }
    }

    pub fn dashed(self) -> Self {
        Self {
            dash: Some(Dash::Dash),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl From<String> for Title {
    fn from(text: String) -> Self {
        Self { text }
    }
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorTrace {
    pub mode: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    pub gauge: Gauge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub axis: GaugeAxis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar: Option<GaugeBar>,
    pub steps: Vec<GaugeStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Threshold>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeAxis {
    pub range: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeBar {
    pub color: String,
}

/// Coloured band drawn behind the gauge bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeStep {
    pub range: [f64; 2],
    pub color: String,
}

/// Needle drawn across the gauge at `value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Threshold {
    pub line: Line,
    pub thickness: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Group,
    Overlay,
    Stack,
}

/// Coordinate reference for shapes: data coordinates or the [0, 1] plotting area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisRef {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "paper")]
    Paper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub xref: AxisRef,
    pub yref: AxisRef,
    pub x0: Coord,
    pub x1: Coord,
    pub y0: f64,
    pub y1: f64,
    pub line: Line,
}

impl Shape {
    /// Vertical line at `x` spanning `[y0, y1]` in data coordinates
    pub fn vertical(x: impl Into<Coord>, y0: f64, y1: f64, line: Line) -> Self {
        let x = x.into();
        Self {
            kind: ShapeKind::Line,
            xref: AxisRef::X,
            yref: AxisRef::Y,
            x0: x,
            x1: x,
            y0,
            y1,
            line,
        }
    }

    /// Horizontal line at `y` across the full plotting width
    pub fn horizontal(y: f64, line: Line) -> Self {
        Self {
            kind: ShapeKind::Line,
            xref: AxisRef::Paper,
            yref: AxisRef::Y,
            x0: Coord::Number(0.0),
            x1: Coord::Number(1.0),
            y0: y,
            y1: y,
            line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: Coord,
    pub y: f64,
    pub text: String,
    pub showarrow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yshift: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Annotation {
    pub fn label(x: impl Into<Coord>, y: f64, text: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y,
            text: text.into(),
            showarrow: false,
            xanchor: None,
            yshift: None,
            font: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLayout {
    pub title: Title,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<AxisLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<AxisLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<BarMode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Layout {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(Title::from(title.into())),
            ..Default::default()
        }
    }

    pub fn with_axes(self, x_title: impl Into<String>, y_title: impl Into<String>) -> Self {
        Self {
            xaxis: Some(AxisLayout {
                title: Title::from(x_title.into()),
            }),
            yaxis: Some(AxisLayout {
                title: Title::from(y_title.into()),
            }),
            ..self
        }
    }
}
