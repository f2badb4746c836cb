//! HTML dashboard page acting as the host document for rendered panels.

use indexmap::IndexMap;
use std::fmt::Write;

use super::descriptor::Chart;
use super::target::{ContainerId, RenderTarget};
use crate::shared::error::DashboardError;

/// Plotly.js bundle loaded by the generated page
pub const DEFAULT_PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const PAGE_STYLE: &str = "\
body { font-family: -apple-system, Segoe UI, Roboto, sans-serif; margin: 0; background: #f3f4f6; color: #111827; }
header { padding: 16px 24px; background: #111827; color: #f9fafb; }
section { padding: 8px 24px 24px; }
.panels { display: grid; grid-template-columns: repeat(auto-fit, minmax(480px, 1fr)); gap: 16px; }
.panel { background: #ffffff; border-radius: 8px; min-height: 320px; padding: 8px; }
.no-data { color: #6b7280; text-align: center; padding-top: 120px; }
.summary { display: grid; grid-template-columns: max-content 1fr; gap: 4px 16px; margin: 8px; }
.summary dt { color: #6b7280; }
.summary dd { margin: 0; font-weight: 600; }
.bias { margin: 8px; font-weight: 600; }
.bias-bullish { color: #16a34a; }
.bias-bearish { color: #dc2626; }
.signals { margin: 8px; padding-left: 20px; }";

/// Content held by one container
#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Chart(Chart),
    /// Literal markup, embedded without escaping
    Message(String),
}

/// In-memory dashboard page.
///
/// Containers keep the position of their first write; later writes replace the content.
#[derive(Debug, Clone)]
pub struct DashboardDocument {
    title: String,
    plotly_src: String,
    panels: IndexMap<ContainerId, PanelContent>,
}

impl DashboardDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            plotly_src: DEFAULT_PLOTLY_SRC.to_string(),
            panels: IndexMap::new(),
        }
    }

    /// Set the Plotly.js script source
    pub fn with_plotly_src(mut self, src: impl Into<String>) -> Self {
        self.plotly_src = src.into();
        self
    }

    pub fn panel(&self, container: &ContainerId) -> Option<&PanelContent> {
        self.panels.get(container)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Render the complete HTML page.
    ///
    /// Containers are grouped into one section per prefix, in first-write order.
    pub fn render(&self) -> Result<String, DashboardError> {
        let mut body = String::new();
        let mut scripts = String::new();
        let mut current_section: Option<&str> = None;

        for (container, content) in &self.panels {
            let section = container
                .split_panel()
                .map(|(prefix, _)| prefix)
                .unwrap_or(container.as_str());

            if current_section != Some(section) {
                if current_section.is_some() {
                    body.push_str("</div></section>\n");
                }
                let _ = writeln!(
                    body,
                    "<section><h2>{}</h2><div class=\"panels\">",
                    escape_html(section)
                );
                current_section = Some(section);
            }

            let id = escape_html(container.as_str());
            match content {
                PanelContent::Chart(chart) => {
                    let _ = writeln!(body, "<div class=\"panel\" id=\"{id}\"></div>");
                    let _ = writeln!(
                        scripts,
                        "Plotly.newPlot({}, {}, {}, {{responsive: true}});",
                        script_json(&container.as_str())?,
                        script_json(&chart.data)?,
                        script_json(&chart.layout)?,
                    );
                }
                PanelContent::Message(markup) => {
                    let _ = writeln!(body, "<div class=\"panel\" id=\"{id}\">{markup}</div>");
                }
            }
        }

        if current_section.is_some() {
            body.push_str("</div></section>\n");
        }

        let title = escape_html(&self.title);
        Ok(format!(
            "<!doctype html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">
<title>{title}</title>
<script src=\"{plotly_src}\"></script>
<style>
{PAGE_STYLE}
</style>
</head>
<body>
<header><h1>{title}</h1></header>
{body}<script>
{scripts}</script>
</body>
</html>
",
            plotly_src = escape_html(&self.plotly_src),
        ))
    }
}

impl RenderTarget for DashboardDocument {
    fn set_chart(&mut self, container: &ContainerId, chart: Chart) {
        self.panels
            .insert(container.clone(), PanelContent::Chart(chart));
    }

    fn set_message(&mut self, container: &ContainerId, markup: &str) {
        self.panels
            .insert(container.clone(), PanelContent::Message(markup.to_string()));
    }
}

/// Serialise `value` for embedding inside a `<script>` element
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, DashboardError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::charts::descriptor::{Layout, Title};
    use crate::shared::charts::target::Panel;

    fn empty_chart(title: &str) -> Chart {
        Chart::new(vec![], Layout::titled(title))
    }

    #[test]
    fn test_last_write_wins_and_keeps_position() {
        let mut document = DashboardDocument::new("Dashboard");
        let skew = ContainerId::for_panel("NIFTY", Panel::OiSkew);
        let trend = ContainerId::for_panel("NIFTY", Panel::PcrTrend);

        document.set_message(&skew, "<p>loading</p>");
        document.set_chart(&trend, empty_chart("trend"));
        document.set_chart(&skew, empty_chart("skew"));

        assert_eq!(document.len(), 2);
        assert_eq!(
            document.panel(&skew),
            Some(&PanelContent::Chart(empty_chart("skew")))
        );
        assert_eq!(document.panels.get_index_of(&skew), Some(0));
    }

    #[test]
    fn test_render_groups_sections_by_prefix() {
        let mut document = DashboardDocument::new("Option Chain Dashboard");
        document.set_chart(
            &ContainerId::for_panel("NIFTY", Panel::OiSkew),
            empty_chart("a"),
        );
        document.set_message(
            &ContainerId::for_panel("NIFTY", Panel::PcrTrend),
            r#"<p class="no-data">No historical data yet</p>"#,
        );
        document.set_chart(
            &ContainerId::for_panel("BANKNIFTY", Panel::Sentiment),
            empty_chart("b"),
        );

        let html = document.render().unwrap();

        assert_eq!(html.matches("<section>").count(), 2);
        assert!(html.contains("<h2>NIFTY</h2>"));
        assert!(html.contains("<h2>BANKNIFTY</h2>"));
        assert!(html.contains(
            r#"<div class="panel" id="NIFTY-pcr-trend"><p class="no-data">No historical data yet</p></div>"#
        ));
        assert_eq!(html.matches("Plotly.newPlot(").count(), 2);
        assert!(html.contains(r#"Plotly.newPlot("NIFTY-oi-skew", [], {"title":{"text":"a"}}"#));
        assert!(html.contains(DEFAULT_PLOTLY_SRC));
    }

    #[test]
    fn test_render_escapes_script_and_attributes() {
        let mut document = DashboardDocument::new("A & B").with_plotly_src("/static/plotly.js");
        let container = ContainerId::new("x\"y-oi-skew");
        let chart = Chart::new(
            vec![],
            Layout {
                title: Some(Title::from("</script><b>")),
                ..Layout::default()
            },
        );
        document.set_chart(&container, chart);

        let html = document.render().unwrap();

        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains(r#"id="x&quot;y-oi-skew""#));
        assert!(html.contains(r#"<\/script><b>"#));
        assert!(!html.contains("\"</script><b>"));
        assert!(html.contains(r#"<script src="/static/plotly.js"></script>"#));
    }

    #[test]
    fn test_render_empty_document() {
        let document = DashboardDocument::new("Empty");
        assert!(document.is_empty());
        let html = document.render().unwrap();
        assert!(!html.contains("<section>"));
        assert!(html.ends_with("</html>\n"));
    }
}
