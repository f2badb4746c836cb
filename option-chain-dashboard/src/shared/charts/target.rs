//! Render target capability and panel container naming.

use derive_more::{Display, From};

use super::descriptor::Chart;

/// Identifier of a named container in the host document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Container for `panel` under a caller supplied prefix, e.g. `NIFTY-oi-skew`
    pub fn for_panel(prefix: &str, panel: Panel) -> Self {
        Self(format!("{prefix}{}", panel.suffix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into (prefix, panel) when the id ends with a known panel suffix
    pub fn split_panel(&self) -> Option<(&str, Panel)> {
        Panel::ALL.into_iter().find_map(|panel| {
            self.0
                .strip_suffix(panel.suffix())
                .map(|prefix| (prefix, panel))
        })
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Fixed set of dashboard panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    OiSkew,
    VolumeOi,
    OiDistribution,
    Buildup,
    Sentiment,
    PcrTrend,
    /// Key figures and backend signals, written as markup
    Summary,
}

impl Panel {
    pub const ALL: [Panel; 7] = [
        Panel::OiSkew,
        Panel::VolumeOi,
        Panel::OiDistribution,
        Panel::Buildup,
        Panel::Sentiment,
        Panel::PcrTrend,
        Panel::Summary,
    ];

    /// Panels written by a batch update. The PCR trend is fed from history, not the snapshot.
    pub const BATCH: [Panel; 5] = [
        Panel::OiSkew,
        Panel::VolumeOi,
        Panel::OiDistribution,
        Panel::Buildup,
        Panel::Sentiment,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            Panel::OiSkew => "-oi-skew",
            Panel::VolumeOi => "-volume-oi",
            Panel::OiDistribution => "-oi-dist",
            Panel::Buildup => "-buildup",
            Panel::Sentiment => "-sentiment",
            Panel::PcrTrend => "-pcr-trend",
            Panel::Summary => "-summary",
        }
    }
}

/// Narrow capability the renderer draws into.
///
/// Implementations replace whatever the container held before; the last write wins.
pub trait RenderTarget {
    /// Create or replace the chart in `container`
    fn set_chart(&mut self, container: &ContainerId, chart: Chart);

    /// Replace the content of `container` with literal markup
    fn set_message(&mut self, container: &ContainerId, markup: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_for_panel() {
        assert_eq!(
            ContainerId::for_panel("NIFTY", Panel::OiSkew).as_str(),
            "NIFTY-oi-skew"
        );
        assert_eq!(
            ContainerId::for_panel("BANKNIFTY", Panel::OiDistribution).to_string(),
            "BANKNIFTY-oi-dist"
        );
    }

    #[test]
    fn test_container_split_panel() {
        struct TestCase {
            input: &'static str,
            expected: Option<(&'static str, Panel)>,
        }

        let tests = vec![
            TestCase {
                // TC0: batch panel
                input: "NIFTY-volume-oi",
                expected: Some(("NIFTY", Panel::VolumeOi)),
            },
            TestCase {
                // TC1: trend panel
                input: "BANKNIFTY-pcr-trend",
                expected: Some(("BANKNIFTY", Panel::PcrTrend)),
            },
            TestCase {
                // TC2: prefix containing a dash
                input: "nifty-weekly-sentiment",
                expected: Some(("nifty-weekly", Panel::Sentiment)),
            },
            TestCase {
                // TC3: summary panel
                input: "NIFTY-summary",
                expected: Some(("NIFTY", Panel::Summary)),
            },
            TestCase {
                // TC4: unknown suffix
                input: "NIFTY-overview",
                expected: None,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let container = ContainerId::from(test.input);
            let actual = container.split_panel();
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }
}
