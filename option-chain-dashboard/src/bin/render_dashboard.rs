use indexmap::IndexMap;
use option_chain_dashboard::{
    BackendClient, ChartRenderer, ContainerId, DashboardConfig, DashboardDocument,
    DashboardError, Panel, SymbolSnapshot, init_logging, load_history_file,
    load_snapshot_file,
};
use std::error::Error;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let config = DashboardConfig::from_env();
    info!(
        symbols = ?config.symbols,
        output = %config.output.display(),
        "rendering option chain dashboard"
    );

    let snapshots = match &config.snapshot_file {
        Some(path) => {
            info!(path = %path.display(), "reading snapshots from file");
            load_snapshot_file(path).unwrap_or_else(|error| {
                warn!(
                    path = %path.display(),
                    %error,
                    "snapshot file unreadable, rendering placeholders"
                );
                IndexMap::new()
            })
        }
        None => fetch_snapshots(&config).await?,
    };

    let history = match &config.history_file {
        Some(path) => load_history_file(path).unwrap_or_else(|error| {
            warn!(
                path = %path.display(),
                %error,
                "history file unreadable, skipping PCR trends"
            );
            IndexMap::new()
        }),
        None => IndexMap::new(),
    };
    debug!(
        symbols = history.len(),
        points = history.values().map(Vec::len).sum::<usize>(),
        "pcr history loaded"
    );

    let renderer = ChartRenderer::default();
    let mut document =
        DashboardDocument::new("Option Chain Dashboard").with_plotly_src(&config.plotly_src);

    for symbol in &config.symbols {
        match snapshots.get(symbol) {
            Some(snapshot) => {
                let analysis = snapshot.analysis.as_ref();
                info!(
                    %symbol,
                    spot = snapshot.spot_price,
                    pcr_oi = ?analysis.and_then(|a| a.pcr).map(|pcr| pcr.pcr_oi),
                    max_pain = ?analysis.and_then(|a| a.max_pain),
                    sentiment = ?snapshot.sentiment_score(),
                    updated = ?analysis.and_then(|a| a.timestamp),
                    "rendering symbol"
                );
                renderer.update_all(&mut document, Some(snapshot), symbol);
                renderer.render_summary(
                    &mut document,
                    &ContainerId::for_panel(symbol, Panel::Summary),
                    snapshot,
                );
            }
            None => {
                warn!(%symbol, "no snapshot available");
                renderer.render_unavailable(&mut document, symbol);
            }
        }

        renderer.render_pcr_trend(
            &mut document,
            &ContainerId::for_panel(symbol, Panel::PcrTrend),
            history.get(symbol).map(Vec::as_slice),
        );
    }

    std::fs::write(&config.output, document.render()?)?;
    info!(
        output = %config.output.display(),
        panels = document.len(),
        "dashboard written"
    );

    Ok(())
}

/// Fetch snapshots from the backend, falling back to per-symbol requests when the
/// dashboard endpoint is unavailable
async fn fetch_snapshots(
    config: &DashboardConfig,
) -> Result<IndexMap<String, SymbolSnapshot>, DashboardError> {
    let client = BackendClient::new(config.backend.clone())?;

    match client.health().await {
        Ok(health) => debug!(%health, "backend health"),
        Err(error) => warn!(%error, "backend health check failed"),
    }

    match client.fetch_dashboard().await {
        Ok(snapshots) => return Ok(snapshots),
        Err(error) => warn!(%error, "dashboard fetch failed, requesting symbols individually"),
    }

    let mut snapshots = IndexMap::new();
    for symbol in &config.symbols {
        match client.fetch_symbol(symbol).await {
            Ok(snapshot) => {
                snapshots.insert(symbol.clone(), snapshot);
            }
            Err(error) if error.is_symbol_scoped() => {
                warn!(%symbol, %error, "skipping symbol");
            }
            Err(error) => {
                warn!(%symbol, %error, "backend unavailable, rendering placeholders");
                break;
            }
        }
    }

    Ok(snapshots)
}
