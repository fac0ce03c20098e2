mod bootstrap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dashboard_core::settings::Settings;
use dashboard_data::filter::DateRange;
use dashboard_runtime::data_manager::DataManager;
use dashboard_runtime::orchestrator::DashboardOrchestrator;
use dashboard_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(
        &settings.log_level,
        settings.log_file.as_deref(),
        settings.is_interactive(),
    )?;

    tracing::info!("Olist Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data dir: {}, View: {}, Theme: {}",
        settings.data_dir.display(),
        settings.view,
        settings.theme
    );

    settings.validate()?;
    let (start, end) = settings.date_overrides()?;
    let mut manager = DataManager::load(&settings.data_paths())
        .with_context(|| format!("loading data from {}", settings.data_dir.display()))?;
    let range = initial_range(&manager, start, end)?;
    tracing::info!("Initial range: {} to {}", range.start, range.end);

    match settings.view.as_str() {
        "json" => {
            let snapshot = manager.get_snapshot(range);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        "dashboard" => {
            let bounds = manager.date_bounds();
            let (requests, snapshots, handle) =
                DashboardOrchestrator::new(manager, range).start();

            let app = App::new(&settings.theme, usize::from(settings.top), range, bounds);

            // The TUI handles 'q' / Ctrl+C itself; the OS-level signal covers
            // anything received outside raw mode.
            tokio::select! {
                result = app.run(requests, snapshots) => {
                    handle.abort();
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                    handle.abort();
                }
            }
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}

/// The range to show first: CLI overrides clamped to the orders bounds.
///
/// With no orders loaded, both overrides are required.
fn initial_range(
    manager: &DataManager,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DateRange> {
    if let Some(range) = manager.resolve_range(start, end) {
        return Ok(range);
    }
    match (start, end) {
        (Some(start), Some(end)) => Ok(DateRange::new(start, end)),
        _ => anyhow::bail!(
            "the orders table is empty; pass both --start-date and --end-date"
        ),
    }
}
