//! Data manager.
//!
//! Holds the immutable [`DashboardContext`] loaded at startup and runs a
//! fresh [`analyze_range`] pass for every snapshot request. Nothing is
//! memoised between requests.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use dashboard_core::settings::DataPaths;
use dashboard_core::Result;
use dashboard_data::analysis::{analyze_range, DashboardContext, DashboardSnapshot};
use dashboard_data::filter::DateRange;
use dashboard_data::reader::load_context;

// ── DataManager ───────────────────────────────────────────────────────────────

/// Loaded tables and the per-request analysis entry point.
///
/// # Example
/// ```no_run
/// use dashboard_core::settings::DataPaths;
/// use dashboard_runtime::data_manager::DataManager;
///
/// let mut mgr = DataManager::load(&DataPaths::from_dir("data")).unwrap();
/// if let Some(range) = mgr.default_range() {
///     let snapshot = mgr.get_snapshot(range);
///     println!("GMV: {}", snapshot.totals.total_gmv);
/// }
/// ```
pub struct DataManager {
    /// Tables loaded once at startup; never mutated afterwards.
    context: Arc<DashboardContext>,
    /// Number of analysis passes run so far.
    compute_count: u64,
}

impl DataManager {
    /// Load all five tables from `paths`.
    ///
    /// Any missing file, malformed row or unparseable timestamp aborts the
    /// load with the underlying [`dashboard_core::DashboardError`].
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let context = load_context(paths)?;
        Ok(Self::from_context(context))
    }

    /// Wrap an already-loaded context.
    pub fn from_context(context: DashboardContext) -> Self {
        Self {
            context: Arc::new(context),
            compute_count: 0,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Shared handle to the loaded tables.
    pub fn context(&self) -> Arc<DashboardContext> {
        Arc::clone(&self.context)
    }

    /// Earliest and latest order purchase dates.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.context.date_bounds()
    }

    /// The full span of the orders table.
    pub fn default_range(&self) -> Option<DateRange> {
        self.context.full_range()
    }

    /// Combine optional user overrides with the data bounds.
    ///
    /// Missing ends fall back to the bounds and given ends are clamped into
    /// them. Returns `None` when no orders were loaded.
    pub fn resolve_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Option<DateRange> {
        let (min, max) = self.date_bounds()?;
        let range = DateRange::new(start.unwrap_or(min), end.unwrap_or(max));
        Some(range.clamp_to(min, max))
    }

    /// Filter and aggregate every table for `range`.
    ///
    /// Each call is a full pass, so asking twice for the same range yields
    /// two independently generated snapshots.
    pub fn get_snapshot(&mut self, range: DateRange) -> DashboardSnapshot {
        let started = Instant::now();
        let snapshot = analyze_range(&self.context, range);
        self.compute_count += 1;
        tracing::debug!(
            rows = snapshot.metadata.filtered_rows.total(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "snapshot computed"
        );
        if snapshot.is_empty() {
            tracing::info!("No orders between {} and {}", range.start, range.end);
        }
        snapshot
    }

    /// How many times [`analyze_range`] has run.
    pub fn compute_count(&self) -> u64 {
        self.compute_count
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
