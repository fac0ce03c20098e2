//! Async recompute orchestrator.
//!
//! Runs the [`DataManager`] in a tokio task. The UI publishes the selected
//! [`DateRange`] on a `watch` channel and receives [`DashboardSnapshot`]s on
//! an `mpsc` channel, so the event loop never blocks on aggregation. The
//! watch channel only ever holds the newest range: edits made while a
//! snapshot is being computed collapse into one follow-up request, and the
//! latest edit is never lost.

use dashboard_data::analysis::DashboardSnapshot;
use dashboard_data::filter::DateRange;
use tokio::sync::{mpsc, watch};
use tokio::task;

use crate::data_manager::DataManager;

/// Snapshots buffered between the recompute task and the UI.
const SNAPSHOT_CAPACITY: usize = 4;

// ── DashboardOrchestrator ─────────────────────────────────────────────────────

/// Background snapshot coordinator.
///
/// Call [`DashboardOrchestrator::start`] to spin up the recompute loop in a
/// dedicated tokio task.
pub struct DashboardOrchestrator {
    manager: DataManager,
    /// Range computed immediately on startup.
    initial_range: DateRange,
}

impl DashboardOrchestrator {
    pub fn new(manager: DataManager, initial_range: DateRange) -> Self {
        Self {
            manager,
            initial_range,
        }
    }

    /// Start the recompute loop.
    ///
    /// Returns:
    /// - a `watch::Sender<DateRange>` holding the selected range,
    /// - an `mpsc::Receiver<DashboardSnapshot>` for the results,
    /// - a [`DashboardHandle`] that can abort the loop.
    ///
    /// The loop exits once the range sender is dropped or the snapshot
    /// receiver is closed.
    pub fn start(
        self,
    ) -> (
        watch::Sender<DateRange>,
        mpsc::Receiver<DashboardSnapshot>,
        DashboardHandle,
    ) {
        let (range_tx, range_rx) = watch::channel(self.initial_range);
        let (snapshot_tx, snapshot_rx) = mpsc::channel(SNAPSHOT_CAPACITY);

        let handle = tokio::spawn(async move {
            self.recompute_loop(range_rx, snapshot_tx).await;
        });

        (range_tx, snapshot_rx, DashboardHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    async fn recompute_loop(
        self,
        mut ranges: watch::Receiver<DateRange>,
        tx: mpsc::Sender<DashboardSnapshot>,
    ) {
        let mut manager = self.manager;
        let mut range = *ranges.borrow_and_update();

        loop {
            // Aggregation is CPU-bound; keep it off the async workers.
            let computed = task::spawn_blocking(move || {
                let snapshot = manager.get_snapshot(range);
                (manager, snapshot)
            })
            .await;

            let snapshot = match computed {
                Ok((returned, snapshot)) => {
                    manager = returned;
                    snapshot
                }
                Err(e) => {
                    tracing::error!(error = %e, "snapshot computation failed; stopping");
                    break;
                }
            };

            if tx.send(snapshot).await.is_err() {
                tracing::debug!("snapshot receiver dropped; exiting loop");
                break;
            }

            if ranges.changed().await.is_err() {
                tracing::debug!("range sender dropped; exiting loop");
                break;
            }
            range = *ranges.borrow_and_update();
            tracing::debug!("range changed to {} .. {}", range.start, range.end);
        }
    }
}

// ── DashboardHandle ───────────────────────────────────────────────────────────

/// A handle to the background recompute task.
pub struct DashboardHandle {
    handle: task::JoinHandle<()>,
}

impl DashboardHandle {
    /// Immediately abort the recompute loop.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// `true` once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use dashboard_core::models::OrderRecord;
    use dashboard_data::analysis::DashboardContext;
    use std::time::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(i: usize, when: &str, pay: f64) -> OrderRecord {
        OrderRecord {
            row_index: i,
            order_id: format!("o{i}"),
            customer_unique_id: format!("c{i}"),
            order_status: "delivered".to_string(),
            order_purchase_timestamp: NaiveDateTime::parse_from_str(when, "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            order_delivered_customer_date: None,
            payment_value: pay,
        }
    }

    fn manager() -> DataManager {
        DataManager::from_context(DashboardContext {
            orders: vec![
                order(0, "2021-01-01 10:00:00", 100.0),
                order(1, "2021-01-05 10:00:00", 50.0),
                order(2, "2021-02-10 10:00:00", 10.0),
            ],
            ..Default::default()
        })
    }

    async fn next(rx: &mut mpsc::Receiver<DashboardSnapshot>) -> DashboardSnapshot {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for snapshot")
            .expect("channel closed before receiving snapshot")
    }

    #[tokio::test]
    async fn test_sends_initial_snapshot() {
        let range = DateRange::new(date(2021, 1, 1), date(2021, 1, 31));
        let (_req, mut rx, handle) = DashboardOrchestrator::new(manager(), range).start();

        let snapshot = next(&mut rx).await;
        assert_eq!(snapshot.metadata.range, range);
        assert_eq!(snapshot.totals.total_orders, 2);

        handle.abort();
    }

    #[tokio::test]
    async fn test_range_request_produces_new_snapshot() {
        let initial = DateRange::new(date(2021, 1, 1), date(2021, 1, 31));
        let (req, mut rx, handle) = DashboardOrchestrator::new(manager(), initial).start();
        next(&mut rx).await;

        let feb = DateRange::new(date(2021, 2, 1), date(2021, 2, 28));
        req.send(feb).unwrap();
        let snapshot = next(&mut rx).await;

        assert_eq!(snapshot.metadata.range, feb);
        assert_eq!(snapshot.totals.total_orders, 1);
        assert!((snapshot.totals.total_gmv - 10.0).abs() < 1e-9);

        handle.abort();
    }

    #[tokio::test]
    async fn test_pending_requests_are_coalesced() {
        let initial = DateRange::new(date(2021, 1, 1), date(2021, 1, 31));
        let (req, mut rx, handle) = DashboardOrchestrator::new(manager(), initial).start();
        next(&mut rx).await;

        let last = DateRange::new(date(2021, 1, 5), date(2021, 2, 28));
        req.send(DateRange::new(date(2021, 1, 1), date(2021, 1, 2)))
            .unwrap();
        req.send(DateRange::new(date(2021, 1, 1), date(2021, 1, 3)))
            .unwrap();
        req.send(last).unwrap();

        let snapshot = next(&mut rx).await;
        assert_eq!(snapshot.metadata.range, last);
        assert_eq!(snapshot.totals.total_orders, 2);

        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_burst_of_edits_ends_on_latest_range() {
        let initial = DateRange::new(date(2021, 1, 1), date(2021, 1, 31));
        let (req, mut rx, handle) = DashboardOrchestrator::new(manager(), initial).start();

        // Edit the end date day by day while the first snapshot is computing.
        let mut latest = initial;
        for day in 1..=20 {
            latest = DateRange::new(date(2021, 1, 1), date(2021, 2, day));
            req.send(latest).unwrap();
        }

        let last = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let snapshot = next(&mut rx).await;
                if snapshot.metadata.range == latest {
                    return snapshot;
                }
            }
        })
        .await
        .expect("latest range was never computed");

        assert_eq!(last.totals.total_orders, 3);
        assert_eq!(*req.borrow(), latest);
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Empty)
        ));

        handle.abort();
    }

    #[tokio::test]
    async fn test_empty_range_is_delivered_not_dropped() {
        let initial = DateRange::new(date(2019, 1, 1), date(2019, 12, 31));
        let (_req, mut rx, handle) = DashboardOrchestrator::new(manager(), initial).start();

        let snapshot = next(&mut rx).await;
        assert!(snapshot.is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn test_loop_exits_when_requests_close() {
        let initial = DateRange::new(date(2021, 1, 1), date(2021, 1, 31));
        let (req, mut rx, handle) = DashboardOrchestrator::new(manager(), initial).start();
        next(&mut rx).await;

        drop(req);
        let closed = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for close");
        assert!(closed.is_none());
        assert!(tokio::time::timeout(Duration::from_secs(5), async {
            while !handle.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .is_ok());
    }
}
