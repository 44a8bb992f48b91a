//! Integration tests for the transaction-history core.
//!
//! A scripted [`mock_backend::MockBackend`] stands in for the wallet
//! daemon, with controls for failure injection and for holding fetches
//! in flight.


pub mod e2e_fetch;
pub mod e2e_filters;
pub mod e2e_paging;
pub mod e2e_scroll;

use std::time::Duration;

use atrium_wallet::domain::view::HistoryView;

/// Drive `view.poll()` until `cond` holds, or panic after a grace period.
/// Completions arrive from spawned tasks, so tests have to yield to the
/// runtime between polls.
pub async fn poll_until<F>(view: &mut HistoryView, what: &str, cond: F)
where
    F: Fn(&HistoryView) -> bool,
{
    for _ in 0..500 {
        view.poll();
        if cond(view) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("timed out waiting for: {what}");
}

/// Give spawned backend tasks a chance to run up to their first suspension
/// point. Needed before asserting on backend call counters: the test
/// runtime only runs spawned tasks at await points.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Poll for a fixed grace period and assert `cond` never becomes true.
pub async fn poll_never<F>(view: &mut HistoryView, what: &str, cond: F)
where
    F: Fn(&HistoryView) -> bool,
{
    for _ in 0..25 {
        view.poll();
        assert!(!cond(view), "unexpectedly observed: {what}");
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}
