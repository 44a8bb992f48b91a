//! Fetch-coordination tests: error surfacing, manual retry, and the
//! single-flight rule.

use std::sync::Arc;

use atrium_wallet::config::HistoryConfig;
use atrium_wallet::domain::error::HistoryError;
use atrium_wallet::domain::fetch::{FetchDirection, FetchStatus};
use atrium_wallet::domain::filter::FilterId;
use atrium_wallet::domain::view::HistoryView;
use atrium_wallet::domain::window::WindowMode;

use super::mock_backend::{MockBackend, sample_txs};
use super::{poll_until, settle};

fn paged_view(backend: Arc<MockBackend>) -> HistoryView {
    HistoryView::new(
        backend,
        HistoryConfig::default(),
        WindowMode::Paged { page: 0 },
    )
}

/// A failing first fetch leaves an empty slice with an error state the
/// renderer can display; nothing panics and the cache stays untouched.
#[tokio::test]
async fn first_fetch_error_surfaces() {
    let backend = Arc::new(MockBackend::new(sample_txs(57)));
    backend.set_fail_history(Some("connection refused"));
    let mut view = paged_view(backend.clone());

    view.select_filter(FilterId::All);
    poll_until(&mut view, "fetch error", |v| {
        v.current_slice().1.status() == FetchStatus::Error
    })
    .await;

    let (slice, fetch) = view.current_slice();
    assert!(slice.is_empty());
    match &fetch.last_error {
        Some(HistoryError::FetchFailed { cause }) => {
            assert!(cause.contains("connection refused"));
        }
        other => panic!("expected FetchFailed, got {other:?}"),
    }
}

/// No automatic retry: the error state persists until the user re-triggers
/// the same logical fetch, which then recovers.
#[tokio::test]
async fn retry_after_error_recovers() {
    let backend = Arc::new(MockBackend::new(sample_txs(30)));
    backend.set_fail_history(Some("daemon restarting"));
    let mut view = paged_view(backend.clone());

    view.select_filter(FilterId::All);
    poll_until(&mut view, "fetch error", |v| {
        v.current_slice().1.status() == FetchStatus::Error
    })
    .await;

    let calls_after_error = backend.history_calls();
    // nothing happens on its own
    view.poll();
    assert_eq!(backend.history_calls(), calls_after_error);

    backend.set_fail_history(None);
    view.retry();
    poll_until(&mut view, "recovery", |v| v.current_slice().0.len() == 25).await;
    let (_, fetch) = view.current_slice();
    assert_eq!(fetch.status(), FetchStatus::Idle);
    assert!(fetch.last_error.is_none());
}

/// Two triggers before the first fetch resolves dispatch exactly one fetch;
/// the second is ignored, not queued.
#[tokio::test]
async fn double_trigger_dispatches_once() {
    let backend = Arc::new(MockBackend::new(sample_txs(100)));
    backend.hold();
    let mut view = paged_view(backend.clone());

    view.select_filter(FilterId::All);
    settle().await;
    assert_eq!(backend.history_calls(), 1);

    // both of these arrive while the first fetch is still in flight
    view.scroll_near_edge(FetchDirection::Forward);
    view.scroll_near_edge(FetchDirection::Forward);
    view.poll();
    settle().await;
    assert_eq!(backend.history_calls(), 1, "second trigger must be ignored");

    backend.release();
    poll_until(&mut view, "first page", |v| v.current_slice().0.len() == 25).await;

    // idle again: the next trigger goes through
    view.scroll_near_edge(FetchDirection::Forward);
    settle().await;
    assert_eq!(backend.history_calls(), 2);
}

/// The periodic refresh path obeys the same single-flight rule.
#[tokio::test]
async fn refresh_is_ignored_while_loading() {
    let backend = Arc::new(MockBackend::new(sample_txs(100)));
    backend.hold();
    let mut view = paged_view(backend.clone());

    view.select_filter(FilterId::All);
    settle().await;
    assert_eq!(backend.history_calls(), 1);

    view.refresh();
    view.refresh();
    settle().await;
    assert_eq!(backend.history_calls(), 1);

    backend.release();
    poll_until(&mut view, "first page", |v| v.current_slice().0.len() == 25).await;
}
