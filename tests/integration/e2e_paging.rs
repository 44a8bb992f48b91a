//! End-to-end paged browsing tests.
//!
//! Drives a paged-mode view over the mock daemon: page contents, control
//! availability, and forward-exhaustion behavior.

use std::sync::Arc;

use atrium_wallet::config::HistoryConfig;
use atrium_wallet::domain::fetch::FetchDirection;
use atrium_wallet::domain::filter::FilterId;
use atrium_wallet::domain::view::HistoryView;
use atrium_wallet::domain::window::WindowMode;

use super::mock_backend::{MockBackend, hash_for, sample_txs};
use super::{poll_until, settle};

fn paged_view(backend: Arc<MockBackend>) -> HistoryView {
    HistoryView::new(
        backend,
        HistoryConfig::default(),
        WindowMode::Paged { page: 0 },
    )
}

/// 57 transactions, 25 per page: page 1 shows rows 1-25 with only "next"
/// available, page 3 shows rows 51-57 with only "previous".
#[tokio::test]
async fn three_page_browse_of_57_rows() {
    let backend = Arc::new(MockBackend::new(sample_txs(57)));
    let mut view = paged_view(backend.clone());

    view.select_filter(FilterId::All);
    poll_until(&mut view, "first page and count", |v| {
        v.current_slice().0.len() == 25 && v.filter().total_count == Some(57)
    })
    .await;

    let controls = view.controls();
    assert!(!controls.has_previous, "page 1 has no previous page");
    assert!(controls.has_next, "page 1 has a next page");
    assert_eq!((controls.first_row, controls.last_row), (1, 25));
    assert_eq!(view.current_slice().0[0].hash, hash_for(0));

    // page 2
    assert!(view.page_forward());
    poll_until(&mut view, "second page", |v| v.controls().last_row == 50).await;
    let controls = view.controls();
    assert!(controls.has_previous);
    assert!(controls.has_next);
    assert_eq!(view.current_slice().0[0].hash, hash_for(25));

    // page 3: a short page
    assert!(view.page_forward());
    poll_until(&mut view, "third page", |v| v.controls().last_row == 57).await;
    let controls = view.controls();
    assert!(controls.has_previous, "page 3 has a previous page");
    assert!(!controls.has_next, "page 3 is the last page");
    assert_eq!((controls.first_row, controls.last_row), (51, 57));
    assert_eq!(view.current_slice().0.len(), 7);

    // the known total refuses a fourth page
    assert!(!view.page_forward());
    assert_eq!(view.controls().first_row, 51);
}

/// Paging back over already-fetched rows never refetches.
#[tokio::test]
async fn paging_back_serves_from_cache() {
    let backend = Arc::new(MockBackend::new(sample_txs(57)));
    let mut view = paged_view(backend.clone());

    view.select_filter(FilterId::All);
    poll_until(&mut view, "first page", |v| v.current_slice().0.len() == 25).await;
    view.page_forward();
    poll_until(&mut view, "second page", |v| v.controls().last_row == 50).await;

    let calls_before = backend.history_calls();
    assert!(view.page_backward());
    // immediately served: rows 1-25, still in original order
    let (slice, _) = view.current_slice();
    assert_eq!(slice.len(), 25);
    assert_eq!(slice[0].hash, hash_for(0));
    assert_eq!(slice[24].hash, hash_for(24));
    settle().await;
    assert_eq!(backend.history_calls(), calls_before);
}

/// Once a short page marks forward exhausted, no further forward fetch is
/// issued for the epoch - not by scrolling, not by the periodic refresh.
#[tokio::test]
async fn exhausted_forward_stops_fetching() {
    let backend = Arc::new(MockBackend::new(sample_txs(10)));
    let mut view = paged_view(backend.clone());

    view.select_filter(FilterId::All);
    poll_until(&mut view, "short first page", |v| {
        v.current_slice().0.len() == 10 && !v.current_slice().1.is_loading()
    })
    .await;
    let (_, fetch) = view.current_slice();
    assert!(fetch.exhausted_forward, "10 < 25 marks forward exhausted");

    let calls_before = backend.history_calls();
    view.refresh();
    view.scroll_near_edge(FetchDirection::Forward);
    assert!(!view.page_forward(), "no next page beyond exhausted data");
    view.poll();
    settle().await;
    assert_eq!(backend.history_calls(), calls_before);

    // reselecting the filter resets the epoch and fetches again
    view.select_filter(FilterId::All);
    poll_until(&mut view, "refetch after reselect", |v| {
        v.current_slice().0.len() == 10
    })
    .await;
    assert!(backend.history_calls() > calls_before);
}
