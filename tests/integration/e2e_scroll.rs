//! Incremental-scroll tests: bounded-memory eviction and backward refetch
//! of trimmed rows.

use std::sync::Arc;

use atrium_wallet::config::HistoryConfig;
use atrium_wallet::domain::fetch::FetchDirection;
use atrium_wallet::domain::filter::FilterId;
use atrium_wallet::domain::view::HistoryView;
use atrium_wallet::domain::window::WindowMode;

use super::mock_backend::{MockBackend, hash_for, sample_txs};
use super::{poll_until, settle};

/// Small pages and a tight eviction threshold keep the test readable:
/// at most 2 pages x 5 rows stay cached.
fn scroll_view(backend: Arc<MockBackend>) -> HistoryView {
    let config = HistoryConfig {
        page_size: 5,
        eviction_pages: 2,
        refresh_interval_secs: 8,
        near_edge_rows: 2,
    };
    HistoryView::new(backend, config, WindowMode::Scroll { offset: 0 })
}

/// Scrolling forward past the eviction threshold trims old rows off the
/// head; scrolling back refetches them, identical and in order.
#[tokio::test]
async fn eviction_and_backward_refetch() {
    let backend = Arc::new(MockBackend::new(sample_txs(100)));
    let mut view = scroll_view(backend.clone());

    view.select_filter(FilterId::All);
    poll_until(&mut view, "first window", |v| v.current_slice().0.len() == 5).await;
    assert_eq!(view.loaded_range(), (0, 5));

    view.page_forward();
    poll_until(&mut view, "second window", |v| v.loaded_range().1 == 10).await;
    assert_eq!(view.loaded_range(), (0, 10));

    // third window crosses the threshold: rows 0-4 are trimmed
    view.page_forward();
    poll_until(&mut view, "eviction", |v| v.loaded_range() == (5, 15)).await;
    assert_eq!(view.current_slice().0.first().map(|tx| tx.hash.clone()), Some(hash_for(10)));

    // one window back is still cached
    let calls_before = backend.history_calls();
    view.page_backward();
    assert_eq!(view.current_slice().0.len(), 5);
    settle().await;
    assert_eq!(backend.history_calls(), calls_before);

    // back to the top: the trimmed rows come back via a backward fetch
    view.page_backward();
    poll_until(&mut view, "backward refetch", |v| v.loaded_range().0 == 0).await;
    let (slice, fetch) = view.current_slice();
    let hashes: Vec<_> = slice.iter().map(|tx| tx.hash.clone()).collect();
    assert_eq!(hashes, (0..5).map(hash_for).collect::<Vec<_>>());
    assert!(fetch.exhausted_backward, "offset 0 exhausts backward growth");
}

/// The near-edge trigger grows the tail without moving the window, and is
/// ignored while a fetch is already in flight.
#[tokio::test]
async fn near_edge_grows_tail_once() {
    let backend = Arc::new(MockBackend::new(sample_txs(100)));
    let mut view = scroll_view(backend.clone());

    view.select_filter(FilterId::All);
    poll_until(&mut view, "first window", |v| v.current_slice().0.len() == 5).await;

    backend.hold();
    view.scroll_near_edge(FetchDirection::Forward);
    view.scroll_near_edge(FetchDirection::Forward);
    backend.release();
    poll_until(&mut view, "grown tail", |v| v.loaded_range().1 == 10).await;

    // window itself did not move
    assert_eq!(view.window_start(), 0);
    assert_eq!(view.loaded_range(), (0, 10));
}
