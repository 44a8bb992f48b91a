use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::config::HistoryConfig;
use crate::infra::source::WalletBackend;

use super::cache::HistoryCache;
use super::detail::{DetailResolver, ResolvedDetail};
use super::error::HistoryError;
use super::fetch::{
    FetchCoordinator, FetchDirection, FetchOutcome, FetchRequest, FetchState,
};
use super::filter::{Filter, FilterId};
use super::transaction::TransactionSummary;
use super::window::{FetchPlan, PageControls, PageWindow, WindowMode};

/// State of the open transaction-detail session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Ready(ResolvedDetail),
    Failed(HistoryError),
}

/// The detail view currently open, scoped to a single hash. Closing the
/// session or selecting a different hash discards any in-flight result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSession {
    pub hash: String,
    pub state: DetailState,
    seq: u64,
}

#[derive(Debug)]
struct DetailOutcome {
    seq: u64,
    result: Result<ResolvedDetail, HistoryError>,
}

/// One open history view: the cache/window/fetch state machine between the
/// wallet data source and a renderer.
///
/// Each open view owns its cache instance; nothing here is process-global,
/// so two views (say, two filters open at once) cannot interfere. All
/// mutation happens on the owner's thread: spawned fetches only report back
/// over channels drained by [`HistoryView::poll`].
pub struct HistoryView {
    backend: Arc<dyn WalletBackend>,
    config: HistoryConfig,
    epoch: u64,
    filter: Filter,
    count_error: Option<HistoryError>,
    cache: HistoryCache,
    fetch: FetchState,
    window: PageWindow,
    coordinator: FetchCoordinator,
    completions: UnboundedReceiver<FetchOutcome>,
    detail: Option<DetailSession>,
    detail_tx: UnboundedSender<DetailOutcome>,
    detail_rx: UnboundedReceiver<DetailOutcome>,
    next_detail_seq: u64,
}

impl HistoryView {
    /// Construct a view over `backend`. No fetch is issued until the first
    /// [`HistoryView::select_filter`] call starts an epoch.
    pub fn new(backend: Arc<dyn WalletBackend>, config: HistoryConfig, mode: WindowMode) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (detail_tx, detail_rx) = mpsc::unbounded_channel();
        let coordinator = FetchCoordinator::new(Arc::clone(&backend), tx);
        let window = PageWindow::new(mode, config.page_size);
        Self {
            backend,
            config,
            epoch: 0,
            filter: Filter::new(FilterId::All),
            count_error: None,
            cache: HistoryCache::new(),
            fetch: FetchState::default(),
            window,
            coordinator,
            completions: rx,
            detail: None,
            detail_tx,
            detail_rx,
            next_detail_seq: 0,
        }
    }

    /// Select a filter, discarding the previous epoch's cache and fetch
    /// state. Any fetch still in flight for the old epoch will have its
    /// result dropped on arrival. Re-selecting the current filter restarts
    /// its epoch the same way.
    pub fn select_filter(&mut self, id: FilterId) {
        self.epoch += 1;
        self.filter = Filter::new(id);
        self.count_error = None;
        self.cache.reset();
        self.fetch.reset();
        self.window.reset();
        self.coordinator.dispatch_count(self.epoch, id);
        self.ensure_window_fetch();
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// The count-query failure for the current epoch, if any. The view
    /// stays usable with an unknown (not zero) total.
    pub fn count_error(&self) -> Option<&HistoryError> {
        self.count_error.as_ref()
    }

    /// What the renderer should show: the best-available slice for the
    /// current window and the fetch state to derive loading/error hints
    /// from.
    pub fn current_slice(&self) -> (&[TransactionSummary], &FetchState) {
        let slice = self.cache.slice(self.window.start(), self.window.page_size());
        (slice, &self.fetch)
    }

    pub fn controls(&self) -> PageControls {
        self.window.controls(&self.cache, &self.fetch, &self.filter)
    }

    pub fn window_mode(&self) -> WindowMode {
        self.window.mode()
    }

    /// Absolute offset of the first visible row.
    pub fn window_start(&self) -> usize {
        self.window.start()
    }

    /// The absolute offset range currently held in the cache.
    pub fn loaded_range(&self) -> (usize, usize) {
        (self.cache.base_offset(), self.cache.end_offset())
    }

    /// Move to the next (older) page. Returns whether the window moved.
    pub fn page_forward(&mut self) -> bool {
        let moved = self.window.advance(&self.cache, &self.fetch, &self.filter);
        if moved {
            self.ensure_window_fetch();
        }
        moved
    }

    /// Move to the previous (newer) page.
    pub fn page_backward(&mut self) -> bool {
        let moved = self.window.retreat();
        if moved {
            self.ensure_window_fetch();
        }
        moved
    }

    /// Scroll-driven growth trigger. A second trigger while a fetch is in
    /// flight is ignored, not queued.
    pub fn scroll_near_edge(&mut self, direction: FetchDirection) {
        if self.fetch.is_loading() || self.fetch.exhausted(direction) {
            return;
        }
        let plan = match direction {
            FetchDirection::Forward => FetchPlan {
                direction,
                offset: self.cache.end_offset(),
                count: self.window.page_size(),
            },
            FetchDirection::Backward => {
                let base = self.cache.base_offset();
                if base == 0 {
                    return;
                }
                let offset = base.saturating_sub(self.window.page_size());
                FetchPlan {
                    direction,
                    offset,
                    count: base - offset,
                }
            }
        };
        self.dispatch(plan);
    }

    /// Periodic background refresh: re-enters the normal forward trigger
    /// path under the same single-flight and epoch-guard rules.
    pub fn refresh(&mut self) {
        self.scroll_near_edge(FetchDirection::Forward);
    }

    /// User-triggered retry of the last failed fetch. No-op unless the
    /// fetch state is in error.
    pub fn retry(&mut self) {
        if let Some(request) = self.fetch.retryable() {
            let request = FetchRequest {
                epoch: self.epoch,
                ..request
            };
            self.fetch.begin(request);
            self.coordinator.dispatch(request, self.filter.id);
        }
    }

    /// Open the detail view for a row's hash. Selecting a different hash
    /// discards the previous session's result, arrived or not.
    pub fn open_detail(&mut self, hash: &str) {
        let seq = self.next_detail_seq;
        self.next_detail_seq += 1;
        self.detail = Some(DetailSession {
            hash: hash.to_string(),
            state: DetailState::Loading,
            seq,
        });

        let resolver = DetailResolver::new(Arc::clone(&self.backend));
        let tx = self.detail_tx.clone();
        let hash = hash.to_string();
        tokio::spawn(async move {
            let result = resolver.resolve(&hash).await;
            let _ = tx.send(DetailOutcome { seq, result });
        });
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&DetailSession> {
        self.detail.as_ref()
    }

    /// Drain completed fetches into the cache and the open detail session.
    /// Results dispatched under an older filter epoch are discarded
    /// unconditionally. Returns whether anything changed and a re-render is
    /// warranted.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        let mut merged = false;

        while let Ok(outcome) = self.completions.try_recv() {
            match outcome {
                FetchOutcome::Batch { request, result } => {
                    if request.epoch != self.epoch {
                        debug!(
                            "discarding stale {} fetch result (epoch {} != {})",
                            request.direction, request.epoch, self.epoch
                        );
                        continue;
                    }
                    changed = true;
                    match result {
                        Ok(batch) => {
                            if batch.is_empty() && self.cache.is_empty() {
                                self.fetch.mark_empty();
                                continue;
                            }
                            let returned = batch.len();
                            let accepted = self.cache.append(batch, request.direction);
                            self.fetch.complete(&request, returned);
                            let evict = self.window.eviction(&self.cache, self.config.eviction_pages);
                            if evict > 0 {
                                self.cache.trim_head(evict);
                            }
                            // an all-duplicate page (reorg overlap) made no
                            // progress; chaining it again would spin
                            merged |= accepted > 0;
                        }
                        Err(cause) => self.fetch.fail(cause),
                    }
                }
                FetchOutcome::Count { epoch, result } => {
                    if epoch != self.epoch {
                        continue;
                    }
                    changed = true;
                    match result {
                        Ok(count) => self.filter.total_count = Some(count),
                        Err(cause) => {
                            self.filter.total_count = None;
                            self.count_error = Some(HistoryError::CountUnavailable(cause));
                        }
                    }
                }
            }
        }

        while let Ok(outcome) = self.detail_rx.try_recv() {
            match &mut self.detail {
                Some(session) if session.seq == outcome.seq => {
                    session.state = match outcome.result {
                        Ok(resolved) => DetailState::Ready(resolved),
                        Err(e) => DetailState::Failed(e),
                    };
                    changed = true;
                }
                // closed or superseded session: discard
                _ => {}
            }
        }

        if merged {
            // a merge may still leave the window short; chain the next fetch
            self.ensure_window_fetch();
        }
        changed
    }

    fn ensure_window_fetch(&mut self) {
        if self.fetch.is_loading() {
            return;
        }
        if let Some(plan) = self.window.plan_fetch(&self.cache, &self.fetch) {
            self.dispatch(plan);
        }
    }

    fn dispatch(&mut self, plan: FetchPlan) {
        let request = FetchRequest {
            epoch: self.epoch,
            direction: plan.direction,
            offset: plan.offset,
            requested: plan.count,
        };
        self.fetch.begin(request);
        self.coordinator.dispatch(request, self.filter.id);
    }
}
