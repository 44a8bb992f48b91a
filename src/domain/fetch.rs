use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::Display;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::infra::source::WalletBackend;

use super::error::HistoryError;
use super::filter::FilterId;
use super::transaction::TransactionSummary;

/// Growth direction of a history fetch. Rows are reverse-chronological, so
/// Forward extends the tail with older transactions and Backward re-fetches
/// rows that scroll-mode eviction trimmed off the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum FetchDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

/// The parameters a fetch was dispatched with. Captured at dispatch time so
/// a stale completion can be recognized and a failed request re-issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub epoch: u64,
    pub direction: FetchDirection,
    pub offset: usize,
    pub requested: usize,
}

/// Completion message sent back from a spawned fetch task.
#[derive(Debug)]
pub enum FetchOutcome {
    Batch {
        request: FetchRequest,
        result: Result<Vec<TransactionSummary>, String>,
    },
    Count {
        epoch: u64,
        result: Result<u64, String>,
    },
}

/// Fetch status for the current filter epoch, read by the renderer.
#[derive(Debug, Default)]
pub struct FetchState {
    pub direction: Option<FetchDirection>,
    pub last_error: Option<HistoryError>,
    pub exhausted_forward: bool,
    pub exhausted_backward: bool,
    status: FetchStatus,
    last_request: Option<FetchRequest>,
}

impl FetchState {
    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn exhausted(&self, direction: FetchDirection) -> bool {
        match direction {
            FetchDirection::Forward => self.exhausted_forward,
            FetchDirection::Backward => self.exhausted_backward,
        }
    }

    pub(super) fn begin(&mut self, request: FetchRequest) {
        self.status = FetchStatus::Loading;
        self.direction = Some(request.direction);
        self.last_request = Some(request);
    }

    /// Record a successful merge of `returned` rows against `request`.
    pub(super) fn complete(&mut self, request: &FetchRequest, returned: usize) {
        self.status = FetchStatus::Idle;
        self.direction = None;
        self.last_error = None;
        match request.direction {
            FetchDirection::Forward => {
                self.exhausted_forward = returned < request.requested;
            }
            FetchDirection::Backward => {
                // offset 0 means the head of the ordering was reached
                self.exhausted_backward = request.offset == 0 || returned < request.requested;
            }
        }
    }

    pub(super) fn fail(&mut self, cause: String) {
        self.status = FetchStatus::Error;
        self.direction = None;
        self.last_error = Some(HistoryError::FetchFailed { cause });
    }

    /// Mark the epoch as having no transactions at all. Terminal until the
    /// filter is reselected.
    pub(super) fn mark_empty(&mut self) {
        self.status = FetchStatus::Idle;
        self.direction = None;
        self.last_error = Some(HistoryError::EmptyResult);
        self.exhausted_forward = true;
        self.exhausted_backward = true;
    }

    /// The request to re-issue on a user-triggered retry, if the last fetch
    /// failed.
    pub(super) fn retryable(&self) -> Option<FetchRequest> {
        if self.status == FetchStatus::Error {
            self.last_request
        } else {
            None
        }
    }

    pub(super) fn reset(&mut self) {
        *self = FetchState::default();
    }
}

/// Dispatches history fetches as independent tokio tasks and funnels their
/// completions back over a channel, tagged with the filter epoch they were
/// dispatched under. The owning view drains the channel from its single
/// mutation point; nothing here touches the cache.
pub struct FetchCoordinator {
    backend: Arc<dyn WalletBackend>,
    completions: UnboundedSender<FetchOutcome>,
}

impl FetchCoordinator {
    pub fn new(backend: Arc<dyn WalletBackend>, completions: UnboundedSender<FetchOutcome>) -> Self {
        Self {
            backend,
            completions,
        }
    }

    /// Spawn a history page fetch. The caller has already checked the
    /// single-flight and exhaustion rules.
    pub fn dispatch(&self, request: FetchRequest, filter: FilterId) {
        debug!(
            "dispatching {} fetch: offset={} count={} epoch={}",
            request.direction, request.offset, request.requested, request.epoch
        );
        let backend = Arc::clone(&self.backend);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = backend
                .fetch_history(request.offset, request.requested, filter)
                .await
                .map_err(|e| e.to_string());
            // the receiver may be gone if the view was dropped mid-flight
            let _ = completions.send(FetchOutcome::Batch { request, result });
        });
    }

    /// Spawn the point-in-time transaction count query for a freshly
    /// selected filter.
    pub fn dispatch_count(&self, epoch: u64, filter: FilterId) {
        let backend = Arc::clone(&self.backend);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = backend
                .count_transactions(filter)
                .await
                .map_err(|e| e.to_string());
            let _ = completions.send(FetchOutcome::Count { epoch, result });
        });
    }
}
