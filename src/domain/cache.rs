use std::collections::HashSet;

use tracing::debug;

use super::fetch::FetchDirection;
use super::transaction::TransactionSummary;

/// Append-ordered, offset-addressable store of fetched transaction
/// summaries for the current filter epoch.
///
/// Rows keep the reverse-chronological order the data source returned them
/// in; the cache never re-sorts. `base_offset` is the absolute offset of
/// the first cached row: it is non-zero after scroll-mode eviction has
/// trimmed rows off the head, and those offsets stay addressable so a
/// backward fetch can bring the trimmed rows back.
#[derive(Debug, Default)]
pub struct HistoryCache {
    rows: Vec<TransactionSummary>,
    hashes: HashSet<String>,
    base_offset: usize,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Absolute offset of the first cached row.
    pub fn base_offset(&self) -> usize {
        self.base_offset
    }

    /// Absolute offset one past the last cached row.
    pub fn end_offset(&self) -> usize {
        self.base_offset + self.rows.len()
    }

    /// Merge a fetched batch. Forward batches extend the tail, backward
    /// batches extend the head. Summaries whose hash is already cached are
    /// skipped: offset-based paging can legitimately return overlapping
    /// rows when the chain reorganizes between calls. Returns the number of
    /// rows accepted.
    pub fn append(&mut self, batch: Vec<TransactionSummary>, direction: FetchDirection) -> usize {
        let mut accepted = Vec::with_capacity(batch.len());
        let mut duplicates = 0usize;
        for tx in batch {
            if self.hashes.contains(&tx.hash) {
                duplicates += 1;
                continue;
            }
            self.hashes.insert(tx.hash.clone());
            accepted.push(tx);
        }
        if duplicates > 0 {
            debug!("dropped {duplicates} duplicate row(s) from fetched batch");
        }

        let n = accepted.len();
        match direction {
            FetchDirection::Backward => {
                self.base_offset = self.base_offset.saturating_sub(n);
                self.rows.splice(0..0, accepted);
            }
            FetchDirection::Forward => self.rows.extend(accepted),
        }
        n
    }

    /// The contiguous intersection of `[offset, offset + count)` with the
    /// cached range, in original order. Shorter than `count` when the cache
    /// does not extend that far; the caller tells "exhausted" apart from
    /// "not yet fetched" via the fetch state.
    pub fn slice(&self, offset: usize, count: usize) -> &[TransactionSummary] {
        let start = offset.max(self.base_offset);
        let end = (offset + count).min(self.end_offset());
        if start >= end {
            return &[];
        }
        &self.rows[start - self.base_offset..end - self.base_offset]
    }

    /// Whether `[offset, offset + count)` is fully cached.
    pub fn covers(&self, offset: usize, count: usize) -> bool {
        offset >= self.base_offset && offset + count <= self.end_offset()
    }

    /// Drop the `n` oldest-offset rows off the head. Their hashes are
    /// released so a later backward fetch can reinsert them.
    pub fn trim_head(&mut self, n: usize) {
        let n = n.min(self.rows.len());
        for tx in self.rows.drain(..n) {
            self.hashes.remove(&tx.hash);
        }
        self.base_offset += n;
    }

    /// Discard everything. Called on filter change.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.hashes.clear();
        self.base_offset = 0;
    }
}
