use async_trait::async_trait;
use color_eyre::eyre::Result;

use crate::domain::filter::FilterId;
use crate::domain::transaction::{TransactionDetail, TransactionSummary};

/// The narrow interface to the external wallet daemon.
///
/// The history core is written entirely against this trait: it knows
/// nothing about the transport, and tests substitute a scripted
/// implementation. `fetch_history` pages by offset into the daemon's
/// reverse-chronological ordering for the given filter.
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Total number of transactions matching `filter` at this instant.
    /// Point-in-time: the result may go stale against concurrent wallet
    /// activity.
    async fn count_transactions(&self, filter: FilterId) -> Result<u64>;

    /// Up to `count` transaction summaries starting at `offset`, newest
    /// first. A short page means the ordering is exhausted.
    async fn fetch_history(
        &self,
        offset: usize,
        count: usize,
        filter: FilterId,
    ) -> Result<Vec<TransactionSummary>>;

    /// Full detail for a single transaction.
    async fn fetch_detail(&self, hash: &str) -> Result<TransactionDetail>;

    /// Confirmations required before a transaction counts as confirmed.
    fn required_confirmations(&self) -> i64;

    /// Whether the wallet is configured to spend unconfirmed outputs, in
    /// which case everything displays as confirmed.
    fn spend_unconfirmed_enabled(&self) -> bool;
}
