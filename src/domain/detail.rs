use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::infra::source::WalletBackend;

use super::error::HistoryError;
use super::transaction::{TransactionDetail, TX_HASH_LEN, fractional_digits};

/// Display status of a transaction, derived from its confirmation count and
/// the wallet's spend-unconfirmed setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum TxStatus {
    Confirmed,
    Pending,
}

/// A fetched detail plus the derived presentation facts the renderer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDetail {
    pub detail: TransactionDetail,
    pub status: TxStatus,
    /// Shared fractional-digit width across all input and output amounts,
    /// so displayed amounts right-align on the decimal point.
    pub amount_width: usize,
}

/// One-shot, non-cached transaction detail lookups.
///
/// The detail view is short-lived and a re-open always re-fetches, so
/// confirmation counts stay fresh at the cost of a round trip.
pub struct DetailResolver {
    backend: Arc<dyn WalletBackend>,
}

impl DetailResolver {
    pub fn new(backend: Arc<dyn WalletBackend>) -> Self {
        Self { backend }
    }

    pub async fn resolve(&self, hash: &str) -> Result<ResolvedDetail, HistoryError> {
        if !is_valid_hash(hash) {
            return Err(HistoryError::MalformedHash);
        }

        let detail = self
            .backend
            .fetch_detail(hash)
            .await
            .map_err(|e| HistoryError::DetailUnavailable {
                cause: e.to_string(),
            })?;

        let status = if self.backend.spend_unconfirmed_enabled()
            || detail.confirmations >= self.backend.required_confirmations()
        {
            TxStatus::Confirmed
        } else {
            TxStatus::Pending
        };

        let amount_width = alignment_width(&detail);

        Ok(ResolvedDetail {
            detail,
            status,
            amount_width,
        })
    }
}

/// Max fractional-digit count over every input and output amount of a
/// single transaction.
pub fn alignment_width(detail: &TransactionDetail) -> usize {
    detail
        .inputs
        .iter()
        .map(|i| i.amount)
        .chain(detail.outputs.iter().map(|o| o.amount))
        .map(fractional_digits)
        .max()
        .unwrap_or(0)
}

fn is_valid_hash(hash: &str) -> bool {
    hash.len() == TX_HASH_LEN && hex::decode(hash).is_ok()
}
