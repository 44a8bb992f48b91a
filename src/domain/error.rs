use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the history core.
///
/// None of these are fatal: they are captured into component-local state
/// (`FetchState::last_error`) or returned to the caller, and the cache is
/// always left in its last-known-good state. Retries are user-triggered.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum HistoryError {
    /// The transaction count query failed; the total is unknown, not zero.
    #[error("transaction count unavailable: {0}")]
    CountUnavailable(String),

    /// A history page fetch failed.
    #[error("fetching transactions failed: {cause}")]
    FetchFailed { cause: String },

    /// The selected hash is not a well-formed transaction hash.
    #[error("malformed transaction hash")]
    MalformedHash,

    /// The detail lookup failed at the data source.
    #[error("transaction details unavailable: {cause}")]
    DetailUnavailable { cause: String },

    /// The data source has never returned a transaction for this filter.
    /// Terminal for the current filter epoch until the filter is reselected.
    #[error("no transactions yet")]
    EmptyResult,
}
