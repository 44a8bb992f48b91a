use serde::{Deserialize, Serialize};
use strum::Display;

/// Number of atoms in one ATR.
pub const ATOMS_PER_COIN: i64 = 100_000_000;

/// Fractional digits carried by an atom amount.
const COIN_DECIMALS: usize = 8;

/// Length of a transaction hash in hex characters.
pub const TX_HASH_LEN: usize = 64;

/// Direction of value flow relative to the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Direction {
    Sent,
    Received,
    Transferred,
    Coinbase,
    Staking,
}

/// A single row of transaction history, as returned by the wallet daemon.
/// Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    /// Transaction hash, 64 lowercase hex characters.
    pub hash: String,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub direction: Direction,
    /// Net amount in atoms. Signed: negative for outgoing value.
    pub amount: i64,
    /// Fee in atoms.
    pub fee: i64,
    /// Daemon-assigned type tag ("regular", "vote", "ticket", ...).
    pub tx_type: String,
    /// Height of the containing block, -1 while unconfirmed.
    pub block_height: i64,
}

impl TransactionSummary {
    pub fn is_confirmed(&self) -> bool {
        self.block_height >= 0
    }

    /// Abbreviated hash for list rows: first and last 8 characters.
    pub fn short_hash(&self) -> String {
        if self.hash.len() <= 16 {
            return self.hash.clone();
        }
        format!("{}...{}", &self.hash[..8], &self.hash[self.hash.len() - 8..])
    }
}

/// A spent input of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    pub previous_outpoint: String,
    pub account_name: String,
    /// Amount in atoms.
    pub amount: i64,
}

/// An output of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub address: String,
    pub account_name: String,
    /// Amount in atoms.
    pub amount: i64,
    pub script_type: String,
    pub is_mine: bool,
}

/// Full transaction detail: everything in the summary plus the fields the
/// detail view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub summary: TransactionSummary,
    pub confirmations: i64,
    /// Serialized size in bytes.
    pub size: usize,
    /// Fee rate in atoms per kilobyte.
    pub fee_rate: i64,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
}

/// Format an atom amount as a plain coin string, e.g. `-1.2345 ATR`.
pub fn format_coin(atoms: i64) -> String {
    let sign = if atoms < 0 { "-" } else { "" };
    let abs = atoms.unsigned_abs();
    let whole = abs / ATOMS_PER_COIN as u64;
    let digits = fractional_digits_str(atoms);
    if digits.is_empty() {
        format!("{sign}{whole} ATR")
    } else {
        format!("{sign}{whole}.{digits} ATR")
    }
}

/// Count of significant fractional digits of `atoms` in coin denomination,
/// trailing zeros trimmed. `150_000_000` atoms (1.5 ATR) has 1; a whole
/// number of coins has 0.
pub fn fractional_digits(atoms: i64) -> usize {
    fractional_digits_str(atoms).len()
}

fn fractional_digits_str(atoms: i64) -> String {
    let frac = atoms.unsigned_abs() % ATOMS_PER_COIN as u64;
    let mut s = format!("{frac:0width$}", width = COIN_DECIMALS);
    while s.ends_with('0') {
        s.pop();
    }
    s
}

/// Format an atom amount right-aligned on the decimal point with `width`
/// reserved for fractional digits. Amounts in a detail view all share the
/// same width so the decimal points line up:
///
/// ```text
/// 12.5     ATR
///  3.00125 ATR
/// 40       ATR
/// ```
pub fn format_coin_aligned(atoms: i64, width: usize) -> String {
    let sign = if atoms < 0 { "-" } else { "" };
    let abs = atoms.unsigned_abs();
    let whole = abs / ATOMS_PER_COIN as u64;
    let digits = fractional_digits_str(atoms);
    if digits.is_empty() {
        // one extra column stands in for the missing decimal point
        format!("{sign}{whole}{:<pad$} ATR", "", pad = width + 1)
    } else {
        format!("{sign}{whole}.{digits:<width$} ATR")
    }
}
