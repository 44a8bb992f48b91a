//! Atrium Wallet - a TUI front-end for the Atrium wallet daemon.
//!
//! This library provides:
//! - The paginated, filterable transaction-history core (cache, window,
//!   fetch coordination, detail resolution)
//! - The narrow `WalletBackend` interface to the external wallet daemon
//! - A JSON-RPC implementation of that interface

pub mod config;
pub mod domain;
pub mod infra;
