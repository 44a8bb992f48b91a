pub mod cache;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod transaction;
pub mod view;
pub mod window;
