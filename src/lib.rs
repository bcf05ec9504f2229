//! Real-time rollup of per-salesperson sales performance across branches,
//! kept in sync with a remote snapshot feed.

pub mod branch;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod sink;
pub mod stats;
pub mod store;
pub mod sync;
