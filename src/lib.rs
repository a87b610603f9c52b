//! haystackd: a concurrent line-search server.
//!
//! Answers one question over TCP (optionally TLS): does an exact copy of
//! this line exist in the configured dataset file?
//!
//! Components:
//! - `matcher`: pluggable exact-match strategies (linear, sorted binary,
//!   KMP, Boyer-Moore, Rabin-Karp, Z-algorithm)
//! - `dataset`: dataset accessor with reread-per-query or load-once caching
//! - `protocol`: frame limits, query validation, response vocabulary
//! - `server`: listener and per-connection query handler
//! - `tls`: rustls context construction for server and client

pub mod config;
pub mod dataset;
pub mod error;
pub mod matcher;
pub mod protocol;
pub mod server;
pub mod tls;
