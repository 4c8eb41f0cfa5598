//! Core services implementing the adapter logic.
//!
//! - `blockchain`: Blockchain client interfaces, the Bitcoin client and its transport

pub mod blockchain;
