//! Bitcoin node adapter.
//!
//! Talks to a Bitcoin Core compatible node over JSON-RPC and normalizes its
//! responses into the canonical block/transaction model consumed by a
//! multi-asset indexing pipeline. It includes:
//!
//! - Configuration management through a JSON file
//! - A JSON-RPC over HTTP transport with basic auth and per-request timeouts
//! - Block assembly, payment extraction and embedded-asset routing
//! - Fee quoting, confirmation tracking and transaction broadcast
//!
//! # Module Structure
//!
//! - `bootstrap`: Loads configuration and connects to the node
//! - `models`: Canonical and node-specific data structures, configuration
//! - `services`: Blockchain client, extraction rules and transport
//! - `utils`: Logging, error context and HTTP helpers

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
