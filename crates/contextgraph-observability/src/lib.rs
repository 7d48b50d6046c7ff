// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # contextgraph-observability
//!
//! Logging setup shared by the contextgraph binaries, with per-crate debug
//! flag support.
//!
//! ## Features
//! - `json`: JSON console output
//! - `file-logging`: per-run JSON log files with retention cleanup (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known contextgraph crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "contextgraph",
    "contextgraph-engine",
    "contextgraph-config",
    "contextgraph-observability",
];

/// Log targets raised by `--debug-contextgraph`. The bare `contextgraph`
/// target would prefix-match every member crate.
pub const UMBRELLA_TARGETS: &[&str] = &["contextgraph::replay", "replay_frames"];

/// Target of the per-node propagation trace (see `CONTEXT_GRAPH_TRACE_STEP`)
pub const STEP_TRACE_TARGET: &str = "contextgraph-step-trace";
