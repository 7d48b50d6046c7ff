// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-contextgraph-engine` to raise one crate to
//! debug level without flooding the console with the others.

use std::collections::HashMap;
use std::env;

use crate::{KNOWN_CRATES, STEP_TRACE_TARGET, UMBRELLA_TARGETS};

/// Environment variable listing crates to debug (comma-separated, or `all`)
pub const DEBUG_ENV_VAR: &str = "CONTEXT_GRAPH_DEBUG";

/// Parse debug flags from command-line arguments
///
/// # Example
/// ```rust
/// use contextgraph_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-contextgraph-engine".to_string()]);
/// assert!(flags.is_enabled("contextgraph-engine"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}` pattern.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();

        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
                continue;
            }
            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                if !crate_name.is_empty() {
                    flags.enabled_crates.insert(crate_name.to_string(), true);
                }
            }
        }

        flags
    }

    /// Merge a `CONTEXT_GRAPH_DEBUG`-style value into the flags
    pub fn merge_env_value(&mut self, value: &str) {
        if value.trim() == "all" {
            self.enable_all();
            return;
        }
        for crate_name in value.split(',') {
            let crate_name = crate_name.trim();
            if !crate_name.is_empty() {
                self.enabled_crates.insert(crate_name.to_string(), true);
            }
        }
    }

    fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enabled_crates.insert(crate_name.to_string(), true);
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Get all enabled crates
    pub fn enabled_crates(&self) -> Vec<&String> {
        self.enabled_crates.keys().collect()
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Get log level filter for a crate
    ///
    /// Returns `tracing::Level::DEBUG` if enabled, `tracing::Level::INFO` otherwise.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Filter directives with `info` as the default level
    pub fn to_filter_string(&self) -> String {
        self.to_filter_string_with_base("info")
    }

    /// Create a tracing filter from debug flags
    ///
    /// Returns a filter string that can be used with `EnvFilter`, e.g.
    /// `"warn,contextgraph_engine=debug,contextgraph-step-trace=trace"`.
    /// Crate names are mapped to their module-path targets (see
    /// [`crate_targets`]). The step-trace target is always let through; it
    /// only emits when `CONTEXT_GRAPH_TRACE_STEP` is set.
    pub fn to_filter_string_with_base(&self, base_level: &str) -> String {
        let mut crates: Vec<&String> = self.enabled_crates.keys().collect();
        crates.sort();

        let mut filters = vec![normalize_level(base_level)];
        for crate_name in crates {
            for target in crate_targets(crate_name) {
                filters.push(format!("{}=debug", target));
            }
        }
        filters.push(format!("{}=trace", STEP_TRACE_TARGET));
        filters.join(",")
    }
}

/// Log targets owned by a crate
///
/// Member crates log under their module path (`-` becomes `_`). EnvFilter
/// matches targets by prefix, so the umbrella crate is narrowed to
/// [`UMBRELLA_TARGETS`].
pub fn crate_targets(crate_name: &str) -> Vec<String> {
    if crate_name == "contextgraph" {
        UMBRELLA_TARGETS.iter().map(|t| t.to_string()).collect()
    } else {
        vec![crate_name.replace('-', "_")]
    }
}

/// Lower-case a level name, accepting `warning` for `warn`
pub fn normalize_level(level: &str) -> String {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        other => other.to_string(),
    }
}

/// Parse debug flags from the process arguments and `CONTEXT_GRAPH_DEBUG`
///
/// Environment variable format: comma-separated crate names, e.g.
/// `contextgraph-engine,contextgraph-config`, or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(env_var) = env::var(DEBUG_ENV_VAR) {
        flags.merge_env_value(&env_var);
    }
    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variables:
  {}={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  {}=all                              Enable debug for all crates
  CONTEXT_GRAPH_TRACE_STEP=1          Per-node propagation trace
  CONTEXT_GRAPH_TRACE_NODE=<id>       Restrict the trace to one node
"#,
        KNOWN_CRATES.join(", "),
        DEBUG_ENV_VAR,
        DEBUG_ENV_VAR
    )
}
