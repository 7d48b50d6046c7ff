// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for contextgraph binaries
//!
//! Console output always goes to stderr so tools can keep stdout for data.
//! With the `file-logging` feature, each run also gets its own directory of
//! JSON log files, with configurable retention.

use std::path::Path;
#[cfg(feature = "file-logging")]
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDateTime, TimeZone, Utc};
use tracing_subscriber::EnvFilter;

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingOptions};

const RUN_PREFIX: &str = "run_";
const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Build the `EnvFilter` for a base level plus per-crate debug flags
pub fn build_env_filter(debug_flags: &CrateDebugFlags, level: &str) -> Result<EnvFilter> {
    let directives = debug_flags.to_filter_string_with_base(level);
    EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter: {}", directives))
}

/// Install a console subscriber at `level`, raised to debug for flagged crates
pub fn init_logging(debug_flags: &CrateDebugFlags, level: &str) -> Result<()> {
    init_console_logging(debug_flags, &LoggingOptions::with_level(level))
}

/// Install a console subscriber
///
/// # Errors
/// Fails on an invalid level, on `LogFormat::Json` without the `json`
/// feature, or when a global subscriber is already installed.
pub fn init_console_logging(debug_flags: &CrateDebugFlags, options: &LoggingOptions) -> Result<()> {
    let env_filter = build_env_filter(debug_flags, &options.level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(options.with_target)
        .with_writer(std::io::stderr);

    match options.format {
        LogFormat::Text => builder
            .try_init()
            .map_err(|e| anyhow!("Failed to install log subscriber: {}", e)),
        #[cfg(feature = "json")]
        LogFormat::Json => builder
            .json()
            .try_init()
            .map_err(|e| anyhow!("Failed to install log subscriber: {}", e)),
        #[cfg(not(feature = "json"))]
        LogFormat::Json => Err(anyhow!(
            "JSON log format requires the 'json' feature of contextgraph-observability"
        )),
    }
}

/// Keeps file writers alive; logs are flushed when this is dropped
#[cfg(feature = "file-logging")]
pub struct LoggingGuard {
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: PathBuf,
}

#[cfg(feature = "file-logging")]
impl LoggingGuard {
    /// Directory of this run's log files
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Initialize console output plus per-run JSON log files
///
/// Creates a timestamped folder structure:
/// ```text
/// ./logs/
///   └── run_20250101_120000/
///       ├── contextgraph-engine.log
///       ├── contextgraph-config.log
///       ├── contextgraph.log
///       └── combined.log
/// ```
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags for filtering
/// * `options` - Console level and format
/// * `log_dir` - Base directory for logs (default: `./logs`)
/// * `retention_days` - Keep logs for N days (default: 30)
/// * `retention_runs` - Keep N most recent runs (default: 10)
#[cfg(feature = "file-logging")]
pub fn init_file_logging(
    debug_flags: &CrateDebugFlags,
    options: &LoggingOptions,
    log_dir: Option<PathBuf>,
    retention_days: Option<u64>,
    retention_runs: Option<usize>,
) -> Result<LoggingGuard> {
    use tracing_appender::rolling;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{Layer, Registry};

    let base_log_dir = log_dir.unwrap_or_else(|| PathBuf::from("./logs"));

    let timestamp = Utc::now().format(RUN_TIMESTAMP_FORMAT);
    let run_folder = base_log_dir.join(format!("{}{}", RUN_PREFIX, timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    cleanup_old_logs(
        &base_log_dir,
        retention_days.unwrap_or(30),
        retention_runs.unwrap_or(10),
    )?;

    let mut layers = Vec::new();
    let mut file_guards = Vec::new();

    let console_filter = build_env_filter(debug_flags, &options.level)?;
    let console_layer = match options.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(options.with_target)
            .with_filter(console_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(options.with_target)
            .with_filter(console_filter)
            .boxed(),
    };
    layers.push(console_layer);

    // One file per crate, at debug level for that crate only
    for crate_name in crate::KNOWN_CRATES {
        let file_appender = rolling::never(&run_folder, format!("{}.log", crate_name));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        file_guards.push(guard);

        let directives: Vec<String> = crate::cli::crate_targets(crate_name)
            .into_iter()
            .map(|target| format!("{}=debug", target))
            .collect();
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(EnvFilter::try_new(format!("off,{}", directives.join(",")))?)
            .boxed();
        layers.push(file_layer);
    }

    let combined_appender = rolling::never(&run_folder, "combined.log");
    let (combined_non_blocking, combined_guard) = tracing_appender::non_blocking(combined_appender);
    file_guards.push(combined_guard);

    let combined_layer = tracing_subscriber::fmt::layer()
        .with_writer(combined_non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(build_env_filter(debug_flags, &options.level)?)
        .boxed();
    layers.push(combined_layer);

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(LoggingGuard {
        _file_guards: file_guards,
        log_dir: run_folder,
    })
}

/// Remove run directories older than `retention_days`, then keep only the
/// newest `retention_runs` of what is left.
///
/// Directories not named `run_<YYYYmmdd_HHMMSS>` are never touched. Returns
/// the number of directories removed.
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u64,
    retention_runs: usize,
) -> Result<usize> {
    if !base_log_dir.exists() {
        return Ok(0);
    }

    let cutoff_date = Utc::now() - chrono::Duration::days(retention_days as i64);

    let mut runs = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)
        .with_context(|| format!("Failed to read log directory: {}", base_log_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let started = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(RUN_PREFIX))
            .and_then(|ts| NaiveDateTime::parse_from_str(ts, RUN_TIMESTAMP_FORMAT).ok())
            .map(|naive| Utc.from_utc_datetime(&naive));
        if let Some(started) = started {
            runs.push((path, started));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, started)| *started);

    let (expired, kept): (Vec<_>, Vec<_>) =
        runs.into_iter().partition(|(_, started)| *started < cutoff_date);
    let excess = kept.len().saturating_sub(retention_runs);

    let mut removed = 0;
    for (path, _) in expired.iter().chain(kept.iter().take(excess)) {
        match std::fs::remove_dir_all(path) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!(
                "Warning: Failed to remove old log directory {}: {}",
                path.display(),
                e
            ),
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn make_run(base: &Path, age_days: i64) -> PathBuf {
        let started = Utc::now() - chrono::Duration::days(age_days);
        let dir = base.join(format!(
            "{}{}",
            RUN_PREFIX,
            started.format(RUN_TIMESTAMP_FORMAT)
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_filter_accepts_flags_and_levels() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        assert!(build_env_filter(&flags, "warning").is_ok());
        assert!(build_env_filter(&CrateDebugFlags::default(), "error").is_ok());
    }

    /// Is `target` enabled at DEBUG under the filter built from `args`?
    fn debug_enabled(args: &[&str], check: impl FnOnce() -> bool) -> bool {
        let flags = CrateDebugFlags::from_args(args.iter().map(|a| a.to_string()));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(build_env_filter(&flags, "info").unwrap())
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::with_default(subscriber, check)
    }

    #[test]
    fn test_umbrella_debug_leaves_member_crates_at_info() {
        let args = ["--debug-contextgraph"];
        assert!(debug_enabled(&args, || tracing::enabled!(
            target: "contextgraph::replay",
            tracing::Level::DEBUG
        )));
        assert!(debug_enabled(&args, || tracing::enabled!(
            target: "replay_frames",
            tracing::Level::DEBUG
        )));
        assert!(!debug_enabled(&args, || tracing::enabled!(
            target: "contextgraph_engine::engine",
            tracing::Level::DEBUG
        )));
        assert!(!debug_enabled(&args, || tracing::enabled!(
            target: "contextgraph_config::loader",
            tracing::Level::DEBUG
        )));
        assert!(debug_enabled(&args, || tracing::enabled!(
            target: "contextgraph_config::loader",
            tracing::Level::INFO
        )));
    }

    #[test]
    fn test_member_debug_flag_is_scoped() {
        let args = ["--debug-contextgraph-engine"];
        assert!(debug_enabled(&args, || tracing::enabled!(
            target: "contextgraph_engine::propagation",
            tracing::Level::DEBUG
        )));
        assert!(!debug_enabled(&args, || tracing::enabled!(
            target: "contextgraph::replay",
            tracing::Level::DEBUG
        )));
    }

    #[cfg(feature = "file-logging")]
    #[test]
    fn test_file_logging_writes_run_directory() {
        let dir = tempdir().unwrap();
        let stale = make_run(dir.path(), 40);

        let guard = init_file_logging(
            &CrateDebugFlags::default(),
            &LoggingOptions::default(),
            Some(dir.path().to_path_buf()),
            Some(30),
            Some(10),
        )
        .unwrap();
        let run_dir = guard.log_dir().to_path_buf();
        tracing::info!(target: "contextgraph_engine::graph", "graph built for file test");
        tracing::info!(target: "contextgraph_config::loader", "config loaded for file test");
        drop(guard);

        assert!(!stale.exists());
        assert!(run_dir.starts_with(dir.path()));
        for crate_name in crate::KNOWN_CRATES {
            assert!(run_dir.join(format!("{}.log", crate_name)).exists());
        }

        let engine_log = std::fs::read_to_string(run_dir.join("contextgraph-engine.log")).unwrap();
        assert!(engine_log.contains("graph built for file test"));
        assert!(!engine_log.contains("config loaded for file test"));
        // The umbrella file does not pick up member crates by prefix
        let umbrella_log = std::fs::read_to_string(run_dir.join("contextgraph.log")).unwrap();
        assert!(!umbrella_log.contains("graph built for file test"));

        let combined_log = std::fs::read_to_string(run_dir.join("combined.log")).unwrap();
        assert!(combined_log.contains("graph built for file test"));
        assert!(combined_log.contains("config loaded for file test"));
    }

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let dir = tempdir().unwrap();
        let removed = cleanup_old_logs(&dir.path().join("nope"), 30, 10).unwrap();
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_cleanup_removes_expired_runs() {
        let dir = tempdir().unwrap();
        let old = make_run(dir.path(), 40);
        let recent = make_run(dir.path(), 1);

        assert_eq!(cleanup_old_logs(dir.path(), 30, 10).unwrap(), 1);
        assert!(!old.exists());
        assert!(recent.exists());
    }

    #[test]
    fn test_cleanup_keeps_newest_runs() {
        let dir = tempdir().unwrap();
        let runs: Vec<PathBuf> = (1..=4).map(|age| make_run(dir.path(), age)).collect();
        let unrelated = dir.path().join("notes");
        std::fs::create_dir_all(&unrelated).unwrap();

        assert_eq!(cleanup_old_logs(dir.path(), 30, 2).unwrap(), 2);
        // runs[0] is the newest (1 day old)
        assert!(runs[0].exists());
        assert!(runs[1].exists());
        assert!(!runs[2].exists());
        assert!(!runs[3].exists());
        assert!(unrelated.exists());
    }
}
