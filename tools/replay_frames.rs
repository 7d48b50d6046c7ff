// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Replay recorded sensor frames through a context graph.
//!
//! Reads newline-delimited JSON frames from a file or stdin, steps the engine
//! once per frame and prints the dominant context as JSON lines on stdout.
//! Logs go to stderr, and with the `file-logging` feature also to per-run
//! JSON files under `--log-dir`.

use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use contextgraph::config::{
    find_config_file, load_config, ConfigError, ContextGraphConfig, LoggingConfig,
};
use contextgraph::observability::{
    debug_flags_help, init_console_logging, parse_debug_flags, CrateDebugFlags, LoggingOptions,
};
use contextgraph::replay::{replay, ReplayOptions};
use contextgraph::{build_engine, logging_options};
use tracing::info;

struct Args {
    config: Option<PathBuf>,
    frames: Option<PathBuf>,
    overrides: HashMap<String, String>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: replay_frames [--config <path>] [--frames <path>] [--every <n>]\n\
         \x20                    [--threshold <x>] [--decay <x>] [--log-level <level>]\n\
         \x20                    [--log-format text|json] [--log-dir <path>]\n\
         \x20                    [--debug-<crate>|--debug-all]\n\n\
         Reads NDJSON sensor frames from --frames (default: stdin).\n\
         Without --config, context_graph.toml is searched for and the\n\
         built-in gesture graph with default parameters is used if none is found.\n\n\
         {}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let mut parsed = Args {
        config: None,
        frames: None,
        overrides: HashMap::new(),
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().unwrap_or_else(|| usage_and_exit());
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(value())),
            "--frames" => parsed.frames = Some(PathBuf::from(value())),
            "--every" => {
                parsed.overrides.insert("report_every".to_string(), value());
            }
            "--threshold" => {
                parsed.overrides.insert("confidence_threshold".to_string(), value());
            }
            "--decay" => {
                parsed.overrides.insert("decay".to_string(), value());
            }
            "--log-level" => {
                parsed.overrides.insert("log_level".to_string(), value());
            }
            "--log-format" => {
                parsed.overrides.insert("log_format".to_string(), value());
            }
            "--log-dir" => {
                parsed.overrides.insert("log_dir".to_string(), value());
            }
            "-h" | "--help" => usage_and_exit(),
            other if other.starts_with("--debug-") => {}
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }

    parsed
}

fn resolve_config(args: &Args) -> Result<ContextGraphConfig> {
    if let Some(path) = &args.config {
        return load_config(Some(path), Some(&args.overrides))
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    match find_config_file() {
        Ok(path) => load_config(Some(&path), Some(&args.overrides))
            .with_context(|| format!("Failed to load config {}", path.display())),
        Err(ConfigError::FileNotFound(_)) => {
            let mut config = ContextGraphConfig::default();
            contextgraph::config::apply_environment_overrides(&mut config);
            contextgraph::config::apply_cli_overrides(&mut config, &args.overrides);
            Ok(config)
        }
        Err(e) => Err(e.into()),
    }
}

/// Console logging, plus per-run files when `[logging] dir` is set
#[cfg(feature = "file-logging")]
fn init_tool_logging(
    logging: &LoggingConfig,
    debug_flags: &CrateDebugFlags,
    options: &LoggingOptions,
) -> Result<Option<contextgraph::observability::LoggingGuard>> {
    let Some(dir) = &logging.dir else {
        init_console_logging(debug_flags, options)?;
        return Ok(None);
    };

    let guard = contextgraph::observability::init_file_logging(
        debug_flags,
        options,
        Some(dir.clone()),
        Some(logging.retention_days),
        Some(logging.retention_runs),
    )?;
    info!("[REPLAY] Writing logs to {}", guard.log_dir().display());
    Ok(Some(guard))
}

#[cfg(not(feature = "file-logging"))]
fn init_tool_logging(
    logging: &LoggingConfig,
    debug_flags: &CrateDebugFlags,
    options: &LoggingOptions,
) -> Result<()> {
    if let Some(dir) = &logging.dir {
        anyhow::bail!(
            "Logging to {} requires building with --features file-logging",
            dir.display()
        );
    }
    init_console_logging(debug_flags, options)
}

fn main() -> Result<()> {
    let args = parse_args();
    let config = resolve_config(&args)?;

    let debug_flags = parse_debug_flags();
    let log_options = logging_options(&config.logging)?;
    #[cfg(feature = "file-logging")]
    let _log_guard = init_tool_logging(&config.logging, &debug_flags, &log_options)?;
    #[cfg(not(feature = "file-logging"))]
    init_tool_logging(&config.logging, &debug_flags, &log_options)?;

    let mut engine = build_engine(&config).context("Failed to build engine")?;
    let options = ReplayOptions::from(&config.replay);

    let stdout = io::stdout();
    let summary = match &args.frames {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open frames file {}", path.display()))?;
            replay(&mut engine, BufReader::new(file), stdout.lock(), &options)?
        }
        None => replay(&mut engine, io::stdin().lock(), stdout.lock(), &options)?,
    };

    info!(
        "[REPLAY] Done: {} frames, {} reported, {} confident, {} skipped",
        summary.frames, summary.reported, summary.confident, summary.skipped
    );

    Ok(())
}
