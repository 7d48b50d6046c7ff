// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, ContextGraphConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "context_graph.toml";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "CONTEXT_GRAPH_CONFIG_PATH";

/// Find the configuration file
///
/// Search order:
/// 1. `CONTEXT_GRAPH_CONFIG_PATH` environment variable
/// 2. Current working directory: `./context_graph.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the config file is not found or contains invalid TOML.
/// Value checks are left to [`validate_config`](crate::validate_config).
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<ContextGraphConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: ContextGraphConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `CONTEXT_GRAPH_DECAY` -> `engine.decay`
/// - `CONTEXT_GRAPH_INPUT_GAIN` -> `engine.input_gain`
/// - `CONTEXT_GRAPH_TRANSFER` -> `engine.transfer`
/// - `CONTEXT_GRAPH_LOG_LEVEL` -> `logging.level`
/// - `CONTEXT_GRAPH_LOG_FORMAT` -> `logging.format`
/// - `CONTEXT_GRAPH_LOG_DIR` -> `logging.dir`
/// - `CONTEXT_GRAPH_CONFIDENCE_THRESHOLD` -> `replay.confidence_threshold`
///
/// Values that fail to parse are ignored.
pub fn apply_environment_overrides(config: &mut ContextGraphConfig) {
    if let Some(decay) = env_parse::<f32>("CONTEXT_GRAPH_DECAY") {
        config.engine.decay = decay;
    }
    if let Some(gain) = env_parse::<f32>("CONTEXT_GRAPH_INPUT_GAIN") {
        config.engine.input_gain = gain;
    }
    if let Ok(value) = env::var("CONTEXT_GRAPH_TRANSFER") {
        config.engine.transfer = value;
    }
    if let Ok(value) = env::var("CONTEXT_GRAPH_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("CONTEXT_GRAPH_LOG_FORMAT") {
        config.logging.format = value;
    }
    if let Ok(value) = env::var("CONTEXT_GRAPH_LOG_DIR") {
        config.logging.dir = Some(PathBuf::from(value));
    }
    if let Some(threshold) = env_parse::<f32>("CONTEXT_GRAPH_CONFIDENCE_THRESHOLD") {
        config.replay.confidence_threshold = threshold;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"decay": "0.7", "log_level": "debug"}`)
pub fn apply_cli_overrides(config: &mut ContextGraphConfig, cli_args: &HashMap<String, String>) {
    if let Some(decay) = cli_args.get("decay").and_then(|v| v.parse::<f32>().ok()) {
        config.engine.decay = decay;
    }
    if let Some(gain) = cli_args.get("input_gain").and_then(|v| v.parse::<f32>().ok()) {
        config.engine.input_gain = gain;
    }
    if let Some(value) = cli_args.get("transfer") {
        config.engine.transfer = value.clone();
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.clone();
    }
    if let Some(value) = cli_args.get("log_dir") {
        config.logging.dir = Some(PathBuf::from(value));
    }
    if let Some(threshold) = cli_args
        .get("confidence_threshold")
        .and_then(|v| v.parse::<f32>().ok())
    {
        config.replay.confidence_threshold = threshold;
    }
    if let Some(every) = cli_args.get("report_every").and_then(|v| v.parse::<u64>().ok()) {
        config.replay.report_every = every;
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse::<T>().ok())
}
