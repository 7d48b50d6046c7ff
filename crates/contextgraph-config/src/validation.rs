// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks value ranges, names and graph wiring up front so a bad file is
//! reported in one pass instead of failing at engine construction.

use contextgraph_engine::{ConfigurationError, GraphModel};

use crate::{ConfigError, ConfigResult, ContextGraphConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "warning", "error", "off"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    OutOfRange { field: String, value: String, expected: String },
    InvalidValue { field: String, reason: String },
    Graph(ConfigurationError),
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "{} = {} is outside {}", field, value, expected),
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
            Self::Graph(err) => write!(f, "graph: {}", err),
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Engine parameter ranges and transfer name
/// - Logging level and format names, log retention
/// - Replay threshold and report interval
/// - Graph wiring (custom graphs only)
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &ContextGraphConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_engine(config, &mut errors);
    validate_logging(config, &mut errors);
    validate_replay(config, &mut errors);
    validate_graph(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_engine(config: &ContextGraphConfig, errors: &mut Vec<ConfigValidationError>) {
    let engine = &config.engine;

    if !(engine.decay.is_finite() && (0.0..1.0).contains(&engine.decay)) {
        errors.push(ConfigValidationError::OutOfRange {
            field: "engine.decay".to_string(),
            value: engine.decay.to_string(),
            expected: "[0.0, 1.0)".to_string(),
        });
    }

    if !(engine.input_gain.is_finite() && engine.input_gain > 0.0) {
        errors.push(ConfigValidationError::OutOfRange {
            field: "engine.input_gain".to_string(),
            value: engine.input_gain.to_string(),
            expected: "(0.0, inf)".to_string(),
        });
    }

    match engine.transfer_function() {
        Ok(transfer) => {
            // Range errors are already reported above; only the sigmoid shape is
            // left, checked against the configured decay when that is usable
            let mut params =
                contextgraph_engine::PropagationParams::default().with_transfer(transfer);
            if engine.decay.is_finite() && (0.0..1.0).contains(&engine.decay) {
                params = params.with_decay(engine.decay);
            }
            if let Err(ConfigurationError::InvalidParameter { reason, .. }) = params.validate() {
                errors.push(ConfigValidationError::InvalidValue {
                    field: "engine.sigmoid_*".to_string(),
                    reason,
                });
            }
        }
        Err(_) => errors.push(ConfigValidationError::InvalidValue {
            field: "engine.transfer".to_string(),
            reason: format!("'{}' must be 'linear' or 'sigmoid'", engine.transfer),
        }),
    }
}

fn validate_logging(config: &ContextGraphConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' must be one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let format = config.logging.format.trim().to_ascii_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: format!(
                "'{}' must be one of: {}",
                config.logging.format,
                LOG_FORMATS.join(", ")
            ),
        });
    }

    if config.logging.retention_runs == 0 {
        errors.push(ConfigValidationError::OutOfRange {
            field: "logging.retention_runs".to_string(),
            value: "0".to_string(),
            expected: "[1, inf)".to_string(),
        });
    }
}

fn validate_replay(config: &ContextGraphConfig, errors: &mut Vec<ConfigValidationError>) {
    let threshold = config.replay.confidence_threshold;
    if !(threshold.is_finite() && (0.0..=1.0).contains(&threshold)) {
        errors.push(ConfigValidationError::OutOfRange {
            field: "replay.confidence_threshold".to_string(),
            value: threshold.to_string(),
            expected: "[0.0, 1.0]".to_string(),
        });
    }
    if config.replay.report_every == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "replay.report_every".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
}

fn validate_graph(config: &ContextGraphConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.graph.is_builtin() {
        if !config.graph.edges.is_empty() {
            errors.push(ConfigValidationError::InvalidValue {
                field: "graph.edges".to_string(),
                reason: "edges given without any nodes".to_string(),
            });
        }
        return;
    }
    if let Err(err) = GraphModel::build(&config.graph.descriptor()) {
        errors.push(ConfigValidationError::Graph(err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contextgraph_engine::{EdgeDescriptor, NodeDescriptor};

    fn validation_message(config: &ContextGraphConfig) -> String {
        match validate_config(config) {
            Err(ConfigError::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ContextGraphConfig::default()).is_ok());
    }

    #[test]
    fn test_decay_out_of_range() {
        let mut config = ContextGraphConfig::default();
        config.engine.decay = 1.0;
        let msg = validation_message(&config);
        assert!(msg.contains("engine.decay"));
        assert!(msg.contains("[0.0, 1.0)"));
    }

    #[test]
    fn test_collects_every_problem() {
        let mut config = ContextGraphConfig::default();
        config.engine.input_gain = 0.0;
        config.engine.transfer = "tanh".to_string();
        config.logging.level = "loud".to_string();
        config.replay.confidence_threshold = 1.5;
        config.replay.report_every = 0;

        let msg = validation_message(&config);
        assert!(msg.contains("engine.input_gain"));
        assert!(msg.contains("engine.transfer"));
        assert!(msg.contains("logging.level"));
        assert!(msg.contains("replay.confidence_threshold"));
        assert!(msg.contains("replay.report_every"));
        assert_eq!(msg.lines().count(), 6);
    }

    #[test]
    fn test_bad_sigmoid_shape() {
        let mut config = ContextGraphConfig::default();
        config.engine.transfer = "sigmoid".to_string();
        config.engine.sigmoid_steepness = -1.0;
        let msg = validation_message(&config);
        assert!(msg.contains("engine.sigmoid_*"));
        assert!(msg.contains("steepness"));
    }

    #[test]
    fn test_latching_sigmoid_is_reported() {
        let mut config = ContextGraphConfig::default();
        config.engine.transfer = "sigmoid".to_string();
        config.engine.sigmoid_steepness = 12.0;
        // Drains at the default decay of 0.5
        assert!(validate_config(&config).is_ok());

        config.engine.decay = 0.9;
        let msg = validation_message(&config);
        assert!(msg.contains("engine.sigmoid_*"));
        assert!(msg.contains("latches"));
    }

    #[test]
    fn test_log_format_and_retention() {
        let mut config = ContextGraphConfig::default();
        config.logging.format = "JSON".to_string();
        assert!(validate_config(&config).is_ok());

        config.logging.format = "xml".to_string();
        config.logging.retention_runs = 0;
        let msg = validation_message(&config);
        assert!(msg.contains("logging.format"));
        assert!(msg.contains("logging.retention_runs"));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = ContextGraphConfig::default();
        config.logging.level = "WARNING".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_custom_graph_wiring_is_checked() {
        let mut config = ContextGraphConfig::default();
        config.graph.nodes = vec![
            NodeDescriptor::sensor("IN_A", ""),
            NodeDescriptor::state("ST_A", ""),
        ];
        config.graph.edges = vec![EdgeDescriptor::new("IN_A", "ST_MISSING", 1.0)];

        let msg = validation_message(&config);
        assert!(msg.contains("graph:"));
        assert!(msg.contains("ST_MISSING"));
    }

    #[test]
    fn test_edges_without_nodes() {
        let mut config = ContextGraphConfig::default();
        config.graph.edges = vec![EdgeDescriptor::new("IN_A", "ST_A", 1.0)];
        let msg = validation_message(&config);
        assert!(msg.contains("graph.edges"));
    }
}
