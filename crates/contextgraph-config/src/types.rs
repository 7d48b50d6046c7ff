// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `context_graph.toml`.

use contextgraph_engine::{
    gesture_graph, EdgeDescriptor, GraphDescriptor, NodeDescriptor, PropagationParams,
    TransferFunction,
};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContextGraphConfig {
    pub engine: EngineConfig,
    pub graph: GraphConfig,
    pub logging: LoggingConfig,
    pub replay: ReplayConfig,
}

/// Propagation parameters, flattened for hand-written TOML
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub decay: f32,
    pub input_gain: f32,
    /// `"linear"` or `"sigmoid"`
    pub transfer: String,
    pub sigmoid_steepness: f32,
    pub sigmoid_midpoint: f32,
    pub sigmoid_floor: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let params = PropagationParams::default();
        Self {
            decay: params.decay,
            input_gain: params.input_gain,
            transfer: params.transfer.name().to_string(),
            // Only read when transfer = "sigmoid"
            sigmoid_steepness: 6.0,
            sigmoid_midpoint: 0.5,
            sigmoid_floor: 0.1,
        }
    }
}

impl EngineConfig {
    /// Resolve the transfer name into a [`TransferFunction`]
    pub fn transfer_function(&self) -> ConfigResult<TransferFunction> {
        match self.transfer.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(TransferFunction::Linear),
            "sigmoid" => Ok(TransferFunction::Sigmoid {
                steepness: self.sigmoid_steepness,
                midpoint: self.sigmoid_midpoint,
                floor: self.sigmoid_floor,
            }),
            other => Err(ConfigError::InvalidValue(format!(
                "engine.transfer must be 'linear' or 'sigmoid', got '{}'",
                other
            ))),
        }
    }

    /// Engine parameters; range checks happen when the engine is built
    pub fn propagation_params(&self) -> ConfigResult<PropagationParams> {
        Ok(PropagationParams::new()
            .with_decay(self.decay)
            .with_input_gain(self.input_gain)
            .with_transfer(self.transfer_function()?))
    }
}

/// Graph topology; an empty node list selects the built-in gesture graph
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphConfig {
    pub nodes: Vec<NodeDescriptor>,
    pub edges: Vec<EdgeDescriptor>,
}

impl GraphConfig {
    pub fn is_builtin(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn descriptor(&self) -> GraphDescriptor {
        if self.is_builtin() {
            gesture_graph()
        } else {
            GraphDescriptor {
                nodes: self.nodes.clone(),
                edges: self.edges.clone(),
            }
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`
    pub level: String,
    /// Console format, `"text"` or `"json"`
    pub format: String,
    pub with_target: bool,
    /// Base directory for per-run log files (needs the `file-logging` feature)
    pub dir: Option<PathBuf>,
    pub retention_days: u64,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            with_target: false,
            dir: None,
            retention_days: 30,
            retention_runs: 10,
        }
    }
}

/// Settings for the frame replay tool
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Minimum top-state activation reported as a detection
    pub confidence_threshold: f32,
    /// Emit one line every N frames
    pub report_every: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.55,
            report_every: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contextgraph_engine::Layer;

    #[test]
    fn test_defaults_match_engine_defaults() {
        let config = ContextGraphConfig::default();
        let params = config.engine.propagation_params().unwrap();
        assert_eq!(params, PropagationParams::default());
        assert_eq!(config.replay.confidence_threshold, 0.55);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_sigmoid_transfer_uses_section_values() {
        let engine = EngineConfig {
            transfer: "Sigmoid".to_string(),
            sigmoid_steepness: 4.0,
            ..EngineConfig::default()
        };
        assert_eq!(
            engine.transfer_function().unwrap(),
            TransferFunction::Sigmoid {
                steepness: 4.0,
                midpoint: 0.5,
                floor: 0.1
            }
        );
    }

    #[test]
    fn test_unknown_transfer_is_rejected() {
        let engine = EngineConfig {
            transfer: "relu".to_string(),
            ..EngineConfig::default()
        };
        assert!(matches!(
            engine.propagation_params(),
            Err(ConfigError::InvalidValue(msg)) if msg.contains("relu")
        ));
    }

    #[test]
    fn test_empty_graph_selects_builtin() {
        let graph = GraphConfig::default();
        assert!(graph.is_builtin());
        assert_eq!(graph.descriptor(), gesture_graph());
    }

    #[test]
    fn test_graph_section_parses_from_toml() {
        let config: ContextGraphConfig = toml::from_str(
            r#"
            [[graph.nodes]]
            id = "IN_A"
            layer = "sensor"

            [[graph.nodes]]
            id = "ST_A"
            layer = "STATE"
            label = "Alpha"

            [[graph.edges]]
            source = "IN_A"
            target = "ST_A"
            weight = 0.7
            "#,
        )
        .unwrap();

        let desc = config.graph.descriptor();
        assert_eq!(desc.nodes.len(), 2);
        assert_eq!(desc.nodes[0].layer, Layer::Sensor);
        assert_eq!(desc.nodes[1].label, "Alpha");
        assert_eq!(desc.edges[0].weight, 0.7);
        assert_eq!(config.engine, EngineConfig::default());
    }
}
