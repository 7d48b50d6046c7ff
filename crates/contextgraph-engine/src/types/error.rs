// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for graph construction

use super::layer::Layer;

/// Fatal defects detected while building an engine.
///
/// Every variant is a construction-time error: once a graph is built, the
/// per-frame operations (inject, step, query) cannot fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Node declaration #{position} has an empty id")]
    EmptyNodeId { position: usize },

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("Edge {from} -> {to} references unknown node: {missing}")]
    UnknownNode {
        from: String,
        to: String,
        missing: String,
    },

    #[error("Edge {from} -> {to} has non-finite weight {weight}")]
    NonFiniteWeight { from: String, to: String, weight: f32 },

    #[error("Edge {from} -> {to} targets a SENSOR node; sensors are written only by injection")]
    EdgeIntoSensor { from: String, to: String },

    #[error("{layer} node {id} has no incoming edges and can never activate")]
    InertNode { id: String, layer: Layer },

    #[error("Invalid propagation parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

pub type Result<T> = core::result::Result<T, ConfigurationError>;
pub type Error = ConfigurationError;
