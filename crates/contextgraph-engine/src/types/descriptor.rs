// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration-time descriptors for nodes, edges and whole graphs.
//!
//! Descriptors are plain data: they are what a configuration file or a
//! built-in topology produces, and they are only checked when handed to
//! [`GraphModel::build`](crate::GraphModel::build).

use serde::{Deserialize, Serialize};

use super::layer::Layer;
use crate::edge::EdgeKind;

/// One node declaration: `{id, layer, label}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: String,
    pub layer: Layer,
    /// Display name; falls back to `id` when empty
    #[serde(default)]
    pub label: String,
}

impl NodeDescriptor {
    pub fn new(id: impl Into<String>, layer: Layer, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            layer,
            label: label.into(),
        }
    }

    pub fn sensor(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, Layer::Sensor, label)
    }

    pub fn feature(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, Layer::Feature, label)
    }

    pub fn state(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, Layer::State, label)
    }
}

/// One directed, signed edge declaration: `{source, target, weight}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    pub source: String,
    pub target: String,
    pub weight: f32,
}

impl EdgeDescriptor {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f32) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }

    pub fn kind(&self) -> EdgeKind {
        EdgeKind::of(self.weight)
    }
}

/// Ordered node and edge declarations for one graph.
///
/// Node order matters: it fixes the dense index of every node and therefore
/// the tie-break order of the state ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDescriptor {
    #[serde(default)]
    pub nodes: Vec<NodeDescriptor>,
    #[serde(default)]
    pub edges: Vec<EdgeDescriptor>,
}

impl GraphDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node declaration (builder style)
    pub fn node(mut self, id: impl Into<String>, layer: Layer, label: impl Into<String>) -> Self {
        self.nodes.push(NodeDescriptor::new(id, layer, label));
        self
    }

    /// Append an edge declaration (builder style)
    pub fn edge(mut self, source: impl Into<String>, target: impl Into<String>, weight: f32) -> Self {
        self.edges.push(EdgeDescriptor::new(source, target, weight));
        self
    }

    /// Declare a symmetric mutual-inhibition pair `a ⊣⊢ b`
    pub fn mutual_inhibition(self, a: &str, b: &str, weight: f32) -> Self {
        let weight = -weight.abs();
        self.edge(a, b, weight).edge(b, a, weight)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
