// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Graph Model
//!
//! Immutable, validated topology. Nodes live in a dense arena addressed by
//! [`NodeIndex`]; incoming edges are flattened into one array grouped by
//! target (CSR layout) so the propagation step walks contiguous memory and
//! never scans the edge list.
//!
//! ```text
//! incoming_offsets: [0, 0, 2, 3, ...]        (len = nodes + 1)
//! incoming:         [(src, w), (src, w), ...] grouped by target
//! ```

use ahash::AHashMap;
use tracing::{debug, info};

use crate::edge::EdgeKind;
use crate::types::{ConfigurationError, GraphDescriptor, Layer, NodeIndex, Result};

/// One validated node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub layer: Layer,
    pub label: String,
}

/// One incoming edge as seen from its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomingEdge {
    pub source: NodeIndex,
    pub weight: f32,
}

impl IncomingEdge {
    pub fn kind(&self) -> EdgeKind {
        EdgeKind::of(self.weight)
    }
}

/// Validated, immutable node/edge topology
#[derive(Debug, Clone)]
pub struct GraphModel {
    nodes: Vec<Node>,
    index: AHashMap<String, NodeIndex>,
    incoming_offsets: Vec<usize>,
    incoming: Vec<IncomingEdge>,
    sensors: Vec<NodeIndex>,
    propagated: Vec<NodeIndex>,
    states: Vec<NodeIndex>,
    inhibitory_edges: usize,
}

impl GraphModel {
    /// Validate a descriptor and build the arena.
    ///
    /// # Errors
    /// - `EmptyNodeId` / `DuplicateNode` for bad node declarations
    /// - `NonFiniteWeight`, `UnknownNode`, `EdgeIntoSensor` for bad edges
    /// - `InertNode` for a FEATURE/STATE node without any incoming edge
    pub fn build(descriptor: &GraphDescriptor) -> Result<Self> {
        let node_count = descriptor.nodes.len();
        let mut nodes = Vec::with_capacity(node_count);
        let mut index: AHashMap<String, NodeIndex> = AHashMap::with_capacity(node_count);
        let mut sensors = Vec::new();
        let mut propagated = Vec::new();
        let mut states = Vec::new();

        for (position, decl) in descriptor.nodes.iter().enumerate() {
            if decl.id.trim().is_empty() {
                return Err(ConfigurationError::EmptyNodeId { position });
            }
            let idx = NodeIndex(position as u32);
            if index.insert(decl.id.clone(), idx).is_some() {
                return Err(ConfigurationError::DuplicateNode(decl.id.clone()));
            }

            if decl.layer.accepts_injection() {
                sensors.push(idx);
            }
            if decl.layer.is_propagated() {
                propagated.push(idx);
            }
            if decl.layer.is_ranked() {
                states.push(idx);
            }

            let label = if decl.label.is_empty() {
                decl.id.clone()
            } else {
                decl.label.clone()
            };
            nodes.push(Node {
                id: decl.id.clone(),
                layer: decl.layer,
                label,
            });
        }

        // Resolve edges, then bucket them by target (counting sort keeps
        // declaration order within each bucket)
        let mut resolved = Vec::with_capacity(descriptor.edges.len());
        let mut in_degree = vec![0usize; node_count];
        let mut inhibitory_edges = 0;

        for edge in &descriptor.edges {
            if !edge.weight.is_finite() {
                return Err(ConfigurationError::NonFiniteWeight {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    weight: edge.weight,
                });
            }
            let lookup = |id: &str| {
                index
                    .get(id)
                    .copied()
                    .ok_or_else(|| ConfigurationError::UnknownNode {
                        from: edge.source.clone(),
                        to: edge.target.clone(),
                        missing: id.to_string(),
                    })
            };
            let source = lookup(&edge.source)?;
            let target = lookup(&edge.target)?;

            if !nodes[target.as_usize()].layer.is_propagated() {
                return Err(ConfigurationError::EdgeIntoSensor {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                });
            }
            if edge.kind() == EdgeKind::Inhibitory {
                inhibitory_edges += 1;
            }

            in_degree[target.as_usize()] += 1;
            resolved.push((source, target, edge.weight));
        }

        for &idx in &propagated {
            if in_degree[idx.as_usize()] == 0 {
                let node = &nodes[idx.as_usize()];
                return Err(ConfigurationError::InertNode {
                    id: node.id.clone(),
                    layer: node.layer,
                });
            }
        }

        let mut incoming_offsets = Vec::with_capacity(node_count + 1);
        let mut running = 0;
        incoming_offsets.push(0);
        for degree in &in_degree {
            running += degree;
            incoming_offsets.push(running);
        }

        let mut cursor: Vec<usize> = incoming_offsets[..node_count].to_vec();
        let mut incoming = vec![
            IncomingEdge {
                source: NodeIndex(0),
                weight: 0.0,
            };
            resolved.len()
        ];
        for (source, target, weight) in resolved {
            let slot = &mut cursor[target.as_usize()];
            incoming[*slot] = IncomingEdge { source, weight };
            *slot += 1;
        }

        let graph = Self {
            nodes,
            index,
            incoming_offsets,
            incoming,
            sensors,
            propagated,
            states,
            inhibitory_edges,
        };

        let per_layer: Vec<String> = Layer::ALL
            .iter()
            .map(|layer| format!("{} {}", graph.layer_count(*layer), layer))
            .collect();
        info!(
            "[GRAPH] Built context graph: {} nodes ({}), {} edges ({} inhibitory)",
            graph.len(),
            per_layer.join(", "),
            graph.edge_count(),
            graph.inhibitory_edge_count()
        );
        for (idx, node) in graph.nodes() {
            debug!(
                "[GRAPH]   {} {:<16} in-degree={}",
                node.layer,
                node.id,
                graph.incoming(idx).len()
            );
        }

        Ok(graph)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.incoming.len()
    }

    pub fn inhibitory_edge_count(&self) -> usize {
        self.inhibitory_edges
    }

    pub fn layer_count(&self, layer: Layer) -> usize {
        match layer {
            Layer::Sensor => self.sensors.len(),
            Layer::Feature => self.propagated.len() - self.states.len(),
            Layer::State => self.states.len(),
        }
    }

    /// Resolve a node id to its dense index
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// # Panics
    /// Panics if `idx` did not come from this graph.
    pub fn node(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.as_usize()]
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|idx| self.node(idx))
    }

    pub fn layer_of(&self, id: &str) -> Option<Layer> {
        self.get(id).map(|n| n.layer)
    }

    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(|n| n.label.as_str())
    }

    /// Incoming edges of `idx`, in declaration order
    #[inline(always)]
    pub fn incoming(&self, idx: NodeIndex) -> &[IncomingEdge] {
        let i = idx.as_usize();
        &self.incoming[self.incoming_offsets[i]..self.incoming_offsets[i + 1]]
    }

    /// Nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeIndex(i as u32), n))
    }

    /// SENSOR nodes in declaration order
    pub fn sensors(&self) -> &[NodeIndex] {
        &self.sensors
    }

    /// FEATURE and STATE nodes in declaration order
    pub fn propagated(&self) -> &[NodeIndex] {
        &self.propagated
    }

    /// STATE nodes in declaration order
    pub fn states(&self) -> &[NodeIndex] {
        &self.states
    }
}
