// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! # Propagation Step
//!
//! One synchronous frame of activation propagation.
//!
//! ## Algorithm
//! 1. `previous` holds every activation as of the end of injection
//! 2. For every FEATURE/STATE node `n`:
//!    `raw(n) = decay × previous[n] + gain × Σ weight_e × previous[source_e]`
//! 3. `next[n] = clamp(transfer(raw(n)), 0, 1)`
//! 4. SENSOR nodes are copied through untouched
//!
//! Every right-hand-side term reads `previous`, never `next`. Two nodes that
//! inhibit each other with equal weights and equal activations therefore
//! stay exactly equal, independent of iteration order; any asymmetry is
//! amplified by the inhibition until one node wins.
//!
//! Cost is O(edges) with no allocation: the caller owns both buffers.

use std::sync::OnceLock;

use serde::Serialize;
use tracing::trace;

use crate::edge::compute_edge_contribution;
use crate::graph::GraphModel;
use crate::models::LeakyIntegrator;

/// Runtime-gated tracing config for the propagation step.
/// Enable with:
/// - CONTEXT_GRAPH_TRACE_STEP=1
///   Optional filter:
/// - CONTEXT_GRAPH_TRACE_NODE=<node id>
struct StepTraceCfg {
    enabled: bool,
    node_filter: Option<String>,
}

fn step_trace_cfg() -> &'static StepTraceCfg {
    static CFG: OnceLock<StepTraceCfg> = OnceLock::new();
    CFG.get_or_init(|| {
        let enabled = std::env::var("CONTEXT_GRAPH_TRACE_STEP")
            .ok()
            .as_deref()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let node_filter = std::env::var("CONTEXT_GRAPH_TRACE_NODE")
            .ok()
            .filter(|v| !v.is_empty());

        StepTraceCfg {
            enabled,
            node_filter,
        }
    })
}

/// Counters for one propagation step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PropagationStats {
    /// FEATURE/STATE nodes recomputed
    pub nodes_updated: usize,
    /// Incoming edges read
    pub edges_evaluated: usize,
    /// Nodes committed at the 1.0 ceiling
    pub saturated: usize,
    /// Nodes whose raw value was driven below 0.0 and clamped to zero
    pub suppressed: usize,
}

/// Run one synchronous propagation step.
///
/// `previous` and `next` are indexed by `NodeIndex` and must both have
/// `graph.len()` entries. SENSOR entries of `next` are overwritten with
/// their `previous` values.
pub fn propagate(
    graph: &GraphModel,
    model: &LeakyIntegrator,
    previous: &[f32],
    next: &mut [f32],
) -> PropagationStats {
    debug_assert_eq!(previous.len(), graph.len());
    debug_assert_eq!(next.len(), graph.len());

    let trace_cfg = step_trace_cfg();
    let mut stats = PropagationStats::default();

    for &sensor in graph.sensors() {
        next[sensor.as_usize()] = previous[sensor.as_usize()];
    }

    for &idx in graph.propagated() {
        let incoming = graph.incoming(idx);
        let mut input_sum = 0.0f32;
        for edge in incoming {
            input_sum += compute_edge_contribution(edge.weight, previous[edge.source.as_usize()]);
        }

        let prev = previous[idx.as_usize()];
        let (value, raw) = model.update_activation(prev, input_sum);
        next[idx.as_usize()] = value;

        stats.nodes_updated += 1;
        stats.edges_evaluated += incoming.len();
        if value >= 1.0 {
            stats.saturated += 1;
        } else if raw < 0.0 {
            stats.suppressed += 1;
        }

        if trace_cfg.enabled {
            let node = graph.node(idx);
            let allow = trace_cfg
                .node_filter
                .as_deref()
                .map(|id| id == node.id)
                .unwrap_or(true);
            if allow {
                trace!(
                    target: "contextgraph-step-trace",
                    "[STEP] node={} layer={} prev={:.4} input={:.4} raw={:.4} next={:.4} edges={}",
                    node.id,
                    node.layer,
                    prev,
                    input_sum,
                    raw,
                    value,
                    incoming.len()
                );
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PropagationParams, TransferFunction};
    use crate::types::{GraphDescriptor, Layer};

    fn chain() -> GraphModel {
        GraphModel::build(
            &GraphDescriptor::new()
                .node("IN_A", Layer::Sensor, "")
                .node("FT_A", Layer::Feature, "")
                .node("ST_A", Layer::State, "")
                .edge("IN_A", "FT_A", 0.8)
                .edge("FT_A", "ST_A", 1.0),
        )
        .unwrap()
    }

    #[test]
    fn test_one_layer_per_step() {
        let graph = chain();
        let model = LeakyIntegrator::default();
        let previous = [1.0, 0.0, 0.0];
        let mut next = [0.0; 3];

        let stats = propagate(&graph, &model, &previous, &mut next);

        // Sensor copied, feature fed by the sensor, state still waiting for
        // the feature to become active in `previous`
        assert_eq!(next[0], 1.0);
        assert!((next[1] - 0.8).abs() < 1e-6);
        assert_eq!(next[2], 0.0);
        assert_eq!(stats.nodes_updated, 2);
        assert_eq!(stats.edges_evaluated, 2);
    }

    #[test]
    fn test_stats_count_saturation_and_suppression() {
        let graph = GraphModel::build(
            &GraphDescriptor::new()
                .node("IN_A", Layer::Sensor, "")
                .node("FT_UP", Layer::Feature, "")
                .node("FT_DOWN", Layer::Feature, "")
                .edge("IN_A", "FT_UP", 2.0)
                .edge("IN_A", "FT_DOWN", -2.0),
        )
        .unwrap();
        let model = LeakyIntegrator::new(PropagationParams::default());
        let previous = [1.0, 0.0, 0.5];
        let mut next = [0.0; 3];

        let stats = propagate(&graph, &model, &previous, &mut next);
        assert_eq!(next, [1.0, 1.0, 0.0]);
        assert_eq!(stats.saturated, 1);
        assert_eq!(stats.suppressed, 1);
    }

    #[test]
    fn test_sigmoid_below_ceiling_is_not_saturated() {
        let graph = GraphModel::build(
            &GraphDescriptor::new()
                .node("IN_A", Layer::Sensor, "")
                .node("FT_UP", Layer::Feature, "")
                .edge("IN_A", "FT_UP", 2.0),
        )
        .unwrap();
        let model = LeakyIntegrator::new(
            PropagationParams::default().with_transfer(TransferFunction::default_sigmoid()),
        );
        let previous = [1.0, 0.0];
        let mut next = [0.0; 2];

        // raw 2.0 -> sigmoid(9) = 0.99988
        let stats = propagate(&graph, &model, &previous, &mut next);
        assert!(next[1] > 0.999 && next[1] < 1.0);
        assert_eq!(stats.saturated, 0);
    }

    #[test]
    fn test_step_reads_only_previous_buffer() {
        // Cycle A ⊣ B, B ⊣ A: updating A first must not leak into B
        let graph = GraphModel::build(
            &GraphDescriptor::new()
                .node("ST_A", Layer::State, "")
                .node("ST_B", Layer::State, "")
                .mutual_inhibition("ST_A", "ST_B", 0.4),
        )
        .unwrap();
        let model = LeakyIntegrator::default();
        let previous = [0.5, 0.5];
        let mut next = [0.0; 2];

        propagate(&graph, &model, &previous, &mut next);
        assert_eq!(next[0], next[1]);
        // 0.5 * 0.5 - 0.4 * 0.5
        assert!((next[0] - 0.05).abs() < 1e-6);
    }
}
