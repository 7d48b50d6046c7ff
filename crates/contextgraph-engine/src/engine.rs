// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Context Engine
//!
//! Caller-owned engine value tying the graph model, the activation store and
//! the propagation step together.
//!
//! ## Frame Protocol
//! ```text
//! inject(sensors) ─► step() ─► snapshot() / ranked_states()
//! ```
//! The engine is single-threaded by contract: one driver calls these in
//! sequence once per frame. There is no internal locking and no I/O.

use serde::Serialize;
use tracing::debug;

use crate::graph::GraphModel;
use crate::models::{LeakyIntegrator, PropagationParams};
use crate::propagation::{propagate, PropagationStats};
use crate::ranking::{rank_states, snapshot, ActivationSnapshot, RankedState};
use crate::store::ActivationStore;
use crate::topology::gesture_graph;
use crate::types::{GraphDescriptor, Result};

/// Result of one propagation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Frame number of the step just completed (first step is 1)
    pub frame: u64,
    #[serde(flatten)]
    pub stats: PropagationStats,
}

/// Activation-propagation engine over a fixed graph
#[derive(Debug, Clone)]
pub struct ContextEngine {
    graph: GraphModel,
    store: ActivationStore,
    model: LeakyIntegrator,
    frame: u64,
}

impl ContextEngine {
    /// Validate `params` and `descriptor`, then build an engine with every
    /// activation at `0.0`.
    pub fn new(descriptor: &GraphDescriptor, params: PropagationParams) -> Result<Self> {
        params.validate()?;
        let graph = GraphModel::build(descriptor)?;
        let store = ActivationStore::new(graph.len());

        debug!(
            "[ENGINE] decay={} input_gain={} transfer={}",
            params.decay,
            params.input_gain,
            params.transfer.name()
        );

        Ok(Self {
            graph,
            store,
            model: LeakyIntegrator::new(params),
            frame: 0,
        })
    }

    /// Engine over the built-in gesture graph with default parameters
    pub fn gesture() -> Result<Self> {
        Self::new(&gesture_graph(), PropagationParams::default())
    }

    /// Overwrite sensor activations for this frame.
    ///
    /// Unknown and non-sensor keys are ignored; values are clamped into
    /// `[0, 1]`. Returns the number of sensor values applied.
    pub fn inject<I, K>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = (K, f32)>,
        K: AsRef<str>,
    {
        self.store.inject(&self.graph, values)
    }

    /// Advance one frame
    pub fn step(&mut self) -> StepReport {
        let (previous, next) = self.store.begin_step();
        let stats = propagate(&self.graph, &self.model, previous, next);
        self.frame += 1;

        debug!(
            "[PROPAGATION] frame={} nodes={} edges={} saturated={} suppressed={}",
            self.frame,
            stats.nodes_updated,
            stats.edges_evaluated,
            stats.saturated,
            stats.suppressed
        );

        StepReport {
            frame: self.frame,
            stats,
        }
    }

    /// `inject` followed by `step`
    pub fn tick<I, K>(&mut self, values: I) -> StepReport
    where
        I: IntoIterator<Item = (K, f32)>,
        K: AsRef<str>,
    {
        self.inject(values);
        self.step()
    }

    pub fn snapshot(&self) -> ActivationSnapshot {
        snapshot(&self.graph, &self.store)
    }

    pub fn ranked_states(&self) -> Vec<RankedState> {
        rank_states(&self.graph, &self.store)
    }

    /// Current activation of one node; `None` for unknown ids
    pub fn activation(&self, id: &str) -> Option<f32> {
        self.graph.index_of(id).map(|idx| self.store.get(idx))
    }

    /// Zero every activation and the frame counter; the graph is kept
    pub fn reset(&mut self) {
        self.store.reset();
        self.frame = 0;
        debug!("[ENGINE] Activations reset");
    }

    /// Steps run since construction or the last reset
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn params(&self) -> &PropagationParams {
        self.model.params()
    }
}
