// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Activation Store
//!
//! The engine's only mutable state: one `f32` per node, indexed by
//! [`NodeIndex`], plus a second buffer holding the previous frame so the
//! propagation step can read a consistent snapshot without allocating.

use tracing::trace;

use crate::graph::GraphModel;
use crate::models::clamp_unit;
use crate::types::{Layer, NodeIndex};

#[derive(Debug, Clone)]
pub struct ActivationStore {
    current: Vec<f32>,
    previous: Vec<f32>,
}

impl ActivationStore {
    /// All activations start at `0.0`
    pub fn new(len: usize) -> Self {
        Self {
            current: vec![0.0; len],
            previous: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    #[inline(always)]
    pub fn get(&self, idx: NodeIndex) -> f32 {
        self.current[idx.as_usize()]
    }

    /// Current activations, indexed by `NodeIndex`
    pub fn values(&self) -> &[f32] {
        &self.current
    }

    /// Overwrite SENSOR activations from an external frame.
    ///
    /// Keys naming unknown or non-sensor nodes are skipped. Values are
    /// clamped into `[0, 1]` (NaN becomes `0.0`). Sensors missing from
    /// `values` keep their previous activation.
    ///
    /// Returns the number of sensor values written.
    pub fn inject<I, K>(&mut self, graph: &GraphModel, values: I) -> usize
    where
        I: IntoIterator<Item = (K, f32)>,
        K: AsRef<str>,
    {
        let mut applied = 0;
        for (key, value) in values {
            let key = key.as_ref();
            let Some(idx) = graph.index_of(key) else {
                trace!("[INJECT] Ignoring unknown sensor key {}", key);
                continue;
            };
            match graph.node(idx).layer {
                Layer::Sensor => {
                    self.current[idx.as_usize()] = clamp_unit(value);
                    applied += 1;
                }
                layer @ (Layer::Feature | Layer::State) => {
                    trace!("[INJECT] Ignoring write to {} node {}", layer, key);
                }
            }
        }
        applied
    }

    /// Copy current activations into the previous-frame buffer and hand out
    /// `(previous, current)` for one synchronous step.
    pub(crate) fn begin_step(&mut self) -> (&[f32], &mut [f32]) {
        self.previous.copy_from_slice(&self.current);
        (&self.previous, &mut self.current)
    }

    /// Zero every activation
    pub fn reset(&mut self) {
        self.current.fill(0.0);
        self.previous.fill(0.0);
    }
}
