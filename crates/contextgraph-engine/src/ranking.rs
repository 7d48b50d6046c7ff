// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ranking & Query
//!
//! Read-only views over the activation store. Every view is an owned copy,
//! so consumers can hold on to it across frames without touching engine
//! state.

use core::cmp::Ordering;
use core::ops::Index;

use ahash::AHashMap;
use serde::Serialize;

use crate::graph::GraphModel;
use crate::store::ActivationStore;

/// One entry of the state ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedState {
    pub id: String,
    pub label: String,
    pub value: f32,
}

/// Node id → activation, for every node in the graph
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActivationSnapshot {
    values: AHashMap<String, f32>,
}

impl ActivationSnapshot {
    pub fn get(&self, id: &str) -> Option<f32> {
        self.values.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn into_inner(self) -> AHashMap<String, f32> {
        self.values
    }
}

impl Index<&str> for ActivationSnapshot {
    type Output = f32;

    /// # Panics
    /// Panics if `id` is not a node of the graph.
    fn index(&self, id: &str) -> &f32 {
        &self.values[id]
    }
}

/// Copy every activation into an id-keyed map
pub fn snapshot(graph: &GraphModel, store: &ActivationStore) -> ActivationSnapshot {
    let values = graph
        .nodes()
        .map(|(idx, node)| (node.id.clone(), store.get(idx)))
        .collect();
    ActivationSnapshot { values }
}

/// STATE nodes sorted by activation, highest first.
///
/// The sort is stable over declaration order, so equal activations always
/// come back in the order the states were configured.
pub fn rank_states(graph: &GraphModel, store: &ActivationStore) -> Vec<RankedState> {
    let mut ranked: Vec<RankedState> = graph
        .states()
        .iter()
        .map(|&idx| {
            let node = graph.node(idx);
            RankedState {
                id: node.id.clone(),
                label: node.label.clone(),
                value: store.get(idx),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    ranked
}
