// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Edge contribution calculation
//!
//! Pure functions for computing how much one source node pushes its target.

/// Edge kind, derived from the sign of the weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Excitatory = 0,
    Inhibitory = 1,
}

impl EdgeKind {
    /// Classify a signed weight. Zero counts as excitatory (it has no effect).
    #[inline]
    pub fn of(weight: f32) -> Self {
        if weight < 0.0 {
            EdgeKind::Inhibitory
        } else {
            EdgeKind::Excitatory
        }
    }
}

/// Calculate one edge's contribution to its target
///
/// `contribution = weight × source_activation`
///
/// The weight already carries the sign, so inhibitory edges yield negative
/// contributions. No normalization is applied: configuration authors size
/// inhibitory weights (e.g. `-2.0` for YES ⊣⊢ NO) relative to feed-forward
/// weights themselves.
///
/// # Example
/// ```
/// use contextgraph_engine::edge::compute_edge_contribution;
///
/// assert_eq!(compute_edge_contribution(0.9, 1.0), 0.9);
/// assert_eq!(compute_edge_contribution(-2.0, 0.5), -1.0);
/// ```
#[inline(always)]
pub fn compute_edge_contribution(weight: f32, source_activation: f32) -> f32 {
    weight * source_activation
}
