// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Leaky Integrator Activation Model
//!
//! Every FEATURE and STATE node is a leaky integrator with saturation.
//!
//! ## Model Dynamics
//!
//! ```text
//! Edge Contribution (per incoming edge):
//!     contribution = weight × prev[source]
//!
//! Activation Update:
//!     I(t)   = Σ contribution for all incoming edges
//!     raw    = decay × prev[n] + gain × I(t)
//!     a(t+1) = clamp(transfer(raw), 0, 1)
//!
//!     Where:
//!     - decay    = retained fraction of the previous activation, in [0, 1)
//!     - gain     = input gain (1.0 reproduces the plain weighted sum)
//!     - transfer = identity (linear) or a thresholded sigmoid
//! ```
//!
//! Without excitatory input an activation shrinks geometrically by `decay`
//! per frame; inhibition can drive it to zero but never below. Sigmoid shapes
//! that would hold a node above `floor` without input are rejected by
//! [`PropagationParams::validate`].

use crate::types::{ConfigurationError, Result};
use serde::{Deserialize, Serialize};

/// Zero-input frames a fully active node gets to reach the linear region
/// under sigmoid transfer
const DRAIN_CHECK_FRAMES: usize = 1000;

/// Clamp a value into the activation range `[0, 1]`.
///
/// NaN maps to `0.0` so a broken upstream heuristic can never poison the
/// activation arena.
#[inline(always)]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Shaping applied to the integrated value before clamping
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferFunction {
    /// Identity: the activation is the clamped weighted sum
    #[default]
    Linear,
    /// Logistic squashing above `floor`; values at or below `floor` pass through
    Sigmoid {
        steepness: f32,
        midpoint: f32,
        floor: f32,
    },
}

impl TransferFunction {
    /// Sigmoid with the classic gesture-graph shape (steepness 6, centred on 0.5,
    /// engaged above 0.1)
    pub fn default_sigmoid() -> Self {
        TransferFunction::Sigmoid {
            steepness: 6.0,
            midpoint: 0.5,
            floor: 0.1,
        }
    }

    #[inline(always)]
    pub fn apply(&self, raw: f32) -> f32 {
        match *self {
            TransferFunction::Linear => raw,
            TransferFunction::Sigmoid {
                steepness,
                midpoint,
                floor,
            } => {
                if raw > floor {
                    1.0 / (1.0 + (-steepness * (raw - midpoint)).exp())
                } else {
                    raw
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransferFunction::Linear => "linear",
            TransferFunction::Sigmoid { .. } => "sigmoid",
        }
    }
}

/// Parameters shared by every propagated node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationParams {
    /// Retained fraction of the previous activation, in `[0, 1)`
    pub decay: f32,
    /// Multiplier on the summed edge input
    pub input_gain: f32,
    pub transfer: TransferFunction,
}

impl PropagationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_input_gain(mut self, input_gain: f32) -> Self {
        self.input_gain = input_gain;
        self
    }

    pub fn with_transfer(mut self, transfer: TransferFunction) -> Self {
        self.transfer = transfer;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.decay.is_finite() || self.decay < 0.0 || self.decay >= 1.0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "decay",
                reason: format!("{} is outside [0, 1)", self.decay),
            });
        }
        if !self.input_gain.is_finite() || self.input_gain <= 0.0 {
            return Err(ConfigurationError::InvalidParameter {
                name: "input_gain",
                reason: format!("{} must be finite and positive", self.input_gain),
            });
        }
        if let TransferFunction::Sigmoid {
            steepness,
            midpoint,
            floor,
        } = self.transfer
        {
            if !(steepness.is_finite() && midpoint.is_finite() && floor.is_finite()) {
                return Err(ConfigurationError::InvalidParameter {
                    name: "transfer",
                    reason: "sigmoid parameters must be finite".to_string(),
                });
            }
            if steepness <= 0.0 {
                return Err(ConfigurationError::InvalidParameter {
                    name: "transfer",
                    reason: format!("sigmoid steepness {} must be positive", steepness),
                });
            }
            if !self.drains_without_input(floor) {
                return Err(ConfigurationError::InvalidParameter {
                    name: "transfer",
                    reason: format!(
                        "sigmoid (steepness {}, midpoint {}, floor {}) latches activations at decay {}; \
                         they never fall to the floor without input",
                        steepness, midpoint, floor, self.decay
                    ),
                });
            }
        }
        Ok(())
    }

    /// Follow a node at `1.0` through zero-input frames until `decay * x`
    /// drops to `floor`, after which the sigmoid passes values through and
    /// decay alone drains them. The update is monotone above the floor, so
    /// the trajectory from `1.0` bounds every other starting value.
    fn drains_without_input(&self, floor: f32) -> bool {
        let mut activation = 1.0f32;
        for _ in 0..DRAIN_CHECK_FRAMES {
            let raw = self.decay * activation;
            if raw <= floor {
                return floor >= 0.0;
            }
            activation = clamp_unit(self.transfer.apply(raw));
        }
        false
    }
}

impl Default for PropagationParams {
    fn default() -> Self {
        Self {
            decay: 0.5,      // half-life of one frame
            input_gain: 1.0, // plain weighted sum
            transfer: TransferFunction::Linear,
        }
    }
}

/// Leaky integrator update rule
#[derive(Debug, Clone, Copy)]
pub struct LeakyIntegrator {
    params: PropagationParams,
}

impl LeakyIntegrator {
    pub fn new(params: PropagationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PropagationParams {
        &self.params
    }

    /// Integrate one frame for one node.
    ///
    /// Returns `(new_activation, raw)` so callers can tell saturation and
    /// suppression apart from ordinary values.
    #[inline(always)]
    pub fn update_activation(&self, previous: f32, input_sum: f32) -> (f32, f32) {
        let raw = self.params.decay * previous + self.params.input_gain * input_sum;
        (clamp_unit(self.params.transfer.apply(raw)), raw)
    }
}

impl Default for LeakyIntegrator {
    fn default() -> Self {
        Self::new(PropagationParams::default())
    }
}
