// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Activation Models
//!
//! The update rule applied to every propagated node, together with the
//! parameters that tune it.

pub mod leaky;

// Re-export core types
pub use leaky::{clamp_unit, LeakyIntegrator, PropagationParams, TransferFunction};
