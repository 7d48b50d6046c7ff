// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Context Graph Engine
//!
//! Fuses noisy per-frame sensor scalars into a ranked set of competing
//! context states:
//! - **Types**: node layers, descriptors, indices, errors
//! - **Graph**: validated, immutable topology with precomputed incoming edges
//! - **Store**: the activation arena, written by sensor injection
//! - **Propagation**: one synchronous leaky-integrator step per frame
//! - **Ranking**: snapshot and sorted state views
//!
//! ## Usage
//!
//! ```rust
//! use contextgraph_engine::ContextEngine;
//!
//! let mut engine = ContextEngine::gesture()?;
//! for _ in 0..5 {
//!     engine.inject([("IN_FIST", 1.0)]);
//!     engine.step();
//! }
//! let top = &engine.ranked_states()[0];
//! assert_eq!(top.id, "ST_GRASP");
//! # Ok::<(), contextgraph_engine::ConfigurationError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core type definitions
pub mod types;

// Edge and activation algorithms
pub mod edge;
pub mod models;

pub mod engine;
pub mod graph;
pub mod propagation;
pub mod ranking;
pub mod store;
pub mod topology;

// Re-export types
pub use types::{
    ConfigurationError, EdgeDescriptor, Error, GraphDescriptor, Layer, NodeDescriptor, NodeIndex,
    Result, UnknownLayer,
};

pub use edge::{compute_edge_contribution, EdgeKind};
pub use engine::{ContextEngine, StepReport};
pub use graph::{GraphModel, IncomingEdge, Node};
pub use models::{clamp_unit, LeakyIntegrator, PropagationParams, TransferFunction};
pub use propagation::{propagate, PropagationStats};
pub use ranking::{ActivationSnapshot, RankedState};
pub use store::ActivationStore;
pub use topology::{gesture_graph, gesture_sensor_ids};
