// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Graph Types Module
//!
//! Core type definitions shared by the graph model, the activation store and
//! the configuration layer.

pub mod descriptor;
pub mod error;
pub mod ids;
pub mod layer;

// Re-export commonly used types
pub use descriptor::{EdgeDescriptor, GraphDescriptor, NodeDescriptor};
pub use error::{ConfigurationError, Error, Result};
pub use ids::NodeIndex;
pub use layer::{Layer, UnknownLayer};
