// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Semantic layer of a node

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Layer a node belongs to. Fixed at construction.
///
/// ```text
/// SENSOR  ──►  FEATURE  ──►  STATE ◄─┐
///                              └─────┘ (mutual inhibition)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Layer {
    /// Leaf input, written only by injection
    #[serde(alias = "sensor")]
    Sensor,
    /// Intermediate cue combining sensors
    #[serde(alias = "feature")]
    Feature,
    /// Competing semantic interpretation, ranked for consumers
    #[serde(alias = "state")]
    State,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Sensor, Layer::Feature, Layer::State];

    /// Whether external injection may overwrite this layer's activation
    pub fn accepts_injection(self) -> bool {
        match self {
            Layer::Sensor => true,
            Layer::Feature | Layer::State => false,
        }
    }

    /// Whether the propagation step recomputes this layer every frame
    pub fn is_propagated(self) -> bool {
        match self {
            Layer::Sensor => false,
            Layer::Feature | Layer::State => true,
        }
    }

    /// Whether nodes of this layer appear in the state ranking
    pub fn is_ranked(self) -> bool {
        match self {
            Layer::State => true,
            Layer::Sensor | Layer::Feature => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Sensor => "SENSOR",
            Layer::Feature => "FEATURE",
            Layer::State => "STATE",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown layer name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown layer '{0}' (expected SENSOR, FEATURE or STATE)")]
pub struct UnknownLayer(pub String);

impl FromStr for Layer {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SENSOR" => Ok(Layer::Sensor),
            "FEATURE" => Ok(Layer::Feature),
            "STATE" => Ok(Layer::State),
            _ => Err(UnknownLayer(s.to_string())),
        }
    }
}
