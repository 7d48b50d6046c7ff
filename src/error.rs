// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Umbrella error type for configuration-driven setup and frame replay

use contextgraph_config::ConfigError;
use contextgraph_engine::ConfigurationError;
use contextgraph_observability::UnknownLogFormat;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Graph error: {0}")]
    Graph(#[from] ConfigurationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging error: {0}")]
    LogFormat(#[from] UnknownLogFormat),
}

pub type Result<T> = std::result::Result<T, Error>;
