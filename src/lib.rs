// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # contextgraph
//!
//! Fuses noisy per-frame sensor scalars (hand pose, motion, face cues) into a
//! ranked set of competing context states, using a fixed three-layer graph of
//! leaky integrators joined by signed edges.
//!
//! ## Quick Start
//!
//! ```rust
//! use contextgraph::prelude::*;
//!
//! let mut engine = ContextEngine::gesture()?;
//! for _ in 0..5 {
//!     engine.tick([("IN_THUMB_UP", 1.0)]);
//! }
//! let top = &engine.ranked_states()[0];
//! assert_eq!(top.id, "ST_YES");
//! # Ok::<(), contextgraph::ConfigurationError>(())
//! ```
//!
//! ### From a configuration file
//!
//! ```rust,no_run
//! use contextgraph::{build_engine, config::load_config};
//!
//! let config = load_config(None, None)?;
//! let mut engine = build_engine(&config)?;
//! engine.tick([("IN_FIST", 1.0)]);
//! # Ok::<(), contextgraph::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  contextgraph-engine                                    │
//! │  (graph model, activation store, propagation, ranking)  │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  contextgraph-config / contextgraph-observability       │
//! │  (TOML + overrides, logging setup)                      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  contextgraph (this crate)                              │
//! │  (config → engine wiring, NDJSON frame replay)          │
//! └─────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

// Re-export member crates
pub use contextgraph_config as config;
pub use contextgraph_engine as engine;
pub use contextgraph_observability as observability;

pub mod error;
pub mod replay;

pub use contextgraph_engine::{ConfigurationError, ContextEngine};
pub use error::{Error, Result};

/// Prelude - commonly used types
pub mod prelude {
    pub use contextgraph_engine::{
        gesture_graph, ActivationSnapshot, ContextEngine, GraphDescriptor, Layer,
        PropagationParams, RankedState, StepReport, TransferFunction,
    };

    pub use contextgraph_config::{load_config, validate_config, ContextGraphConfig};

    pub use crate::replay::{detect, replay, Detection, ReplayOptions};
}

/// Validate `config` and build an engine from its `[engine]` and `[graph]`
/// sections
pub fn build_engine(config: &contextgraph_config::ContextGraphConfig) -> Result<ContextEngine> {
    contextgraph_config::validate_config(config)?;
    let params = config.engine.propagation_params()?;
    let engine = ContextEngine::new(&config.graph.descriptor(), params)?;

    info!(
        "[CONTEXTGRAPH] Engine ready: {} nodes, {} edges ({} graph), decay={} transfer={}",
        engine.graph().len(),
        engine.graph().edge_count(),
        if config.graph.is_builtin() {
            "built-in"
        } else {
            "custom"
        },
        params.decay,
        params.transfer.name()
    );

    Ok(engine)
}

/// Console logging options from the `[logging]` section
pub fn logging_options(
    config: &contextgraph_config::LoggingConfig,
) -> Result<contextgraph_observability::LoggingOptions> {
    Ok(contextgraph_observability::LoggingOptions {
        level: config.level.clone(),
        format: config.format.parse()?,
        with_target: config.with_target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contextgraph_config::{ContextGraphConfig, LoggingConfig};
    use contextgraph_observability::LogFormat;

    #[test]
    fn test_build_engine_from_defaults() {
        let engine = build_engine(&ContextGraphConfig::default()).unwrap();
        assert_eq!(engine.graph().len(), 43);
        assert_eq!(engine.params().decay, 0.5);
    }

    #[test]
    fn test_build_engine_rejects_invalid_config() {
        let mut config = ContextGraphConfig::default();
        config.engine.decay = 2.0;
        assert!(matches!(build_engine(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_logging_options_from_config() {
        let options = logging_options(&LoggingConfig::default()).unwrap();
        assert_eq!(options.level, "info");
        assert_eq!(options.format, LogFormat::Text);
        assert!(!options.with_target);

        let config = LoggingConfig {
            format: "JSON".to_string(),
            with_target: true,
            ..LoggingConfig::default()
        };
        let options = logging_options(&config).unwrap();
        assert_eq!(options.format, LogFormat::Json);
        assert!(options.with_target);

        let config = LoggingConfig {
            format: "xml".to_string(),
            ..LoggingConfig::default()
        };
        assert!(matches!(logging_options(&config), Err(Error::LogFormat(_))));
    }
}
