// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Frame Replay
//!
//! Drives an engine from newline-delimited JSON sensor frames and reports the
//! dominant context per frame.
//!
//! ## Input
//! ```text
//! {"IN_FIST": 1.0, "IN_VEL": 0.1}
//! {"IN_FIST": 0.0}
//! ```
//! Blank lines and lines starting with `#` are skipped. A line that is not a
//! JSON object of numbers is logged and skipped; the engine does not step.
//!
//! ## Output
//! One JSON object per reported frame:
//! ```text
//! {"frame":5,"state":"ST_GRASP","label":"ACTION: GRASP","value":1.0,"confident":true}
//! ```
//! A top value at or below the confidence threshold is reported as `UNCERTAIN`.

use std::io::{BufRead, Write};

use ahash::AHashMap;
use contextgraph_config::ReplayConfig;
use contextgraph_engine::ContextEngine;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;

/// State reported when no state clears the confidence threshold
pub const UNCERTAIN: &str = "UNCERTAIN";

/// One frame of sensor readings, keyed by node id
pub type SensorFrame = AHashMap<String, f32>;

/// Parse one NDJSON line into a sensor frame
pub fn parse_frame(line: &str) -> serde_json::Result<SensorFrame> {
    serde_json::from_str(line)
}

/// Dominant context after one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub frame: u64,
    /// Winning state id, or [`UNCERTAIN`]
    pub state: String,
    pub label: String,
    /// Activation of the top-ranked state, reported even when uncertain
    pub value: f32,
    pub confident: bool,
}

/// Read the top-ranked state and compare it against `threshold`
pub fn detect(engine: &ContextEngine, threshold: f32) -> Detection {
    let top = engine.ranked_states().into_iter().next();
    let value = top.as_ref().map(|s| s.value).unwrap_or(0.0);

    match top {
        Some(state) if value > threshold => Detection {
            frame: engine.frame(),
            state: state.id,
            label: state.label,
            value,
            confident: true,
        },
        _ => Detection {
            frame: engine.frame(),
            state: UNCERTAIN.to_string(),
            label: UNCERTAIN.to_string(),
            value,
            confident: false,
        },
    }
}

/// Replay options, usually taken from the `[replay]` config section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayOptions {
    pub confidence_threshold: f32,
    /// Report every N frames stepped by this replay (0 is treated as 1)
    pub report_every: u64,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        ReplayOptions::from(&ReplayConfig::default())
    }
}

impl From<&ReplayConfig> for ReplayOptions {
    fn from(config: &ReplayConfig) -> Self {
        ReplayOptions {
            confidence_threshold: config.confidence_threshold,
            report_every: config.report_every,
        }
    }
}

/// Counters for one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Frames stepped
    pub frames: u64,
    /// Detections written
    pub reported: u64,
    /// Malformed lines skipped
    pub skipped: u64,
    /// Frames whose detection was confident
    pub confident: u64,
}

/// Replay every frame of `input` through `engine`, writing detections to `output`
pub fn replay<R, W>(
    engine: &mut ContextEngine,
    input: R,
    mut output: W,
    options: &ReplayOptions,
) -> Result<ReplaySummary>
where
    R: BufRead,
    W: Write,
{
    let every = options.report_every.max(1);
    let mut summary = ReplaySummary::default();

    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let frame = match parse_frame(trimmed) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("[REPLAY] Skipping line {}: {}", line_no + 1, e);
                summary.skipped += 1;
                continue;
            }
        };

        let applied = engine.inject(frame.iter().map(|(id, value)| (id.as_str(), *value)));
        if applied < frame.len() {
            debug!(
                "[REPLAY] Line {}: {} of {} keys are not sensors",
                line_no + 1,
                frame.len() - applied,
                frame.len()
            );
        }
        engine.step();
        summary.frames += 1;

        let detection = detect(engine, options.confidence_threshold);
        if detection.confident {
            summary.confident += 1;
        }
        if summary.frames % every == 0 {
            serde_json::to_writer(&mut output, &detection)?;
            writeln!(output)?;
            summary.reported += 1;
        }
    }

    output.flush()?;
    Ok(summary)
}
