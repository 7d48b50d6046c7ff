// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration → engine → replay, end to end.

use std::fs;
use std::io::BufReader;
use std::path::Path;

use contextgraph::config::{load_config, validate_config, ConfigError};
use contextgraph::prelude::*;
use contextgraph::replay::UNCERTAIN;
use contextgraph::{build_engine, Error};
use tempfile::tempdir;

const CUSTOM_GRAPH: &str = r#"
[engine]
decay = 0.6

[replay]
confidence_threshold = 0.5

[[graph.nodes]]
id = "IN_LIGHT"
layer = "SENSOR"
label = "Ambient Light"

[[graph.nodes]]
id = "IN_NOISE"
layer = "SENSOR"
label = "Noise"

[[graph.nodes]]
id = "ST_DAY"
layer = "STATE"
label = "Daytime"

[[graph.nodes]]
id = "ST_NIGHT"
layer = "STATE"
label = "Night"

[[graph.edges]]
source = "IN_LIGHT"
target = "ST_DAY"
weight = 0.8

[[graph.edges]]
source = "IN_NOISE"
target = "ST_NIGHT"
weight = 0.4

[[graph.edges]]
source = "ST_DAY"
target = "ST_NIGHT"
weight = -1.0
"#;

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("context_graph.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_shipped_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("context_graph.toml");
    let config = load_config(Some(&path), None).unwrap();
    validate_config(&config).unwrap();
    assert!(config.graph.is_builtin());

    let engine = build_engine(&config).unwrap();
    assert_eq!(engine.graph().len(), 43);
}

#[test]
fn test_custom_graph_from_toml() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), CUSTOM_GRAPH);
    let config = load_config(Some(&path), None).unwrap();

    let mut engine = build_engine(&config).unwrap();
    assert_eq!(engine.params().decay, 0.6);
    assert_eq!(engine.graph().len(), 4);
    assert_eq!(engine.graph().layer_of("ST_NIGHT"), Some(Layer::State));

    for _ in 0..4 {
        engine.tick([("IN_LIGHT", 1.0), ("IN_NOISE", 1.0)]);
    }
    let ranked = engine.ranked_states();
    assert_eq!(ranked[0].id, "ST_DAY");
    assert_eq!(ranked[0].label, "Daytime");
    assert_eq!(ranked[1].value, 0.0);
}

#[test]
fn test_bad_graph_is_reported_before_engine_build() {
    let dir = tempdir().unwrap();
    let body = CUSTOM_GRAPH.replace("target = \"ST_NIGHT\"\nweight = 0.4", "target = \"ST_DUSK\"\nweight = 0.4");
    let path = write_config(dir.path(), &body);
    let config = load_config(Some(&path), None).unwrap();

    match build_engine(&config) {
        Err(Error::Config(ConfigError::ValidationError(msg))) => {
            assert!(msg.contains("ST_DUSK"), "{}", msg);
        }
        other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_sigmoid_transfer_from_toml() {
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "[engine]\ntransfer = \"sigmoid\"\nsigmoid_steepness = 8.0\n",
    );
    let config = load_config(Some(&path), None).unwrap();
    let engine = build_engine(&config).unwrap();
    assert_eq!(
        engine.params().transfer,
        TransferFunction::Sigmoid {
            steepness: 8.0,
            midpoint: 0.5,
            floor: 0.1
        }
    );
}

#[test]
fn test_replay_recorded_session() {
    let dir = tempdir().unwrap();
    let frames_path = dir.path().join("session.ndjson");

    let mut session = String::from("# thumbs up, then nothing\n");
    for _ in 0..5 {
        session.push_str("{\"IN_THUMB_UP\": 1.0, \"IN_FIST\": 0.0}\n");
    }
    for _ in 0..30 {
        session.push_str("{\"IN_THUMB_UP\": 0.0}\n");
    }
    fs::write(&frames_path, session).unwrap();

    let mut engine = ContextEngine::gesture().unwrap();
    let mut out = Vec::new();
    let file = fs::File::open(&frames_path).unwrap();
    let summary = replay(
        &mut engine,
        BufReader::new(file),
        &mut out,
        &ReplayOptions::default(),
    )
    .unwrap();

    assert_eq!(summary.frames, 35);
    assert_eq!(summary.skipped, 0);

    let detections: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(detections.len(), 35);
    assert_eq!(detections[4]["state"], "ST_YES");
    assert_eq!(detections[4]["label"], "CTX: YES / OK");
    // Context fades once the gesture stops
    assert_eq!(detections[34]["state"], UNCERTAIN);
}
