// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Built-in Gesture Topology
//!
//! Hand/face context graph: 16 sensors, 12 features, 15 competing states.
//!
//! ```text
//! physical:  IN_FIST/IN_PINCH ─► FT_HOLDING ─► ST_GRASP, ST_DRAG
//!            IN_VEL ─► FT_ACTIVE ─► ST_DRAG,  ⊣ ST_GRASP, ⊣ ST_IDLE
//!            IN_HANDS_PROX/IN_REL_MOV ─► FT_FRICTION ─► ST_WASH
//! semantic:  rock/paper/scissors, thumbs up/down, the three wise monkeys,
//!            smile/surprise
//! exclusion: ROCK ⊣ SCISSORS, PAPER   SCISSORS ⊣ PAPER   YES ⊣⊢ NO (-2.0)
//!            MIZARU ⊣ KIKAZARU, IWAZARU   KIKAZARU ⊣ IWAZARU
//!            GRASP ⊣⊢ WASH   DRAG ⊣ WASH
//! ```

use crate::types::{EdgeDescriptor, GraphDescriptor, Layer, NodeDescriptor};

const NODES: &[(&str, Layer, &str)] = &[
    // Sensors
    ("IN_VEL", Layer::Sensor, "Velocity"),
    ("IN_REL_MOV", Layer::Sensor, "Rel. Motion"),
    ("IN_FIST", Layer::Sensor, "Fist"),
    ("IN_PINCH", Layer::Sensor, "Pinch"),
    ("IN_OPEN", Layer::Sensor, "Open Hand"),
    ("IN_SCISSORS", Layer::Sensor, "Scissors Pose"),
    ("IN_HANDS_PROX", Layer::Sensor, "Hands Touch"),
    ("IN_OCCLUSION", Layer::Sensor, "Face Lost+Prox"),
    ("IN_THUMB_UP", Layer::Sensor, "Thumb UP"),
    ("IN_THUMB_DOWN", Layer::Sensor, "Thumb DOWN"),
    ("IN_EYES_ACT", Layer::Sensor, "Cover Eyes"),
    ("IN_EARS_ACT", Layer::Sensor, "Cover Ears"),
    ("IN_MOUTH_GUARD", Layer::Sensor, "Cover Mouth"),
    ("IN_SMILE", Layer::Sensor, "Smile"),
    ("IN_MOUTH", Layer::Sensor, "Mouth Open"),
    ("IN_FACE_PROX", Layer::Sensor, "Hand-Face Prox"),
    // Features
    ("FT_ACTIVE", Layer::Feature, "High Kinetic"),
    ("FT_HOLDING", Layer::Feature, "Holding"),
    ("FT_FRICTION", Layer::Feature, "Friction"),
    ("FT_HIDING", Layer::Feature, "Concealment"),
    ("FT_RPS_ROCK", Layer::Feature, "Pose: ROCK"),
    ("FT_RPS_SCI", Layer::Feature, "Pose: SCISSORS"),
    ("FT_RPS_PAP", Layer::Feature, "Pose: PAPER"),
    ("FT_APPROVAL", Layer::Feature, "Semantics: YES"),
    ("FT_DISAPPROVAL", Layer::Feature, "Semantics: NO"),
    ("FT_HIDDEN_SENSE", Layer::Feature, "Blocking Senses"),
    ("FT_HAPPY", Layer::Feature, "Emo: Happy"),
    ("FT_SHOCK", Layer::Feature, "Emo: Shock"),
    // States
    ("ST_IDLE", Layer::State, "IDLE"),
    ("ST_GRASP", Layer::State, "ACTION: GRASP"),
    ("ST_DRAG", Layer::State, "ACTION: DRAG"),
    ("ST_WASH", Layer::State, "ACTION: WASH"),
    ("ST_PEEKABOO", Layer::State, "CTX: HIDDEN"),
    ("ST_ROCK", Layer::State, "GAME: ROCK"),
    ("ST_SCISSORS", Layer::State, "GAME: SCISSORS"),
    ("ST_PAPER", Layer::State, "GAME: PAPER"),
    ("ST_YES", Layer::State, "CTX: YES / OK"),
    ("ST_NO", Layer::State, "CTX: NO / BAD"),
    ("ST_MIZARU", Layer::State, "🙈 MIZARU"),
    ("ST_KIKAZARU", Layer::State, "🙉 KIKAZARU"),
    ("ST_IWAZARU", Layer::State, "🙊 IWAZARU"),
    ("ST_SMILE", Layer::State, "FACE: SMILE"),
    ("ST_SURPRISE", Layer::State, "FACE: SURPRISE"),
];

const EDGES: &[(&str, &str, f32)] = &[
    // Physical actions
    ("IN_VEL", "FT_ACTIVE", 0.9),
    ("IN_FIST", "FT_HOLDING", 0.9),
    ("IN_PINCH", "FT_HOLDING", 0.8),
    ("IN_HANDS_PROX", "FT_FRICTION", 0.7),
    ("IN_REL_MOV", "FT_FRICTION", 0.9),
    ("IN_OCCLUSION", "FT_HIDING", 1.0),
    ("FT_HOLDING", "ST_GRASP", 1.0),
    ("FT_ACTIVE", "ST_GRASP", -0.3),
    ("FT_HOLDING", "ST_DRAG", 0.8),
    ("FT_ACTIVE", "ST_DRAG", 0.9),
    ("FT_FRICTION", "ST_WASH", 1.2),
    ("FT_HIDING", "ST_PEEKABOO", 1.2),
    // Rock / paper / scissors
    ("IN_FIST", "FT_RPS_ROCK", 0.8),
    ("IN_SCISSORS", "FT_RPS_SCI", 0.9),
    ("IN_OPEN", "FT_RPS_PAP", 0.9),
    ("FT_RPS_ROCK", "ST_ROCK", 0.9),
    ("FT_RPS_SCI", "ST_SCISSORS", 0.9),
    ("FT_RPS_PAP", "ST_PAPER", 0.9),
    // Approval; a raised or lowered thumb is not a rock fist
    ("IN_THUMB_UP", "FT_APPROVAL", 1.0),
    ("IN_THUMB_DOWN", "FT_DISAPPROVAL", 1.0),
    ("IN_THUMB_UP", "FT_RPS_ROCK", -0.5),
    ("IN_THUMB_DOWN", "FT_RPS_ROCK", -0.5),
    ("FT_APPROVAL", "ST_YES", 1.0),
    ("FT_DISAPPROVAL", "ST_NO", 1.0),
    // See / hear / speak no evil
    ("IN_EYES_ACT", "FT_HIDDEN_SENSE", 0.8),
    ("IN_EYES_ACT", "ST_MIZARU", 1.0),
    ("IN_HANDS_PROX", "ST_MIZARU", 0.5),
    ("IN_EARS_ACT", "FT_HIDDEN_SENSE", 0.8),
    ("IN_EARS_ACT", "ST_KIKAZARU", 1.0),
    ("IN_MOUTH_GUARD", "FT_HIDDEN_SENSE", 0.8),
    ("IN_MOUTH_GUARD", "ST_IWAZARU", 1.0),
    ("IN_HANDS_PROX", "ST_IWAZARU", 0.8),
    // Face
    ("IN_SMILE", "FT_HAPPY", 0.9),
    ("IN_MOUTH", "FT_SHOCK", 0.6),
    ("IN_FACE_PROX", "FT_SHOCK", 0.5),
    ("FT_HAPPY", "ST_SMILE", 0.9),
    ("FT_SHOCK", "ST_SURPRISE", 0.9),
    // Inhibition
    ("FT_ACTIVE", "ST_IDLE", -0.6),
    ("ST_ROCK", "ST_SCISSORS", -0.8),
    ("ST_ROCK", "ST_PAPER", -0.8),
    ("ST_SCISSORS", "ST_PAPER", -0.8),
    ("ST_YES", "ST_NO", -2.0),
    ("ST_NO", "ST_YES", -2.0),
    ("ST_MIZARU", "ST_KIKAZARU", -1.0),
    ("ST_MIZARU", "ST_IWAZARU", -1.0),
    ("ST_KIKAZARU", "ST_IWAZARU", -1.0),
    ("ST_GRASP", "ST_WASH", -0.8),
    ("ST_WASH", "ST_GRASP", -0.8),
    ("ST_DRAG", "ST_WASH", -0.8),
];

/// The built-in hand/face gesture graph
pub fn gesture_graph() -> GraphDescriptor {
    GraphDescriptor {
        nodes: NODES
            .iter()
            .map(|&(id, layer, label)| NodeDescriptor::new(id, layer, label))
            .collect(),
        edges: EDGES
            .iter()
            .map(|&(source, target, weight)| EdgeDescriptor::new(source, target, weight))
            .collect(),
    }
}

/// Sensor ids of the built-in graph, in declaration order
pub fn gesture_sensor_ids() -> impl Iterator<Item = &'static str> {
    NODES
        .iter()
        .filter(|(_, layer, _)| layer.accepts_injection())
        .map(|&(id, _, _)| id)
}
