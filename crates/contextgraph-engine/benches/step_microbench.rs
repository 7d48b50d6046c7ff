// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Step Microbenchmarks
//!
//! Purpose:
//! - Track the per-frame cost of the propagation step on the built-in graph.
//! - Check that cost scales with edge count on larger synthetic graphs.
//!
//! Notes:
//! - Fixed inputs, no I/O.
//! - The engine is reused across iterations; steady-state steps allocate nothing.

use std::time::Duration;

use contextgraph_engine::{
    gesture_sensor_ids, ContextEngine, GraphDescriptor, Layer, PropagationParams,
    TransferFunction,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Layered synthetic graph: `width` sensors, features and states with
/// `fan_in` incoming edges per propagated node and one inhibition ring.
fn create_layered_graph(width: usize, fan_in: usize) -> GraphDescriptor {
    let mut desc = GraphDescriptor::new();
    for i in 0..width {
        desc = desc
            .node(format!("IN_{}", i), Layer::Sensor, "")
            .node(format!("FT_{}", i), Layer::Feature, "")
            .node(format!("ST_{}", i), Layer::State, "");
    }
    for i in 0..width {
        for offset in 0..fan_in {
            let src = (i + offset) % width;
            let weight = 0.8 / fan_in as f32;
            desc = desc
                .edge(format!("IN_{}", src), format!("FT_{}", i), weight)
                .edge(format!("FT_{}", src), format!("ST_{}", i), weight);
        }
        desc = desc.edge(format!("ST_{}", i), format!("ST_{}", (i + 1) % width), -0.5);
    }
    desc
}

fn bench_gesture_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture_graph");
    group.sample_size(20);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(1));

    let frame: Vec<(&str, f32)> = gesture_sensor_ids()
        .enumerate()
        .map(|(i, id)| (id, (i % 4) as f32 * 0.25))
        .collect();

    group.bench_function("step_only", |b| {
        let mut engine = ContextEngine::gesture().unwrap();
        engine.inject(frame.iter().copied());
        b.iter(|| black_box(engine.step()));
    });

    group.bench_function("tick_full_frame", |b| {
        let mut engine = ContextEngine::gesture().unwrap();
        b.iter(|| black_box(engine.tick(black_box(frame.iter().copied()))));
    });

    group.bench_function("tick_sigmoid", |b| {
        let params =
            PropagationParams::default().with_transfer(TransferFunction::default_sigmoid());
        let mut engine =
            ContextEngine::new(&contextgraph_engine::gesture_graph(), params).unwrap();
        b.iter(|| black_box(engine.tick(black_box(frame.iter().copied()))));
    });

    group.bench_function("ranked_states", |b| {
        let mut engine = ContextEngine::gesture().unwrap();
        for _ in 0..5 {
            engine.tick(frame.iter().copied());
        }
        b.iter(|| black_box(engine.ranked_states()));
    });

    group.finish();
}

fn bench_layered_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("layered_step");
    group.sample_size(20);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(1));

    for &(width, fan_in) in &[(64usize, 4usize), (256, 8), (1024, 16)] {
        let desc = create_layered_graph(width, fan_in);
        let mut engine = ContextEngine::new(&desc, PropagationParams::default()).unwrap();
        let sensors: Vec<(String, f32)> = (0..width)
            .map(|i| (format!("IN_{}", i), if i % 3 == 0 { 1.0 } else { 0.2 }))
            .collect();
        engine.inject(sensors.iter().map(|(k, v)| (k.as_str(), *v)));

        let edges = (width * fan_in * 2 + width) as u64;
        group.throughput(Throughput::Elements(edges));
        group.bench_with_input(
            BenchmarkId::new("step", format!("{}w_{}fan", width, fan_in)),
            &width,
            |b, _| b.iter(|| black_box(engine.step())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_gesture_graph, bench_layered_scaling);
criterion_main!(benches);
