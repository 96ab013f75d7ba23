// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-pass benchmarks over large balanced trees.

use std::sync::Arc;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Vec2};
use understory_tree_draw::faces::PropFace;
use understory_tree_draw::{
    AlignedGridState, AngularWindow, DrawParams, Drawer, FaceSlot, NodeData, PolarProjection,
    RectProjection, Tree,
};

fn balanced_tree(arity: usize, depth: usize, labels: bool) -> Tree {
    let mut tree = Tree::new(NodeData::named("root", 0.0));
    let name = Arc::new(PropFace::name());
    let mut frontier = vec![tree.root()];
    let mut serial = 0_u32;
    for level in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * arity);
        for parent in frontier {
            for _ in 0..arity {
                serial += 1;
                let dist = 1.0 + f64::from(serial % 5) * 0.5;
                let id = tree.add_child(parent, NodeData::named(&format!("n{serial}"), dist));
                if labels && level + 1 == depth {
                    tree.add_face(id, FaceSlot::aligned(0), name.clone());
                }
                next.push(id);
            }
        }
        frontier = next;
    }
    tree.commit();
    tree
}

fn bench_rect(c: &mut Criterion) {
    let mut group = c.benchmark_group("rect");
    for &(arity, depth) in &[(2usize, 12usize), (4, 7), (10, 4)] {
        let tree = balanced_tree(arity, depth, false);
        group.throughput(Throughput::Elements(tree.len() as u64));

        let full = DrawParams {
            zoom: Vec2::new(4.0, 4.0),
            ..Default::default()
        };
        group.bench_function(format!("full_a{arity}_d{depth}"), |b| {
            let drawer = Drawer::new(&tree, &full, RectProjection::new()).unwrap();
            let mut grid = AlignedGridState::new();
            b.iter(|| black_box(drawer.base(&mut grid).count()));
        });

        let zoomed = DrawParams {
            zoom: Vec2::new(20.0, 20.0),
            viewport: Some(Rect::new(0.0, 100.0, 40.0, 160.0)),
            ..Default::default()
        };
        group.bench_function(format!("viewport_a{arity}_d{depth}"), |b| {
            let drawer = Drawer::new(&tree, &zoomed, RectProjection::new()).unwrap();
            let mut grid = AlignedGridState::new();
            b.iter(|| black_box(drawer.base(&mut grid).count()));
        });
    }
    group.finish();
}

fn bench_polar(c: &mut Criterion) {
    let mut group = c.benchmark_group("polar");
    let tree = balanced_tree(3, 8, false);
    group.throughput(Throughput::Elements(tree.len() as u64));

    let params = DrawParams {
        zoom: Vec2::new(30.0, 30.0),
        ..Default::default()
    };
    group.bench_function("full_a3_d8", |b| {
        let projection = PolarProjection::new(AngularWindow::default()).unwrap();
        let drawer = Drawer::new(&tree, &params, projection).unwrap();
        let mut grid = AlignedGridState::new();
        b.iter(|| black_box(drawer.base(&mut grid).count()));
    });

    let culled = DrawParams {
        viewport: Some(Rect::new(0.0, -0.5, 20.0, 0.5)),
        ..params.clone()
    };
    group.bench_function("viewport_a3_d8", |b| {
        let projection = PolarProjection::new(AngularWindow::default()).unwrap();
        let drawer = Drawer::new(&tree, &culled, projection).unwrap();
        let mut grid = AlignedGridState::new();
        b.iter(|| black_box(drawer.base(&mut grid).count()));
    });
    group.finish();
}

fn bench_aligned(c: &mut Criterion) {
    let mut group = c.benchmark_group("aligned");
    let tree = balanced_tree(4, 6, true);
    group.throughput(Throughput::Elements(tree.len() as u64));
    let params = DrawParams {
        zoom: Vec2::new(20.0, 20.0),
        collapse_threshold_px: 0.0,
        ..Default::default()
    };
    group.bench_function("measure_then_place_a4_d6", |b| {
        let drawer = Drawer::new(&tree, &params, RectProjection::new()).unwrap();
        let mut grid = AlignedGridState::new();
        b.iter(|| {
            let base = drawer.base(&mut grid).count();
            let labels = drawer.aligned(1, &grid).unwrap().count();
            black_box((base, labels))
        });
    });
    group.finish();
}

criterion_group!(benches, bench_rect, bench_polar, bench_aligned);
criterion_main!(benches);
