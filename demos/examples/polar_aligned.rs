// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Radial layout with an aligned panel.
//!
//! Grow a balanced tree with varied branch lengths, draw it in a half-turn window, and place leaf
//! names in an aligned column outside the deepest leaf.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example polar_aligned`

use std::sync::Arc;

use kurbo::{Rect, Vec2};
use tracing_subscriber::EnvFilter;
use understory_tree_draw::faces::{PropFace, RectFace};
use understory_tree_draw::{
    AlignedGridState, AngularWindow, DrawCommand, DrawKind, DrawParams, Drawer, FaceFlags,
    FaceSlot, NodeData, PolarProjection, Tree,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let mut tree = Tree::new(NodeData::named("root", 0.0));
    let label = Arc::new(PropFace::name());
    let band = Arc::new(RectFace::new(0.5).with_flags(FaceFlags::ALWAYS_DRAWN));
    let mut frontier = vec![tree.root()];
    let mut serial = 0_u32;
    for depth in 0..5 {
        let mut next = Vec::new();
        for parent in frontier {
            for _ in 0..3 {
                serial += 1;
                let dist = 1.0 + f64::from(serial % 7) * 0.25;
                let id = tree.add_child(parent, NodeData::named(&format!("n{serial}"), dist));
                if depth == 4 {
                    tree.add_face(id, FaceSlot::aligned(0), label.clone());
                    tree.add_face(id, FaceSlot::aligned(1), band.clone());
                }
                next.push(id);
            }
        }
        frontier = next;
    }
    tree.commit();

    let window = AngularWindow::from_degrees(-90.0, 90.0).expect("valid window");
    let projection = PolarProjection::new(window).expect("valid window");
    let params = DrawParams {
        zoom: Vec2::new(60.0, 60.0),
        viewport: Some(Rect::new(0.0, -6.0, 12.0, 6.0)),
        ..Default::default()
    };
    let drawer = Drawer::new(&tree, &params, projection).expect("valid parameters");

    let mut grid = AlignedGridState::new();
    let base: Vec<DrawCommand> = drawer.base(&mut grid).collect();
    let count = |cmds: &[DrawCommand], kind| cmds.iter().filter(|c| c.kind() == kind).count();
    println!(
        "base: {} commands, {} node boxes, {} arcs, {} outlines",
        base.len(),
        count(&base, DrawKind::NodeBox),
        count(&base, DrawKind::Arc),
        count(&base, DrawKind::Polygon),
    );
    for (column, width) in grid.columns(1) {
        println!("aligned column {column}: width {width:.3}");
    }

    let aligned: Vec<DrawCommand> = drawer
        .aligned(1, &grid)
        .expect("base pass finished")
        .collect();
    println!(
        "panel 1: {} labels, {} bands, starting at radius {:.2}",
        count(&aligned, DrawKind::Text),
        count(&aligned, DrawKind::Rect),
        drawer.aligned_origin(),
    );
}
