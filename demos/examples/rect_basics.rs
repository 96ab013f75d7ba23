// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangular drawing basics.
//!
//! Build `((A,B)X,C)root`, draw it expanded and then with `X` collapsed, and print the
//! command streams. Collapsed `X` is marked with a wedge.
//!
//! Run:
//! - `RUST_LOG=understory_tree_draw=trace cargo run -p understory_demos --example rect_basics`

use std::sync::Arc;

use kurbo::Vec2;
use tracing_subscriber::EnvFilter;
use understory_tree_draw::faces::{PropFace, TriangleFace};
use understory_tree_draw::{
    AlignedGridState, Anchor, DrawCommand, DrawParams, Drawer, FaceFlags, FaceSlot, NodeData,
    RectProjection, TipDirection, Tree,
};

fn print_stream(title: &str, cmds: &[DrawCommand]) {
    println!("== {title} ({} commands)", cmds.len());
    for cmd in cmds {
        match cmd.as_node_box() {
            Some(nb) => println!("  nodebox {:?} {:?} path={:?}", nb.name, nb.rect, nb.path),
            None => println!("  {:?} {:?}", cmd.kind(), cmd.bounds()),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = Tree::new(NodeData::named("root", 1.0));
    let x = tree.add_child(tree.root(), NodeData::named("X", 1.0));
    let a = tree.add_child(x, NodeData::named("A", 1.0));
    let b = tree.add_child(x, NodeData::named("B", 1.0));
    let c = tree.add_child(tree.root(), NodeData::named("C", 1.0));
    let name = Arc::new(PropFace::name());
    for leaf in [a, b, c] {
        tree.add_face(leaf, FaceSlot::new(Anchor::BranchRight, 0), name.clone());
    }
    let wedge =
        TriangleFace::new(0.5, TipDirection::Backward).with_flags(FaceFlags::COLLAPSED_ONLY);
    tree.add_face(x, FaceSlot::new(Anchor::BranchRight, 0), Arc::new(wedge));
    tree.commit();

    let params = DrawParams {
        zoom: Vec2::new(40.0, 20.0),
        ..Default::default()
    };
    let drawer = Drawer::new(&tree, &params, RectProjection::new()).expect("valid parameters");
    let mut grid = AlignedGridState::new();
    let expanded: Vec<DrawCommand> = drawer.base(&mut grid).collect();
    print_stream("expanded", &expanded);

    let collapsed = DrawParams {
        collapsed: [x].into_iter().collect(),
        ..params
    };
    let drawer = Drawer::new(&tree, &collapsed, RectProjection::new()).expect("valid parameters");
    let cmds: Vec<DrawCommand> = drawer.base(&mut grid).collect();
    print_stream("X collapsed", &cmds);
}
