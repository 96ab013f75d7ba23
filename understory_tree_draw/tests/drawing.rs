// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end checks of the emitted command streams.

use std::sync::Arc;

use kurbo::{Point, Rect, Vec2};
use understory_tree_draw::faces::PropFace;
use understory_tree_draw::{
    AlignedGridState, Anchor, DrawCommand, DrawKind, DrawParams, Drawer, Face, FaceSlot,
    LineRole, NodeBox, NodeData, NodeId, PolarProjection, Projection, RectProjection, Tree,
};

/// `((A,B)X,C)root`, every branch of length 1.
fn example_tree() -> (Tree, NodeId) {
    let mut tree = Tree::new(NodeData::named("root", 1.0));
    let x = tree.add_child(tree.root(), NodeData::named("X", 1.0));
    tree.add_child(x, NodeData::named("A", 1.0));
    tree.add_child(x, NodeData::named("B", 1.0));
    tree.add_child(tree.root(), NodeData::named("C", 1.0));
    tree.commit();
    (tree, x)
}

fn draw_base<P: Projection>(tree: &Tree, params: &DrawParams, projection: P) -> Vec<DrawCommand> {
    let drawer = Drawer::new(tree, params, projection).unwrap();
    let mut grid = AlignedGridState::new();
    drawer.base(&mut grid).collect()
}

fn node_box<'a>(cmds: &'a [DrawCommand], name: &str) -> Option<&'a NodeBox> {
    cmds.iter()
        .filter_map(DrawCommand::as_node_box)
        .find(|nb| nb.name.as_deref() == Some(name))
}

fn branch_starts(cmds: &[DrawCommand]) -> Vec<Point> {
    cmds.iter()
        .filter_map(|c| match c {
            DrawCommand::Line {
                p1,
                role: LineRole::Branch,
                ..
            } => Some(*p1),
            _ => None,
        })
        .collect()
}

fn overlaps(viewport: &Rect, cmd: &DrawCommand) -> bool {
    let b = cmd.bounds();
    b.x <= viewport.x1 && viewport.x0 <= b.x1() && b.y <= viewport.y1 && viewport.y0 <= b.y1()
}

#[test]
fn example_tree_draws_every_node() {
    let (tree, _) = example_tree();
    let params = DrawParams {
        collapse_threshold_px: 0.0,
        ..Default::default()
    };
    let cmds = draw_base(&tree, &params, RectProjection::new());

    let boxes = cmds.iter().filter(|c| c.kind() == DrawKind::NodeBox).count();
    assert_eq!(boxes, 5);
    let starts = branch_starts(&cmds);
    assert_eq!(starts.len(), 4);

    // X's branch starts at depth 1 within X's breadth; A and B start at depth 2.
    let x_bs = starts.iter().find(|p| p.x == 1.0 && p.y < 2.0).unwrap().y;
    let a_bs = starts.iter().find(|p| p.x == 2.0 && p.y < 1.0).unwrap().y;
    let b_bs = starts.iter().find(|p| p.x == 2.0 && p.y > 1.0).unwrap().y;
    assert_eq!(x_bs, (a_bs + b_bs) / 2.0);

    for (name, path) in [("root", vec![]), ("X", vec![0]), ("A", vec![0, 0]), ("C", vec![1])] {
        assert_eq!(node_box(&cmds, name).unwrap().path, path, "path of {name}");
    }
}

#[test]
fn manually_collapsed_subtree_is_replaced_by_one_shape() {
    let (tree, x) = example_tree();
    let expanded = DrawParams {
        collapse_threshold_px: 0.0,
        ..Default::default()
    };
    let collapsed = DrawParams {
        collapse_threshold_px: 0.0,
        collapsed: [x].into_iter().collect(),
        ..Default::default()
    };
    let before = draw_base(&tree, &expanded, RectProjection::new());
    let after = draw_base(&tree, &collapsed, RectProjection::new());

    assert!(node_box(&after, "A").is_none());
    assert!(node_box(&after, "B").is_none());
    let shapes = after
        .iter()
        .filter(|c| c.kind() == DrawKind::Polygon || c.line_role() == Some(LineRole::Stub))
        .count();
    assert_eq!(shapes, 1);
    assert_eq!(node_box(&after, "root"), node_box(&before, "root"));
    assert_eq!(node_box(&after, "C"), node_box(&before, "C"));
}

#[test]
fn small_subtrees_hide_their_descendants() {
    // root -> N (4 leaves), M (40 leaves). At unit zoom N is below the 6px threshold.
    let mut tree = Tree::new(NodeData::named("root", 0.0));
    let n = tree.add_child(tree.root(), NodeData::named("N", 1.0));
    for i in 0..4 {
        tree.add_child(n, NodeData::named(&format!("n{i}"), 1.0));
    }
    let m = tree.add_child(tree.root(), NodeData::named("M", 1.0));
    for i in 0..40 {
        tree.add_child(m, NodeData::named(&format!("m{i}"), 0.5));
    }
    tree.commit();
    let cmds = draw_base(&tree, &DrawParams::default(), RectProjection::new());

    let boxes: Vec<&NodeBox> = cmds.iter().filter_map(DrawCommand::as_node_box).collect();
    assert!(
        boxes.iter().all(|b| b.path.len() < 2),
        "no descendant of a collapsed node gets a node box"
    );
    let n_box = node_box(&cmds, "N").unwrap().rect;
    let covering = cmds
        .iter()
        .filter(|c| c.kind() == DrawKind::Polygon || c.line_role() == Some(LineRole::Stub))
        .filter(|c| {
            let b = c.bounds();
            b.y <= n_box.y && b.y1() >= n_box.y1()
        })
        .count();
    assert_eq!(covering, 1);
    assert!(node_box(&cmds, "M").is_some());
}

#[test]
fn every_command_touches_the_viewport() {
    let mut tree = Tree::new(NodeData::named("root", 0.5));
    let mut frontier = vec![tree.root()];
    for depth in 0..6 {
        let mut next = Vec::new();
        for parent in frontier {
            for k in 0..3 {
                let dist = 0.5 + f64::from(depth * 3 + k) * 0.1;
                next.push(tree.add_child(parent, NodeData::named("n", dist)));
            }
        }
        frontier = next;
    }
    tree.commit();
    let viewport = Rect::new(1.0, 200.0, 3.0, 420.0);
    let params = DrawParams {
        viewport: Some(viewport),
        zoom: Vec2::new(40.0, 8.0),
        ..Default::default()
    };
    let cmds = draw_base(&tree, &params, RectProjection::new());
    assert!(!cmds.is_empty());
    for cmd in &cmds {
        assert!(overlaps(&viewport, cmd), "{cmd:?} is disjoint from the viewport");
    }
    // A viewport cut shows fewer boxes than the whole tree.
    let all = draw_base(
        &tree,
        &DrawParams {
            zoom: params.zoom,
            ..Default::default()
        },
        RectProjection::new(),
    );
    let count = |cmds: &[DrawCommand]| cmds.iter().filter(|c| c.kind() == DrawKind::NodeBox).count();
    assert!(count(&cmds) < count(&all));
}

#[test]
fn aligned_columns_share_the_widest_face() {
    let mut tree = Tree::new(NodeData::named("root", 0.0));
    let names = ["a", "bb", "cccc", "dd", "eeeeeee", "f"];
    let mut leaves = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let dist = 1.0 + i as f64 * 0.3;
        leaves.push(tree.add_child(tree.root(), NodeData::named(name, dist)));
    }
    let face: Arc<dyn Face> = Arc::new(PropFace::name());
    for &leaf in &leaves {
        tree.add_face(leaf, FaceSlot::aligned(0), face.clone());
        tree.add_face(leaf, FaceSlot::aligned(1), face.clone());
    }
    tree.commit();
    let params = DrawParams {
        zoom: Vec2::new(20.0, 20.0),
        collapse_threshold_px: 0.0,
        ..Default::default()
    };
    let drawer = Drawer::new(&tree, &params, RectProjection::new()).unwrap();
    let mut grid = AlignedGridState::new();
    let base: Vec<DrawCommand> = drawer.base(&mut grid).collect();
    assert!(base.iter().all(|c| c.kind() != DrawKind::Text));

    let panel: Vec<DrawCommand> = drawer.aligned(1, &grid).unwrap().collect();
    assert_eq!(panel.len(), names.len() * 2);
    let width0 = grid.width(1, 0).unwrap();
    let col1_x = drawer.aligned_origin() + width0;
    for column in [0, 1] {
        let width = grid.width(1, column).unwrap();
        let placed: Vec<f64> = panel
            .iter()
            .filter(|c| (c.bounds().x >= col1_x - 1e-9) == (column == 1))
            .map(|c| c.bounds().dx)
            .collect();
        assert_eq!(placed.len(), names.len());
        assert!(placed.iter().all(|w| *w <= width + 1e-9));
        assert!(placed.iter().any(|w| (w - width).abs() < 1e-9));
    }
    // Columns start at the same place for every leaf, whatever its depth.
    let starts: Vec<f64> = panel.iter().map(|c| c.bounds().x).collect();
    assert!(starts.iter().all(|x| *x == drawer.aligned_origin() || *x == col1_x));
}

#[test]
fn aligned_panel_ignores_horizontal_scroll() {
    let mut tree = Tree::new(NodeData::named("root", 0.0));
    let face: Arc<dyn Face> = Arc::new(PropFace::name());
    for name in ["ant", "bee", "cicada", "dragonfly"] {
        let leaf = tree.add_child(tree.root(), NodeData::named(name, 4.0));
        tree.add_face(leaf, FaceSlot::aligned(0), face.clone());
    }
    tree.commit();
    let render = |viewport: Option<Rect>| {
        let params = DrawParams {
            zoom: Vec2::new(20.0, 20.0),
            collapse_threshold_px: 0.0,
            viewport,
            ..Default::default()
        };
        let drawer = Drawer::new(&tree, &params, RectProjection::new()).unwrap();
        let mut grid = AlignedGridState::new();
        drawer.base(&mut grid).for_each(drop);
        let panel: Vec<DrawCommand> = drawer.aligned(1, &grid).unwrap().collect();
        (grid.width(1, 0), panel)
    };

    let (width, panel) = render(None);
    assert!(width.is_some_and(|w| w > 0.0));
    assert_eq!(panel.len(), 4);
    for x0 in [-3.0, 2.0, 4.5, 20.0] {
        let scrolled = render(Some(Rect::new(x0, 0.0, x0 + 6.0, 4.0)));
        assert_eq!(scrolled.0, width, "column width changed at x0 = {x0}");
        assert_eq!(scrolled.1, panel, "aligned output changed at x0 = {x0}");
    }
    // Tree scrolled fully out on the left.
    assert_eq!(render(Some(Rect::new(4.5, 0.0, 30.0, 4.0))).1.len(), 4);
}

#[test]
fn redrawing_is_deterministic() {
    let (mut tree, x) = example_tree();
    tree.add_face(
        x,
        FaceSlot::new(Anchor::BranchTop, 0),
        Arc::new(PropFace::name()),
    );
    let params = DrawParams {
        zoom: Vec2::new(30.0, 30.0),
        viewport: Some(Rect::new(0.0, 0.0, 2.5, 2.5)),
        ..Default::default()
    };
    let first = draw_base(&tree, &params, RectProjection::new());
    let second = draw_base(&tree, &params, RectProjection::new());
    assert_eq!(first, second);
    assert_eq!(
        draw_base(&tree, &params, PolarProjection::default()),
        draw_base(&tree, &params, PolarProjection::default())
    );
}

#[test]
fn abandoning_a_stream_early_is_cheap() {
    let mut tree = Tree::new(NodeData::named("root", 0.0));
    for _ in 0..10_000 {
        tree.add_child(tree.root(), NodeData::named("leaf", 1.0));
    }
    tree.commit();
    let params = DrawParams {
        collapse_threshold_px: 0.0,
        ..Default::default()
    };
    let drawer = Drawer::new(&tree, &params, RectProjection::new()).unwrap();
    let mut grid = AlignedGridState::new();
    let first: Vec<DrawCommand> = drawer.base(&mut grid).take(3).collect();
    assert_eq!(first.len(), 3);
    assert!(!grid.is_sealed());
}
