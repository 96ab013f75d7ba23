// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Tree Draw: streaming tree-to-draw-commands layout.
//!
//! Understory Tree Draw turns a rooted, ordered tree of any size into a lazy stream of
//! geometric drawing primitives, ready for a rasterizer of your choice.
//!
//! - Lays the tree out in a rectangular or a radial (polar) projection.
//! - Prunes subtrees outside the viewport before doing any geometry work for them.
//! - Collapses subtrees too small to read into outlines, adapting detail to the zoom level.
//! - Places per-node decorations ("faces") around each branch, plus aligned columns whose
//!   widths are shared by the whole tree.
//!
//! ## Coordinates
//!
//! Layout happens on two generalized axes. The primary axis carries depth (branch lengths)
//! and the secondary axis carries breadth (one unit per leaf). [`RectProjection`] maps them to
//! literal x/y. [`PolarProjection`] maps them to radius and angle, spreading the breadth over an
//! [`AngularWindow`]. Every [`DrawCommand`] is expressed in the projection's native units.
//!
//! ## Not a rasterizer
//!
//! This crate never touches pixels. Text metrics are approximate and exist only to negotiate
//! space between faces. The emitted commands carry opaque [`Style`] payloads for the backend.
//!
//! ## API overview
//!
//! - [`Tree`]: arena tree with cached subtree sizes ([`Tree::commit`]) and attached faces.
//! - [`Walk`]: lazy combined pre/post-order traversal with [`Walk::prune`].
//! - [`Projection`]: the coordinate seam, implemented by [`RectProjection`] and [`PolarProjection`].
//! - [`Face`]: external node decoration; built-ins live in [`faces`].
//! - [`DrawParams`]: viewport, zoom, thresholds, collapsed nodes, searches and selections.
//! - [`Drawer`]: validated render; [`Drawer::base`] and [`Drawer::aligned`] return a [`DrawStream`].
//! - [`AlignedGridState`]: aligned column widths measured by the base pass.
//!
//! ## Panels
//!
//! Panel 0 draws the tree itself and measures every aligned face. Aligned panels (1 and up)
//! draw the aligned faces assigned to them using those measurements, so the base stream must
//! be exhausted first. [`Drawer::aligned`] returns [`ConfigError::GridNotMeasured`] otherwise.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use kurbo::Vec2;
//! use understory_tree_draw::faces::PropFace;
//! use understory_tree_draw::{
//!     AlignedGridState, DrawKind, DrawParams, Drawer, FaceSlot, LineRole, NodeData,
//!     RectProjection, Tree,
//! };
//!
//! // ((A,B)X,C)root
//! let mut tree = Tree::new(NodeData::named("root", 1.0));
//! let x = tree.add_child(tree.root(), NodeData::named("X", 1.0));
//! let a = tree.add_child(x, NodeData::named("A", 1.0));
//! let b = tree.add_child(x, NodeData::named("B", 1.0));
//! let c = tree.add_child(tree.root(), NodeData::named("C", 1.0));
//! let names = Arc::new(PropFace::name());
//! for leaf in [a, b, c] {
//!     tree.add_face(leaf, FaceSlot::aligned(0), names.clone());
//! }
//! tree.commit();
//!
//! let params = DrawParams {
//!     zoom: Vec2::new(20.0, 20.0),
//!     collapse_threshold_px: 0.0,
//!     ..Default::default()
//! };
//! let drawer = Drawer::new(&tree, &params, RectProjection::new()).unwrap();
//!
//! let mut grid = AlignedGridState::new();
//! let base: Vec<_> = drawer.base(&mut grid).collect();
//! let node_boxes = base.iter().filter(|c| c.kind() == DrawKind::NodeBox).count();
//! let branches = base.iter().filter(|c| c.line_role() == Some(LineRole::Branch)).count();
//! assert_eq!((node_boxes, branches), (5, 4));
//!
//! // Leaf names, aligned in one column right of the deepest leaf.
//! let labels: Vec<_> = drawer.aligned(1, &grid).unwrap().collect();
//! assert_eq!(labels.len(), 3);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod command;
pub mod draw;
pub mod error;
pub mod face;
pub mod faces;
pub mod grid;
mod negotiate;
pub mod outline;
pub mod params;
pub mod projection;
pub mod projections;
pub mod tree;
pub mod types;
pub mod walk;

pub use command::{DrawCommand, DrawKind, LineRole, NodeBox, TipDirection};
pub use draw::{DrawStream, Drawer};
pub use error::ConfigError;
pub use face::{Anchor, AttachedFace, Face, FaceBox, FaceMap, FaceNode, FaceOffer, FaceSlot};
pub use grid::AlignedGridState;
pub use outline::RenderTarget;
pub use params::{DrawParams, Highlight};
pub use projection::{Projection, View};
pub use projections::{AngularWindow, AnnularSector, PolarProjection, RectProjection};
pub use tree::{LEAF_BREADTH, Node, NodeData, Tree};
pub use types::{FaceFlags, LayoutBox, NodeId, SlantedBox, Style};
pub use walk::{Visit, VisitKind, Walk};
