// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangular projection.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size, Vec2};

use crate::command::{DrawCommand, LineRole};
use crate::projection::{Projection, View, rects_overlap, segments_overlap};
use crate::tree::Node;
use crate::types::{LayoutBox, Style};

/// Literal x/y layout: depth along x, breadth along y.
#[derive(Copy, Clone, Debug, Default)]
pub struct RectProjection;

impl RectProjection {
    /// Create the projection.
    pub const fn new() -> Self {
        Self
    }
}

impl Projection for RectProjection {
    fn prepare(&mut self, _root: Size) {}

    fn origin(&self) -> Point {
        Point::ZERO
    }

    fn node_size(&self, node: &Node) -> Size {
        node.size()
    }

    fn content_size(&self, node: &Node) -> Size {
        Size::new(node.dist().abs(), node.size().height)
    }

    fn children_size(&self, node: &Node) -> Size {
        let s = node.size();
        Size::new(s.width - node.dist().abs(), s.height)
    }

    fn breadth_px(&self, view: &View, b: &LayoutBox) -> f64 {
        b.dy * view.zoom.y
    }

    fn in_viewport(&self, view: &View, b: &LayoutBox) -> bool {
        let Some(viewport) = view.viewport else {
            return true;
        };
        if view.aligned_panel {
            // Aligned panels scroll with the tree vertically only.
            segments_overlap(viewport.y0, viewport.y1, b.y, b.y1())
        } else {
            rects_overlap(&viewport, &b.to_rect())
        }
    }

    fn px_scale(&self, view: &View, _b: &LayoutBox) -> Vec2 {
        view.zoom
    }

    fn children_span(&self, x: f64, y0: f64, y1: f64, style: Style) -> DrawCommand {
        DrawCommand::Line {
            p1: Point::new(x, y0),
            p2: Point::new(x, y1),
            role: LineRole::ChildrenSpan,
            style,
        }
    }
}
