// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection trait: how generalized layout boxes map onto a coordinate system.

use core::fmt::Debug;

use kurbo::{Point, Rect, Size, Vec2};

use crate::command::DrawCommand;
use crate::error::ConfigError;
use crate::tree::Node;
use crate::types::{LayoutBox, Style};

/// View-dependent inputs shared by every projection query of one render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct View {
    /// Visible window; `None` is unbounded.
    pub viewport: Option<Rect>,
    /// Pixels per layout unit, per axis.
    pub zoom: Vec2,
    /// On-screen breadth below which a node collapses.
    pub collapse_threshold_px: f64,
    /// Whether this render is an aligned panel rather than the base panel.
    pub aligned_panel: bool,
}

/// A coordinate system for the layout: rectangular or polar.
///
/// The primary axis carries depth (branch lengths) and the secondary axis breadth.
/// Implementations convert node sizes into boxes, answer visibility and collapse questions,
/// and build the one primitive whose shape depends on the projection.
pub trait Projection: Debug {
    /// Reject an unusable projection configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Per-render setup, given the root's size.
    fn prepare(&mut self, root: Size);

    /// Where the root's box starts.
    fn origin(&self) -> Point;

    /// Box extents of the node and all its descendants.
    fn node_size(&self, node: &Node) -> Size;

    /// Box extents of the node's own branch.
    fn content_size(&self, node: &Node) -> Size;

    /// Box extents of the node's descendants.
    fn children_size(&self, node: &Node) -> Size;

    /// On-screen breadth of `b` in pixels.
    fn breadth_px(&self, view: &View, b: &LayoutBox) -> f64;

    /// Whether a node occupying `b` is too small to draw expanded.
    fn is_small(&self, view: &View, b: &LayoutBox) -> bool {
        self.breadth_px(view, b) < view.collapse_threshold_px
    }

    /// Whether `b` can be visible in the view.
    fn in_viewport(&self, view: &View, b: &LayoutBox) -> bool;

    /// Pixels per layout unit on each axis at `b`.
    fn px_scale(&self, view: &View, b: &LayoutBox) -> Vec2;

    /// The line joining the first and last child branches at primary coordinate `x`.
    fn children_span(&self, x: f64, y0: f64, y1: f64, style: Style) -> DrawCommand;
}

/// Inclusive rectangle overlap; touching edges count as overlapping.
pub(crate) fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Inclusive interval overlap.
pub(crate) fn segments_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    a0 <= b1 && b0 <= a1
}
