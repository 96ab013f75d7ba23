// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types shared across the engine: node identifiers, layout boxes, and style payloads.

use alloc::collections::BTreeMap;
use alloc::string::String;
use kurbo::{Point, Rect};

/// Identifier for a node in a [`Tree`](crate::Tree).
///
/// This is a small, copyable slot handle. Trees only grow, so an identifier stays
/// valid for the lifetime of the tree that issued it.
/// Using a `NodeId` with a different tree is a logic error.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Free-form style payload carried by nodes and draw commands.
///
/// Keys and values are opaque to the engine; they are forwarded verbatim to the rasterizer.
pub type Style = BTreeMap<String, String>;

bitflags::bitflags! {
    /// Flags controlling when a face is drawn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct FaceFlags: u8 {
        /// Draw even when [`Face::fits`](crate::Face::fits) rejects the offered space.
        ///
        /// Used for backgrounds and outlines that must render at any zoom.
        const ALWAYS_DRAWN   = 0b0000_0001;
        /// Only draw for the representative of a collapsed run.
        const COLLAPSED_ONLY = 0b0000_0010;
    }
}

/// A box in generalized layout coordinates.
///
/// `x`/`dx` run along the primary (depth) axis and `y`/`dy` along the secondary (breadth) axis.
/// In the rectangular projection these are literal x/y; in the polar projection `x` is the
/// radius and `y` the angle in radians, so the same value describes an annular sector.
///
/// Extents are non-negative. A zero extent is legal and means "not drawn".
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LayoutBox {
    /// Start on the primary axis.
    pub x: f64,
    /// Start on the secondary axis.
    pub y: f64,
    /// Extent on the primary axis.
    pub dx: f64,
    /// Extent on the secondary axis.
    pub dy: f64,
}

impl LayoutBox {
    /// Create a box from its origin and extents.
    pub const fn new(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self { x, y, dx, dy }
    }

    /// The end on the primary axis.
    pub fn x1(&self) -> f64 {
        self.x + self.dx
    }

    /// The end on the secondary axis.
    pub fn y1(&self) -> f64 {
        self.y + self.dy
    }

    /// Smallest box containing both points, in native coordinates.
    pub fn from_points(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self::new(x, y, a.x.max(b.x) - x, a.y.max(b.y) - y)
    }

    /// Union with another box.
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.x1().max(other.x1()) - x,
            self.y1().max(other.y1()) - y,
        )
    }

    /// Interpret the box as a literal rectangle (rectangular projection only).
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x1(), self.y1())
    }
}

/// Union silhouette of a contiguous run of collapsed siblings.
///
/// The run starts at `(x, y)` and spans `dy` along the secondary axis. Its depth
/// varies between `dx_min` and `dx_max`, which gives the outline its slanted edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlantedBox {
    /// Start on the primary axis (shared by every sibling of the run).
    pub x: f64,
    /// Start on the secondary axis.
    pub y: f64,
    /// Shallowest member depth; never greater than `dx_max`.
    pub dx_min: f64,
    /// Deepest member depth.
    pub dx_max: f64,
    /// Total secondary extent of the run.
    pub dy: f64,
}

impl SlantedBox {
    /// Start an outline from a single member box.
    pub fn from_box(b: &LayoutBox) -> Self {
        Self {
            x: b.x,
            y: b.y,
            dx_min: b.dx,
            dx_max: b.dx,
            dy: b.dy,
        }
    }

    /// Merge the next sibling box of the run into `outline`.
    pub fn stack(outline: Option<Self>, b: &LayoutBox) -> Self {
        match outline {
            None => Self::from_box(b),
            Some(o) => Self {
                x: o.x,
                y: o.y,
                dx_min: o.dx_min.min(b.dx),
                dx_max: o.dx_max.max(b.dx),
                dy: o.dy + b.dy,
            },
        }
    }

    /// Bounding box of the silhouette.
    pub fn bounds(&self) -> LayoutBox {
        LayoutBox::new(self.x, self.y, self.dx_max, self.dy)
    }

    /// Corner points of the silhouette, clockwise from the origin.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.dx_min, self.y),
            Point::new(self.x + self.dx_max, self.y + self.dy),
            Point::new(self.x, self.y + self.dy),
        ]
    }
}
