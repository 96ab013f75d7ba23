// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polar projection.
//!
//! Layout boxes are read as annular sectors: `x`/`dx` are radius and radial extent,
//! `y`/`dy` are start angle and angular extent in radians. Viewports stay Cartesian, so
//! visibility is decided on the rectangle circumscribing each sector.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size, Vec2};

use crate::command::DrawCommand;
use crate::error::ConfigError;
use crate::projection::{Projection, View, rects_overlap, segments_overlap};
use crate::tree::Node;
use crate::types::{LayoutBox, Style};

/// Gap left at the end of the default full-turn window so the first and last leaves never meet
/// on the branch cut.
const WINDOW_EPSILON: f64 = 1e-6;

/// Smallest radius used for pixel scale, so faces at the center still get a finite scale.
const MIN_RADIUS: f64 = 1e-10;

/// The angular range the tree's breadth is spread over, in radians.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AngularWindow {
    /// Angle of the first leaf edge.
    pub start: f64,
    /// Angle of the last leaf edge.
    pub end: f64,
}

impl Default for AngularWindow {
    fn default() -> Self {
        Self {
            start: -PI,
            end: PI - WINDOW_EPSILON,
        }
    }
}

impl AngularWindow {
    /// A validated window.
    pub fn new(start: f64, end: f64) -> Result<Self, ConfigError> {
        let w = Self { start, end };
        w.validate()?;
        Ok(w)
    }

    /// A window given in degrees, as user interfaces usually present it.
    pub fn from_degrees(start: f64, end: f64) -> Result<Self, ConfigError> {
        Self::new(start.to_radians(), end.to_radians())
    }

    /// Angular span.
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Reject empty, inverted or non-finite windows, and windows reaching outside `[-π, π]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.start.is_finite()
            && self.end.is_finite()
            && self.start < self.end
            && -PI <= self.start
            && self.end <= PI;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidAngularWindow {
                start: self.start,
                end: self.end,
            })
        }
    }
}

/// A polar view of a [`LayoutBox`]: radius `r`, start angle `a`, extents `dr` and `da`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnnularSector {
    /// Inner radius.
    pub r: f64,
    /// Start angle in radians.
    pub a: f64,
    /// Radial extent.
    pub dr: f64,
    /// Angular extent in radians.
    pub da: f64,
}

impl From<LayoutBox> for AnnularSector {
    fn from(b: LayoutBox) -> Self {
        Self {
            r: b.x,
            a: b.y,
            dr: b.dx,
            da: b.dy,
        }
    }
}

impl AnnularSector {
    /// Split the sector where it crosses the branch cut at ±π.
    ///
    /// Both pieces lie inside `[-π, π]`. A sector that does not cross the cut is returned whole.
    pub fn split_at_branch_cut(&self) -> (Self, Option<Self>) {
        let (a0, a1) = (self.a, self.a + self.da);
        let piece = |from: f64, to: f64| Self {
            r: self.r,
            a: from,
            dr: self.dr,
            da: to - from,
        };
        if a0 < PI && PI < a1 {
            (piece(a0, PI), Some(piece(-PI, a1 - TAU)))
        } else if a0 < -PI && -PI < a1 {
            (piece(a0 + TAU, PI), Some(piece(-PI, a1)))
        } else {
            (*self, None)
        }
    }

    /// Cartesian rectangle circumscribing the sector, as one rectangle or two when the sector
    /// crosses the branch cut (a single rectangle would then span the whole negative x side).
    pub fn circumscribe(&self) -> (Rect, Option<Rect>) {
        let (first, second) = self.split_at_branch_cut();
        (first.circumscribe_piece(), second.map(|s| s.circumscribe_piece()))
    }

    fn circumscribe_piece(&self) -> Rect {
        let (rmin, rmax) = (self.r, self.r + self.dr);
        let (amin, amax) = (self.a, self.a + self.da);
        let mut rect = Rect::from_points(polar(rmin, amin), polar(rmin, amax));
        rect = rect.union_pt(polar(rmax, amin)).union_pt(polar(rmax, amax));
        // Extremes reached inside the angular range.
        if amin < -FRAC_PI_2 && -FRAC_PI_2 < amax {
            rect.y0 = -rmax;
        }
        if amin < 0.0 && 0.0 < amax {
            rect.x1 = rmax;
        }
        if amin < FRAC_PI_2 && FRAC_PI_2 < amax {
            rect.y1 = rmax;
        }
        rect
    }
}

fn polar(r: f64, a: f64) -> Point {
    Point::new(r * a.cos(), r * a.sin())
}

/// Radial layout: depth along the radius, breadth along the angle.
#[derive(Copy, Clone, Debug, Default)]
pub struct PolarProjection {
    window: AngularWindow,
    angular_scale: f64,
}

impl PolarProjection {
    /// Create a projection over `window`.
    pub fn new(window: AngularWindow) -> Result<Self, ConfigError> {
        window.validate()?;
        Ok(Self {
            window,
            angular_scale: 0.0,
        })
    }

    /// The configured window.
    pub fn window(&self) -> AngularWindow {
        self.window
    }

    /// Radians per unit of breadth, as fixed by the last [`Projection::prepare`].
    pub fn angular_scale(&self) -> f64 {
        self.angular_scale
    }
}

impl Projection for PolarProjection {
    fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()
    }

    fn prepare(&mut self, root: Size) {
        self.angular_scale = if root.height > 0.0 {
            self.window.span() / root.height
        } else {
            0.0
        };
    }

    fn origin(&self) -> Point {
        Point::new(0.0, self.window.start)
    }

    fn node_size(&self, node: &Node) -> Size {
        let s = node.size();
        Size::new(s.width, s.height * self.angular_scale)
    }

    fn content_size(&self, node: &Node) -> Size {
        Size::new(node.dist().abs(), node.size().height * self.angular_scale)
    }

    fn children_size(&self, node: &Node) -> Size {
        let s = node.size();
        Size::new(
            s.width - node.dist().abs(),
            s.height * self.angular_scale,
        )
    }

    fn breadth_px(&self, view: &View, b: &LayoutBox) -> f64 {
        // Arc length at the outer radius.
        (b.x + b.dx) * b.dy * view.zoom.x
    }

    fn in_viewport(&self, view: &View, b: &LayoutBox) -> bool {
        let Some(viewport) = view.viewport else {
            return true;
        };
        if !segments_overlap(-PI, PI, b.y, b.y1()) {
            return false;
        }
        if view.aligned_panel {
            return true;
        }
        let (first, second) = AnnularSector::from(*b).circumscribe();
        rects_overlap(&viewport, &first) || second.is_some_and(|r| rects_overlap(&viewport, &r))
    }

    fn px_scale(&self, view: &View, b: &LayoutBox) -> Vec2 {
        let z = view.zoom.x;
        Vec2::new(z, z * b.x.max(MIN_RADIUS))
    }

    fn children_span(&self, x: f64, y0: f64, y1: f64, style: Style) -> DrawCommand {
        DrawCommand::Arc {
            p1: Point::new(x, y0),
            p2: Point::new(x, y1),
            large: y1 - y0 > PI,
            style,
        }
    }
}
