// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw commands: the engine's output primitives.
//!
//! All geometry is in the native units of the active projection: literal x/y for the
//! rectangular projection, `(radius, angle)` pairs for the polar one.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Point;

use crate::types::{LayoutBox, Style};

/// Kind tag of a [`DrawCommand`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DrawKind {
    /// Node hit box.
    NodeBox,
    /// Straight segment.
    Line,
    /// Arc of constant primary coordinate.
    Arc,
    /// Circle.
    Circle,
    /// Ellipse.
    Ellipse,
    /// Rectangle.
    Rect,
    /// Rhombus.
    Rhombus,
    /// Polygon.
    Polygon,
    /// Triangle inscribed in a box.
    Triangle,
    /// Text.
    Text,
    /// Heat-map style value array.
    Array,
    /// Embedded HTML fragment.
    HtmlEmbed,
    /// Image.
    Image,
}

/// What a line stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// A node's branch, from its parent's children span to the node.
    Branch,
    /// The span joining a node's first and last child branches.
    ChildrenSpan,
    /// A collapsed run too thin to outline.
    Stub,
}

/// Direction a [`DrawCommand::Triangle`] points to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TipDirection {
    /// Toward increasing primary coordinate.
    Forward,
    /// Toward decreasing primary coordinate.
    Backward,
    /// Toward decreasing secondary coordinate.
    Up,
    /// Toward increasing secondary coordinate.
    Down,
}

/// Hit box of a drawn node, with the data a front end shows for it.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeBox {
    /// The node's box, including its drawn content and descendants.
    pub rect: LayoutBox,
    /// Display name.
    pub name: Option<String>,
    /// Properties after include/exclude filtering.
    pub props: BTreeMap<String, String>,
    /// Structural id path: child indices from the root.
    pub path: Vec<usize>,
    /// Names of the searches whose results contain the node.
    pub result_of: Vec<String>,
    /// Names of the searches with results below the node.
    pub parent_of: Vec<String>,
    /// Names of the selections whose results contain the node.
    pub selected_by: Vec<String>,
}

/// One drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Node hit box.
    NodeBox(NodeBox),
    /// Straight segment.
    Line {
        /// Start.
        p1: Point,
        /// End.
        p2: Point,
        /// What the line stands for.
        role: LineRole,
        /// Style payload.
        style: Style,
    },
    /// Arc at constant primary coordinate from `p1` to `p2`.
    Arc {
        /// Start.
        p1: Point,
        /// End.
        p2: Point,
        /// Whether the arc spans more than half a turn.
        large: bool,
        /// Style payload.
        style: Style,
    },
    /// Circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius in primary-axis units.
        radius: f64,
        /// Style payload.
        style: Style,
    },
    /// Ellipse.
    Ellipse {
        /// Center.
        center: Point,
        /// Radius along the primary axis.
        rx: f64,
        /// Radius along the secondary axis.
        ry: f64,
        /// Style payload.
        style: Style,
    },
    /// Rectangle (an annular sector in polar units).
    Rect {
        /// Geometry.
        rect: LayoutBox,
        /// Style payload.
        style: Style,
    },
    /// Rhombus through the midpoints of a box's edges.
    Rhombus {
        /// Corner points.
        points: [Point; 4],
        /// Style payload.
        style: Style,
    },
    /// Closed polygon.
    Polygon {
        /// Vertices.
        points: Vec<Point>,
        /// Style payload.
        style: Style,
    },
    /// Triangle inscribed in a box.
    Triangle {
        /// Enclosing box.
        rect: LayoutBox,
        /// Where the tip points.
        tip: TipDirection,
        /// Style payload.
        style: Style,
    },
    /// Text fitted to a box.
    Text {
        /// Box the text occupies.
        rect: LayoutBox,
        /// The text.
        text: String,
        /// Font size in pixels.
        font_size: f64,
        /// Style payload.
        style: Style,
    },
    /// Values spread evenly over a box.
    Array {
        /// Enclosing box.
        rect: LayoutBox,
        /// The values.
        values: Vec<f64>,
        /// Style payload.
        style: Style,
    },
    /// HTML fragment embedded in a box.
    HtmlEmbed {
        /// Enclosing box.
        rect: LayoutBox,
        /// Markup.
        html: String,
        /// Style payload.
        style: Style,
    },
    /// Image fitted to a box.
    Image {
        /// Enclosing box.
        rect: LayoutBox,
        /// Image location.
        url: String,
        /// Style payload.
        style: Style,
    },
}

impl DrawCommand {
    /// The kind tag.
    pub fn kind(&self) -> DrawKind {
        match self {
            Self::NodeBox(_) => DrawKind::NodeBox,
            Self::Line { .. } => DrawKind::Line,
            Self::Arc { .. } => DrawKind::Arc,
            Self::Circle { .. } => DrawKind::Circle,
            Self::Ellipse { .. } => DrawKind::Ellipse,
            Self::Rect { .. } => DrawKind::Rect,
            Self::Rhombus { .. } => DrawKind::Rhombus,
            Self::Polygon { .. } => DrawKind::Polygon,
            Self::Triangle { .. } => DrawKind::Triangle,
            Self::Text { .. } => DrawKind::Text,
            Self::Array { .. } => DrawKind::Array,
            Self::HtmlEmbed { .. } => DrawKind::HtmlEmbed,
            Self::Image { .. } => DrawKind::Image,
        }
    }

    /// The line role, for lines.
    pub fn line_role(&self) -> Option<LineRole> {
        match self {
            Self::Line { role, .. } => Some(*role),
            _ => None,
        }
    }

    /// The node box payload, for node boxes.
    pub fn as_node_box(&self) -> Option<&NodeBox> {
        match self {
            Self::NodeBox(nb) => Some(nb),
            _ => None,
        }
    }

    /// Conservative bounds in native units.
    pub fn bounds(&self) -> LayoutBox {
        match self {
            Self::NodeBox(nb) => nb.rect,
            Self::Line { p1, p2, .. } | Self::Arc { p1, p2, .. } => LayoutBox::from_points(*p1, *p2),
            Self::Circle { center, radius, .. } => {
                LayoutBox::new(center.x - radius, center.y - radius, 2.0 * radius, 2.0 * radius)
            }
            Self::Ellipse { center, rx, ry, .. } => {
                LayoutBox::new(center.x - rx, center.y - ry, 2.0 * rx, 2.0 * ry)
            }
            Self::Rhombus { points, .. } => points_bounds(points),
            Self::Polygon { points, .. } => points_bounds(points),
            Self::Rect { rect, .. }
            | Self::Triangle { rect, .. }
            | Self::Text { rect, .. }
            | Self::Array { rect, .. }
            | Self::HtmlEmbed { rect, .. }
            | Self::Image { rect, .. } => *rect,
        }
    }
}

fn points_bounds(points: &[Point]) -> LayoutBox {
    let Some((first, rest)) = points.split_first() else {
        return LayoutBox::default();
    };
    let start = LayoutBox::new(first.x, first.y, 0.0, 0.0);
    rest.iter()
        .fold(start, |acc, p| acc.union(&LayoutBox::new(p.x, p.y, 0.0, 0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn bounds_cover_geometry() {
        let line = DrawCommand::Line {
            p1: Point::new(3.0, 1.0),
            p2: Point::new(1.0, 1.0),
            role: LineRole::Branch,
            style: Style::new(),
        };
        assert_eq!(line.bounds(), LayoutBox::new(1.0, 1.0, 2.0, 0.0));
        assert_eq!(line.kind(), DrawKind::Line);
        assert_eq!(line.line_role(), Some(LineRole::Branch));

        let poly = DrawCommand::Polygon {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(4.0, 3.0),
                Point::new(0.0, 3.0),
            ],
            style: Style::new(),
        };
        assert_eq!(poly.bounds(), LayoutBox::new(0.0, 0.0, 4.0, 3.0));

        let circle = DrawCommand::Circle {
            center: Point::new(5.0, 5.0),
            radius: 1.0,
            style: Style::new(),
        };
        assert_eq!(circle.bounds(), LayoutBox::new(4.0, 4.0, 2.0, 2.0));
        assert!(circle.as_node_box().is_none());
    }
}
