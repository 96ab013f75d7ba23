// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Face layout negotiation: per-anchor boxes for a node's faces.
//!
//! Branch anchors are laid out locally: rows split the available breadth and each column
//! starts after the widest face drawn in the previous one. Aligned anchors share column
//! widths across the tree, so they run in two modes. The base pass measures them into an
//! [`AlignedGridState`] without drawing, and aligned panels place them using the sealed widths.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::command::DrawCommand;
use crate::face::{Anchor, AttachedFace, FaceBox, FaceNode, FaceOffer};
use crate::grid::AlignedGridState;
use crate::projection::{Projection, View};
use crate::types::{FaceFlags, LayoutBox};

/// How aligned anchors use the grid during a pass.
#[derive(Debug)]
pub(crate) enum GridAccess<'g> {
    /// Base pass: measure and fold widths, draw nothing.
    Measure(&'g mut AlignedGridState),
    /// Aligned panel: place with the sealed widths.
    Place(&'g AlignedGridState),
}

/// Which faces take part, by their [`FaceFlags::COLLAPSED_ONLY`] flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FaceFilter {
    /// An expanded node: everything but collapsed-only faces.
    Expanded,
    /// The representative of a collapsed run: only collapsed-only faces.
    CollapsedOnly,
}

impl FaceFilter {
    fn admits(self, flags: FaceFlags) -> bool {
        match self {
            Self::Expanded => !flags.contains(FaceFlags::COLLAPSED_ONLY),
            Self::CollapsedOnly => flags.contains(FaceFlags::COLLAPSED_ONLY),
        }
    }
}

/// Node geometry the anchors are positioned against.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct FaceFrame {
    /// The node's own branch box.
    pub(crate) content: LayoutBox,
    /// Secondary coordinate of the node's branch.
    pub(crate) branch_pos: f64,
    /// Branch positions of the first and last child, for internal nodes.
    pub(crate) child_span: Option<(f64, f64)>,
    /// Room right of the node before its closest child, for expanded internal nodes.
    pub(crate) dx_to_closest_child: Option<f64>,
    /// Primary coordinate of the first aligned column.
    pub(crate) aligned_x: f64,
    /// Which faces take part.
    pub(crate) filter: FaceFilter,
}

/// Lays out the faces of one node.
#[derive(Debug)]
pub(crate) struct Negotiator<'a, P: Projection> {
    pub(crate) projection: &'a P,
    pub(crate) view: &'a View,
    /// `0` for the base pass, the aligned panel index otherwise.
    pub(crate) panel: u32,
}

type Columns = BTreeMap<usize, Vec<AttachedFace>>;

impl<P: Projection> Negotiator<'_, P> {
    /// Lay out and draw every face at `anchor`; returns the primary extent used.
    pub(crate) fn anchor(
        &self,
        anchor: Anchor,
        columns: &Columns,
        node: &FaceNode<'_>,
        frame: &FaceFrame,
        grid: &mut GridAccess<'_>,
        out: &mut Vec<DrawCommand>,
    ) -> f64 {
        if anchor.is_aligned() {
            self.aligned(anchor, columns, node, frame, grid, out);
            0.0
        } else if self.panel == 0 {
            self.branch(anchor, columns, node, frame, out)
        } else {
            0.0
        }
    }

    fn branch(
        &self,
        anchor: Anchor,
        columns: &Columns,
        node: &FaceNode<'_>,
        frame: &FaceFrame,
        out: &mut Vec<DrawCommand>,
    ) -> f64 {
        let eligible: Vec<Vec<&AttachedFace>> = columns
            .values()
            .map(|rows| admitted(rows, frame.filter, None))
            .filter(|rows| !rows.is_empty())
            .collect();
        let n_col = eligible.len() as f64;
        let LayoutBox { x, y, dx, dy } = frame.content;
        let bs = frame.branch_pos;
        let mut dx_before = 0.0;
        for rows in &eligible {
            let n_row = rows.len() as f64;
            let mut widest: f64 = 0.0;
            for (row, attached) in rows.iter().enumerate() {
                let row = row as f64;
                let (fx, fy, avail_dx, avail_dy) = match anchor {
                    Anchor::BranchTop => {
                        let avail_dy = (bs - y) / n_row;
                        (x + dx_before, bs - avail_dy * (n_row - row), Some(dx / n_col), avail_dy)
                    }
                    Anchor::BranchBottom => {
                        let avail_dy = (y + dy - bs) / n_row;
                        (x + dx_before, bs + avail_dy * row, Some(dx / n_col), avail_dy)
                    }
                    _ => {
                        let mut half = (bs - y).min(y + dy - bs);
                        if let Some((s0, s1)) = frame.child_span {
                            half = half.min(bs - s0).min(s1 - bs);
                        }
                        let avail_dy = half * 2.0 / n_row;
                        (
                            x + dx + dx_before,
                            bs + (row - n_row / 2.0) * avail_dy,
                            frame.dx_to_closest_child.map(|d| d / n_col),
                            avail_dy,
                        )
                    }
                };
                let region = Region {
                    x: fx,
                    y: fy,
                    avail_dx,
                    avail_dy,
                };
                if let Some(placed) = self.negotiate(anchor, attached, node, &region) {
                    widest = widest.max(placed.used_dx);
                    attached.face.draw(&placed.content, &placed.face_box, out);
                }
            }
            dx_before += widest;
        }
        dx_before
    }

    fn aligned(
        &self,
        anchor: Anchor,
        columns: &Columns,
        node: &FaceNode<'_>,
        frame: &FaceFrame,
        grid: &mut GridAccess<'_>,
        out: &mut Vec<DrawCommand>,
    ) {
        let LayoutBox { y, dy, .. } = frame.content;
        for (&column, rows) in columns {
            match &mut *grid {
                GridAccess::Measure(grid) => {
                    for panel in panels_of(rows) {
                        let rows = admitted(rows, frame.filter, Some(panel));
                        let n_row = rows.len() as f64;
                        for (row, attached) in rows.iter().enumerate() {
                            let avail_dy = dy / n_row;
                            let region = Region {
                                x: frame.aligned_x,
                                y: y + row as f64 * avail_dy,
                                avail_dx: None,
                                avail_dy,
                            };
                            if let Some(placed) = self.negotiate(anchor, attached, node, &region) {
                                grid.fold(panel, column, placed.used_dx);
                            }
                        }
                    }
                }
                GridAccess::Place(grid) => {
                    let Some(width) = grid.width(self.panel, column) else {
                        continue;
                    };
                    let rows = admitted(rows, frame.filter, Some(self.panel));
                    let n_row = rows.len() as f64;
                    let x = frame.aligned_x + grid.offset(self.panel, column);
                    for (row, attached) in rows.iter().enumerate() {
                        let avail_dy = dy / n_row;
                        let region = Region {
                            x,
                            y: y + row as f64 * avail_dy,
                            avail_dx: Some(width),
                            avail_dy,
                        };
                        let Some(mut placed) = self.negotiate(anchor, attached, node, &region)
                        else {
                            continue;
                        };
                        let slack = (width - placed.used_dx).max(0.0);
                        placed.face_box.bbox.x += match anchor {
                            Anchor::AlignedTrailing => slack,
                            Anchor::AlignedCentered => slack / 2.0,
                            _ => 0.0,
                        };
                        attached.face.draw(&placed.content, &placed.face_box, out);
                    }
                }
            }
        }
    }

    /// Offer a region to one face; `None` when it draws nothing.
    fn negotiate(
        &self,
        anchor: Anchor,
        attached: &AttachedFace,
        node: &FaceNode<'_>,
        region: &Region,
    ) -> Option<Placed> {
        let face = &attached.face;
        let content = face.content(node)?;
        let pad = face.padding();
        let offer_box = LayoutBox::new(
            region.x + pad.x,
            region.y + pad.y,
            region.avail_dx.map_or(0.0, |w| (w - 2.0 * pad.x).max(0.0)),
            (region.avail_dy - 2.0 * pad.y).max(0.0),
        );
        let offer = FaceOffer {
            anchor,
            x: offer_box.x,
            y: offer_box.y,
            avail_dx: region.avail_dx.map(|_| offer_box.dx),
            avail_dy: offer_box.dy,
            px_scale: self.projection.px_scale(self.view, &offer_box),
        };
        let face_box = face.compute_bounding_box(&content, &offer)?;
        if !face.flags().contains(FaceFlags::ALWAYS_DRAWN) && !face.fits(&face_box) {
            return None;
        }
        Some(Placed {
            used_dx: face_box.bbox.dx + 2.0 * pad.x,
            content,
            face_box,
        })
    }
}

#[derive(Copy, Clone, Debug)]
struct Region {
    x: f64,
    y: f64,
    avail_dx: Option<f64>,
    avail_dy: f64,
}

#[derive(Clone, Debug)]
struct Placed {
    content: String,
    face_box: FaceBox,
    /// Primary extent including padding.
    used_dx: f64,
}

/// Faces of a column taking part under `filter`, optionally restricted to one aligned panel.
fn admitted(rows: &[AttachedFace], filter: FaceFilter, panel: Option<u32>) -> Vec<&AttachedFace> {
    rows.iter()
        .filter(|f| filter.admits(f.face.flags()))
        .filter(|f| panel.is_none_or(|p| f.panel == p))
        .collect()
}

/// Distinct aligned panels used by a column, ascending.
fn panels_of(rows: &[AttachedFace]) -> Vec<u32> {
    let mut panels: Vec<u32> = rows.iter().map(|f| f.panel).collect();
    panels.sort_unstable();
    panels.dedup();
    panels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faces::{RectFace, TextFace};
    use crate::projections::RectProjection;
    use crate::tree::NodeData;
    use alloc::sync::Arc;
    use alloc::vec;
    use kurbo::Vec2;

    fn view() -> View {
        View {
            viewport: None,
            zoom: Vec2::new(10.0, 10.0),
            collapse_threshold_px: 6.0,
            aligned_panel: false,
        }
    }

    fn columns(faces: Vec<(usize, AttachedFace)>) -> Columns {
        let mut out = Columns::new();
        for (col, f) in faces {
            out.entry(col).or_default().push(f);
        }
        out
    }

    fn attached(face: impl crate::Face + 'static, panel: u32) -> AttachedFace {
        AttachedFace {
            face: Arc::new(face),
            panel,
        }
    }

    fn frame() -> FaceFrame {
        FaceFrame {
            content: LayoutBox::new(0.0, 0.0, 4.0, 2.0),
            branch_pos: 1.0,
            child_span: None,
            dx_to_closest_child: None,
            aligned_x: 10.0,
            filter: FaceFilter::Expanded,
        }
    }

    fn leaf_node(data: &NodeData) -> FaceNode<'_> {
        FaceNode {
            data: Some(data),
            is_leaf: true,
            collapsed: false,
            members: 1,
        }
    }

    #[test]
    fn branch_columns_advance_by_widest_face() {
        let p = RectProjection::new();
        let v = view();
        let neg = Negotiator {
            projection: &p,
            view: &v,
            panel: 0,
        };
        let data = NodeData::named("n", 4.0);
        let cols = columns(vec![
            (0, attached(RectFace::new(1.5), 1)),
            (0, attached(RectFace::new(0.5), 1)),
            (1, attached(RectFace::new(2.0), 1)),
        ]);
        let mut grid = AlignedGridState::new();
        let mut out = Vec::new();
        let used = neg.anchor(
            Anchor::BranchRight,
            &cols,
            &leaf_node(&data),
            &frame(),
            &mut GridAccess::Measure(&mut grid),
            &mut out,
        );
        assert_eq!(used, 3.5);
        let rects: Vec<LayoutBox> = out.iter().map(DrawCommand::bounds).collect();
        // Two rows of one unit around the branch at y = 1, then the next column at x = 4 + 1.5.
        assert_eq!(rects[0], LayoutBox::new(4.0, 0.0, 1.5, 1.0));
        assert_eq!(rects[1], LayoutBox::new(4.0, 1.0, 0.5, 1.0));
        assert_eq!(rects[2], LayoutBox::new(5.5, 0.0, 2.0, 2.0));
    }

    #[test]
    fn refused_faces_draw_nothing_unless_always_drawn() {
        let p = RectProjection::new();
        let v = view();
        let neg = Negotiator {
            projection: &p,
            view: &v,
            panel: 0,
        };
        let data = NodeData::named("n", 4.0);
        // Rows of 0.1 units at 10 px per unit are 1px tall, below the legible minimum.
        let mut f = frame();
        f.content.dy = 0.4;
        f.branch_pos = 0.2;
        let cols = columns(vec![
            (0, attached(TextFace::new("tiny"), 1)),
            (0, attached(RectFace::new(1.0).with_flags(FaceFlags::ALWAYS_DRAWN), 1)),
        ]);
        let mut grid = AlignedGridState::new();
        let mut out = Vec::new();
        let used = neg.anchor(
            Anchor::BranchBottom,
            &cols,
            &leaf_node(&data),
            &f,
            &mut GridAccess::Measure(&mut grid),
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind(), crate::DrawKind::Rect);
        assert_eq!(used, 4.0, "the background fills the branch width");
    }

    #[test]
    fn aligned_measure_then_place() {
        let p = RectProjection::new();
        let v = view();
        let data = NodeData::named("n", 4.0);
        let cols = columns(vec![
            (0, attached(TextFace::new("abcd"), 1)),
            (1, attached(TextFace::new("ab"), 1)),
            (1, attached(TextFace::new("skip").with_flags(FaceFlags::COLLAPSED_ONLY), 1)),
        ]);
        let mut grid = AlignedGridState::new();
        let mut out = Vec::new();
        let measure = Negotiator {
            projection: &p,
            view: &v,
            panel: 0,
        };
        measure.anchor(
            Anchor::AlignedTrailing,
            &cols,
            &leaf_node(&data),
            &frame(),
            &mut GridAccess::Measure(&mut grid),
            &mut out,
        );
        assert!(out.is_empty(), "measuring draws nothing");
        // 15px text: 0.9 units per glyph at 10 px per unit.
        assert!((grid.width(1, 0).unwrap() - 3.6).abs() < 1e-9);
        assert!((grid.width(1, 1).unwrap() - 1.8).abs() < 1e-9);
        grid.seal();

        // A wider column from another node: trailing text moves to the column end.
        let mut wide = grid.clone();
        wide.clear();
        wide.fold(1, 0, 5.0);
        wide.fold(1, 1, 1.8);
        wide.seal();
        let place = Negotiator {
            projection: &p,
            view: &v,
            panel: 1,
        };
        place.anchor(
            Anchor::AlignedTrailing,
            &cols,
            &leaf_node(&data),
            &frame(),
            &mut GridAccess::Place(&wide),
            &mut out,
        );
        assert_eq!(out.len(), 2);
        let first = out[0].bounds();
        assert!((first.x - (10.0 + 5.0 - 3.6)).abs() < 1e-9);
        let second = out[1].bounds();
        assert!((second.x - 15.0).abs() < 1e-9, "second column starts after the first");
        assert!(second.dx <= 1.8 + 1e-9);
    }

    #[test]
    fn other_panels_are_not_placed() {
        let p = RectProjection::new();
        let v = view();
        let data = NodeData::named("n", 4.0);
        let cols = columns(vec![(0, attached(TextFace::new("abcd"), 2))]);
        let mut grid = AlignedGridState::new();
        let mut out = Vec::new();
        let measure = Negotiator {
            projection: &p,
            view: &v,
            panel: 0,
        };
        measure.anchor(
            Anchor::AlignedLeading,
            &cols,
            &leaf_node(&data),
            &frame(),
            &mut GridAccess::Measure(&mut grid),
            &mut out,
        );
        assert!(grid.width(1, 0).is_none() && grid.width(2, 0).is_some());
        let place = Negotiator {
            projection: &p,
            view: &v,
            panel: 1,
        };
        place.anchor(
            Anchor::AlignedLeading,
            &cols,
            &leaf_node(&data),
            &frame(),
            &mut GridAccess::Place(&grid),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
