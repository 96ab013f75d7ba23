// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-command emitter: drives the walk and produces each panel's command stream.
//!
//! ## Panels
//!
//! Panel 0 (the base panel) draws branches, markers, branch faces, collapsed outlines and
//! node boxes. It also measures every aligned face into an [`AlignedGridState`].
//! Aligned panels (1 and up) draw only the aligned faces assigned to them, using the widths
//! sealed by the base pass. Run the base stream to completion before asking for any
//! aligned panel; [`Drawer::aligned`] refuses an unsealed grid.
//!
//! ## Streaming
//!
//! Streams are lazy: the tree is walked only as far as the consumer pulls commands, and
//! subtrees that are invisible or collapsed are pruned from the walk. Node boxes are held
//! back and emitted at the end in reverse encounter order, ancestors first.
//!
//! When the tree has aligned faces, the base pass keeps walking subtrees that are outside
//! the viewport but still visible to the aligned panels. Those subtrees are laid out and
//! measured, but nothing is emitted for them, so column widths do not depend on
//! horizontal scrolling.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Point;
use tracing::{debug, trace};

use crate::command::{DrawCommand, LineRole, NodeBox};
use crate::error::ConfigError;
use crate::face::{Anchor, FaceMap, FaceNode};
use crate::grid::AlignedGridState;
use crate::negotiate::{FaceFilter, FaceFrame, GridAccess, Negotiator};
use crate::outline::{Collapser, RenderTarget, Resolved};
use crate::params::{DrawParams, Highlight};
use crate::projection::{Projection, View};
use crate::tree::Tree;
use crate::types::{LayoutBox, NodeId, Style};
use crate::walk::{Visit, VisitKind, Walk};

/// A validated render of one tree snapshot.
///
/// Construction checks every parameter, so a stream never stops halfway on bad input.
#[derive(Debug)]
pub struct Drawer<'t, P: Projection> {
    tree: &'t Tree,
    params: &'t DrawParams,
    projection: P,
    aligned_x: f64,
}

impl<'t, P: Projection> Drawer<'t, P> {
    /// Validate the configuration and prepare `projection` for `tree`.
    ///
    /// The tree must be [committed](Tree::commit).
    pub fn new(tree: &'t Tree, params: &'t DrawParams, mut projection: P) -> Result<Self, ConfigError> {
        params.validate()?;
        projection.validate()?;
        debug_assert!(tree.is_committed(), "draw requires committed subtree sizes");
        let root = tree.node(tree.root());
        projection.prepare(root.size());
        let reach = projection.origin().x + projection.node_size(root).width;
        Ok(Self {
            tree,
            params,
            aligned_x: params.aligned_origin.max(reach),
            projection,
        })
    }

    /// The prepared projection.
    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Primary coordinate of the first aligned column.
    pub fn aligned_origin(&self) -> f64 {
        self.aligned_x
    }

    /// Stream the base panel, measuring aligned faces into `grid`.
    ///
    /// The grid is cleared now and sealed when the stream is exhausted.
    pub fn base<'a>(&'a self, grid: &'a mut AlignedGridState) -> DrawStream<'a, P> {
        grid.clear();
        self.stream(0, GridAccess::Measure(grid))
    }

    /// Stream aligned panel `panel` using the widths sealed by a finished base pass.
    pub fn aligned<'a>(
        &'a self,
        panel: u32,
        grid: &'a AlignedGridState,
    ) -> Result<DrawStream<'a, P>, ConfigError> {
        if panel == 0 {
            return Err(ConfigError::InvalidPanel { panel });
        }
        if !grid.is_sealed() {
            return Err(ConfigError::GridNotMeasured { panel });
        }
        Ok(self.stream(panel, GridAccess::Place(grid)))
    }

    fn stream<'a>(&'a self, panel: u32, grid: GridAccess<'a>) -> DrawStream<'a, P> {
        debug!(panel, nodes = self.tree.len(), "draw pass started");
        DrawStream {
            tree: self.tree,
            params: self.params,
            projection: &self.projection,
            aligned_x: self.aligned_x,
            view: View {
                viewport: self.params.viewport,
                zoom: self.params.zoom,
                collapse_threshold_px: self.params.collapse_threshold_px,
                aligned_panel: panel != 0,
            },
            panel,
            grid,
            walk: self.tree.walk(self.tree.root()),
            collapser: Collapser::default(),
            frames: Vec::new(),
            point: self.projection.origin(),
            skip_exit: false,
            muted: false,
            run_visible: false,
            pending: VecDeque::new(),
            node_boxes: Vec::new(),
            scratch: Vec::new(),
            finished: false,
            stats: PassStats::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct PassStats {
    nodes_visited: usize,
    commands: usize,
    runs_flushed: usize,
}

/// An expanded node whose descendants are being drawn.
#[derive(Clone, Debug)]
struct Frame {
    node: NodeId,
    start: Point,
    branch_positions: Vec<f64>,
    /// Deepest node box among the children, relative to the children's start.
    child_box_dx: f64,
    /// Laid out for measurement only; nothing is emitted for it.
    muted: bool,
}

/// Lazy command stream of one panel. See the [module docs](self).
#[derive(Debug)]
pub struct DrawStream<'a, P: Projection> {
    tree: &'a Tree,
    params: &'a DrawParams,
    projection: &'a P,
    aligned_x: f64,
    view: View,
    panel: u32,
    grid: GridAccess<'a>,
    walk: Walk<'a>,
    collapser: Collapser,
    frames: Vec<Frame>,
    point: Point,
    skip_exit: bool,
    /// Drop every command and node box while set.
    muted: bool,
    /// Whether any member of the pending collapsed run is in the viewport.
    run_visible: bool,
    pending: VecDeque<DrawCommand>,
    node_boxes: Vec<DrawCommand>,
    scratch: Vec<DrawCommand>,
    finished: bool,
    stats: PassStats,
}

impl<P: Projection> DrawStream<'_, P> {
    /// The panel this stream draws.
    pub fn panel(&self) -> u32 {
        self.panel
    }

    fn visit(&mut self, v: Visit) {
        match v.kind {
            VisitKind::Enter => self.enter(v.node),
            VisitKind::Exit => self.exit(v.node),
        }
    }

    fn enter(&mut self, id: NodeId) {
        self.stats.nodes_visited += 1;
        let tree = self.tree;
        let node = tree.node(id);
        let size = self.projection.node_size(node);
        let b = LayoutBox::new(self.point.x, self.point.y, size.width, size.height);

        let parent_muted = self.frames.last().is_some_and(|f| f.muted);
        let visible = !parent_muted && self.projection.in_viewport(&self.view, &b);
        if !visible && !self.measures_aligned(&b) {
            self.flush();
            self.record_child(b.y + b.dy / 2.0, 0.0);
            self.skip(b.dy);
            return;
        }
        if self.params.collapsed.contains(&id) || self.projection.is_small(&self.view, &b) {
            let walk = &self.walk;
            self.collapser
                .stack(id, node.parent(), &b, || walk.path().collect());
            self.run_visible |= visible;
            self.skip(b.dy);
            return;
        }
        self.flush();
        self.frames.push(Frame {
            node: id,
            start: self.point,
            branch_positions: Vec::new(),
            child_box_dx: 0.0,
            muted: !visible,
        });
        self.point.x += self.projection.content_size(node).width;
    }

    /// Whether the base pass must still lay out a box outside the viewport, because the
    /// aligned panels can see it.
    fn measures_aligned(&self, b: &LayoutBox) -> bool {
        if !matches!(self.grid, GridAccess::Measure(_)) || !self.tree.has_aligned_faces() {
            return false;
        }
        let aligned = View {
            aligned_panel: true,
            ..self.view
        };
        self.projection.in_viewport(&aligned, b)
    }

    /// Prune the node just entered and move past its breadth.
    fn skip(&mut self, dy: f64) {
        self.point.y += dy;
        self.walk.prune();
        self.skip_exit = true;
    }

    fn exit(&mut self, id: NodeId) {
        if core::mem::take(&mut self.skip_exit) {
            return;
        }
        self.flush();
        let Some(frame) = self.frames.pop() else {
            return;
        };
        debug_assert_eq!(frame.node, id, "frames follow the walk");
        let path: Vec<usize> = self.walk.path().collect();
        self.muted = frame.muted;
        let (bs, box_dx) = self.draw_node(&frame, path);
        self.muted = false;
        let dy = self.projection.node_size(self.tree.node(id)).height;
        self.point = Point::new(frame.start.x, frame.start.y + dy);
        self.record_child(bs, if frame.muted { 0.0 } else { box_dx });
    }

    /// Report a finished child to the enclosing frame.
    fn record_child(&mut self, branch_pos: f64, box_dx: f64) {
        if let Some(parent) = self.frames.last_mut() {
            parent.branch_positions.push(branch_pos);
            parent.child_box_dx = parent.child_box_dx.max(box_dx);
        }
    }

    /// Draw an expanded node whose children are done; returns its branch position and
    /// node box depth.
    fn draw_node(&mut self, frame: &Frame, path: Vec<usize>) -> (f64, f64) {
        let tree = self.tree;
        let node = tree.node(frame.node);
        let style = &node.data().style;
        let size = self.projection.node_size(node);
        let content_dx = self.projection.content_size(node).width;
        let Point { x, y } = frame.start;
        let first_last = frame
            .branch_positions
            .first()
            .zip(frame.branch_positions.last())
            .map(|(&a, &b)| (a, b));
        let bs = first_last.map_or(y + size.height / 2.0, |(a, b)| (a + b) / 2.0);
        let end = x + content_dx;

        if self.panel == 0 {
            if frame.node != tree.root() && content_dx > 0.0 {
                self.emit(DrawCommand::Line {
                    p1: Point::new(x, bs),
                    p2: Point::new(end, bs),
                    role: LineRole::Branch,
                    style: style.clone(),
                });
            }
            if let Some((s0, s1)) = first_last {
                self.emit(self.projection.children_span(end, s0, s1, style.clone()));
            }
            if self.params.node_marker_px > 0.0 {
                self.emit(DrawCommand::Circle {
                    center: Point::new(end, bs),
                    radius: self.params.node_marker_px / self.view.zoom.x,
                    style: style.clone(),
                });
            }
        }

        let dx_to_closest_child = node
            .children()
            .iter()
            .map(|c| tree.node(*c).dist().abs())
            .reduce(f64::min);
        let face_frame = FaceFrame {
            content: LayoutBox::new(x, y, content_dx, size.height),
            branch_pos: bs,
            child_span: first_last,
            dx_to_closest_child,
            aligned_x: self.aligned_x,
            filter: FaceFilter::Expanded,
        };
        let face_node = FaceNode {
            data: Some(node.data()),
            is_leaf: node.is_leaf(),
            collapsed: false,
            members: 1,
        };
        let right = self.draw_faces(node.faces(), &face_node, &face_frame);

        let box_dx = size
            .width
            .max(content_dx + right.max(frame.child_box_dx));
        if self.panel == 0 && !self.muted {
            let rect = LayoutBox::new(x, y, box_dx, size.height);
            self.node_boxes.push(self.node_box(frame.node, rect, path));
        }
        (bs, box_dx)
    }

    /// Lay out every anchor of a face map; returns the extent used right of the branch.
    fn draw_faces(
        &mut self,
        faces: &FaceMap,
        face_node: &FaceNode<'_>,
        frame: &FaceFrame,
    ) -> f64 {
        let negotiator = Negotiator {
            projection: self.projection,
            view: &self.view,
            panel: self.panel,
        };
        let mut right = 0.0;
        let mut out = core::mem::take(&mut self.scratch);
        for (&anchor, columns) in faces {
            let used = negotiator.anchor(anchor, columns, face_node, frame, &mut self.grid, &mut out);
            if anchor == Anchor::BranchRight {
                right = used;
            }
        }
        for cmd in out.drain(..) {
            self.emit(cmd);
        }
        self.scratch = out;
        right
    }

    fn node_box(&self, id: NodeId, rect: LayoutBox, path: Vec<usize>) -> DrawCommand {
        let data = self.tree.node(id).data();
        let props = data
            .props
            .iter()
            .filter(|(k, _)| self.params.forwards_prop(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        DrawCommand::NodeBox(NodeBox {
            rect,
            name: data.name.clone(),
            props,
            path,
            result_of: tags(&self.params.searches, |h| h.results.contains(&id)),
            parent_of: tags(&self.params.searches, |h| h.parents.contains(&id)),
            selected_by: tags(&self.params.selections, |h| h.results.contains(&id)),
        })
    }

    /// Resolve and draw the pending collapsed run, if any.
    fn flush(&mut self) {
        let Some(run) = self.collapser.take() else {
            return;
        };
        self.stats.runs_flushed += 1;
        let branch_pos = run.branch_pos();
        let bounds = run.outline.bounds();
        let breadth_px = self.projection.breadth_px(&self.view, &bounds);
        let members = run.members.len();
        let resolved = run.resolve(self.tree, breadth_px, self.params.collapsing_height_px);
        trace!(
            panel = self.panel,
            members,
            dy = bounds.dy,
            kind = resolved.label(),
            "collapsed run flushed"
        );
        self.muted = !core::mem::take(&mut self.run_visible);
        let box_dx = self.draw_resolved(resolved);
        let box_dx = if self.muted { 0.0 } else { box_dx };
        self.muted = false;
        self.record_child(branch_pos, box_dx);
    }

    fn draw_resolved(&mut self, resolved: Resolved) -> f64 {
        match resolved {
            Resolved::Leaf { node, rect, path } => {
                let frame = Frame {
                    node,
                    start: Point::new(rect.x, rect.y),
                    branch_positions: Vec::new(),
                    child_box_dx: 0.0,
                    muted: self.muted,
                };
                self.draw_node(&frame, path).1
            }
            Resolved::Stub { outline, style_of } => {
                if self.panel == 0 {
                    let mid = outline.y + outline.dy / 2.0;
                    self.emit(DrawCommand::Line {
                        p1: Point::new(outline.x, mid),
                        p2: Point::new(outline.x + outline.dx_max, mid),
                        role: LineRole::Stub,
                        style: self.tree.node(style_of).data().style.clone(),
                    });
                }
                outline.dx_max
            }
            Resolved::Outline {
                outline,
                target,
                members,
                sole_path,
            } => {
                if self.panel == 0 {
                    let style: Style = target.style(self.tree).clone();
                    self.emit(DrawCommand::Polygon {
                        points: outline.corners().to_vec(),
                        style,
                    });
                }
                self.draw_representative(&target, members, &outline.bounds());
                if let (Some(path), Some(id), 0, false) =
                    (sole_path, target.node(), self.panel, self.muted)
                {
                    let nb = self.node_box(id, outline.bounds(), path);
                    self.node_boxes.push(nb);
                }
                outline.dx_max
            }
        }
    }

    /// Draw the collapsed-only faces of a run's representative right of its outline.
    fn draw_representative(&mut self, target: &RenderTarget, members: usize, bounds: &LayoutBox) {
        let Some(faces) = target.faces(self.tree) else {
            return;
        };
        let face_node = target.face_node(self.tree, members);
        let content = match target {
            RenderTarget::SyntheticGroup { size, .. } => {
                LayoutBox::new(bounds.x, bounds.y, size.width, size.height)
            }
            RenderTarget::Node(_) => *bounds,
        };
        let frame = FaceFrame {
            content,
            branch_pos: bounds.y + bounds.dy / 2.0,
            child_span: None,
            dx_to_closest_child: None,
            aligned_x: self.aligned_x,
            filter: FaceFilter::CollapsedOnly,
        };
        self.draw_faces(faces, &face_node, &frame);
    }

    /// Queue a non-node-box command, dropping geometry outside the viewport.
    fn emit(&mut self, cmd: DrawCommand) {
        if self.muted {
            return;
        }
        if self.view.viewport.is_some() && !self.projection.in_viewport(&self.view, &cmd.bounds()) {
            return;
        }
        self.pending.push_back(cmd);
    }

    fn finish(&mut self) {
        self.flush();
        self.pending.extend(self.node_boxes.drain(..).rev());
        self.finished = true;
        if let GridAccess::Measure(grid) = &mut self.grid {
            grid.seal();
            debug!(columns = grid.len(), "aligned grid sealed");
        }
        debug!(
            panel = self.panel,
            nodes_visited = self.stats.nodes_visited,
            commands = self.stats.commands + self.pending.len(),
            runs_flushed = self.stats.runs_flushed,
            "draw pass finished"
        );
    }
}

/// Names of the highlights matching a node.
fn tags(named: &BTreeMap<String, Highlight>, matches: impl Fn(&Highlight) -> bool) -> Vec<String> {
    named
        .iter()
        .filter(|(_, h)| matches(h))
        .map(|(name, _)| name.clone())
        .collect()
}

impl<P: Projection> Iterator for DrawStream<'_, P> {
    type Item = DrawCommand;

    fn next(&mut self) -> Option<DrawCommand> {
        loop {
            if let Some(cmd) = self.pending.pop_front() {
                self.stats.commands += 1;
                return Some(cmd);
            }
            if self.finished {
                return None;
            }
            match self.walk.next() {
                Some(v) => self.visit(v),
                None => self.finish(),
            }
        }
    }
}
