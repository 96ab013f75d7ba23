// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collapse accumulator: merges contiguous runs of collapsed siblings into one outline.

use alloc::vec::Vec;
use kurbo::Size;

use crate::face::{FaceMap, FaceNode};
use crate::tree::Tree;
use crate::types::{LayoutBox, NodeId, SlantedBox, Style};

/// The node a collapsed outline is drawn for.
///
/// Downstream code draws faces and node boxes through this type, so it never needs to ask
/// whether the node really exists in the tree.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderTarget {
    /// A real tree node: the sole member of a run, or the parent of a run spanning all
    /// its children.
    Node(NodeId),
    /// An ownerless placeholder standing in for a partial run of siblings.
    ///
    /// It exists only while its run is being drawn.
    SyntheticGroup {
        /// The collapsed siblings, in drawing order.
        members: Vec<NodeId>,
        /// Depth and breadth extents of the run.
        size: Size,
        /// Style of the placeholder.
        style: Style,
        /// Common parent of the members, whose collapsed-only faces the group draws.
        parent: Option<NodeId>,
    },
}

impl RenderTarget {
    /// The real node, if this is not a synthetic group.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(*id),
            Self::SyntheticGroup { .. } => None,
        }
    }

    /// Style used for the outline.
    pub fn style<'a>(&'a self, tree: &'a Tree) -> &'a Style {
        match self {
            Self::Node(id) => &tree.node(*id).data().style,
            Self::SyntheticGroup { style, .. } => style,
        }
    }

    /// Faces considered when drawing the target.
    pub(crate) fn faces<'a>(&self, tree: &'a Tree) -> Option<&'a FaceMap> {
        match self {
            Self::Node(id) => Some(tree.node(*id).faces()),
            Self::SyntheticGroup { parent, .. } => parent.map(|p| tree.node(p).faces()),
        }
    }

    /// The view faces get of the target, as the representative of `members` collapsed siblings.
    pub(crate) fn face_node<'a>(&self, tree: &'a Tree, members: usize) -> FaceNode<'a> {
        match self {
            Self::Node(id) => {
                let node = tree.node(*id);
                FaceNode {
                    data: Some(node.data()),
                    is_leaf: node.is_leaf(),
                    collapsed: true,
                    members,
                }
            }
            Self::SyntheticGroup { .. } => FaceNode {
                data: None,
                is_leaf: false,
                collapsed: true,
                members,
            },
        }
    }
}

/// A contiguous run of collapsed siblings awaiting a flush.
#[derive(Clone, Debug)]
pub(crate) struct Run {
    pub(crate) outline: SlantedBox,
    pub(crate) members: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    /// Structural id path of the first member.
    pub(crate) first_path: Vec<usize>,
}

impl Run {
    /// The single branch position the run contributes to its parent.
    pub(crate) fn branch_pos(&self) -> f64 {
        self.outline.y + self.outline.dy / 2.0
    }

    /// Decide how the run is drawn.
    ///
    /// `breadth_px` is the on-screen breadth of the outline's bounds.
    pub(crate) fn resolve(
        self,
        tree: &Tree,
        breadth_px: f64,
        collapsing_height_px: f64,
    ) -> Resolved {
        if let [only] = *self.members.as_slice()
            && tree.node(only).is_leaf()
        {
            return Resolved::Leaf {
                node: only,
                rect: self.outline.bounds(),
                path: self.first_path,
            };
        }
        if breadth_px < collapsing_height_px {
            return Resolved::Stub {
                outline: self.outline,
                style_of: self.members[0],
            };
        }
        let members = self.members.len();
        let whole_family = self
            .parent
            .filter(|p| tree.node(*p).children().len() == members);
        let target = match whole_family {
            _ if members == 1 => RenderTarget::Node(self.members[0]),
            Some(p) => RenderTarget::Node(p),
            None => RenderTarget::SyntheticGroup {
                size: Size::new(self.outline.dx_max, self.outline.dy),
                style: Style::new(),
                parent: self.parent,
                members: self.members,
            },
        };
        Resolved::Outline {
            outline: self.outline,
            target,
            members,
            sole_path: (members == 1).then_some(self.first_path),
        }
    }
}

/// How a flushed run is drawn.
#[derive(Clone, Debug)]
pub(crate) enum Resolved {
    /// A lone leaf, drawn as an ordinary node.
    Leaf {
        node: NodeId,
        rect: LayoutBox,
        path: Vec<usize>,
    },
    /// A run too thin to outline, drawn as one line.
    Stub { outline: SlantedBox, style_of: NodeId },
    /// An outline with its representative.
    Outline {
        outline: SlantedBox,
        target: RenderTarget,
        members: usize,
        /// Id path of the sole member, which gets a node box spanning the outline.
        sole_path: Option<Vec<usize>>,
    },
}

impl Resolved {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Leaf { .. } => "leaf",
            Self::Stub { .. } => "stub",
            Self::Outline { .. } => "outline",
        }
    }
}

/// Accumulator state for one render.
#[derive(Clone, Debug, Default)]
pub(crate) enum Collapser {
    #[default]
    Idle,
    Accumulating(Run),
}

impl Collapser {
    pub(crate) fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Merge a collapsed sibling into the current run, starting one if idle.
    pub(crate) fn stack(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
        b: &LayoutBox,
        path: impl FnOnce() -> Vec<usize>,
    ) {
        match self {
            Self::Idle => {
                *self = Self::Accumulating(Run {
                    outline: SlantedBox::from_box(b),
                    members: alloc::vec![node],
                    parent,
                    first_path: path(),
                });
            }
            Self::Accumulating(run) => {
                debug_assert_eq!(run.parent, parent, "a run only holds siblings");
                run.outline = SlantedBox::stack(Some(run.outline), b);
                run.members.push(node);
            }
        }
    }

    /// End the current run, if any, returning to idle.
    pub(crate) fn take(&mut self) -> Option<Run> {
        match core::mem::take(self) {
            Self::Idle => None,
            Self::Accumulating(run) => Some(run),
        }
    }
}
