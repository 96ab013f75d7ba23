// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree model: structure, per-node data, attached faces, and cached subtree sizes.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Size;

use crate::error::ConfigError;
use crate::face::{AttachedFace, Face, FaceMap, FaceSlot};
use crate::types::{NodeId, Style};
use crate::walk::Walk;

/// Breadth of a leaf, in layout units.
pub const LEAF_BREADTH: f64 = 1.0;

/// User data of a node.
#[derive(Clone, Debug, Default)]
pub struct NodeData {
    /// Display name.
    pub name: Option<String>,
    /// Branch length to the parent. Negative lengths are drawn by magnitude.
    pub dist: f64,
    /// Arbitrary properties, forwarded (filtered) with the node's hit box.
    pub props: BTreeMap<String, String>,
    /// Style applied to the node's branch, marker, and outline.
    pub style: Style,
}

impl NodeData {
    /// A named node with the given branch length.
    pub fn named(name: &str, dist: f64) -> Self {
        Self {
            name: Some(name.into()),
            dist,
            ..Default::default()
        }
    }
}

/// A node in the tree.
#[derive(Clone, Debug)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
    faces: FaceMap,
    size: Size,
}

impl Node {
    fn new(parent: Option<NodeId>, data: NodeData) -> Self {
        Self {
            parent,
            children: Vec::new(),
            data,
            faces: FaceMap::new(),
            size: Size::ZERO,
        }
    }

    /// Parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in drawing order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// User data.
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Branch length.
    pub fn dist(&self) -> f64 {
        self.data.dist
    }

    /// Cached subtree size: width is the depth extent, height the breadth extent.
    ///
    /// Only meaningful after [`Tree::commit`].
    pub fn size(&self) -> Size {
        self.size
    }

    /// Attached faces.
    pub fn faces(&self) -> &FaceMap {
        &self.faces
    }
}

/// A rooted, ordered tree.
///
/// The tree grows by [`Tree::add_child`]; sizes are recomputed in one batch by [`Tree::commit`].
/// Drawing reads the tree without mutating it.
#[derive(Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    committed: bool,
    aligned_faces: bool,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let leaves = self.nodes.iter().filter(|n| n.is_leaf()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &self.nodes.len())
            .field("leaves", &leaves)
            .field("committed", &self.committed)
            .field("aligned_faces", &self.aligned_faces)
            .field("root_size", &self.nodes[0].size)
            .finish_non_exhaustive()
    }
}

impl Tree {
    /// Create a tree holding only a root.
    pub fn new(root: NodeData) -> Self {
        Self {
            nodes: vec![Node::new(None, root)],
            committed: false,
            aligned_faces: false,
        }
    }

    /// The root node.
    pub const fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always has a root, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append a child to `parent`.
    pub fn add_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node::new(Some(parent), data));
        self.nodes[parent.idx()].children.push(id);
        self.committed = false;
        id
    }

    /// Attach a face.
    pub fn add_face(&mut self, id: NodeId, slot: FaceSlot, face: Arc<dyn Face>) {
        self.aligned_faces |= slot.anchor.is_aligned();
        self.nodes[id.idx()]
            .faces
            .entry(slot.anchor)
            .or_default()
            .entry(slot.column)
            .or_default()
            .push(AttachedFace {
                face,
                panel: slot.panel,
            });
    }

    /// Attach a face by anchor name, failing on names outside the known set.
    pub fn add_face_named(
        &mut self,
        id: NodeId,
        anchor: &str,
        column: usize,
        face: Arc<dyn Face>,
    ) -> Result<(), ConfigError> {
        let anchor = anchor.parse()?;
        self.add_face(id, FaceSlot::new(anchor, column), face);
        Ok(())
    }

    /// Update a branch length.
    pub fn set_dist(&mut self, id: NodeId, dist: f64) {
        self.nodes[id.idx()].data.dist = dist;
        self.committed = false;
    }

    /// Mutable access to a node's style.
    pub fn style_mut(&mut self, id: NodeId) -> &mut Style {
        &mut self.nodes[id.idx()].data.style
    }

    /// Mutable access to a node's properties.
    pub fn props_mut(&mut self, id: NodeId) -> &mut BTreeMap<String, String> {
        &mut self.nodes[id.idx()].data.props
    }

    /// Access a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    /// Whether any node carries a face at an aligned anchor.
    pub fn has_aligned_faces(&self) -> bool {
        self.aligned_faces
    }

    /// Whether cached sizes reflect the current structure.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Recompute every cached subtree size.
    ///
    /// Children always have larger slot indices than their parent, so a reverse slot scan
    /// visits every child before its parent without recursion.
    pub fn commit(&mut self) {
        for i in (0..self.nodes.len()).rev() {
            let (mut depth, mut breadth) = (0.0_f64, 0.0);
            for c in &self.nodes[i].children {
                let s = self.nodes[c.idx()].size;
                depth = depth.max(s.width);
                breadth += s.height;
            }
            let node = &mut self.nodes[i];
            if node.children.is_empty() {
                breadth = LEAF_BREADTH;
            }
            node.size = Size::new(node.data.dist.abs() + depth, breadth);
        }
        self.committed = true;
    }

    /// Walk the subtree under `root` in combined pre/post order.
    pub fn walk(&self, root: NodeId) -> Walk<'_> {
        Walk::new(self, root)
    }

    /// Structural id path: child indices from the root down to `id`.
    pub fn path_to(&self, mut id: NodeId) -> Vec<usize> {
        let mut out = Vec::new();
        while let Some(parent) = self.node(id).parent {
            let idx = self
                .node(parent)
                .children
                .iter()
                .position(|c| *c == id)
                .unwrap_or_default();
            out.push(idx);
            id = parent;
        }
        out.reverse();
        out
    }

    /// Resolve a structural id path.
    pub fn node_at(&self, path: &[usize]) -> Option<NodeId> {
        let mut id = self.root();
        for &i in path {
            id = *self.node(id).children.get(i)?;
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, [NodeId; 4]) {
        // ((A,B)X,C)root, all dist 1.
        let mut tree = Tree::new(NodeData::named("root", 1.0));
        let root = tree.root();
        let x = tree.add_child(root, NodeData::named("X", 1.0));
        let a = tree.add_child(x, NodeData::named("A", 1.0));
        let b = tree.add_child(x, NodeData::named("B", 1.0));
        let c = tree.add_child(root, NodeData::named("C", 1.0));
        (tree, [x, a, b, c])
    }

    #[test]
    fn commit_computes_sizes() {
        let (mut tree, [x, a, _b, c]) = sample();
        assert!(!tree.is_committed());
        tree.commit();
        assert!(tree.is_committed());
        assert_eq!(tree.node(a).size(), Size::new(1.0, 1.0));
        assert_eq!(tree.node(x).size(), Size::new(2.0, 2.0));
        assert_eq!(tree.node(c).size(), Size::new(1.0, 1.0));
        assert_eq!(tree.node(tree.root()).size(), Size::new(3.0, 3.0));
    }

    #[test]
    fn negative_dist_counts_by_magnitude() {
        let mut tree = Tree::new(NodeData::named("root", 0.0));
        let n = tree.add_child(tree.root(), NodeData::named("n", -2.5));
        tree.commit();
        assert_eq!(tree.node(n).size().width, 2.5);
        tree.set_dist(n, 1.0);
        assert!(!tree.is_committed(), "dist change must invalidate sizes");
        tree.commit();
        assert_eq!(tree.node(tree.root()).size().width, 1.0);
    }

    #[test]
    fn paths_resolve_both_ways() {
        let (tree, [x, a, b, c]) = sample();
        assert_eq!(tree.path_to(tree.root()), Vec::<usize>::new());
        assert_eq!(tree.path_to(b), vec![0, 1]);
        assert_eq!(tree.path_to(c), vec![1]);
        assert_eq!(tree.node_at(&[0, 0]), Some(a));
        assert_eq!(tree.node_at(&[0]), Some(x));
        assert_eq!(tree.node_at(&[0, 2]), None);
    }

    #[test]
    fn named_anchor_is_validated() {
        use crate::faces::TextFace;
        let (mut tree, [x, ..]) = sample();
        let face: Arc<dyn Face> = Arc::new(TextFace::new("hi"));
        assert!(tree.add_face_named(x, "branch_top", 0, face.clone()).is_ok());
        assert!(!tree.has_aligned_faces());
        assert!(tree.add_face_named(x, "aligned", 1, face.clone()).is_ok());
        assert!(tree.has_aligned_faces());
        let err = tree.add_face_named(x, "nowhere", 0, face).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAnchor { .. }));
        assert_eq!(tree.node(x).faces().len(), 2);
    }
}
