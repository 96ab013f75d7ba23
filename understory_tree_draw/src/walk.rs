// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazy combined pre/post-order traversal with per-subtree pruning.

use alloc::vec;
use alloc::vec::Vec;

use crate::tree::Tree;
use crate::types::NodeId;

/// Whether a visit enters or leaves a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VisitKind {
    /// First visit, before any descendant.
    Enter,
    /// Last visit, after every visited descendant.
    Exit,
}

/// One traversal event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Visit {
    /// The visited node.
    pub node: NodeId,
    /// Enter or exit.
    pub kind: VisitKind,
}

impl Visit {
    /// Whether this is the first visit of the node.
    pub fn is_enter(&self) -> bool {
        self.kind == VisitKind::Enter
    }
}

#[derive(Copy, Clone, Debug)]
struct Frame {
    node: NodeId,
    next_child: usize,
    // Position of `node` among its parent's children.
    index: usize,
}

/// Traversal cursor returned by [`Tree::walk`].
///
/// Yields exactly one [`VisitKind::Enter`] and one [`VisitKind::Exit`] per reachable node in
/// natural recursive order. Calling [`Walk::prune`] right after an enter suppresses the whole
/// subtree: the next event is that node's exit. Events are produced on demand, so pruned
/// subtrees cost nothing. A walk is not restartable; call [`Tree::walk`] again.
#[derive(Clone, Debug)]
pub struct Walk<'a> {
    tree: &'a Tree,
    stack: Vec<Frame>,
    pop_pending: bool,
    just_entered: bool,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(tree: &'a Tree, root: NodeId) -> Self {
        Self {
            tree,
            stack: vec![Frame {
                node: root,
                next_child: usize::MAX,
                index: 0,
            }],
            pop_pending: false,
            just_entered: false,
        }
    }

    /// Skip the subtree of the node entered by the latest event.
    ///
    /// Only valid immediately after an enter event; misuse is a no-op that trips a debug assertion.
    pub fn prune(&mut self) {
        debug_assert!(self.just_entered, "prune is only valid right after an enter");
        if !self.just_entered {
            return;
        }
        if let Some(top) = self.stack.last_mut() {
            top.next_child = self.tree.node(top.node).children().len();
        }
    }

    /// Structural id path of the node of the latest event (child indices from the walk root).
    pub fn path(&self) -> impl Iterator<Item = usize> + '_ {
        self.stack.iter().skip(1).map(|f| f.index)
    }
}

impl Iterator for Walk<'_> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        if self.pop_pending {
            self.stack.pop();
            self.pop_pending = false;
        }
        let top = self.stack.last_mut()?;
        // The walk root starts with a sentinel so its enter is reported first.
        if top.next_child == usize::MAX {
            top.next_child = 0;
            self.just_entered = true;
            return Some(Visit {
                node: top.node,
                kind: VisitKind::Enter,
            });
        }
        let children = self.tree.node(top.node).children();
        if let Some(&child) = children.get(top.next_child) {
            let index = top.next_child;
            top.next_child += 1;
            self.stack.push(Frame {
                node: child,
                next_child: 0,
                index,
            });
            self.just_entered = true;
            Some(Visit {
                node: child,
                kind: VisitKind::Enter,
            })
        } else {
            self.pop_pending = true;
            self.just_entered = false;
            Some(Visit {
                node: top.node,
                kind: VisitKind::Exit,
            })
        }
    }
}
