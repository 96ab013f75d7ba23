// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-render draw parameters.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashSet;
use kurbo::{Rect, Vec2};

use crate::error::ConfigError;
use crate::types::NodeId;

/// Nodes matched by a named search or selection.
#[derive(Clone, Debug, Default)]
pub struct Highlight {
    /// The matched nodes.
    pub results: HashSet<NodeId>,
    /// Strict ancestors of matched nodes.
    pub parents: HashSet<NodeId>,
}

impl Highlight {
    /// Build a highlight from result nodes, deriving their ancestors from `tree`.
    pub fn from_results(tree: &crate::Tree, results: impl IntoIterator<Item = NodeId>) -> Self {
        let mut out = Self::default();
        for id in results {
            let mut parent = tree.node(id).parent();
            while let Some(p) = parent {
                if !out.parents.insert(p) {
                    break;
                }
                parent = tree.node(p).parent();
            }
            out.results.insert(id);
        }
        out
    }
}

/// Inputs of one render besides the tree and projection.
///
/// Build with struct-update syntax:
///
/// ```
/// use understory_tree_draw::DrawParams;
/// use kurbo::{Rect, Vec2};
///
/// let params = DrawParams {
///     viewport: Some(Rect::new(0.0, 0.0, 10.0, 40.0)),
///     zoom: Vec2::new(20.0, 12.0),
///     ..Default::default()
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct DrawParams {
    /// Visible window in layout space; `None` is unbounded.
    pub viewport: Option<Rect>,
    /// Pixels per layout unit, per axis. Polar layouts use `x` for both axes.
    pub zoom: Vec2,
    /// Nodes whose on-screen breadth is below this many pixels collapse into outlines.
    pub collapse_threshold_px: f64,
    /// Collapsed runs thinner than this many pixels are drawn as a stub line.
    pub collapsing_height_px: f64,
    /// Radius of node point markers in pixels; `0` disables them.
    pub node_marker_px: f64,
    /// Primary coordinate where aligned panels start their first column.
    ///
    /// Columns never start before the deepest point of the tree, so `0` places them right
    /// after it.
    pub aligned_origin: f64,
    /// Manually collapsed nodes.
    pub collapsed: HashSet<NodeId>,
    /// Named searches; node boxes are tagged with the searches that match them.
    pub searches: BTreeMap<String, Highlight>,
    /// Named selections; node boxes are tagged with the selections that match them.
    pub selections: BTreeMap<String, Highlight>,
    /// If set, only these properties are forwarded with node boxes.
    pub include_props: Option<Vec<String>>,
    /// Properties never forwarded with node boxes.
    pub exclude_props: Vec<String>,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            viewport: None,
            zoom: Vec2::new(1.0, 1.0),
            collapse_threshold_px: 6.0,
            collapsing_height_px: 4.0,
            node_marker_px: 2.0,
            aligned_origin: 0.0,
            collapsed: HashSet::new(),
            searches: BTreeMap::new(),
            selections: BTreeMap::new(),
            include_props: None,
            exclude_props: Vec::new(),
        }
    }
}

impl DrawParams {
    /// Reject parameters that would make a render meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Vec2 { x, y } = self.zoom;
        if !(x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0) {
            return Err(ConfigError::NonPositiveZoom { x, y });
        }
        if let Some(v) = self.viewport {
            let finite = v.x0.is_finite() && v.y0.is_finite() && v.x1.is_finite() && v.y1.is_finite();
            if !finite || v.x1 < v.x0 || v.y1 < v.y0 {
                return Err(ConfigError::InvalidViewport {
                    rect: (v.x0, v.y0, v.x1, v.y1),
                });
            }
        }
        for (which, value) in [
            ("collapse_threshold_px", self.collapse_threshold_px),
            ("collapsing_height_px", self.collapsing_height_px),
            ("node_marker_px", self.node_marker_px),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidThreshold { which, value });
            }
        }
        if !self.aligned_origin.is_finite() {
            return Err(ConfigError::InvalidThreshold {
                which: "aligned_origin",
                value: self.aligned_origin,
            });
        }
        Ok(())
    }

    /// Whether `key` is forwarded with node boxes.
    pub fn forwards_prop(&self, key: &str) -> bool {
        if self.exclude_props.iter().any(|k| k == key) {
            return false;
        }
        match &self.include_props {
            Some(keys) => keys.iter().any(|k| k == key),
            None => true,
        }
    }
}
