// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Face trait: externally supplied node decorations and where they attach.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::str::FromStr;

use kurbo::Vec2;

use crate::command::DrawCommand;
use crate::error::ConfigError;
use crate::tree::NodeData;
use crate::types::{FaceFlags, LayoutBox};

/// A named attachment point around a node where faces may be requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Anchor {
    /// Above the node's branch, stacking away from it.
    BranchTop,
    /// Below the node's branch, stacking away from it.
    BranchBottom,
    /// Right of the branch end (the node's own position).
    BranchRight,
    /// Aligned column, justified to the column start.
    AlignedLeading,
    /// Aligned column, justified to the column end.
    AlignedTrailing,
    /// Aligned column, centered in the column.
    AlignedCentered,
}

impl Anchor {
    /// Every anchor, in drawing order.
    pub const ALL: [Self; 6] = [
        Self::BranchTop,
        Self::BranchBottom,
        Self::BranchRight,
        Self::AlignedLeading,
        Self::AlignedTrailing,
        Self::AlignedCentered,
    ];

    /// Whether faces at this anchor share column widths across the whole tree.
    pub const fn is_aligned(self) -> bool {
        matches!(
            self,
            Self::AlignedLeading | Self::AlignedTrailing | Self::AlignedCentered
        )
    }

    /// The canonical name accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BranchTop => "branch_top",
            Self::BranchBottom => "branch_bottom",
            Self::BranchRight => "branch_right",
            Self::AlignedLeading => "aligned_leading",
            Self::AlignedTrailing => "aligned_trailing",
            Self::AlignedCentered => "aligned_center",
        }
    }
}

impl FromStr for Anchor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "branch_top" => Ok(Self::BranchTop),
            "branch_bottom" => Ok(Self::BranchBottom),
            "branch_right" => Ok(Self::BranchRight),
            "aligned" | "aligned_leading" => Ok(Self::AlignedLeading),
            "aligned_trailing" => Ok(Self::AlignedTrailing),
            "aligned_center" | "aligned_centered" => Ok(Self::AlignedCentered),
            _ => Err(ConfigError::UnknownAnchor { name: s.into() }),
        }
    }
}

/// Where a face is attached: anchor, column, and (for aligned anchors) panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FaceSlot {
    /// Attachment point.
    pub anchor: Anchor,
    /// Column within the anchor; columns are laid out in ascending order.
    pub column: usize,
    /// Aligned panel that draws the face. Ignored for branch anchors.
    pub panel: u32,
}

impl FaceSlot {
    /// A slot at `anchor`/`column`, drawn by aligned panel 1 when the anchor is aligned.
    pub const fn new(anchor: Anchor, column: usize) -> Self {
        Self {
            anchor,
            column,
            panel: 1,
        }
    }

    /// A leading-justified aligned slot.
    pub const fn aligned(column: usize) -> Self {
        Self::new(Anchor::AlignedLeading, column)
    }

    /// Move an aligned slot to another aligned panel.
    #[must_use]
    pub const fn in_panel(mut self, panel: u32) -> Self {
        self.panel = panel;
        self
    }
}

/// A face as stored on a node.
#[derive(Clone, Debug)]
pub struct AttachedFace {
    /// The face itself; faces are commonly shared between nodes.
    pub face: Arc<dyn Face>,
    /// Aligned panel that draws it.
    pub panel: u32,
}

/// Per-node faces: anchor → column → rows.
pub type FaceMap = BTreeMap<Anchor, BTreeMap<usize, Vec<AttachedFace>>>;

/// Read-only view of the node a face decorates.
///
/// The node may be a real tree node or a synthetic group standing in for a collapsed run;
/// faces see both through this one type.
#[derive(Copy, Clone, Debug)]
pub struct FaceNode<'a> {
    pub(crate) data: Option<&'a NodeData>,
    pub(crate) is_leaf: bool,
    pub(crate) collapsed: bool,
    pub(crate) members: usize,
}

impl<'a> FaceNode<'a> {
    /// Display name, if any.
    pub fn name(&self) -> Option<&'a str> {
        self.data.and_then(|d| d.name.as_deref())
    }

    /// A property value by key.
    pub fn prop(&self, key: &str) -> Option<&'a str> {
        self.data
            .and_then(|d| d.props.get(key))
            .map(String::as_str)
    }

    /// Branch length; `0` for synthetic groups.
    pub fn dist(&self) -> f64 {
        self.data.map_or(0.0, |d| d.dist)
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Whether the node is drawn as the representative of a collapsed run.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Number of collapsed siblings represented; `1` for an ordinary node.
    pub fn member_count(&self) -> usize {
        self.members
    }
}

/// Space offered to a face by the layout negotiator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceOffer {
    /// Anchor being laid out.
    pub anchor: Anchor,
    /// Start of the offered space on the primary axis (padding already applied).
    pub x: f64,
    /// Start of the offered space on the secondary axis (padding already applied).
    pub y: f64,
    /// Offered primary extent; `None` means the face may choose its natural width.
    pub avail_dx: Option<f64>,
    /// Offered secondary extent.
    pub avail_dy: f64,
    /// Pixels per layout unit on each axis at this location.
    pub px_scale: Vec2,
}

/// Geometry a face chose inside its offer.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FaceBox {
    /// The face's bounding box in native units.
    pub bbox: LayoutBox,
    /// Chosen font size in pixels, for text-like faces; `0` otherwise.
    pub font_size: f64,
}

/// An externally supplied node decoration.
///
/// The engine positions and queries faces but never creates or owns them.
pub trait Face: Debug {
    /// The content to draw for `node`; `None` draws nothing.
    fn content(&self, node: &FaceNode<'_>) -> Option<String>;

    /// Drawing flags.
    fn flags(&self) -> FaceFlags {
        FaceFlags::empty()
    }

    /// Padding on each side, in layout units.
    fn padding(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Choose a box inside `offer`, or `None` when no usable box exists.
    fn compute_bounding_box(&self, content: &str, offer: &FaceOffer) -> Option<FaceBox>;

    /// Whether the chosen box is legible enough to draw.
    fn fits(&self, placed: &FaceBox) -> bool {
        placed.bbox.dx > 0.0 && placed.bbox.dy > 0.0
    }

    /// Append the face's draw commands.
    fn draw(&self, content: &str, placed: &FaceBox, out: &mut Vec<DrawCommand>);
}
