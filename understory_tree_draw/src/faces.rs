// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in faces: text, node properties, and simple shapes.
//!
//! Text metrics are approximate: every glyph is assumed to be [`CHAR_WIDTH`] font sizes wide.
//! That is enough for layout negotiation; exact shaping belongs to the rasterizer.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Vec2};

use crate::command::{DrawCommand, TipDirection};
use crate::face::{Anchor, Face, FaceBox, FaceNode, FaceOffer};
use crate::types::{FaceFlags, LayoutBox, Style};

/// Glyph advance as a fraction of the font size.
pub const CHAR_WIDTH: f64 = 0.6;

/// Default smallest legible font size in pixels.
pub const MIN_FONT_PX: f64 = 6.0;

/// Default largest font size in pixels.
pub const MAX_FONT_PX: f64 = 15.0;

/// Font sizing shared by the text faces.
#[derive(Clone, Debug, PartialEq)]
struct TextLook {
    min_font_px: f64,
    max_font_px: f64,
    flags: FaceFlags,
    padding: Vec2,
    style: Style,
}

impl Default for TextLook {
    fn default() -> Self {
        Self {
            min_font_px: MIN_FONT_PX,
            max_font_px: MAX_FONT_PX,
            flags: FaceFlags::empty(),
            padding: Vec2::ZERO,
            style: Style::new(),
        }
    }
}

impl TextLook {
    fn fit(&self, content: &str, offer: &FaceOffer) -> Option<FaceBox> {
        let len = content.chars().count() as f64;
        if len == 0.0 {
            return None;
        }
        let px = offer.px_scale;
        let mut font = self.max_font_px.min(offer.avail_dy * px.y);
        if let Some(w) = offer.avail_dx {
            font = font.min(w * px.x / (len * CHAR_WIDTH));
        }
        let font = font.max(0.0);
        let dx = font * CHAR_WIDTH * len / px.x;
        let dy = font / px.y;
        // Text hugs the branch it annotates.
        let y = match offer.anchor {
            Anchor::BranchTop => offer.y + offer.avail_dy - dy,
            Anchor::BranchBottom => offer.y,
            _ => offer.y + (offer.avail_dy - dy) / 2.0,
        };
        Some(FaceBox {
            bbox: LayoutBox::new(offer.x, y, dx, dy),
            font_size: font,
        })
    }

    fn fits(&self, placed: &FaceBox) -> bool {
        placed.font_size >= self.min_font_px && placed.bbox.dx > 0.0
    }

    fn draw(&self, content: &str, placed: &FaceBox, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::Text {
            rect: placed.bbox,
            text: content.into(),
            font_size: placed.font_size,
            style: self.style.clone(),
        });
    }
}

macro_rules! text_look_builders {
    () => {
        /// Limit the font size to `min..=max` pixels; text that would be smaller is not drawn.
        #[must_use]
        pub fn with_font_range(mut self, min: f64, max: f64) -> Self {
            self.look.min_font_px = min;
            self.look.max_font_px = max;
            self
        }

        /// Set drawing flags.
        #[must_use]
        pub fn with_flags(mut self, flags: FaceFlags) -> Self {
            self.look.flags = flags;
            self
        }

        /// Set padding in layout units.
        #[must_use]
        pub fn with_padding(mut self, padding: Vec2) -> Self {
            self.look.padding = padding;
            self
        }

        /// Set the style payload of the emitted text.
        #[must_use]
        pub fn with_style(mut self, style: Style) -> Self {
            self.look.style = style;
            self
        }
    };
}

/// Fixed text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextFace {
    text: String,
    look: TextLook,
}

impl TextFace {
    /// A face showing `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            look: TextLook::default(),
        }
    }

    text_look_builders!();
}

impl Face for TextFace {
    fn content(&self, _node: &FaceNode<'_>) -> Option<String> {
        (!self.text.is_empty()).then(|| self.text.clone())
    }

    fn flags(&self) -> FaceFlags {
        self.look.flags
    }

    fn padding(&self) -> Vec2 {
        self.look.padding
    }

    fn compute_bounding_box(&self, content: &str, offer: &FaceOffer) -> Option<FaceBox> {
        self.look.fit(content, offer)
    }

    fn fits(&self, placed: &FaceBox) -> bool {
        self.look.fits(placed)
    }

    fn draw(&self, content: &str, placed: &FaceBox, out: &mut Vec<DrawCommand>) {
        self.look.draw(content, placed, out);
    }
}

/// Text read from the decorated node: a property, or its name.
#[derive(Clone, Debug, PartialEq)]
pub struct PropFace {
    key: Option<String>,
    look: TextLook,
}

impl PropFace {
    /// A face showing the node's name.
    pub fn name() -> Self {
        Self {
            key: None,
            look: TextLook::default(),
        }
    }

    /// A face showing the property `key`.
    pub fn new(key: &str) -> Self {
        Self {
            key: Some(key.into()),
            look: TextLook::default(),
        }
    }

    text_look_builders!();
}

impl Face for PropFace {
    fn content(&self, node: &FaceNode<'_>) -> Option<String> {
        let text = match &self.key {
            None => node.name(),
            Some(key) => node.prop(key),
        }?;
        (!text.is_empty()).then(|| text.into())
    }

    fn flags(&self) -> FaceFlags {
        self.look.flags
    }

    fn padding(&self) -> Vec2 {
        self.look.padding
    }

    fn compute_bounding_box(&self, content: &str, offer: &FaceOffer) -> Option<FaceBox> {
        self.look.fit(content, offer)
    }

    fn fits(&self, placed: &FaceBox) -> bool {
        self.look.fits(placed)
    }

    fn draw(&self, content: &str, placed: &FaceBox, out: &mut Vec<DrawCommand>) {
        self.look.draw(content, placed, out);
    }
}

/// A circle of fixed pixel radius, shrunk to the offered space.
#[derive(Clone, Debug, PartialEq)]
pub struct CircleFace {
    radius_px: f64,
    flags: FaceFlags,
    style: Style,
}

impl CircleFace {
    /// A circle of `radius_px` pixels.
    pub fn new(radius_px: f64) -> Self {
        Self {
            radius_px,
            flags: FaceFlags::empty(),
            style: Style::new(),
        }
    }

    /// Set drawing flags.
    #[must_use]
    pub fn with_flags(mut self, flags: FaceFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the style payload.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Face for CircleFace {
    fn content(&self, _node: &FaceNode<'_>) -> Option<String> {
        Some(String::new())
    }

    fn flags(&self) -> FaceFlags {
        self.flags
    }

    fn compute_bounding_box(&self, _content: &str, offer: &FaceOffer) -> Option<FaceBox> {
        let px = offer.px_scale;
        let mut r = self.radius_px.min(offer.avail_dy * px.y / 2.0);
        if let Some(w) = offer.avail_dx {
            r = r.min(w * px.x / 2.0);
        }
        let r = r.max(0.0);
        let (dx, dy) = (2.0 * r / px.x, 2.0 * r / px.y);
        Some(FaceBox {
            bbox: LayoutBox::new(offer.x, offer.y + (offer.avail_dy - dy) / 2.0, dx, dy),
            font_size: 0.0,
        })
    }

    fn draw(&self, _content: &str, placed: &FaceBox, out: &mut Vec<DrawCommand>) {
        let b = placed.bbox;
        out.push(DrawCommand::Circle {
            center: Point::new(b.x + b.dx / 2.0, b.y + b.dy / 2.0),
            radius: b.dx / 2.0,
            style: self.style.clone(),
        });
    }
}

/// A rectangle filling the offered space; a common always-drawn background.
#[derive(Clone, Debug, PartialEq)]
pub struct RectFace {
    width: f64,
    flags: FaceFlags,
    style: Style,
}

impl RectFace {
    /// A rectangle `width` layout units wide where the offer leaves the width open.
    pub fn new(width: f64) -> Self {
        Self {
            width,
            flags: FaceFlags::empty(),
            style: Style::new(),
        }
    }

    /// Set drawing flags.
    #[must_use]
    pub fn with_flags(mut self, flags: FaceFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the style payload.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Face for RectFace {
    fn content(&self, _node: &FaceNode<'_>) -> Option<String> {
        Some(String::new())
    }

    fn flags(&self) -> FaceFlags {
        self.flags
    }

    fn compute_bounding_box(&self, _content: &str, offer: &FaceOffer) -> Option<FaceBox> {
        let dx = offer.avail_dx.unwrap_or(self.width).max(0.0);
        Some(FaceBox {
            bbox: LayoutBox::new(offer.x, offer.y, dx, offer.avail_dy.max(0.0)),
            font_size: 0.0,
        })
    }

    fn draw(&self, _content: &str, placed: &FaceBox, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::Rect {
            rect: placed.bbox,
            style: self.style.clone(),
        });
    }
}

/// A triangle filling the offered space, pointing along `tip`.
///
/// With [`FaceFlags::COLLAPSED_ONLY`] it marks collapsed runs with a wedge.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleFace {
    width: f64,
    tip: TipDirection,
    flags: FaceFlags,
    style: Style,
}

impl TriangleFace {
    /// A triangle `width` layout units wide where the offer leaves the width open.
    pub fn new(width: f64, tip: TipDirection) -> Self {
        Self {
            width,
            tip,
            flags: FaceFlags::empty(),
            style: Style::new(),
        }
    }

    /// Set drawing flags.
    #[must_use]
    pub fn with_flags(mut self, flags: FaceFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the style payload.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Face for TriangleFace {
    fn content(&self, _node: &FaceNode<'_>) -> Option<String> {
        Some(String::new())
    }

    fn flags(&self) -> FaceFlags {
        self.flags
    }

    fn compute_bounding_box(&self, _content: &str, offer: &FaceOffer) -> Option<FaceBox> {
        let dx = offer.avail_dx.unwrap_or(self.width).max(0.0);
        Some(FaceBox {
            bbox: LayoutBox::new(offer.x, offer.y, dx, offer.avail_dy.max(0.0)),
            font_size: 0.0,
        })
    }

    fn draw(&self, _content: &str, placed: &FaceBox, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::Triangle {
            rect: placed.bbox,
            tip: self.tip,
            style: self.style.clone(),
        });
    }
}
