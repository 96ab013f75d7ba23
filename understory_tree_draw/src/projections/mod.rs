// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection implementations.
//!
//! - `rect`: literal x/y; depth grows rightward, breadth downward.
//! - `polar`: radius/angle; depth grows outward, breadth sweeps an angular window.
//!
//! Collapse note
//! -------------
//! Both collapse thresholds compare against [`Projection::breadth_px`](crate::Projection::breadth_px),
//! and the two projections disagree on what it measures.
//! A rectangular box spans `dy * zoom.y` pixels.
//! A polar sector spans `(r + dr) * da * zoom` pixels, its arc length at the outer radius.
//! The same measure decides whether a node collapses and whether a collapsed run is
//! outlined or drawn as a stub.

pub mod polar;
pub mod rect;

pub use polar::{AngularWindow, AnnularSector, PolarProjection};
pub use rect::RectProjection;
