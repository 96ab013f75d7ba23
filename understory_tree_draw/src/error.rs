// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors, detected before a draw produces any output.

use alloc::string::String;
use core::fmt;

/// A rejected draw configuration.
///
/// Every variant is raised before the first draw command is produced, so a caller never
/// observes a partial command stream for an invalid request.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A face was requested at an anchor name outside the known set.
    UnknownAnchor {
        /// The rejected name.
        name: String,
    },
    /// A zoom component is zero, negative, or not finite.
    NonPositiveZoom {
        /// Horizontal zoom.
        x: f64,
        /// Vertical zoom.
        y: f64,
    },
    /// The viewport is inverted or has non-finite coordinates.
    InvalidViewport {
        /// The rejected rectangle as `(x0, y0, x1, y1)`.
        rect: (f64, f64, f64, f64),
    },
    /// A pixel threshold is negative or not finite.
    InvalidThreshold {
        /// Which setting was rejected.
        which: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The polar angular window is empty, inverted, not finite, or reaches outside `[-π, π]`.
    InvalidAngularWindow {
        /// Window start in radians.
        start: f64,
        /// Window end in radians.
        end: f64,
    },
    /// Panel 0 is the base panel; aligned panels are numbered from 1.
    InvalidPanel {
        /// The rejected panel index.
        panel: u32,
    },
    /// An aligned panel was requested before the base pass sealed the aligned grid.
    GridNotMeasured {
        /// The aligned panel that was requested.
        panel: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAnchor { name } => write!(f, "unknown face anchor: {name:?}"),
            Self::NonPositiveZoom { x, y } => {
                write!(f, "zoom must be finite and positive, got ({x}, {y})")
            }
            Self::InvalidViewport { rect } => write!(f, "invalid viewport {rect:?}"),
            Self::InvalidThreshold { which, value } => {
                write!(f, "{which} must be finite and non-negative, got {value}")
            }
            Self::InvalidAngularWindow { start, end } => {
                write!(f, "invalid angular window [{start}, {end}]")
            }
            Self::InvalidPanel { panel } => {
                write!(f, "panel {panel} is not an aligned panel (aligned panels start at 1)")
            }
            Self::GridNotMeasured { panel } => write!(
                f,
                "aligned panel {panel} requested before the base pass measured the aligned grid"
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_the_offending_value() {
        let e = ConfigError::UnknownAnchor {
            name: "branch_left".into(),
        };
        assert_eq!(e.to_string(), "unknown face anchor: \"branch_left\"");
        let e = ConfigError::GridNotMeasured { panel: 2 };
        assert!(e.to_string().contains("panel 2"));
    }
}
