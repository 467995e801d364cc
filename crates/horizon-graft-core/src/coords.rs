//! Coordinate translation between the host platform and the foreign toolkit.
//!
//! The two systems can disagree on two things: how many host units make up
//! one toolkit unit (the scale), and which corner of the content area is the
//! origin. [`CoordinateMapping`] captures both explicitly and every
//! translation is a pure function of a mapping and its input, so the same
//! host size always produces the same toolkit size no matter how many resizes
//! came before.
//!
//! # Example
//!
//! ```
//! use horizon_graft_core::{CoordinateMapping, HostSize, Origin, ToolkitSize};
//!
//! // A HiDPI host (2 physical pixels per logical unit) feeding a
//! // bottom-left-origin toolkit.
//! let mapping = CoordinateMapping::new(2.0, Origin::TopLeft, Origin::BottomLeft).unwrap();
//!
//! let size = mapping.host_to_toolkit_size(HostSize::new(1600, 1200));
//! assert_eq!(size, ToolkitSize::new(800, 600));
//! assert_eq!(mapping.toolkit_to_host_size(size), HostSize::new(1600, 1200));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConstraintViolation;
use crate::geometry::{HostPoint, HostSize, ToolkitPoint, ToolkitSize};

/// Which corner of a content area holds coordinate (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Y grows downwards (winit, Win32, X11, GTK).
    #[default]
    TopLeft,
    /// Y grows upwards (AppKit, OpenGL).
    BottomLeft,
}

/// Translation parameters between host units and toolkit units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapping {
    /// Host units per toolkit unit.
    scale: f64,
    host_origin: Origin,
    toolkit_origin: Origin,
}

impl CoordinateMapping {
    /// Create a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintViolation::NonPositiveScale`] if `scale` is zero,
    /// negative, or not finite.
    pub fn new(
        scale: f64,
        host_origin: Origin,
        toolkit_origin: Origin,
    ) -> Result<Self, ConstraintViolation> {
        validate_scale(scale)?;
        Ok(Self {
            scale,
            host_origin,
            toolkit_origin,
        })
    }

    /// The 1:1, top-left to top-left mapping.
    pub const fn identity() -> Self {
        Self {
            scale: 1.0,
            host_origin: Origin::TopLeft,
            toolkit_origin: Origin::TopLeft,
        }
    }

    /// Host units per toolkit unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The host's origin convention.
    pub fn host_origin(&self) -> Origin {
        self.host_origin
    }

    /// The toolkit's origin convention.
    pub fn toolkit_origin(&self) -> Origin {
        self.toolkit_origin
    }

    /// Returns a copy of this mapping with a different scale.
    pub fn with_scale(self, scale: f64) -> Result<Self, ConstraintViolation> {
        Self::new(scale, self.host_origin, self.toolkit_origin)
    }

    /// Returns true if translation is a no-op.
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.host_origin == self.toolkit_origin
    }

    /// Translate a content size from host units to toolkit units.
    ///
    /// Sizes are origin independent. Fractional results are rounded to the
    /// nearest unit.
    pub fn host_to_toolkit_size(&self, size: HostSize) -> ToolkitSize {
        ToolkitSize::new(
            scale_down(size.width, self.scale),
            scale_down(size.height, self.scale),
        )
    }

    /// Translate a size from toolkit units back to host units.
    pub fn toolkit_to_host_size(&self, size: ToolkitSize) -> HostSize {
        HostSize::new(
            scale_up(size.width, self.scale),
            scale_up(size.height, self.scale),
        )
    }

    /// Translate a point inside a content area of `container` host size.
    ///
    /// The container height is needed to flip the Y axis when the origins
    /// differ.
    pub fn host_to_toolkit_point(&self, point: HostPoint, container: HostSize) -> ToolkitPoint {
        let height = f64::from(container.height);
        let top_down_y = match self.host_origin {
            Origin::TopLeft => point.y,
            Origin::BottomLeft => height - point.y,
        };

        let x = point.x / self.scale;
        let y = top_down_y / self.scale;
        let y = match self.toolkit_origin {
            Origin::TopLeft => y,
            Origin::BottomLeft => height / self.scale - y,
        };
        ToolkitPoint::new(x, y)
    }

    /// Translate a toolkit point back into host units.
    pub fn toolkit_to_host_point(&self, point: ToolkitPoint, container: HostSize) -> HostPoint {
        let height = f64::from(container.height);
        let top_down_y = match self.toolkit_origin {
            Origin::TopLeft => point.y,
            Origin::BottomLeft => height / self.scale - point.y,
        };

        let x = point.x * self.scale;
        let y = top_down_y * self.scale;
        let y = match self.host_origin {
            Origin::TopLeft => y,
            Origin::BottomLeft => height - y,
        };
        HostPoint::new(x, y)
    }
}

impl Default for CoordinateMapping {
    fn default() -> Self {
        Self::identity()
    }
}

/// Check that a scale factor can be used in a mapping.
pub fn validate_scale(scale: f64) -> Result<(), ConstraintViolation> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(ConstraintViolation::NonPositiveScale(scale))
    }
}

fn scale_down(value: u32, scale: f64) -> u32 {
    (f64::from(value) / scale).round() as u32
}

fn scale_up(value: u32, scale: f64) -> u32 {
    (f64::from(value) * scale).round() as u32
}
