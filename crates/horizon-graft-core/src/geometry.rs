//! Size and point types for the two coordinate systems.
//!
//! Host and toolkit values are distinct types so a host size can never be
//! handed to the toolkit without passing through
//! [`CoordinateMapping`](crate::CoordinateMapping).

use serde::{Deserialize, Serialize};

/// A content size in host-platform units (e.g. physical pixels for winit,
/// points for AppKit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HostSize {
    /// Width in host units.
    pub width: u32,
    /// Height in host units.
    pub height: u32,
}

impl HostSize {
    /// Create a new host size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for HostSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// A size in the foreign toolkit's units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ToolkitSize {
    /// Width in toolkit units.
    pub width: u32,
    /// Height in toolkit units.
    pub height: u32,
}

impl ToolkitSize {
    /// Create a new toolkit size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for ToolkitSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// A position inside the window's content area in host units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HostPoint {
    pub x: f64,
    pub y: f64,
}

impl HostPoint {
    /// Create a new host point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A position inside the embedded surface in toolkit units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToolkitPoint {
    pub x: f64,
    pub y: f64,
}

impl ToolkitPoint {
    /// Create a new toolkit point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_size_empty() {
        assert!(HostSize::new(0, 10).is_empty());
        assert!(HostSize::new(10, 0).is_empty());
        assert!(!HostSize::new(1, 1).is_empty());
    }

    #[test]
    fn test_size_from_tuple() {
        assert_eq!(HostSize::from((800, 600)), HostSize::new(800, 600));
        assert_eq!(ToolkitSize::from((400, 300)), ToolkitSize::new(400, 300));
    }
}
