//! Input forwarding types.
//!
//! When the toolkit renders offscreen it never sees OS input, so the bridge
//! can forward host pointer and focus events through the relation's
//! coordinate mapping. This is opt-in via
//! [`BridgeConfig::forward_input`](horizon_graft_core::BridgeConfig).

use horizon_graft_core::{CoordinateMapping, HostPoint, HostSize, ToolkitPoint};

/// A pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// A scroll amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollDelta {
    /// Whole lines or rows, as reported by a mouse wheel.
    Lines { x: f32, y: f32 },
    /// Precise deltas in the coordinate units of the receiving side.
    Pixels { x: f64, y: f64 },
}

/// An input event in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostInput {
    PointerMoved(HostPoint),
    PointerButton {
        position: HostPoint,
        button: PointerButton,
        pressed: bool,
    },
    Scroll {
        position: HostPoint,
        delta: ScrollDelta,
    },
    PointerLeft,
    Focus(bool),
}

/// An input event in toolkit coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolkitInput {
    PointerMoved(ToolkitPoint),
    PointerButton {
        position: ToolkitPoint,
        button: PointerButton,
        pressed: bool,
    },
    Scroll {
        position: ToolkitPoint,
        delta: ScrollDelta,
    },
    PointerLeft,
    Focus(bool),
}

impl HostInput {
    /// Translate into toolkit coordinates for a content area of `container`.
    pub fn translate(&self, mapping: &CoordinateMapping, container: HostSize) -> ToolkitInput {
        let point = |p: HostPoint| mapping.host_to_toolkit_point(p, container);
        match *self {
            Self::PointerMoved(position) => ToolkitInput::PointerMoved(point(position)),
            Self::PointerButton {
                position,
                button,
                pressed,
            } => ToolkitInput::PointerButton {
                position: point(position),
                button,
                pressed,
            },
            Self::Scroll { position, delta } => ToolkitInput::Scroll {
                position: point(position),
                delta: match delta {
                    ScrollDelta::Pixels { x, y } => ScrollDelta::Pixels {
                        x: x / mapping.scale(),
                        y: y / mapping.scale(),
                    },
                    lines => lines,
                },
            },
            Self::PointerLeft => ToolkitInput::PointerLeft,
            Self::Focus(focused) => ToolkitInput::Focus(focused),
        }
    }
}
