//! Prelude module for Horizon Graft.
//!
//! ```ignore
//! use horizon_graft::prelude::*;
//! ```

// ============================================================================
// Core Types
// ============================================================================

pub use crate::{
    BridgeConfig, ConstraintViolation, CoordinateMapping, GraftError, HostPoint, HostSize,
    Origin, ScalePolicy, ToolkitPoint, ToolkitSize,
};

// ============================================================================
// Windows
// ============================================================================

pub use crate::window::{
    HostPlatform, HostWindow, NativeWindow, WindowConfig, WindowState, create_native_window,
};

// ============================================================================
// Embedding
// ============================================================================

pub use crate::embed::{
    EmbeddedSurface, EmbeddingBridge, EmbeddingState, HostInput, RealizeError, SurfaceState,
    ToolkitInput, ToolkitSurface, embed_surface,
};

// ============================================================================
// Backends and Routing
// ============================================================================

pub use crate::backend::{HeadlessHost, HeadlessSurface, WinitHost};
pub use crate::router::{route_to_windows, route_window_event};
