//! The embedding bridge.
//!
//! Grafting makes a foreign toolkit's root drawable the sole content of a
//! [`NativeWindow`](crate::window::NativeWindow) and keeps the two in sync
//! afterwards:
//!
//! - **Resize forwarding**: every content size change is translated through
//!   the relation's [`CoordinateMapping`](horizon_graft_core::CoordinateMapping)
//!   and handed to the surface synchronously.
//! - **Visibility**: the surface is told when its window is shown.
//! - **Input forwarding**: opt-in, for toolkits that render offscreen.
//!
//! # Relation lifecycle
//!
//! ```text
//! None --embed--> Embedded --(close | destroy | release | re-embed)--> None
//! ```
//!
//! The window owns the relation and holds the surface only weakly. A
//! surface destroyed while embedded, even from inside its own resize
//! callback, severs the relation, and later resizes become no-ops.

pub mod bridge;
pub mod input;
pub(crate) mod relation;
pub mod surface;
pub mod toolkit;

pub use bridge::{EmbeddingBridge, embed_surface};
pub use input::{HostInput, PointerButton, ScrollDelta, ToolkitInput};
pub use relation::{EmbeddingState, RelationId};
pub use surface::{EmbeddedSurface, SurfaceId, SurfaceState};
pub use toolkit::{RealizeError, ToolkitSurface};
