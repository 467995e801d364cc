//! Horizon Graft: embed a foreign UI toolkit's render surface into a native
//! top-level window.
//!
//! The crate has two entry points:
//!
//! - [`create_native_window`]: a top-level window with standard platform
//!   chrome, in state `Created`.
//! - [`embed_surface`] (or [`EmbeddingBridge::embed`]): make a toolkit
//!   surface the window's sole content and keep it sized to the window.
//!
//! Everything runs on the UI thread. Windows and surfaces are `!Send`.
//!
//! # Example
//!
//! ```
//! use horizon_graft::prelude::*;
//!
//! let mut host = HeadlessHost::new();
//! let mut window = create_native_window(&mut host, "Demo", 800, 600)?;
//!
//! let toolkit = HeadlessSurface::new(ToolkitSize::new(0, 0));
//! let probe = toolkit.probe();
//! let surface = EmbeddedSurface::new(toolkit);
//!
//! embed_surface(&mut window, &surface)?;
//! assert_eq!(probe.last_size(), Some(ToolkitSize::new(800, 600)));
//!
//! window.notify_content_resized(HostSize::new(400, 300));
//! assert_eq!(probe.last_size(), Some(ToolkitSize::new(400, 300)));
//! # Ok::<(), GraftError>(())
//! ```
//!
//! With winit, create windows through [`WinitHost`](backend::WinitHost) and
//! feed window events to [`router::route_to_windows`].

pub use horizon_graft_core::*;

pub mod backend;
pub mod embed;
pub mod prelude;
pub mod router;
pub mod window;

pub use embed::{EmbeddedSurface, EmbeddingBridge, embed_surface};
pub use window::{NativeWindow, create_native_window};
