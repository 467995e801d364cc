//! Native window factory.
//!
//! This module creates host top-level windows and tracks the state the
//! embedding bridge relies on.
//!
//! ```
//! use horizon_graft::backend::HeadlessHost;
//! use horizon_graft::window::{create_native_window, WindowState};
//! use horizon_graft::HostSize;
//!
//! let mut host = HeadlessHost::new();
//! let window = create_native_window(&mut host, "Demo", 800, 600)?;
//!
//! assert_eq!(window.content_size(), HostSize::new(800, 600));
//! assert_eq!(window.state(), WindowState::Created);
//! # Ok::<(), horizon_graft::GraftError>(())
//! ```
//!
//! Windows are created through a [`HostPlatform`]. Use
//! [`WinitHost`](crate::backend::WinitHost) in an application and
//! [`HeadlessHost`](crate::backend::HeadlessHost) in tests.

mod host;
mod native_window;
mod window_config;

pub use host::{HostError, HostPlatform, HostWindow};
pub use native_window::{NativeWindow, NativeWindowId, WindowState, create_native_window};
pub use window_config::WindowConfig;
