//! Host platform backends.
//!
//! - [`WinitHost`]: real top-level windows on a winit event loop, with the
//!   toolkit drawable parented in as a native child.
//! - [`HeadlessHost`] and [`HeadlessSurface`]: in-memory host and toolkit
//!   that record every call, for tests and for running without a display.

pub mod headless;
mod native_child;
mod winit_host;

pub use headless::{
    ContentEvent, HeadlessHost, HeadlessSurface, HeadlessWindowProbe, SurfaceProbe,
};
pub use winit_host::WinitHost;
