//! Host platform backed by winit.
//!
//! Windows are created from inside the event loop (typically in
//! `ApplicationHandler::resumed`) and start hidden. Content is attached as a
//! native child of the winit window; see the `native_child` module for
//! the per-platform mechanism.
//!
//! Host units are physical pixels and the scale factor is winit's.
//!
//! ```ignore
//! impl ApplicationHandler for App {
//!     fn resumed(&mut self, event_loop: &ActiveEventLoop) {
//!         let mut host = WinitHost::new(event_loop);
//!         let window = create_native_window(&mut host, "Demo", 800, 600).unwrap();
//!         self.windows.push(window);
//!     }
//! }
//! ```

use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use horizon_graft_core::logging::targets;
use horizon_graft_core::{HostSize, graft_debug, graft_warn};

use super::native_child::NativeChild;
use crate::window::{HostError, HostPlatform, HostWindow, WindowConfig};

/// Creates host windows on a running winit event loop.
pub struct WinitHost<'a> {
    event_loop: &'a ActiveEventLoop,
}

impl<'a> WinitHost<'a> {
    pub fn new(event_loop: &'a ActiveEventLoop) -> Self {
        Self { event_loop }
    }
}

impl HostPlatform for WinitHost<'_> {
    fn create_window(&mut self, config: &WindowConfig) -> Result<Box<dyn HostWindow>, HostError> {
        let window = self
            .event_loop
            .create_window(config.to_window_attributes())
            .map_err(|e| HostError::allocation(e.to_string()))?;
        graft_debug!(targets::BACKEND, id = ?window.id(), "winit window created");
        Ok(Box::new(WinitHostWindow {
            window: Some(window),
            child: None,
        }))
    }
}

struct WinitHostWindow {
    /// `None` once closed; dropping the winit window closes it.
    window: Option<Window>,
    child: Option<NativeChild>,
}

impl WinitHostWindow {
    fn raw_handle(&self) -> Result<RawWindowHandle, HostError> {
        let window = self
            .window
            .as_ref()
            .ok_or_else(|| HostError::handle_access("window is closed"))?;
        let handle = window
            .window_handle()
            .map_err(|e| HostError::handle_access(e.to_string()))?;
        Ok(handle.as_raw())
    }
}

impl HostWindow for WinitHostWindow {
    fn content_size(&self) -> HostSize {
        self.window
            .as_ref()
            .map(|window| {
                let size = window.inner_size();
                HostSize::new(size.width, size.height)
            })
            .unwrap_or_default()
    }

    fn scale_factor(&self) -> f64 {
        self.window
            .as_ref()
            .map(|window| window.scale_factor())
            .unwrap_or(1.0)
    }

    fn set_title(&mut self, title: &str) {
        if let Some(window) = &self.window {
            window.set_title(title);
        }
    }

    fn show(&mut self) {
        if let Some(window) = &self.window {
            window.set_visible(true);
        }
    }

    fn close(&mut self) {
        self.detach_content();
        self.window = None;
    }

    fn request_content_size(&mut self, size: HostSize) -> Option<HostSize> {
        let window = self.window.as_ref()?;
        window
            .request_inner_size(PhysicalSize::new(size.width, size.height))
            .map(|applied| HostSize::new(applied.width, applied.height))
    }

    fn replace_content(&mut self, drawable: RawWindowHandle, size: HostSize) -> Result<(), HostError> {
        let parent = self.raw_handle()?;
        let child = NativeChild::attach(parent, drawable, size, self.scale_factor())?;
        // The new child is in place before the old one goes away.
        if let Some(previous) = self.child.replace(child) {
            previous.detach();
        }
        Ok(())
    }

    fn layout_content(&mut self, size: HostSize) {
        let scale_factor = self.scale_factor();
        if let Some(child) = &self.child {
            child.layout(size, scale_factor);
        }
    }

    fn detach_content(&mut self) {
        if let Some(child) = self.child.take() {
            child.detach();
        }
    }

    fn window_handle(&self) -> Option<RawWindowHandle> {
        self.raw_handle()
            .inspect_err(|err| graft_warn!(targets::BACKEND, %err, "no native window handle"))
            .ok()
    }

    fn winit_id(&self) -> Option<WindowId> {
        self.window.as_ref().map(|window| window.id())
    }
}
