//! Horizon Graft winit example
//!
//! Opens a decorated top-level window and grafts a second, undecorated
//! winit window into it as a native child, standing in for a foreign
//! toolkit's root drawable. Resize the outer window to watch the child
//! follow.
//!
//! Run with: RUST_LOG=horizon_graft=debug cargo run -p horizon-graft --example winit_embed

use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use horizon_graft::prelude::*;

/// A bare winit window playing the part of the toolkit surface.
struct ForeignRoot {
    window: Window,
}

impl ToolkitSurface for ForeignRoot {
    fn realize(&mut self) -> Result<RawWindowHandle, RealizeError> {
        self.window
            .window_handle()
            .map(|handle| handle.as_raw())
            .map_err(|e| RealizeError::new(e.to_string()))
    }

    fn preferred_size(&self) -> ToolkitSize {
        let size = self.window.inner_size();
        ToolkitSize::new(size.width, size.height)
    }

    fn resize(&mut self, size: ToolkitSize) {
        let _ = self
            .window
            .request_inner_size(PhysicalSize::new(size.width, size.height));
    }

    fn visibility_changed(&mut self, visible: bool) {
        self.window.set_visible(visible);
    }

    fn destroy(&mut self) {
        self.window.set_visible(false);
    }
}

#[derive(Default)]
struct App {
    windows: Vec<NativeWindow>,
    surfaces: Vec<EmbeddedSurface>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }

        let mut host = WinitHost::new(event_loop);
        let mut window =
            create_native_window(&mut host, "Horizon Graft", 800, 600).expect("Failed to create window");

        let attrs = Window::default_attributes()
            .with_decorations(false)
            .with_visible(false);
        let foreign = event_loop.create_window(attrs).expect("Failed to create foreign root");
        let surface = EmbeddedSurface::new(ForeignRoot { window: foreign });

        if let Err(err) = embed_surface(&mut window, &surface) {
            tracing::error!(%err, "embedding failed, showing an empty window");
        }
        window.show().expect("Window closed before it was shown");

        self.windows.push(window);
        self.surfaces.push(surface);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            self.windows.retain(|window| window.winit_id() != Some(id));
            if self.windows.is_empty() {
                event_loop.exit();
            }
            return;
        }
        route_to_windows(self.windows.iter_mut(), id, &event);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("horizon_graft=info")),
        )
        .init();
    horizon_graft::thread_check::set_ui_thread();

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = App::default();
    event_loop.run_app(&mut app).expect("Event loop error");
}
