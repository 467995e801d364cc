//! Window event routing.
//!
//! This module feeds winit window events into [`NativeWindow`]s, which is
//! where resize forwarding and input forwarding happen.
//!
//! # Usage
//!
//! Call the router from `ApplicationHandler::window_event`:
//!
//! ```ignore
//! fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
//!     if let WindowEvent::CloseRequested = event {
//!         self.windows.retain(|window| window.winit_id() != Some(id));
//!         return;
//!     }
//!     route_to_windows(self.windows.iter_mut(), id, &event);
//! }
//! ```
//!
//! The router handles:
//!
//! - `Resized` and `ScaleFactorChanged`: resize forwarding
//! - `CursorMoved`, `CursorLeft`, `MouseInput`, `MouseWheel`, `Focused`:
//!   input forwarding, when enabled for the relation
//! - `Destroyed`: severs the relation without touching the host
//!
//! Every other event first detaches the drawable of a surface destroyed
//! since the last event.
//!
//! `CloseRequested` is left to the application.

use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::window::WindowId;

use horizon_graft_core::{HostPoint, HostSize};

use crate::embed::input::{HostInput, PointerButton, ScrollDelta};
use crate::window::NativeWindow;

/// Route one window event to `window`.
///
/// Returns `true` if the event reached the embedded surface.
pub fn route_window_event(window: &mut NativeWindow, event: &WindowEvent) -> bool {
    if !matches!(event, WindowEvent::Destroyed) {
        window.detach_destroyed_content();
    }
    match event {
        WindowEvent::Resized(size) => window
            .notify_content_resized(HostSize::new(size.width, size.height))
            .is_some(),
        WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
            window.notify_scale_factor_changed(*scale_factor).is_some()
        }
        WindowEvent::Destroyed => {
            window.mark_destroyed();
            false
        }
        _ => match host_input(window, event) {
            Some(input) => window.dispatch_input(&input),
            None => false,
        },
    }
}

/// Route an event to whichever of `windows` has the winit id `id`.
///
/// Returns `true` if the event reached an embedded surface.
pub fn route_to_windows<'a>(
    windows: impl IntoIterator<Item = &'a mut NativeWindow>,
    id: WindowId,
    event: &WindowEvent,
) -> bool {
    windows
        .into_iter()
        .find(|window| window.winit_id() == Some(id))
        .is_some_and(|window| route_window_event(window, event))
}

fn host_input(window: &NativeWindow, event: &WindowEvent) -> Option<HostInput> {
    let input = match event {
        WindowEvent::CursorMoved { position, .. } => {
            HostInput::PointerMoved(HostPoint::new(position.x, position.y))
        }
        WindowEvent::CursorLeft { .. } => HostInput::PointerLeft,
        WindowEvent::MouseInput { state, button, .. } => HostInput::PointerButton {
            position: window.cursor_position().unwrap_or_default(),
            button: pointer_button(*button),
            pressed: *state == ElementState::Pressed,
        },
        WindowEvent::MouseWheel { delta, .. } => HostInput::Scroll {
            position: window.cursor_position().unwrap_or_default(),
            delta: match *delta {
                MouseScrollDelta::LineDelta(x, y) => ScrollDelta::Lines { x, y },
                MouseScrollDelta::PixelDelta(position) => ScrollDelta::Pixels {
                    x: position.x,
                    y: position.y,
                },
            },
        },
        WindowEvent::Focused(focused) => HostInput::Focus(*focused),
        _ => return None,
    };
    Some(input)
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Back => PointerButton::Back,
        MouseButton::Forward => PointerButton::Forward,
        MouseButton::Other(code) => PointerButton::Other(code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    use crate::backend::headless::{HeadlessHost, HeadlessSurface};
    use crate::embed::{EmbeddedSurface, EmbeddingBridge};
    use crate::window::{WindowState, create_native_window};
    use horizon_graft_core::ToolkitSize;

    #[test]
    fn test_pointer_button_mapping() {
        assert_eq!(pointer_button(MouseButton::Left), PointerButton::Primary);
        assert_eq!(pointer_button(MouseButton::Right), PointerButton::Secondary);
        assert_eq!(pointer_button(MouseButton::Other(9)), PointerButton::Other(9));
    }

    #[test]
    fn test_resized_event_forwards() {
        let mut host = HeadlessHost::new();
        let mut window = create_native_window(&mut host, "Demo", 800, 600).unwrap();
        let toolkit = HeadlessSurface::new(ToolkitSize::default());
        let probe = toolkit.probe();
        let surface = EmbeddedSurface::new(toolkit);
        EmbeddingBridge::default().embed(&mut window, &surface).unwrap();

        let routed = route_window_event(&mut window, &WindowEvent::Resized(PhysicalSize::new(400, 300)));
        assert!(routed);
        assert_eq!(probe.last_size(), Some(ToolkitSize::new(400, 300)));
    }

    #[test]
    fn test_destroyed_event_closes_without_forwarding() {
        let mut host = HeadlessHost::new();
        let mut window = create_native_window(&mut host, "Demo", 800, 600).unwrap();
        let surface = EmbeddedSurface::new(HeadlessSurface::new(ToolkitSize::default()));
        EmbeddingBridge::default().embed(&mut window, &surface).unwrap();

        assert!(!route_window_event(&mut window, &WindowEvent::Destroyed));
        assert_eq!(window.state(), WindowState::Closed);
        assert!(!surface.embedding().is_embedded());
        assert!(!route_window_event(&mut window, &WindowEvent::Resized(PhysicalSize::new(1, 1))));
    }

    #[test]
    fn test_focus_not_forwarded_by_default() {
        let mut host = HeadlessHost::new();
        let mut window = create_native_window(&mut host, "Demo", 10, 10).unwrap();
        let toolkit = HeadlessSurface::new(ToolkitSize::default());
        let probe = toolkit.probe();
        let surface = EmbeddedSurface::new(toolkit);
        EmbeddingBridge::default().embed(&mut window, &surface).unwrap();

        assert!(!route_window_event(&mut window, &WindowEvent::Focused(true)));
        assert!(probe.inputs().is_empty());
    }
}
