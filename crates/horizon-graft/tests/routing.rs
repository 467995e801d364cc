//! Integration tests for winit event routing.

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{DeviceId, ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};

use horizon_graft::backend::{HeadlessHost, HeadlessSurface, SurfaceProbe};
use horizon_graft::embed::{
    EmbeddedSurface, EmbeddingBridge, PointerButton, ScrollDelta, ToolkitInput,
};
use horizon_graft::router::{route_to_windows, route_window_event};
use horizon_graft::window::{NativeWindow, WindowState, create_native_window};
use horizon_graft::{BridgeConfig, HostPoint, ToolkitPoint, ToolkitSize};

fn device() -> DeviceId {
    // Only used to build synthetic events.
    unsafe { DeviceId::dummy() }
}

fn embedded(
    host: &mut HeadlessHost,
    config: BridgeConfig,
) -> (NativeWindow, EmbeddedSurface, SurfaceProbe) {
    let mut window = create_native_window(host, "Routed", 800, 600).unwrap();
    let toolkit = HeadlessSurface::new(ToolkitSize::default());
    let probe = toolkit.probe();
    let surface = EmbeddedSurface::new(toolkit);
    EmbeddingBridge::new(config)
        .unwrap()
        .embed(&mut window, &surface)
        .unwrap();
    (window, surface, probe)
}

#[test]
fn test_route_by_window_id() {
    let mut host = HeadlessHost::new();
    let (a, _surface_a, probe_a) = embedded(&mut host, BridgeConfig::default());
    let id_a = host.last_window().unwrap().winit_id().unwrap();
    let (b, _surface_b, probe_b) = embedded(&mut host, BridgeConfig::default());
    let mut windows = vec![a, b];

    let routed = route_to_windows(
        windows.iter_mut(),
        id_a,
        &WindowEvent::Resized(PhysicalSize::new(320, 200)),
    );

    assert!(routed);
    assert_eq!(probe_a.last_size(), Some(ToolkitSize::new(320, 200)));
    assert_eq!(probe_b.resizes(), vec![ToolkitSize::new(800, 600)]);
}

#[test]
fn test_unknown_window_id_is_ignored() {
    let mut host = HeadlessHost::new();
    let (window, _surface, probe) = embedded(&mut host, BridgeConfig::default());
    let mut windows = vec![window];

    let unknown = winit::window::WindowId::from(u64::MAX);
    assert!(!route_to_windows(
        windows.iter_mut(),
        unknown,
        &WindowEvent::Resized(PhysicalSize::new(1, 1)),
    ));
    assert_eq!(probe.resizes().len(), 1);
}

#[test]
fn test_pointer_events_use_tracked_cursor() {
    let mut host = HeadlessHost::new();
    let (mut window, _surface, probe) =
        embedded(&mut host, BridgeConfig::new().with_forward_input(true));

    assert!(route_window_event(
        &mut window,
        &WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(40.0, 30.0),
        },
    ));
    assert!(route_window_event(
        &mut window,
        &WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Released,
            button: MouseButton::Right,
        },
    ));
    assert!(route_window_event(
        &mut window,
        &WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::LineDelta(0.0, -1.0),
            phase: TouchPhase::Moved,
        },
    ));
    assert!(route_window_event(
        &mut window,
        &WindowEvent::CursorLeft {
            device_id: device(),
        },
    ));

    let at = ToolkitPoint::new(40.0, 30.0);
    assert_eq!(
        probe.inputs(),
        vec![
            ToolkitInput::PointerMoved(at),
            ToolkitInput::PointerButton {
                position: at,
                button: PointerButton::Secondary,
                pressed: false,
            },
            ToolkitInput::Scroll {
                position: at,
                delta: ScrollDelta::Lines { x: 0.0, y: -1.0 },
            },
            ToolkitInput::PointerLeft,
        ]
    );
    assert_eq!(window.cursor_position(), None);
}

#[test]
fn test_cursor_tracked_even_without_forwarding() {
    let mut host = HeadlessHost::new();
    let (mut window, _surface, probe) = embedded(&mut host, BridgeConfig::default());

    assert!(!route_window_event(
        &mut window,
        &WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(5.0, 6.0),
        },
    ));
    assert_eq!(window.cursor_position(), Some(HostPoint::new(5.0, 6.0)));
    assert!(probe.inputs().is_empty());
}

#[test]
fn test_destroyed_event_severs_relation() {
    let mut host = HeadlessHost::new();
    let (mut window, surface, _probe) = embedded(&mut host, BridgeConfig::default());

    route_window_event(&mut window, &WindowEvent::Destroyed);

    assert_eq!(window.state(), WindowState::Closed);
    assert!(!surface.embedding().is_embedded());
    assert!(!surface.is_destroyed());
}

#[test]
fn test_any_routed_event_detaches_destroyed_content() {
    let mut host = HeadlessHost::new();
    let (mut window, surface, _probe) = embedded(&mut host, BridgeConfig::default());
    let window_probe = host.last_window().unwrap();

    surface.destroy();
    assert!(window_probe.content().is_some());

    assert!(!route_window_event(&mut window, &WindowEvent::Focused(true)));
    assert_eq!(window_probe.content(), None);
}

#[test]
fn test_close_requested_is_left_to_application() {
    let mut host = HeadlessHost::new();
    let (mut window, _surface, _probe) = embedded(&mut host, BridgeConfig::default());

    assert!(!route_window_event(&mut window, &WindowEvent::CloseRequested));
    assert_eq!(window.state(), WindowState::Created);
}
