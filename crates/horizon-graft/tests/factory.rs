//! Integration tests for native window creation.

use horizon_graft::backend::HeadlessHost;
use horizon_graft::window::{NativeWindow, WindowConfig, WindowState, create_native_window};
use horizon_graft::{ConstraintViolation, GraftError, HostSize};

#[test]
fn test_content_size_matches_request() {
    let mut host = HeadlessHost::new();
    for (width, height) in [(1, 1), (800, 600), (1920, 1080), (3, 7000)] {
        let window = create_native_window(&mut host, "sized", width, height).unwrap();
        assert_eq!(window.content_size(), HostSize::new(width, height));
        assert_eq!(window.state(), WindowState::Created);
    }
}

#[test]
fn test_demo_window() {
    let mut host = HeadlessHost::new();
    let window = create_native_window(&mut host, "Demo", 800, 600).unwrap();
    let probe = host.last_window().unwrap();

    assert_eq!(window.title(), "Demo");
    assert_eq!(probe.title(), "Demo");
    assert_eq!(window.content_size(), HostSize::new(800, 600));
    assert_eq!(window.state(), WindowState::Created);
    assert!(!probe.is_visible());
    assert!(window.embedded_relation().is_none());
}

#[test]
fn test_zero_dimensions_are_constraint_violations() {
    let mut host = HeadlessHost::new();
    for (width, height) in [(0, 600), (800, 0), (0, 0)] {
        let err = create_native_window(&mut host, "bad", width, height).unwrap_err();
        assert_eq!(
            err,
            GraftError::ConstraintViolation(ConstraintViolation::ZeroDimension { width, height })
        );
    }
    assert!(host.windows().is_empty());
}

#[test]
fn test_refused_allocation_yields_no_window() {
    let mut host = HeadlessHost::new();
    host.refuse_next_window("too many windows");

    let err = create_native_window(&mut host, "Demo", 800, 600).unwrap_err();
    assert!(matches!(err, GraftError::AllocationFailure(_)));
    assert!(host.windows().is_empty());

    // The next attempt is the caller's decision and succeeds.
    assert!(create_native_window(&mut host, "Demo", 800, 600).is_ok());
}

#[test]
fn test_show_close_lifecycle() {
    let mut host = HeadlessHost::new();
    let mut window = create_native_window(&mut host, "", 320, 240).unwrap();
    let probe = host.last_window().unwrap();

    window.show().unwrap();
    assert_eq!(window.state(), WindowState::Shown);
    assert!(probe.is_visible());

    window.set_title("Renamed").unwrap();
    assert_eq!(probe.title(), "Renamed");

    window.close();
    assert_eq!(window.state(), WindowState::Closed);
    assert!(probe.is_closed());
    assert_eq!(
        window.show().unwrap_err().constraint(),
        Some(&ConstraintViolation::WindowClosed)
    );
}

#[test]
fn test_config_options_reach_host() {
    let mut host = HeadlessHost::new().with_scale_factor(2.0);
    let config = WindowConfig::new("Configured", 640, 480)
        .with_min_size(320, 240)
        .with_resizable(false);
    let window = NativeWindow::create(&mut host, &config).unwrap();

    assert_eq!(window.scale_factor(), 2.0);
    assert_eq!(window.content_size(), HostSize::new(640, 480));
}

#[test]
fn test_programmatic_resize() {
    let mut host = HeadlessHost::new();
    let mut window = create_native_window(&mut host, "Demo", 800, 600).unwrap();
    let probe = host.last_window().unwrap();

    window.request_content_size(1024, 768).unwrap();
    assert_eq!(window.content_size(), HostSize::new(1024, 768));

    probe.defer_resizes(true);
    window.request_content_size(640, 480).unwrap();
    assert_eq!(window.content_size(), HostSize::new(1024, 768));
    window.notify_content_resized(probe.content_size());
    assert_eq!(window.content_size(), HostSize::new(640, 480));

    assert!(window.request_content_size(0, 480).unwrap_err().is_constraint_violation());
}

#[test]
fn test_content_size_is_requested_size_before_host_settles() {
    let mut host = HeadlessHost::new().with_unconfigured_windows();
    let mut window = create_native_window(&mut host, "Demo", 800, 600).unwrap();
    let probe = host.last_window().unwrap();

    assert_eq!(probe.content_size(), HostSize::default());
    assert_eq!(window.content_size(), HostSize::new(800, 600));

    // The window manager settles on another size later.
    window.notify_content_resized(probe.drag_to(HostSize::new(790, 580)));
    assert_eq!(window.content_size(), HostSize::new(790, 580));
}
