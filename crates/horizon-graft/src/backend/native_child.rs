//! Attaching a foreign drawable as a native child of a host window.
//!
//! # Platform Support
//!
//! | Platform | Mechanism |
//! |----------|-----------|
//! | macOS | `addSubview:` with width/height autoresizing |
//! | Windows | `SetParent` with `WS_CHILD` style |
//! | Linux X11 | `ReparentWindow` over an x11rb connection |
//! | Linux Wayland | Not supported (no cross-client subsurfaces) |
//!
//! Sizes arrive in physical pixels; AppKit frames are converted to points.
//!
//! A detached drawable is hidden and top-level again; it is never
//! destroyed. An attach that fails part way through detaches the same way.

use raw_window_handle::RawWindowHandle;

use horizon_graft_core::HostSize;

use crate::window::HostError;

/// A drawable parented into a host window.
pub(crate) struct NativeChild {
    child: imp::Child,
}

impl NativeChild {
    /// Parent `drawable` into `parent`, filling a content area of `size`.
    pub(crate) fn attach(
        parent: RawWindowHandle,
        drawable: RawWindowHandle,
        size: HostSize,
        scale_factor: f64,
    ) -> Result<Self, HostError> {
        imp::attach(parent, drawable, size, scale_factor).map(|child| Self { child })
    }

    pub(crate) fn layout(&self, size: HostSize, scale_factor: f64) {
        imp::layout(&self.child, size, scale_factor);
    }

    /// Unparent the drawable. It is not destroyed.
    pub(crate) fn detach(self) {
        imp::detach(self.child);
    }
}

// ============================================================================
// macOS Implementation
// ============================================================================

#[cfg(target_os = "macos")]
mod macos {
    use super::*;
    use objc2::msg_send;
    use objc2::rc::Retained;
    use objc2_app_kit::NSView;
    use objc2_foundation::{NSPoint, NSRect, NSSize};

    /// NSViewWidthSizable | NSViewHeightSizable
    const FILL_PARENT: usize = 2 | 16;

    pub(super) struct Child {
        view: Retained<NSView>,
    }

    fn ns_view(handle: RawWindowHandle) -> Result<Retained<NSView>, HostError> {
        match handle {
            RawWindowHandle::AppKit(handle) => {
                let view = handle.ns_view.as_ptr() as *mut NSView;
                // The handle points at a live NSView owned by its window.
                unsafe { Retained::retain(view) }
                    .ok_or_else(|| HostError::handle_access("null NSView"))
            }
            _ => Err(HostError::unsupported("expected an AppKit view handle")),
        }
    }

    fn frame(size: HostSize, scale_factor: f64) -> NSRect {
        NSRect::new(
            NSPoint::new(0.0, 0.0),
            NSSize::new(
                f64::from(size.width) / scale_factor,
                f64::from(size.height) / scale_factor,
            ),
        )
    }

    pub(super) fn attach(
        parent: RawWindowHandle,
        drawable: RawWindowHandle,
        size: HostSize,
        scale_factor: f64,
    ) -> Result<Child, HostError> {
        let parent = ns_view(parent)?;
        let view = ns_view(drawable)?;
        unsafe {
            let _: () = msg_send![&view, setFrame: frame(size, scale_factor)];
            let _: () = msg_send![&view, setAutoresizingMask: FILL_PARENT];
            let _: () = msg_send![&parent, addSubview: &*view];
        }
        Ok(Child { view })
    }

    pub(super) fn layout(child: &Child, size: HostSize, scale_factor: f64) {
        unsafe {
            let _: () = msg_send![&child.view, setFrame: frame(size, scale_factor)];
        }
    }

    pub(super) fn detach(child: Child) {
        unsafe {
            let _: () = msg_send![&child.view, removeFromSuperview];
        }
    }
}

#[cfg(target_os = "macos")]
use macos as imp;

// ============================================================================
// Windows Implementation
// ============================================================================

#[cfg(target_os = "windows")]
mod windows_impl {
    use super::*;
    use horizon_graft_core::logging::targets;
    use horizon_graft_core::graft_warn;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{
        GWL_STYLE, GetWindowLongW, SW_HIDE, SWP_FRAMECHANGED, SWP_NOZORDER, SWP_SHOWWINDOW,
        SetParent, SetWindowLongW, SetWindowPos, ShowWindow, WS_CAPTION, WS_CHILD, WS_POPUP,
        WS_THICKFRAME, WS_VISIBLE,
    };

    pub(super) struct Child {
        hwnd: HWND,
        /// Style the drawable had before it was parented.
        style: i32,
    }

    fn hwnd(handle: RawWindowHandle) -> Result<HWND, HostError> {
        match handle {
            RawWindowHandle::Win32(handle) => Ok(HWND(handle.hwnd.get() as *mut std::ffi::c_void)),
            _ => Err(HostError::unsupported("expected a Win32 window handle")),
        }
    }

    fn place(hwnd: HWND, size: HostSize) -> windows::core::Result<()> {
        unsafe {
            SetWindowPos(
                hwnd,
                HWND::default(),
                0,
                0,
                size.width as i32,
                size.height as i32,
                SWP_NOZORDER | SWP_FRAMECHANGED | SWP_SHOWWINDOW,
            )
        }
    }

    pub(super) fn attach(
        parent: RawWindowHandle,
        drawable: RawWindowHandle,
        size: HostSize,
        _scale_factor: f64,
    ) -> Result<Child, HostError> {
        let parent = hwnd(parent)?;
        let hwnd = hwnd(drawable)?;
        let child = unsafe {
            let style = GetWindowLongW(hwnd, GWL_STYLE);
            let chrome = (WS_POPUP.0 | WS_CAPTION.0 | WS_THICKFRAME.0) as i32;
            SetWindowLongW(hwnd, GWL_STYLE, (style & !chrome) | WS_CHILD.0 as i32);
            if let Err(err) = SetParent(hwnd, parent) {
                SetWindowLongW(hwnd, GWL_STYLE, style);
                return Err(HostError::platform(err.to_string()));
            }
            Child { hwnd, style }
        };
        if let Err(err) = place(hwnd, size) {
            unparent(&child);
            return Err(HostError::platform(err.to_string()));
        }
        Ok(child)
    }

    /// Hide the drawable, make it top-level again and restore its style.
    fn unparent(child: &Child) {
        unsafe {
            let _ = ShowWindow(child.hwnd, SW_HIDE);
            if let Err(err) = SetParent(child.hwnd, HWND::default()) {
                graft_warn!(targets::BACKEND, %err, "failed to unparent embedded child");
            }
            SetWindowLongW(child.hwnd, GWL_STYLE, child.style & !(WS_VISIBLE.0 as i32));
        }
    }

    pub(super) fn layout(child: &Child, size: HostSize, _scale_factor: f64) {
        if let Err(err) = place(child.hwnd, size) {
            graft_warn!(targets::BACKEND, %err, "SetWindowPos failed for embedded child");
        }
    }

    pub(super) fn detach(child: Child) {
        unparent(&child);
    }
}

#[cfg(target_os = "windows")]
use windows_impl as imp;

// ============================================================================
// Linux Implementation
// ============================================================================

#[cfg(target_os = "linux")]
mod linux {
    use super::*;
    use horizon_graft_core::logging::targets;
    use horizon_graft_core::graft_warn;
    use x11rb::connection::Connection;
    use x11rb::protocol::xproto::{ConfigureWindowAux, ConnectionExt as _};
    use x11rb::rust_connection::RustConnection;

    pub(super) struct Child {
        conn: RustConnection,
        window: u32,
        root: u32,
    }

    fn x11_window(handle: RawWindowHandle) -> Result<u32, HostError> {
        match handle {
            RawWindowHandle::Xlib(handle) => Ok(handle.window as u32),
            RawWindowHandle::Xcb(handle) => Ok(handle.window.get()),
            RawWindowHandle::Wayland(_) => Err(HostError::unsupported(
                "Wayland surfaces cannot be reparented into another client's window",
            )),
            _ => Err(HostError::unsupported("expected an X11 window handle")),
        }
    }

    fn platform(err: impl std::fmt::Display) -> HostError {
        HostError::platform(err.to_string())
    }

    fn configure(conn: &RustConnection, window: u32, size: HostSize) -> Result<(), HostError> {
        let aux = ConfigureWindowAux::new()
            .x(0)
            .y(0)
            .width(size.width)
            .height(size.height);
        conn.configure_window(window, &aux).map_err(platform)?;
        conn.flush().map_err(platform)
    }

    pub(super) fn attach(
        parent: RawWindowHandle,
        drawable: RawWindowHandle,
        size: HostSize,
        _scale_factor: f64,
    ) -> Result<Child, HostError> {
        let parent = x11_window(parent)?;
        let window = x11_window(drawable)?;

        let (conn, screen) = x11rb::connect(None).map_err(platform)?;
        let root = conn
            .setup()
            .roots
            .get(screen)
            .map(|screen| screen.root)
            .ok_or_else(|| HostError::handle_access("X11 screen not found"))?;

        conn.reparent_window(window, parent, 0, 0)
            .map_err(platform)?
            .check()
            .map_err(platform)?;
        let child = Child { conn, window, root };

        let shown = child
            .conn
            .map_window(window)
            .map_err(platform)
            .and_then(|cookie| cookie.check().map_err(platform))
            .and_then(|()| configure(&child.conn, window, size));
        if let Err(err) = shown {
            unparent(&child);
            return Err(err);
        }
        Ok(child)
    }

    /// Unmap the window and hand it back to the root. A mapped window
    /// reparented to the root would show up as a bare top-level.
    fn unparent(child: &Child) {
        let result = child
            .conn
            .unmap_window(child.window)
            .map_err(platform)
            .and_then(|_| {
                child
                    .conn
                    .reparent_window(child.window, child.root, 0, 0)
                    .map_err(platform)
            })
            .and_then(|cookie| cookie.check().map_err(platform));
        if let Err(err) = result {
            graft_warn!(targets::BACKEND, %err, "failed to unparent embedded X11 window");
        }
    }

    pub(super) fn layout(child: &Child, size: HostSize, _scale_factor: f64) {
        if let Err(err) = configure(&child.conn, child.window, size) {
            graft_warn!(targets::BACKEND, %err, "failed to resize embedded X11 window");
        }
    }

    pub(super) fn detach(child: Child) {
        unparent(&child);
    }
}

#[cfg(target_os = "linux")]
use linux as imp;

// ============================================================================
// Fallback
// ============================================================================

#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
mod unsupported {
    use super::*;

    pub(super) enum Child {}

    pub(super) fn attach(
        _parent: RawWindowHandle,
        _drawable: RawWindowHandle,
        _size: HostSize,
        _scale_factor: f64,
    ) -> Result<Child, HostError> {
        Err(HostError::unsupported(
            "native child attachment is not available on this platform",
        ))
    }

    pub(super) fn layout(child: &Child, _size: HostSize, _scale_factor: f64) {
        match *child {}
    }

    pub(super) fn detach(child: Child) {
        match child {}
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
use unsupported as imp;

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::WebWindowHandle;

    #[test]
    fn test_web_handles_are_not_attachable() {
        let web = RawWindowHandle::Web(WebWindowHandle::new(1));
        let err = NativeChild::attach(web, web, HostSize::new(10, 10), 1.0)
            .err()
            .unwrap();
        assert!(err.is_unsupported());
    }

    #[cfg(target_os = "linux")]
    mod x11 {
        use super::*;
        use raw_window_handle::XcbWindowHandle;
        use std::num::NonZeroU32;
        use x11rb::connection::Connection;
        use x11rb::protocol::xproto::{ConnectionExt as _, CreateWindowAux, MapState, WindowClass};
        use x11rb::rust_connection::RustConnection;
        use x11rb::{COPY_DEPTH_FROM_PARENT, COPY_FROM_PARENT};

        fn create_window(conn: &RustConnection, root: u32) -> u32 {
            let id = conn.generate_id().unwrap();
            conn.create_window(
                COPY_DEPTH_FROM_PARENT,
                id,
                root,
                0,
                0,
                100,
                100,
                0,
                WindowClass::INPUT_OUTPUT,
                COPY_FROM_PARENT,
                &CreateWindowAux::new(),
            )
            .unwrap()
            .check()
            .unwrap();
            id
        }

        fn handle(window: u32) -> RawWindowHandle {
            RawWindowHandle::Xcb(XcbWindowHandle::new(NonZeroU32::new(window).unwrap()))
        }

        fn parent_of(conn: &RustConnection, window: u32) -> u32 {
            conn.query_tree(window).unwrap().reply().unwrap().parent
        }

        fn map_state(conn: &RustConnection, window: u32) -> MapState {
            conn.get_window_attributes(window)
                .unwrap()
                .reply()
                .unwrap()
                .map_state
        }

        #[test]
        #[ignore = "requires an X11 display"]
        fn test_detached_child_is_unmapped_under_root() {
            let (conn, screen) = x11rb::connect(None).unwrap();
            let root = conn.setup().roots[screen].root;
            let parent = create_window(&conn, root);
            let drawable = create_window(&conn, root);
            conn.map_window(parent).unwrap().check().unwrap();

            let child =
                NativeChild::attach(handle(parent), handle(drawable), HostSize::new(50, 40), 1.0)
                    .unwrap();
            assert_eq!(parent_of(&conn, drawable), parent);
            assert_eq!(map_state(&conn, drawable), MapState::VIEWABLE);

            child.detach();
            assert_eq!(parent_of(&conn, drawable), root);
            assert_eq!(map_state(&conn, drawable), MapState::UNMAPPED);
        }

        #[test]
        #[ignore = "requires an X11 display"]
        fn test_failed_attach_leaves_drawable_unparented() {
            let (conn, screen) = x11rb::connect(None).unwrap();
            let root = conn.setup().roots[screen].root;
            let drawable = create_window(&conn, root);
            // An id that was never created.
            let missing = conn.generate_id().unwrap();

            let err =
                NativeChild::attach(handle(missing), handle(drawable), HostSize::new(50, 40), 1.0)
                    .err()
                    .unwrap();
            assert!(!err.is_unsupported());
            assert_eq!(parent_of(&conn, drawable), root);
            assert_eq!(map_state(&conn, drawable), MapState::UNMAPPED);
        }
    }

    #[cfg(target_os = "windows")]
    mod win32 {
        use super::*;
        use raw_window_handle::Win32WindowHandle;
        use std::num::NonZeroIsize;
        use windows::Win32::Foundation::{HINSTANCE, HWND};
        use windows::Win32::UI::WindowsAndMessaging::{
            CreateWindowExW, DestroyWindow, GA_PARENT, GWL_STYLE, GetAncestor, GetDesktopWindow,
            GetWindowLongW, HMENU, IsWindowVisible, WINDOW_EX_STYLE, WS_CHILD,
            WS_OVERLAPPEDWINDOW, WS_VISIBLE,
        };
        use windows::core::w;

        fn create_window() -> HWND {
            unsafe {
                CreateWindowExW(
                    WINDOW_EX_STYLE(0),
                    w!("STATIC"),
                    w!(""),
                    WS_OVERLAPPEDWINDOW | WS_VISIBLE,
                    0,
                    0,
                    100,
                    100,
                    HWND::default(),
                    HMENU::default(),
                    HINSTANCE::default(),
                    None,
                )
                .unwrap()
            }
        }

        fn handle(hwnd: HWND) -> RawWindowHandle {
            RawWindowHandle::Win32(Win32WindowHandle::new(
                NonZeroIsize::new(hwnd.0 as isize).unwrap(),
            ))
        }

        #[test]
        #[ignore = "requires an interactive desktop session"]
        fn test_detached_child_is_hidden_top_level() {
            let parent = create_window();
            let drawable = create_window();

            let child =
                NativeChild::attach(handle(parent), handle(drawable), HostSize::new(50, 40), 1.0)
                    .unwrap();
            unsafe {
                assert_eq!(GetAncestor(drawable, GA_PARENT), parent);
                assert!(IsWindowVisible(drawable).as_bool());
            }

            child.detach();
            unsafe {
                assert_eq!(GetAncestor(drawable, GA_PARENT), GetDesktopWindow());
                assert!(!IsWindowVisible(drawable).as_bool());
                assert_eq!(GetWindowLongW(drawable, GWL_STYLE) & WS_CHILD.0 as i32, 0);
                let _ = DestroyWindow(drawable);
                let _ = DestroyWindow(parent);
            }
        }
    }
}
