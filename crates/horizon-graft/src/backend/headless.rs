//! In-memory host platform and toolkit surface.
//!
//! `HeadlessHost` creates windows that exist only as records, and
//! `HeadlessSurface` is a toolkit surface that records every call the
//! bridge makes. Both hand out probes that share the recorded state, so a
//! test can keep observing after ownership has moved into a
//! [`NativeWindow`](crate::window::NativeWindow) or
//! [`EmbeddedSurface`](crate::embed::EmbeddedSurface).
//!
//! Drawables are modelled as web handles carrying a unique id.

use std::cell::RefCell;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use raw_window_handle::{RawWindowHandle, WebWindowHandle};
use winit::window::WindowId;

use horizon_graft_core::logging::targets;
use horizon_graft_core::{HostSize, ToolkitSize, graft_debug};

use crate::embed::input::ToolkitInput;
use crate::embed::toolkit::{RealizeError, ToolkitSurface};
use crate::window::{HostError, HostPlatform, HostWindow, WindowConfig};

static NEXT_DRAWABLE_ID: AtomicU32 = AtomicU32::new(1);

fn next_handle() -> RawWindowHandle {
    RawWindowHandle::Web(WebWindowHandle::new(
        NEXT_DRAWABLE_ID.fetch_add(1, Ordering::Relaxed),
    ))
}

/// Headless windows reuse their drawable id as their winit id, so events
/// can be routed to them by id.
fn winit_id_for(handle: RawWindowHandle) -> Option<WindowId> {
    drawable_id(handle).map(|id| WindowId::from(u64::from(id.get())))
}

// ============================================================================
// Host
// ============================================================================

/// A change to a headless window's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEvent {
    /// A drawable became the content of an empty window.
    Attached(RawWindowHandle),
    /// A drawable replaced the previous content in one step.
    Replaced {
        previous: RawWindowHandle,
        current: RawWindowHandle,
    },
    /// The content was removed.
    Detached(RawWindowHandle),
}

#[derive(Debug)]
struct WindowRecord {
    handle: RawWindowHandle,
    title: String,
    size: HostSize,
    scale_factor: f64,
    visible: bool,
    closed: bool,
    content: Option<RawWindowHandle>,
    content_log: Vec<ContentEvent>,
    layouts: Vec<HostSize>,
    refuse_attach: Option<String>,
    defer_resize: bool,
}

/// Observes (and steers) one headless window.
#[derive(Debug, Clone)]
pub struct HeadlessWindowProbe {
    record: Rc<RefCell<WindowRecord>>,
}

impl HeadlessWindowProbe {
    pub fn title(&self) -> String {
        self.record.borrow().title.clone()
    }

    pub fn content_size(&self) -> HostSize {
        self.record.borrow().size
    }

    pub fn scale_factor(&self) -> f64 {
        self.record.borrow().scale_factor
    }

    pub fn is_visible(&self) -> bool {
        self.record.borrow().visible
    }

    pub fn is_closed(&self) -> bool {
        self.record.borrow().closed
    }

    /// The id events for this window are routed by.
    pub fn winit_id(&self) -> Option<WindowId> {
        winit_id_for(self.record.borrow().handle)
    }

    /// The drawable currently attached as content.
    pub fn content(&self) -> Option<RawWindowHandle> {
        self.record.borrow().content
    }

    /// Every content change, in order.
    pub fn content_log(&self) -> Vec<ContentEvent> {
        self.record.borrow().content_log.clone()
    }

    /// Every size the content was laid out to, in order.
    pub fn layouts(&self) -> Vec<HostSize> {
        self.record.borrow().layouts.clone()
    }

    /// Make the next content attachment fail with an allocation error.
    pub fn refuse_next_attach(&self, reason: impl Into<String>) {
        self.record.borrow_mut().refuse_attach = Some(reason.into());
    }

    /// Make programmatic resizes asynchronous: the size is applied but
    /// reported only through a later resize notification.
    pub fn defer_resizes(&self, defer: bool) {
        self.record.borrow_mut().defer_resize = defer;
    }

    /// Simulate the user dragging the window edge. Returns the new size,
    /// which the caller then reports with `notify_content_resized`.
    pub fn drag_to(&self, size: HostSize) -> HostSize {
        self.record.borrow_mut().size = size;
        size
    }

    /// Simulate moving the window to a display with another scale factor.
    /// The content size scales with it.
    pub fn move_to_display(&self, scale_factor: f64) {
        let mut record = self.record.borrow_mut();
        let ratio = scale_factor / record.scale_factor;
        record.size = HostSize::new(
            (f64::from(record.size.width) * ratio).round() as u32,
            (f64::from(record.size.height) * ratio).round() as u32,
        );
        record.scale_factor = scale_factor;
    }
}

/// An in-memory host platform.
#[derive(Debug)]
pub struct HeadlessHost {
    scale_factor: f64,
    unconfigured: bool,
    refuse_next: Option<String>,
    windows: Vec<HeadlessWindowProbe>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// A host whose windows have a scale factor of 1.
    pub fn new() -> Self {
        Self {
            scale_factor: 1.0,
            unconfigured: false,
            refuse_next: None,
            windows: Vec::new(),
        }
    }

    /// Scale factor given to windows created from now on.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Windows created from now on report an empty content area until
    /// their first resize, like X11 windows the window manager has not
    /// configured yet.
    pub fn with_unconfigured_windows(mut self) -> Self {
        self.unconfigured = true;
        self
    }

    /// Make the next window creation fail with an allocation error.
    pub fn refuse_next_window(&mut self, reason: impl Into<String>) {
        self.refuse_next = Some(reason.into());
    }

    /// Probes for every window created so far.
    pub fn windows(&self) -> &[HeadlessWindowProbe] {
        &self.windows
    }

    /// Probe for the most recently created window.
    pub fn last_window(&self) -> Option<HeadlessWindowProbe> {
        self.windows.last().cloned()
    }
}

impl HostPlatform for HeadlessHost {
    fn create_window(&mut self, config: &WindowConfig) -> Result<Box<dyn HostWindow>, HostError> {
        if let Some(reason) = self.refuse_next.take() {
            return Err(HostError::allocation(reason));
        }

        let record = Rc::new(RefCell::new(WindowRecord {
            handle: next_handle(),
            title: config.title().to_string(),
            size: if self.unconfigured {
                HostSize::default()
            } else {
                config.size()
            },
            scale_factor: self.scale_factor,
            visible: false,
            closed: false,
            content: None,
            content_log: Vec::new(),
            layouts: Vec::new(),
            refuse_attach: None,
            defer_resize: false,
        }));
        self.windows.push(HeadlessWindowProbe {
            record: Rc::clone(&record),
        });
        graft_debug!(targets::BACKEND, title = config.title(), "headless window created");
        Ok(Box::new(HeadlessWindow { record }))
    }
}

struct HeadlessWindow {
    record: Rc<RefCell<WindowRecord>>,
}

impl HostWindow for HeadlessWindow {
    fn content_size(&self) -> HostSize {
        self.record.borrow().size
    }

    fn scale_factor(&self) -> f64 {
        self.record.borrow().scale_factor
    }

    fn set_title(&mut self, title: &str) {
        self.record.borrow_mut().title = title.to_string();
    }

    fn show(&mut self) {
        self.record.borrow_mut().visible = true;
    }

    fn close(&mut self) {
        let mut record = self.record.borrow_mut();
        if let Some(content) = record.content.take() {
            record.content_log.push(ContentEvent::Detached(content));
        }
        record.visible = false;
        record.closed = true;
    }

    fn request_content_size(&mut self, size: HostSize) -> Option<HostSize> {
        let mut record = self.record.borrow_mut();
        record.size = size;
        (!record.defer_resize).then_some(size)
    }

    fn replace_content(&mut self, drawable: RawWindowHandle, size: HostSize) -> Result<(), HostError> {
        let mut record = self.record.borrow_mut();
        if let Some(reason) = record.refuse_attach.take() {
            return Err(HostError::allocation(reason));
        }
        let event = match record.content.replace(drawable) {
            Some(previous) => ContentEvent::Replaced {
                previous,
                current: drawable,
            },
            None => ContentEvent::Attached(drawable),
        };
        record.content_log.push(event);
        record.layouts.push(size);
        Ok(())
    }

    fn layout_content(&mut self, size: HostSize) {
        self.record.borrow_mut().layouts.push(size);
    }

    fn detach_content(&mut self) {
        let mut record = self.record.borrow_mut();
        if let Some(content) = record.content.take() {
            record.content_log.push(ContentEvent::Detached(content));
        }
    }

    fn window_handle(&self) -> Option<RawWindowHandle> {
        Some(self.record.borrow().handle)
    }

    fn winit_id(&self) -> Option<WindowId> {
        winit_id_for(self.record.borrow().handle)
    }
}

// ============================================================================
// Toolkit surface
// ============================================================================

#[derive(Debug, Default)]
struct SurfaceRecord {
    realize_calls: usize,
    resizes: Vec<ToolkitSize>,
    inputs: Vec<ToolkitInput>,
    visibility: Vec<bool>,
    destroy_calls: usize,
}

/// Observes a [`HeadlessSurface`] after it has been wrapped.
#[derive(Debug, Clone)]
pub struct SurfaceProbe {
    record: Rc<RefCell<SurfaceRecord>>,
}

impl SurfaceProbe {
    pub fn realize_calls(&self) -> usize {
        self.record.borrow().realize_calls
    }

    /// Every size forwarded to the surface, in order.
    pub fn resizes(&self) -> Vec<ToolkitSize> {
        self.record.borrow().resizes.clone()
    }

    pub fn last_size(&self) -> Option<ToolkitSize> {
        self.record.borrow().resizes.last().copied()
    }

    pub fn inputs(&self) -> Vec<ToolkitInput> {
        self.record.borrow().inputs.clone()
    }

    pub fn visibility(&self) -> Vec<bool> {
        self.record.borrow().visibility.clone()
    }

    pub fn destroy_calls(&self) -> usize {
        self.record.borrow().destroy_calls
    }
}

/// A toolkit surface that records what the bridge does to it.
pub struct HeadlessSurface {
    preferred: ToolkitSize,
    fail_realize: Option<String>,
    drawable: Option<RawWindowHandle>,
    realize_hook: Option<Box<dyn FnMut()>>,
    resize_hook: Option<Box<dyn FnMut(ToolkitSize)>>,
    record: Rc<RefCell<SurfaceRecord>>,
}

impl HeadlessSurface {
    /// A surface that would like to be `preferred` in size.
    pub fn new(preferred: ToolkitSize) -> Self {
        Self {
            preferred,
            fail_realize: None,
            drawable: None,
            realize_hook: None,
            resize_hook: None,
            record: Rc::default(),
        }
    }

    /// Make every realization attempt fail with `message`.
    pub fn failing_realize(mut self, message: impl Into<String>) -> Self {
        self.fail_realize = Some(message.into());
        self
    }

    /// Run `hook` after each forwarded resize has been recorded.
    ///
    /// The hook runs inside the bridge's resize forwarding, which makes it
    /// the place to exercise re-entrant teardown. Holding a strong handle to
    /// the surface in the hook keeps the surface alive forever; take it out
    /// of a shared slot instead.
    pub fn with_resize_hook(mut self, hook: impl FnMut(ToolkitSize) + 'static) -> Self {
        self.resize_hook = Some(Box::new(hook));
        self
    }

    /// Run `hook` inside each successful realization, after the drawable
    /// has been allocated. The same slot caveat as for
    /// [`with_resize_hook`](Self::with_resize_hook) applies.
    pub fn with_realize_hook(mut self, hook: impl FnMut() + 'static) -> Self {
        self.realize_hook = Some(Box::new(hook));
        self
    }

    pub fn probe(&self) -> SurfaceProbe {
        SurfaceProbe {
            record: Rc::clone(&self.record),
        }
    }
}

impl ToolkitSurface for HeadlessSurface {
    fn realize(&mut self) -> Result<RawWindowHandle, RealizeError> {
        if let Some(message) = &self.fail_realize {
            return Err(RealizeError::new(message.clone()));
        }
        self.record.borrow_mut().realize_calls += 1;
        let drawable = *self.drawable.get_or_insert_with(next_handle);
        if let Some(hook) = self.realize_hook.as_mut() {
            hook();
        }
        Ok(drawable)
    }

    fn preferred_size(&self) -> ToolkitSize {
        self.preferred
    }

    fn resize(&mut self, size: ToolkitSize) {
        self.record.borrow_mut().resizes.push(size);
        if let Some(hook) = self.resize_hook.as_mut() {
            hook(size);
        }
    }

    fn handle_input(&mut self, event: &ToolkitInput) {
        self.record.borrow_mut().inputs.push(*event);
    }

    fn visibility_changed(&mut self, visible: bool) {
        self.record.borrow_mut().visibility.push(visible);
    }

    fn destroy(&mut self) {
        self.drawable = None;
        self.realize_hook = None;
        self.resize_hook = None;
        self.record.borrow_mut().destroy_calls += 1;
    }
}

/// Drawable id carried by a headless handle.
pub fn drawable_id(handle: RawWindowHandle) -> Option<NonZeroU32> {
    match handle {
        RawWindowHandle::Web(web) => NonZeroU32::new(web.id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refused_window_is_not_recorded() {
        let mut host = HeadlessHost::new();
        host.refuse_next_window("exhausted");
        let err = host
            .create_window(&WindowConfig::new("x", 1, 1))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "allocation refused: exhausted");
        assert!(host.windows().is_empty());

        assert!(host.create_window(&WindowConfig::new("x", 1, 1)).is_ok());
        assert_eq!(host.windows().len(), 1);
    }

    #[test]
    fn test_replace_content_logs_swap() {
        let mut host = HeadlessHost::new();
        let mut window = host.create_window(&WindowConfig::new("x", 10, 10)).unwrap();
        let probe = host.last_window().unwrap();
        let a = next_handle();
        let b = next_handle();

        window.replace_content(a, HostSize::new(10, 10)).unwrap();
        window.replace_content(b, HostSize::new(10, 10)).unwrap();
        window.detach_content();

        assert_eq!(
            probe.content_log(),
            vec![
                ContentEvent::Attached(a),
                ContentEvent::Replaced {
                    previous: a,
                    current: b
                },
                ContentEvent::Detached(b),
            ]
        );
    }

    #[test]
    fn test_refused_attach_keeps_content() {
        let mut host = HeadlessHost::new();
        let mut window = host.create_window(&WindowConfig::new("x", 10, 10)).unwrap();
        let probe = host.last_window().unwrap();
        let a = next_handle();
        window.replace_content(a, HostSize::new(10, 10)).unwrap();

        probe.refuse_next_attach("no memory");
        assert!(window.replace_content(next_handle(), HostSize::new(10, 10)).is_err());
        assert_eq!(probe.content(), Some(a));
    }

    #[test]
    fn test_move_to_display_scales_size() {
        let mut host = HeadlessHost::new();
        let window = host.create_window(&WindowConfig::new("x", 400, 300)).unwrap();
        let probe = host.last_window().unwrap();
        probe.move_to_display(2.0);
        assert_eq!(window.content_size(), HostSize::new(800, 600));
        assert_eq!(window.scale_factor(), 2.0);
    }

    #[test]
    fn test_surface_drawable_is_stable_until_destroy() {
        let mut surface = HeadlessSurface::new(ToolkitSize::default());
        let first = surface.realize().unwrap();
        assert_eq!(surface.realize().unwrap(), first);
        assert!(drawable_id(first).is_some());
        surface.destroy();
        assert_ne!(surface.realize().unwrap(), first);
    }
}
