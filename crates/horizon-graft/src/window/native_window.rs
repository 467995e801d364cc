//! Native window wrapper.
//!
//! This module provides `NativeWindow`, a host top-level window together with
//! the bookkeeping the embedding bridge needs: lifecycle state, the last
//! known content size and scale factor, and the window's half of the
//! embedding relation.

use raw_window_handle::RawWindowHandle;
use std::sync::atomic::{AtomicU64, Ordering};
use winit::window::WindowId;

use horizon_graft_core::logging::{span_names, targets};
use horizon_graft_core::thread_check::ThreadAffinity;
use horizon_graft_core::{
    ConstraintViolation, GraftError, GraftSpan, HostPoint, HostSize, Result, ToolkitSize,
    graft_debug, graft_trace, graft_warn, validate_scale,
};

use super::host::{HostPlatform, HostWindow};
use super::window_config::WindowConfig;
use crate::embed::input::HostInput;
use crate::embed::relation::{EmbeddingRelation, EmbeddingState, RelationId};
use crate::embed::surface::EmbeddedSurface;

static NEXT_WINDOW_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeWindowId(u64);

impl NativeWindowId {
    pub(crate) fn next() -> Self {
        Self(NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Lifecycle state of a native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Allocated but never shown.
    Created,
    /// Visible on screen.
    Shown,
    /// Closed; no further operations are accepted.
    Closed,
}

/// A native top-level window with host-managed chrome.
///
/// The caller owns the window exclusively. The embedding bridge only
/// borrows it for the duration of a graft, and the window in turn holds
/// just a weak reference to its embedded surface, so dropping either side
/// tears the relation down.
///
/// Dropping a `NativeWindow` closes it.
///
/// # Example
///
/// ```
/// use horizon_graft::backend::HeadlessHost;
/// use horizon_graft::window::{NativeWindow, WindowConfig, WindowState};
///
/// let mut host = HeadlessHost::new();
/// let mut window = NativeWindow::create(&mut host, &WindowConfig::new("Demo", 800, 600))?;
/// assert_eq!(window.state(), WindowState::Created);
///
/// window.show()?;
/// assert_eq!(window.state(), WindowState::Shown);
/// # Ok::<(), horizon_graft::GraftError>(())
/// ```
pub struct NativeWindow {
    id: NativeWindowId,
    host: Box<dyn HostWindow>,
    title: String,
    state: WindowState,
    content_size: HostSize,
    scale_factor: f64,
    relation: Option<EmbeddingRelation>,
    cursor: Option<HostPoint>,
    affinity: ThreadAffinity,
}

impl NativeWindow {
    /// Create a new native window from a configuration.
    ///
    /// The window is returned in state [`WindowState::Created`], not yet
    /// shown.
    ///
    /// # Errors
    ///
    /// - [`ConstraintViolation::ZeroDimension`] if a dimension is zero. The
    ///   host is not called.
    /// - [`GraftError::AllocationFailure`] if the host refuses to create the
    ///   window. Nothing is left allocated.
    pub fn create(host: &mut dyn HostPlatform, config: &WindowConfig) -> Result<Self> {
        horizon_graft_core::debug_assert_ui_thread!("NativeWindow::create");
        let _span = GraftSpan::new(span_names::CREATE_WINDOW);
        config.validate()?;

        let host_window = host.create_window(config).map_err(|err| {
            graft_warn!(targets::FACTORY, title = config.title(), %err, "host refused window creation");
            GraftError::from(err)
        })?;

        let window = Self {
            id: NativeWindowId::next(),
            title: config.title().to_string(),
            state: WindowState::Created,
            // The host may not have applied the size yet; a later resize
            // notification corrects it.
            content_size: config.size(),
            scale_factor: host_window.scale_factor(),
            host: host_window,
            relation: None,
            cursor: None,
            affinity: ThreadAffinity::current(),
        };

        graft_debug!(
            targets::FACTORY,
            window = window.id.as_u64(),
            title = %window.title,
            width = window.content_size.width,
            height = window.content_size.height,
            scale = window.scale_factor,
            "native window created"
        );
        Ok(window)
    }

    /// Get the unique window identifier.
    pub fn id(&self) -> NativeWindowId {
        self.id
    }

    /// The winit window id, for windows created by a winit host.
    pub fn winit_id(&self) -> Option<WindowId> {
        self.host.winit_id()
    }

    /// The native handle of the window itself.
    pub fn window_handle(&self) -> Option<RawWindowHandle> {
        if self.is_closed() {
            return None;
        }
        self.host.window_handle()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == WindowState::Closed
    }

    /// Size of the content area in host units, excluding chrome.
    pub fn content_size(&self) -> HostSize {
        self.content_size
    }

    /// Host units per logical point.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Last pointer position reported to this window, if the pointer is
    /// inside the content area.
    pub fn cursor_position(&self) -> Option<HostPoint> {
        self.cursor
    }

    // =========================================================================
    // Embedding
    // =========================================================================

    /// Whether a surface is currently this window's content root.
    pub fn embedding_state(&self) -> EmbeddingState {
        match &self.relation {
            Some(relation) if relation.is_live() => EmbeddingState::Embedded(relation.id()),
            _ => EmbeddingState::None,
        }
    }

    /// The id of the live embedding relation, if any.
    pub fn embedded_relation(&self) -> Option<RelationId> {
        self.embedding_state().relation_id()
    }

    /// The embedded surface, while the relation is live.
    pub fn embedded_surface(&self) -> Option<EmbeddedSurface> {
        self.relation.as_ref().and_then(EmbeddingRelation::surface)
    }

    /// Detach the drawable of a surface that was destroyed while embedded.
    ///
    /// A destroyed surface stops receiving forwards at once, but the host
    /// keeps showing its drawable until the window is next touched: resized,
    /// shown, given input, embedded into or closed. Call this to detach it
    /// right away. The winit router does so for every event it routes.
    /// Returns the relation that was swept, if any.
    pub fn detach_destroyed_content(&mut self) -> Option<RelationId> {
        self.affinity.debug_assert_same_thread();
        if self.is_closed() {
            return None;
        }
        self.sweep_stale_relation()
    }

    pub(crate) fn relation(&self) -> Option<&EmbeddingRelation> {
        self.relation.as_ref()
    }

    pub(crate) fn take_relation(&mut self) -> Option<EmbeddingRelation> {
        self.relation.take()
    }

    pub(crate) fn install_relation(&mut self, relation: EmbeddingRelation) {
        debug_assert!(self.relation.is_none());
        self.relation = Some(relation);
    }

    pub(crate) fn host_mut(&mut self) -> &mut dyn HostWindow {
        self.host.as_mut()
    }

    pub(crate) fn affinity(&self) -> &ThreadAffinity {
        &self.affinity
    }

    /// Drop a relation whose surface has gone away and detach its drawable.
    pub(crate) fn sweep_stale_relation(&mut self) -> Option<RelationId> {
        if !self.relation.as_ref().is_some_and(|relation| !relation.is_live()) {
            return None;
        }
        let relation = self.relation.take()?;
        let id = relation.id();
        graft_debug!(
            targets::BRIDGE,
            window = self.id.as_u64(),
            relation = id.as_u64(),
            "sweeping relation whose surface is gone"
        );
        relation.teardown();
        self.host.detach_content();
        Some(id)
    }

    /// Tear down the relation, if any, and detach the content.
    pub(crate) fn teardown_relation(&mut self) -> Option<RelationId> {
        let relation = self.relation.take()?;
        let id = relation.id();
        let _span = GraftSpan::new(span_names::TEARDOWN);
        relation.teardown();
        self.host.detach_content();
        graft_debug!(targets::BRIDGE, window = self.id.as_u64(), relation = id.as_u64(), "relation torn down");
        Some(id)
    }

    /// Lay out the attached content and forward the current size.
    ///
    /// Returns the size the surface received, or `None` if nothing is
    /// embedded.
    pub(crate) fn sync_content(&mut self) -> Option<ToolkitSize> {
        self.sweep_stale_relation();
        self.relation.as_ref()?;
        self.host.layout_content(self.content_size);
        let forwarded = self
            .relation
            .as_ref()
            .and_then(|relation| relation.forward_resize(self.content_size, self.scale_factor));
        // The surface may have destroyed itself inside its resize callback.
        self.sweep_stale_relation();
        forwarded
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Show the window.
    ///
    /// The embedded surface, if any, is told it became visible. Showing an
    /// already shown window does nothing.
    pub fn show(&mut self) -> Result<()> {
        self.affinity.debug_assert_same_thread();
        match self.state {
            WindowState::Closed => Err(ConstraintViolation::WindowClosed.into()),
            WindowState::Shown => Ok(()),
            WindowState::Created => {
                self.host.show();
                self.state = WindowState::Shown;
                self.sweep_stale_relation();
                if let Some(relation) = &self.relation {
                    relation.forward_visibility(true);
                }
                graft_debug!(targets::FACTORY, window = self.id.as_u64(), "window shown");
                Ok(())
            }
        }
    }

    /// Close the window.
    ///
    /// The embedding relation is torn down and the drawable detached before
    /// the host window is released. Closing twice does nothing.
    pub fn close(&mut self) {
        self.affinity.debug_assert_same_thread();
        if self.is_closed() {
            return;
        }
        self.teardown_relation();
        self.host.close();
        self.state = WindowState::Closed;
        self.cursor = None;
        graft_debug!(targets::FACTORY, window = self.id.as_u64(), "window closed");
    }

    /// Record that the host destroyed the window on its own.
    ///
    /// The relation is severed without touching the host, since the native
    /// window no longer exists.
    pub fn mark_destroyed(&mut self) {
        if self.is_closed() {
            return;
        }
        if let Some(relation) = self.relation.take() {
            relation.teardown();
        }
        self.state = WindowState::Closed;
        self.cursor = None;
        graft_debug!(targets::FACTORY, window = self.id.as_u64(), "window destroyed by host");
    }

    /// Set the window title.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.affinity.debug_assert_same_thread();
        if self.is_closed() {
            return Err(ConstraintViolation::WindowClosed.into());
        }
        let title = title.into();
        self.host.set_title(&title);
        self.title = title;
        Ok(())
    }

    // =========================================================================
    // Size and Scale
    // =========================================================================

    /// Ask the host for a new content size.
    ///
    /// If the host applies the size synchronously it is forwarded at once;
    /// otherwise it arrives later through
    /// [`notify_content_resized`](Self::notify_content_resized).
    pub fn request_content_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.affinity.debug_assert_same_thread();
        if self.is_closed() {
            return Err(ConstraintViolation::WindowClosed.into());
        }
        if width == 0 || height == 0 {
            return Err(ConstraintViolation::ZeroDimension { width, height }.into());
        }
        if let Some(applied) = self.host.request_content_size(HostSize::new(width, height)) {
            self.notify_content_resized(applied);
        }
        Ok(())
    }

    /// The host reports a new content size.
    ///
    /// Call this from the host's resize notification. Before any surface is
    /// embedded the size is only recorded. Returns the size forwarded to the
    /// embedded surface, if any.
    pub fn notify_content_resized(&mut self, size: HostSize) -> Option<ToolkitSize> {
        self.affinity.debug_assert_same_thread();
        if self.is_closed() {
            return None;
        }
        graft_trace!(
            targets::RESIZE,
            window = self.id.as_u64(),
            width = size.width,
            height = size.height,
            "content resized"
        );
        self.content_size = size;
        self.sync_content()
    }

    /// The host reports a new display scale factor.
    ///
    /// Invalid factors are ignored. Returns the size forwarded to the
    /// embedded surface, if any.
    pub fn notify_scale_factor_changed(&mut self, scale_factor: f64) -> Option<ToolkitSize> {
        self.affinity.debug_assert_same_thread();
        if self.is_closed() {
            return None;
        }
        if let Err(err) = validate_scale(scale_factor) {
            graft_warn!(targets::RESIZE, window = self.id.as_u64(), %err, "ignoring scale factor");
            return None;
        }
        graft_debug!(targets::RESIZE, window = self.id.as_u64(), scale = scale_factor, "scale factor changed");
        self.scale_factor = scale_factor;
        self.content_size = self.host.content_size();
        self.sync_content()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Deliver a host input event to the embedded surface.
    ///
    /// The pointer position is tracked regardless. Returns true if the event
    /// reached the surface, which only happens while the relation is live and
    /// its bridge configuration forwards input.
    pub fn dispatch_input(&mut self, input: &HostInput) -> bool {
        self.affinity.debug_assert_same_thread();
        if self.is_closed() {
            return false;
        }
        match input {
            HostInput::PointerMoved(position) => self.cursor = Some(*position),
            HostInput::PointerLeft => self.cursor = None,
            _ => {}
        }

        self.sweep_stale_relation();
        let delivered = self.relation.as_ref().is_some_and(|relation| {
            relation.forward_input(input, self.content_size, self.scale_factor)
        });
        self.sweep_stale_relation();
        delivered
    }
}

impl Drop for NativeWindow {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for NativeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeWindow")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("state", &self.state)
            .field("content_size", &self.content_size)
            .field("scale_factor", &self.scale_factor)
            .field("relation", &self.relation)
            .finish()
    }
}

static_assertions::assert_not_impl_any!(NativeWindow: Send, Sync);

/// Create a native top-level window with standard chrome.
///
/// Shorthand for [`NativeWindow::create`] with a plain
/// [`WindowConfig`]. The title may be empty; both dimensions must be
/// positive.
pub fn create_native_window(
    host: &mut dyn HostPlatform,
    title: &str,
    width: u32,
    height: u32,
) -> Result<NativeWindow> {
    NativeWindow::create(host, &WindowConfig::new(title, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::headless::HeadlessHost;

    #[test]
    fn test_create_reports_requested_size() {
        let mut host = HeadlessHost::new();
        let window = create_native_window(&mut host, "Demo", 800, 600).unwrap();
        assert_eq!(window.content_size(), HostSize::new(800, 600));
        assert_eq!(window.state(), WindowState::Created);
        assert_eq!(window.title(), "Demo");
        assert_eq!(window.embedding_state(), EmbeddingState::None);
    }

    #[test]
    fn test_zero_size_never_reaches_host() {
        let mut host = HeadlessHost::new();
        let err = create_native_window(&mut host, "x", 0, 10).unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(host.windows().is_empty());
    }

    #[test]
    fn test_window_ids_are_unique() {
        let mut host = HeadlessHost::new();
        let a = create_native_window(&mut host, "a", 1, 1).unwrap();
        let b = create_native_window(&mut host, "b", 1, 1).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_closed_window_rejects_operations() {
        let mut host = HeadlessHost::new();
        let mut window = create_native_window(&mut host, "x", 10, 10).unwrap();
        window.close();
        window.close();
        assert!(window.is_closed());
        assert!(window.show().is_err());
        assert!(window.set_title("y").is_err());
        assert!(window.request_content_size(5, 5).is_err());
        assert_eq!(window.notify_content_resized(HostSize::new(5, 5)), None);
        assert!(window.window_handle().is_none());
    }

    #[test]
    fn test_resize_before_embed_is_recorded() {
        let mut host = HeadlessHost::new();
        let mut window = create_native_window(&mut host, "x", 10, 10).unwrap();
        assert_eq!(window.notify_content_resized(HostSize::new(30, 40)), None);
        assert_eq!(window.content_size(), HostSize::new(30, 40));
    }

    #[test]
    fn test_invalid_scale_is_ignored() {
        let mut host = HeadlessHost::new();
        let mut window = create_native_window(&mut host, "x", 10, 10).unwrap();
        window.notify_scale_factor_changed(0.0);
        window.notify_scale_factor_changed(f64::NAN);
        assert_eq!(window.scale_factor(), 1.0);
        window.notify_scale_factor_changed(2.0);
        assert_eq!(window.scale_factor(), 2.0);
    }

    #[test]
    fn test_drop_closes_host_window() {
        let mut host = HeadlessHost::new();
        let window = create_native_window(&mut host, "x", 10, 10).unwrap();
        let probe = host.last_window().unwrap();
        assert!(!probe.is_closed());
        drop(window);
        assert!(probe.is_closed());
    }
}
