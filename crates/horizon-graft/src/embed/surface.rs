//! The embedded surface handle.
//!
//! `EmbeddedSurface` wraps a [`ToolkitSurface`] in a cheap-clone handle with
//! an explicit lifecycle:
//!
//! ```text
//! Unrealized --realize--> Realized --destroy--> Destroyed
//!      \________________________destroy________/
//! ```
//!
//! Destroying a surface that is embedded severs its relation first, so the
//! window never forwards to a dead drawable. Destruction is allowed from
//! inside the surface's own toolkit callbacks, `realize` included; in that
//! case the toolkit's `destroy` runs as soon as the callback returns.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use raw_window_handle::RawWindowHandle;

use horizon_graft_core::logging::targets;
use horizon_graft_core::thread_check::ThreadAffinity;
use horizon_graft_core::{ConstraintViolation, GraftError, ToolkitSize, graft_debug, graft_warn};

use super::input::ToolkitInput;
use super::relation::{EmbeddingState, RelationId, RelationLink};
use super::toolkit::ToolkitSurface;

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an embedded surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    fn next() -> Self {
        Self(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Lifecycle state of an embedded surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// The toolkit has not allocated a native drawable yet.
    Unrealized,
    /// The native drawable exists.
    Realized,
    /// The surface has been destroyed and can no longer be embedded.
    Destroyed,
}

pub(crate) struct SurfaceInner {
    id: SurfaceId,
    toolkit: RefCell<Box<dyn ToolkitSurface>>,
    state: Cell<SurfaceState>,
    drawable: Cell<Option<RawWindowHandle>>,
    link: RefCell<Option<Rc<RelationLink>>>,
    last_size: Cell<Option<ToolkitSize>>,
    destroy_pending: Cell<bool>,
    affinity: ThreadAffinity,
}

impl SurfaceInner {
    fn sever_link(&self) {
        if let Some(link) = self.link.borrow_mut().take() {
            link.sever();
            graft_debug!(
                targets::BRIDGE,
                surface = self.id.as_u64(),
                relation = link.id().as_u64(),
                "surface destroyed while embedded, relation severed"
            );
        }
    }
}

impl Drop for SurfaceInner {
    fn drop(&mut self) {
        if self.state.get() != SurfaceState::Destroyed || self.destroy_pending.get() {
            self.sever_link();
            self.state.set(SurfaceState::Destroyed);
            self.toolkit.get_mut().destroy();
        }
    }
}

/// A handle to the foreign toolkit's root drawable.
///
/// Clones refer to the same surface. The surface is destroyed when
/// [`destroy`](Self::destroy) is called or the last handle is dropped,
/// whichever comes first. The bridge never keeps a surface alive.
#[derive(Clone)]
pub struct EmbeddedSurface {
    inner: Rc<SurfaceInner>,
}

impl EmbeddedSurface {
    /// Wrap a toolkit surface. It starts out unrealized.
    pub fn new(toolkit: impl ToolkitSurface + 'static) -> Self {
        Self {
            inner: Rc::new(SurfaceInner {
                id: SurfaceId::next(),
                toolkit: RefCell::new(Box::new(toolkit)),
                state: Cell::new(SurfaceState::Unrealized),
                drawable: Cell::new(None),
                link: RefCell::new(None),
                last_size: Cell::new(None),
                destroy_pending: Cell::new(false),
                affinity: ThreadAffinity::current(),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<SurfaceInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<SurfaceInner> {
        Rc::downgrade(&self.inner)
    }

    /// The surface's unique id.
    pub fn id(&self) -> SurfaceId {
        self.inner.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SurfaceState {
        self.inner.state.get()
    }

    /// Returns true once the native drawable exists.
    pub fn is_realized(&self) -> bool {
        self.state() == SurfaceState::Realized
    }

    /// Returns true if the surface has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.state() == SurfaceState::Destroyed
    }

    /// The native drawable, once realized.
    pub fn drawable(&self) -> Option<RawWindowHandle> {
        self.inner.drawable.get()
    }

    /// The size the toolkit would like.
    pub fn preferred_size(&self) -> ToolkitSize {
        self.inner
            .toolkit
            .try_borrow()
            .map(|toolkit| toolkit.preferred_size())
            .unwrap_or_default()
    }

    /// The last size forwarded by the bridge, if any.
    pub fn last_forwarded_size(&self) -> Option<ToolkitSize> {
        self.inner.last_size.get()
    }

    /// Whether this surface is currently some window's content root.
    pub fn embedding(&self) -> EmbeddingState {
        match self.live_link() {
            Some(link) => EmbeddingState::Embedded(link.id()),
            None => EmbeddingState::None,
        }
    }

    /// Returns true if both handles refer to the same surface.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Ask the toolkit to allocate its native drawable.
    ///
    /// Realizing an already realized surface returns the existing drawable.
    ///
    /// # Errors
    ///
    /// - [`ConstraintViolation::SurfaceDestroyed`] if the surface is
    ///   destroyed, including by the toolkit from inside its own `realize`.
    /// - [`GraftError::RealizationFailure`] if the toolkit fails. The surface
    ///   stays unrealized.
    pub fn realize(&self) -> Result<RawWindowHandle, GraftError> {
        self.inner.affinity.debug_assert_same_thread();
        match (self.state(), self.drawable()) {
            (SurfaceState::Destroyed, _) => {
                return Err(ConstraintViolation::SurfaceDestroyed.into());
            }
            (SurfaceState::Realized, Some(drawable)) => return Ok(drawable),
            _ => {}
        }

        let mut toolkit = self.inner.toolkit.try_borrow_mut().map_err(|_| {
            GraftError::RealizationFailure("surface is busy in a toolkit callback".to_string())
        })?;
        let realized = toolkit.realize();
        drop(toolkit);

        // The toolkit may have destroyed the surface from inside `realize`.
        if self.is_destroyed() {
            self.finish_pending_destroy();
            graft_debug!(targets::BRIDGE, surface = self.id().as_u64(), "surface destroyed while realizing");
            return Err(ConstraintViolation::SurfaceDestroyed.into());
        }
        let drawable = realized.inspect_err(|err| {
            graft_warn!(targets::BRIDGE, surface = self.id().as_u64(), %err, "toolkit failed to realize surface");
        })?;

        self.inner.drawable.set(Some(drawable));
        self.inner.state.set(SurfaceState::Realized);
        graft_debug!(targets::BRIDGE, surface = self.id().as_u64(), ?drawable, "surface realized");
        Ok(drawable)
    }

    /// Destroy the surface.
    ///
    /// If the surface is embedded, its relation is severed first and the
    /// owning window stops forwarding to it. The window detaches the dead
    /// drawable the next time it is touched, or at once through
    /// [`NativeWindow::detach_destroyed_content`](crate::window::NativeWindow::detach_destroyed_content).
    /// Destroying twice is a no-op.
    pub fn destroy(&self) {
        self.inner.affinity.debug_assert_same_thread();
        if self.is_destroyed() {
            return;
        }
        self.inner.state.set(SurfaceState::Destroyed);
        self.inner.sever_link();
        self.inner.drawable.set(None);

        match self.inner.toolkit.try_borrow_mut() {
            Ok(mut toolkit) => toolkit.destroy(),
            Err(_) => {
                // Destroyed from inside one of our own toolkit callbacks.
                self.inner.destroy_pending.set(true);
            }
        }
    }

    pub(crate) fn live_link(&self) -> Option<Rc<RelationLink>> {
        self.inner
            .link
            .borrow()
            .as_ref()
            .filter(|link| link.is_live())
            .cloned()
    }

    pub(crate) fn attach_link(&self, link: Rc<RelationLink>) {
        if let Some(previous) = self.inner.link.borrow_mut().replace(link) {
            previous.sever();
        }
    }

    /// Clear the surface's link if it still belongs to `relation`.
    pub(crate) fn clear_link(&self, relation: RelationId) {
        let mut slot = self.inner.link.borrow_mut();
        if slot.as_ref().is_some_and(|link| link.id() == relation) {
            *slot = None;
        }
    }

    pub(crate) fn apply_resize(&self, size: ToolkitSize) {
        if self.is_destroyed() {
            return;
        }
        {
            let Ok(mut toolkit) = self.inner.toolkit.try_borrow_mut() else {
                graft_warn!(targets::RESIZE, surface = self.id().as_u64(), "re-entrant resize dropped");
                return;
            };
            self.inner.last_size.set(Some(size));
            toolkit.resize(size);
        }
        self.finish_pending_destroy();
    }

    pub(crate) fn apply_input(&self, event: &ToolkitInput) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let delivered = match self.inner.toolkit.try_borrow_mut() {
            Ok(mut toolkit) => {
                toolkit.handle_input(event);
                true
            }
            Err(_) => false,
        };
        self.finish_pending_destroy();
        delivered
    }

    pub(crate) fn apply_visibility(&self, visible: bool) {
        if self.is_destroyed() {
            return;
        }
        if let Ok(mut toolkit) = self.inner.toolkit.try_borrow_mut() {
            toolkit.visibility_changed(visible);
        }
        self.finish_pending_destroy();
    }

    fn finish_pending_destroy(&self) {
        if self.inner.destroy_pending.get()
            && let Ok(mut toolkit) = self.inner.toolkit.try_borrow_mut()
        {
            self.inner.destroy_pending.set(false);
            toolkit.destroy();
        }
    }
}

impl std::fmt::Debug for EmbeddedSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedSurface")
            .field("id", &self.id())
            .field("state", &self.state())
            .field("embedding", &self.embedding())
            .finish()
    }
}

// Surfaces are confined to the UI thread.
static_assertions::assert_not_impl_any!(EmbeddedSurface: Send, Sync);
