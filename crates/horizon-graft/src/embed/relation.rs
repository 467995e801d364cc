//! The association between a native window and its embedded surface.
//!
//! A relation is owned by the window. The surface keeps only a shared
//! [`RelationLink`], and the window keeps only a weak reference to the
//! surface, so neither endpoint owns the other. Either side can sever the
//! link; the other side notices the next time it looks and drops its half.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use horizon_graft_core::logging::targets;
use horizon_graft_core::{
    BridgeConfig, CoordinateMapping, HostSize, ToolkitSize, graft_trace, graft_warn,
};

use super::input::HostInput;
use super::surface::{EmbeddedSurface, SurfaceInner};
use crate::window::NativeWindowId;

static NEXT_RELATION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one successful graft.
///
/// Re-embedding always produces a new id, even for the same surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationId(u64);

impl RelationId {
    fn next() -> Self {
        Self(NEXT_RELATION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw id value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Observable state of a window's embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingState {
    /// No live relation.
    None,
    /// The window's content root is an embedded surface.
    Embedded(RelationId),
}

impl EmbeddingState {
    /// Returns true if a surface is embedded.
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(_))
    }

    /// The relation id, if embedded.
    pub fn relation_id(&self) -> Option<RelationId> {
        match self {
            Self::None => None,
            Self::Embedded(id) => Some(*id),
        }
    }
}

/// The liveness flag shared by both endpoints of a relation.
#[derive(Debug)]
pub(crate) struct RelationLink {
    id: RelationId,
    window: NativeWindowId,
    live: Cell<bool>,
}

impl RelationLink {
    fn new(window: NativeWindowId) -> Rc<Self> {
        Rc::new(Self {
            id: RelationId::next(),
            window,
            live: Cell::new(true),
        })
    }

    pub(crate) fn id(&self) -> RelationId {
        self.id
    }

    pub(crate) fn window(&self) -> NativeWindowId {
        self.window
    }

    pub(crate) fn is_live(&self) -> bool {
        self.live.get()
    }

    pub(crate) fn sever(&self) {
        self.live.set(false);
    }
}

/// The window-side half of a relation: the link, a weak surface reference,
/// and the bridge settings the relation was created with.
pub(crate) struct EmbeddingRelation {
    link: Rc<RelationLink>,
    surface: Weak<SurfaceInner>,
    config: BridgeConfig,
}

impl EmbeddingRelation {
    /// Create the relation and hand the surface its half of the link.
    pub(crate) fn install(
        window: NativeWindowId,
        surface: &EmbeddedSurface,
        config: BridgeConfig,
    ) -> Self {
        let link = RelationLink::new(window);
        surface.attach_link(Rc::clone(&link));
        Self {
            link,
            surface: surface.downgrade(),
            config,
        }
    }

    pub(crate) fn id(&self) -> RelationId {
        self.link.id()
    }

    /// Both endpoints still exist and neither has severed the link.
    pub(crate) fn is_live(&self) -> bool {
        self.link.is_live() && self.surface.strong_count() > 0
    }

    pub(crate) fn surface(&self) -> Option<EmbeddedSurface> {
        if !self.link.is_live() {
            return None;
        }
        self.surface.upgrade().map(EmbeddedSurface::from_inner)
    }

    /// Sever the link and clear the surface's half of it.
    pub(crate) fn teardown(self) {
        self.link.sever();
        if let Some(surface) = self.surface.upgrade().map(EmbeddedSurface::from_inner) {
            surface.clear_link(self.link.id());
        }
    }

    fn mapping(&self, host_scale: f64) -> Option<CoordinateMapping> {
        match self.config.mapping(host_scale) {
            Ok(mapping) => Some(mapping),
            Err(err) => {
                graft_warn!(targets::RESIZE, relation = self.id().as_u64(), %err, "cannot map host coordinates");
                None
            }
        }
    }

    /// Translate the host content size and hand it to the surface.
    ///
    /// Returns the forwarded toolkit size, or `None` if the relation is no
    /// longer live.
    pub(crate) fn forward_resize(&self, size: HostSize, host_scale: f64) -> Option<ToolkitSize> {
        let surface = self.surface()?;
        let mapping = self.mapping(host_scale)?;
        let toolkit_size = mapping.host_to_toolkit_size(size);
        graft_trace!(
            targets::RESIZE,
            relation = self.id().as_u64(),
            host_width = size.width,
            host_height = size.height,
            width = toolkit_size.width,
            height = toolkit_size.height,
            "forwarding resize"
        );
        surface.apply_resize(toolkit_size);
        Some(toolkit_size)
    }

    /// Translate and deliver an input event, if input forwarding is on.
    pub(crate) fn forward_input(&self, input: &HostInput, container: HostSize, host_scale: f64) -> bool {
        if !self.config.forward_input {
            return false;
        }
        let Some(surface) = self.surface() else {
            return false;
        };
        let Some(mapping) = self.mapping(host_scale) else {
            return false;
        };
        let event = input.translate(&mapping, container);
        graft_trace!(targets::INPUT, relation = self.id().as_u64(), ?event, "forwarding input");
        surface.apply_input(&event)
    }

    pub(crate) fn forward_visibility(&self, visible: bool) {
        if let Some(surface) = self.surface() {
            surface.apply_visibility(visible);
        }
    }
}

impl std::fmt::Debug for EmbeddingRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingRelation")
            .field("id", &self.id())
            .field("window", &self.link.window())
            .field("live", &self.is_live())
            .finish()
    }
}
