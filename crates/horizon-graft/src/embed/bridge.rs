//! The embedding bridge: grafts a surface into a native window.

use horizon_graft_core::logging::{span_names, targets};
use horizon_graft_core::thread_check::ThreadAffinity;
use horizon_graft_core::{
    BridgeConfig, ConstraintViolation, GraftError, GraftSpan, Result, graft_debug, graft_warn,
};

use super::relation::{EmbeddingRelation, RelationId};
use super::surface::EmbeddedSurface;
use crate::window::{NativeWindow, WindowState};

/// Grafts foreign toolkit surfaces into native windows.
///
/// A bridge holds the [`BridgeConfig`] that each relation it creates will
/// use for coordinate translation and input forwarding. The bridge itself
/// keeps no per-window state, so one bridge can serve any number of
/// windows; the relation lives in the window.
///
/// # Example
///
/// ```
/// use horizon_graft::backend::{HeadlessHost, HeadlessSurface};
/// use horizon_graft::embed::{EmbeddedSurface, EmbeddingBridge};
/// use horizon_graft::window::create_native_window;
/// use horizon_graft::{BridgeConfig, ToolkitSize};
///
/// let mut host = HeadlessHost::new();
/// let mut window = create_native_window(&mut host, "Demo", 800, 600)?;
///
/// let toolkit = HeadlessSurface::new(ToolkitSize::new(0, 0));
/// let probe = toolkit.probe();
/// let surface = EmbeddedSurface::new(toolkit);
///
/// let bridge = EmbeddingBridge::new(BridgeConfig::default())?;
/// bridge.embed(&mut window, &surface)?;
///
/// assert!(surface.is_realized());
/// assert_eq!(probe.last_size(), Some(ToolkitSize::new(800, 600)));
/// # Ok::<(), horizon_graft::GraftError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EmbeddingBridge {
    config: BridgeConfig,
    affinity: ThreadAffinity,
}

impl EmbeddingBridge {
    /// Create a bridge with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a constraint violation if the configuration holds a fixed
    /// scale that is not positive and finite.
    pub fn new(config: BridgeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            affinity: ThreadAffinity::current(),
        })
    }

    /// The configuration new relations are created with.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Make `surface` the sole content of `window`.
    ///
    /// The surface is realized if needed, its drawable replaces the
    /// window's current content, and resize forwarding is installed. The
    /// current content size is forwarded before this returns, and if the
    /// window is already shown the surface is told it is visible.
    ///
    /// A previous relation on the window is torn down before the new one is
    /// installed. Embedding the surface that is already embedded in this
    /// window only re-synchronizes its size.
    ///
    /// # Errors
    ///
    /// - [`ConstraintViolation::WindowClosed`],
    ///   [`ConstraintViolation::SurfaceDestroyed`] or
    ///   [`ConstraintViolation::SurfaceEmbeddedElsewhere`] if a precondition
    ///   does not hold. Nothing is touched.
    /// - [`GraftError::RealizationFailure`] if the toolkit cannot realize the
    ///   surface. The window is untouched.
    /// - [`GraftError::AllocationFailure`] if the host cannot attach the
    ///   drawable. The window keeps its previous content and relation.
    pub fn embed(&self, window: &mut NativeWindow, surface: &EmbeddedSurface) -> Result<RelationId> {
        let _span = GraftSpan::new(span_names::EMBED);
        self.affinity.debug_assert_same_thread();
        window.affinity().debug_assert_same_thread();

        if window.state() == WindowState::Closed {
            return Err(ConstraintViolation::WindowClosed.into());
        }
        if surface.is_destroyed() {
            return Err(ConstraintViolation::SurfaceDestroyed.into());
        }
        if let Some(link) = surface.live_link() {
            if link.window() != window.id() {
                return Err(ConstraintViolation::SurfaceEmbeddedElsewhere.into());
            }
            if window.relation().is_some_and(|relation| relation.id() == link.id()) {
                graft_debug!(
                    targets::BRIDGE,
                    window = window.id().as_u64(),
                    relation = link.id().as_u64(),
                    "surface already embedded here, resynchronizing"
                );
                window.sync_content();
                return Ok(link.id());
            }
        }

        window.sweep_stale_relation();

        let drawable = surface.realize()?;
        let window_id = window.id();
        let size = window.content_size();
        window
            .host_mut()
            .replace_content(drawable, size)
            .map_err(|err| {
                graft_warn!(
                    targets::BRIDGE,
                    window = window_id.as_u64(),
                    surface = surface.id().as_u64(),
                    %err,
                    "host refused to attach drawable, previous content kept"
                );
                GraftError::from(err)
            })?;

        if let Some(previous) = window.take_relation() {
            graft_debug!(
                targets::BRIDGE,
                window = window.id().as_u64(),
                relation = previous.id().as_u64(),
                "replacing previous relation"
            );
            previous.teardown();
        }

        let relation = EmbeddingRelation::install(window.id(), surface, self.config.clone());
        let id = relation.id();
        window.install_relation(relation);

        let forwarded = window.sync_content();
        if window.state() == WindowState::Shown
            && let Some(relation) = window.relation()
        {
            relation.forward_visibility(true);
        }

        tracing::info!(
            target: targets::BRIDGE,
            window = window.id().as_u64(),
            surface = surface.id().as_u64(),
            relation = id.as_u64(),
            ?forwarded,
            "surface embedded"
        );
        Ok(id)
    }

    /// Tear down the window's relation and detach the drawable.
    ///
    /// Neither the window nor the surface is closed or destroyed. Returns
    /// the released relation, if there was one.
    pub fn release(&self, window: &mut NativeWindow) -> Option<RelationId> {
        self.affinity.debug_assert_same_thread();
        window.teardown_relation()
    }
}

impl Default for EmbeddingBridge {
    fn default() -> Self {
        Self {
            config: BridgeConfig::default(),
            affinity: ThreadAffinity::current(),
        }
    }
}

static_assertions::assert_impl_all!(EmbeddingBridge: Send, Sync);

/// Graft `surface` into `window` with the default bridge configuration.
///
/// See [`EmbeddingBridge::embed`] for the full contract.
pub fn embed_surface(window: &mut NativeWindow, surface: &EmbeddedSurface) -> Result<()> {
    EmbeddingBridge::default().embed(window, surface).map(|_| ())
}
