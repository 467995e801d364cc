//! The seam to the foreign toolkit.

use raw_window_handle::RawWindowHandle;
use thiserror::Error;

use horizon_graft_core::{GraftError, ToolkitSize};

use super::input::ToolkitInput;

/// The foreign toolkit's root widget, as seen by the bridge.
///
/// Implement this for the toolkit's top-level widget. The bridge only calls
/// these methods from the UI thread and never while another call on the same
/// surface is in progress.
///
/// # Example
///
/// ```ignore
/// struct GtkRoot { widget: gtk::Widget }
///
/// impl ToolkitSurface for GtkRoot {
///     fn realize(&mut self) -> Result<RawWindowHandle, RealizeError> {
///         self.widget.realize();
///         native_handle_of(&self.widget).ok_or_else(|| RealizeError::new("no native window"))
///     }
///     fn preferred_size(&self) -> ToolkitSize { /* ... */ }
///     fn resize(&mut self, size: ToolkitSize) { self.widget.size_allocate(/* ... */) }
///     fn destroy(&mut self) { unsafe { self.widget.destroy() } }
/// }
/// ```
pub trait ToolkitSurface {
    /// Allocate the native drawable and return its handle.
    ///
    /// Called at most once per successful realization.
    fn realize(&mut self) -> Result<RawWindowHandle, RealizeError>;

    /// The size the widget tree would like, before any host constraints.
    fn preferred_size(&self) -> ToolkitSize;

    /// Re-lay-out the widget tree to exactly fill `size`.
    ///
    /// Runs inside the host's resize callback and must not block.
    fn resize(&mut self, size: ToolkitSize);

    /// Receive a forwarded input event.
    fn handle_input(&mut self, _event: &ToolkitInput) {}

    /// The host window was shown or hidden.
    fn visibility_changed(&mut self, _visible: bool) {}

    /// Release the native drawable and the widget tree.
    fn destroy(&mut self);
}

/// The toolkit could not realize its drawable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RealizeError {
    message: String,
}

impl RealizeError {
    /// Create a realization error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<RealizeError> for GraftError {
    fn from(err: RealizeError) -> Self {
        GraftError::RealizationFailure(err.message)
    }
}
