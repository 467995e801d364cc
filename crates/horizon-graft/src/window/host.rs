//! The seam to the host platform's window system.
//!
//! A [`HostPlatform`] creates top-level windows; a [`HostWindow`] is one such
//! window as seen by [`NativeWindow`](super::NativeWindow). The bridge only
//! talks to the host through these traits, so the same graft logic drives
//! the in-memory [`HeadlessHost`](crate::backend::HeadlessHost) in tests and
//! the winit backend in applications.

use std::fmt;

use raw_window_handle::RawWindowHandle;
use winit::window::WindowId;

use horizon_graft_core::{GraftError, HostSize};

use super::window_config::WindowConfig;

// ============================================================================
// Error Type
// ============================================================================

/// Error type for host platform operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    kind: HostErrorKind,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostErrorKind {
    /// The host refused to allocate a window or view.
    Allocation,
    /// The operation is not supported for this window or drawable kind.
    Unsupported,
    /// Failed to access a native handle.
    HandleAccess,
    /// A platform call failed.
    Platform,
}

impl HostError {
    /// The host refused to allocate a resource.
    pub fn allocation(message: impl Into<String>) -> Self {
        Self::with_kind(HostErrorKind::Allocation, message)
    }

    /// The operation is not supported here.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::with_kind(HostErrorKind::Unsupported, message)
    }

    /// A native handle could not be obtained.
    pub fn handle_access(message: impl Into<String>) -> Self {
        Self::with_kind(HostErrorKind::HandleAccess, message)
    }

    /// A platform call failed.
    pub fn platform(message: impl Into<String>) -> Self {
        Self::with_kind(HostErrorKind::Platform, message)
    }

    fn with_kind(kind: HostErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns true if this error indicates the operation is not supported.
    pub fn is_unsupported(&self) -> bool {
        self.kind == HostErrorKind::Unsupported
    }

    /// The error message without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            HostErrorKind::Allocation => write!(f, "allocation refused: {}", self.message),
            HostErrorKind::Unsupported => write!(f, "unsupported: {}", self.message),
            HostErrorKind::HandleAccess => {
                write!(f, "failed to access native handle: {}", self.message)
            }
            HostErrorKind::Platform => write!(f, "platform error: {}", self.message),
        }
    }
}

impl std::error::Error for HostError {}

impl From<HostError> for GraftError {
    fn from(err: HostError) -> Self {
        GraftError::AllocationFailure(err.to_string())
    }
}

// ============================================================================
// Host Traits
// ============================================================================

/// A window system that can create top-level windows.
pub trait HostPlatform {
    /// Allocate a top-level window with standard chrome.
    ///
    /// The window must be created hidden, with a content area of exactly
    /// `config.size()` host units. On failure nothing may be left allocated.
    fn create_window(&mut self, config: &WindowConfig) -> Result<Box<dyn HostWindow>, HostError>;
}

/// One host top-level window.
///
/// Sizes are in host units. For winit that is physical pixels; the scale
/// factor reported by [`scale_factor`](Self::scale_factor) is the number of
/// host units per logical point.
pub trait HostWindow {
    /// Current size of the content area, excluding decorations.
    fn content_size(&self) -> HostSize;

    /// Current display scale factor.
    fn scale_factor(&self) -> f64;

    /// Change the title bar text.
    fn set_title(&mut self, title: &str);

    /// Make the window visible.
    fn show(&mut self);

    /// Close the window and release the native object.
    fn close(&mut self);

    /// Ask the host for a new content size.
    ///
    /// Returns the applied size if the host resized synchronously, or `None`
    /// if the result will arrive later as a resize notification.
    fn request_content_size(&mut self, size: HostSize) -> Option<HostSize>;

    /// Make `drawable` the window's sole content, sized to `size`.
    ///
    /// Any previous content is replaced in the same step, so no frame is
    /// presented without content. On error the previous content must be
    /// left attached.
    fn replace_content(&mut self, drawable: RawWindowHandle, size: HostSize) -> Result<(), HostError>;

    /// Resize the attached content to `size`.
    fn layout_content(&mut self, size: HostSize);

    /// Remove the current content, if any.
    fn detach_content(&mut self);

    /// The native handle of the window itself, if it has one.
    fn window_handle(&self) -> Option<RawWindowHandle>;

    /// The winit id, for hosts backed by winit.
    fn winit_id(&self) -> Option<WindowId> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_display() {
        assert_eq!(
            HostError::unsupported("wayland").to_string(),
            "unsupported: wayland"
        );
        assert_eq!(
            HostError::allocation("out of handles").to_string(),
            "allocation refused: out of handles"
        );
        assert!(HostError::unsupported("x").is_unsupported());
        assert!(!HostError::platform("x").is_unsupported());
    }

    #[test]
    fn test_host_error_maps_to_allocation_failure() {
        let err: GraftError = HostError::platform("SetParent failed").into();
        assert_eq!(
            err,
            GraftError::AllocationFailure("platform error: SetParent failed".to_string())
        );
    }
}
