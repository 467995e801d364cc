//! Window configuration and builder.
//!
//! This module provides `WindowConfig`, a builder for the options a native
//! top-level window is created with.

use winit::dpi::{PhysicalPosition, PhysicalSize, Position, Size};
use winit::window::{Window, WindowAttributes};

use horizon_graft_core::{ConstraintViolation, HostSize};

/// Configuration for creating a native window.
///
/// The content size is mandatory and measured in host units, excluding the
/// title bar and borders.
///
/// # Example
///
/// ```
/// use horizon_graft::window::WindowConfig;
///
/// let config = WindowConfig::new("Demo", 800, 600)
///     .with_min_size(320, 240)
///     .with_resizable(true);
///
/// assert_eq!(config.title(), "Demo");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    /// Window title. May be empty.
    title: String,
    /// Requested content size.
    size: HostSize,
    /// Minimum content size.
    min_size: Option<HostSize>,
    /// Initial window position.
    position: Option<(i32, i32)>,
    /// Whether the user can resize the window.
    resizable: bool,
    /// Whether the window has standard chrome (title bar, borders).
    decorations: bool,
}

impl WindowConfig {
    /// Create a configuration with a title and content size.
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            size: HostSize::new(width, height),
            min_size: None,
            position: None,
            resizable: true,
            decorations: true,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the content size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = HostSize::new(width, height);
        self
    }

    /// Set the minimum content size.
    pub fn with_min_size(mut self, width: u32, height: u32) -> Self {
        self.min_size = Some(HostSize::new(width, height));
        self
    }

    /// Set the initial position of the window.
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = Some((x, y));
        self
    }

    /// Set whether the window is resizable.
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set whether the window has decorations.
    pub fn with_decorations(mut self, decorations: bool) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> HostSize {
        self.size
    }

    pub fn min_size(&self) -> Option<HostSize> {
        self.min_size
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        self.position
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn has_decorations(&self) -> bool {
        self.decorations
    }

    /// Reject sizes no host can honour.
    ///
    /// Runs before any host call is made.
    pub fn validate(&self) -> Result<(), ConstraintViolation> {
        if self.size.is_empty() {
            return Err(ConstraintViolation::ZeroDimension {
                width: self.size.width,
                height: self.size.height,
            });
        }
        if let Some(min) = self.min_size
            && min.is_empty()
        {
            return Err(ConstraintViolation::ZeroDimension {
                width: min.width,
                height: min.height,
            });
        }
        Ok(())
    }

    /// Convert to winit `WindowAttributes`.
    ///
    /// Sizes are physical so the created window's inner size equals the
    /// requested content size. The window starts hidden; it becomes visible
    /// through [`NativeWindow::show`](super::NativeWindow::show).
    pub fn to_window_attributes(&self) -> WindowAttributes {
        let mut attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(Size::Physical(PhysicalSize::new(
                self.size.width,
                self.size.height,
            )))
            .with_resizable(self.resizable)
            .with_decorations(self.decorations)
            .with_visible(false);

        if let Some(min) = self.min_size {
            attrs = attrs.with_min_inner_size(Size::Physical(PhysicalSize::new(min.width, min.height)));
        }

        if let Some((x, y)) = self.position {
            attrs = attrs.with_position(Position::Physical(PhysicalPosition::new(x, y)));
        }

        attrs
    }
}
