//! Error types for Horizon Graft.
//!
//! Both entry points of the bridge report failures through [`GraftError`].
//! There are exactly three kinds:
//!
//! - [`GraftError::ConstraintViolation`]: the caller broke a precondition
//!   (zero dimensions, a closed window, a destroyed surface). These are
//!   detected before any host or toolkit call is made.
//! - [`GraftError::AllocationFailure`]: the host platform refused to create
//!   or attach a native resource.
//! - [`GraftError::RealizationFailure`]: the foreign toolkit could not
//!   allocate its native drawable.
//!
//! Nothing is retried internally. Retrying allocation is a caller policy.

use thiserror::Error;

/// The main error type for Horizon Graft operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraftError {
    /// The caller passed arguments or handles that violate a precondition.
    #[error("constraint violation: {0}")]
    ConstraintViolation(#[from] ConstraintViolation),

    /// The host platform refused to allocate a window or attach a drawable.
    #[error("host platform allocation failed: {0}")]
    AllocationFailure(String),

    /// The foreign toolkit could not realize its native drawable.
    #[error("surface realization failed: {0}")]
    RealizationFailure(String),
}

impl GraftError {
    /// Returns true if this error is a caller contract violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }

    /// Returns the constraint that was violated, if any.
    pub fn constraint(&self) -> Option<&ConstraintViolation> {
        match self {
            Self::ConstraintViolation(violation) => Some(violation),
            _ => None,
        }
    }
}

/// Preconditions that callers of the bridge must uphold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintViolation {
    /// A window was requested with a zero width or height.
    #[error("window dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    /// The window has already been closed.
    #[error("window has been closed")]
    WindowClosed,

    /// The surface has already been destroyed.
    #[error("surface has been destroyed")]
    SurfaceDestroyed,

    /// The surface is the live content root of a different window.
    #[error("surface is already embedded in another window")]
    SurfaceEmbeddedElsewhere,

    /// A coordinate scale factor was zero, negative or not finite.
    #[error("scale factor must be positive and finite, got {0}")]
    NonPositiveScale(f64),
}

/// Errors produced while loading a [`BridgeConfig`](crate::BridgeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid TOML for a bridge config.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but holds an invalid value.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConstraintViolation),
}

/// A specialized Result type for Horizon Graft operations.
pub type Result<T> = std::result::Result<T, GraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violation_converts() {
        let err: GraftError = ConstraintViolation::WindowClosed.into();
        assert!(err.is_constraint_violation());
        assert_eq!(err.constraint(), Some(&ConstraintViolation::WindowClosed));
    }

    #[test]
    fn test_error_display() {
        let err = GraftError::from(ConstraintViolation::ZeroDimension {
            width: 0,
            height: 600,
        });
        assert!(err.to_string().contains("0x600"));

        let err = GraftError::AllocationFailure("out of handles".to_string());
        assert!(err.to_string().contains("out of handles"));
        assert!(!err.is_constraint_violation());
        assert!(err.constraint().is_none());

        let err = GraftError::RealizationFailure("no display".to_string());
        assert!(err.to_string().contains("realization"));
    }
}
