//! Core types for Horizon Graft.
//!
//! This crate holds everything the embedding bridge needs that does not
//! touch a window system:
//!
//! - **Errors**: [`GraftError`] and its three kinds
//! - **Geometry**: distinct host and toolkit size/point types
//! - **Coordinates**: [`CoordinateMapping`], the pure host/toolkit translation
//! - **Configuration**: [`BridgeConfig`], loadable from TOML
//! - **Logging**: tracing targets and span helpers
//! - **Thread checks**: UI-thread affinity assertions
//!
//! # Example
//!
//! ```
//! use horizon_graft_core::{BridgeConfig, HostSize, Origin, ToolkitSize};
//!
//! let config = BridgeConfig::new().with_origins(Origin::BottomLeft, Origin::TopLeft);
//! let mapping = config.mapping(1.0).unwrap();
//! assert_eq!(
//!     mapping.host_to_toolkit_size(HostSize::new(400, 300)),
//!     ToolkitSize::new(400, 300)
//! );
//! ```

mod config;
mod coords;
mod error;
mod geometry;
pub mod logging;
pub mod thread_check;

pub use config::{BridgeConfig, ScalePolicy};
pub use coords::{validate_scale, CoordinateMapping, Origin};
pub use error::{ConfigError, ConstraintViolation, GraftError, Result};
pub use geometry::{HostPoint, HostSize, ToolkitPoint, ToolkitSize};
pub use logging::GraftSpan;
