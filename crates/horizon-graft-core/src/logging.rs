//! Logging facilities for Horizon Graft.
//!
//! Horizon Graft uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_graft=debug")
//!     .init();
//! ```
//!
//! Every event is emitted under one of the [`targets`], so a single
//! subsystem can be isolated with a directive such as
//! `horizon_graft::resize=trace`.

/// Span names used throughout Horizon Graft for tracing.
pub mod span_names {
    /// Native window creation.
    pub const CREATE_WINDOW: &str = "create_window";
    /// Surface graft.
    pub const EMBED: &str = "embed";
    /// Relation teardown.
    pub const TEARDOWN: &str = "teardown";
}

/// Target names for log filtering.
pub mod targets {
    /// Native window factory.
    pub const FACTORY: &str = "horizon_graft::factory";
    /// Embedding bridge (graft, re-embed, teardown).
    pub const BRIDGE: &str = "horizon_graft::bridge";
    /// Resize forwarding.
    pub const RESIZE: &str = "horizon_graft::resize";
    /// Input forwarding.
    pub const INPUT: &str = "horizon_graft::input";
    /// Host backends.
    pub const BACKEND: &str = "horizon_graft::backend";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time the bridge entry points.
#[derive(Debug)]
pub struct GraftSpan {
    _span: tracing::span::EnteredSpan,
}

impl GraftSpan {
    /// Enter a span for the named operation.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_graft::perf", "graft", operation);
        Self {
            _span: span.entered(),
        }
    }
}

#[macro_export]
macro_rules! graft_trace {
    ($target:expr, $($arg:tt)*) => {
        tracing::trace!(target: $target, $($arg)*)
    };
}

#[macro_export]
macro_rules! graft_debug {
    ($target:expr, $($arg:tt)*) => {
        tracing::debug!(target: $target, $($arg)*)
    };
}

#[macro_export]
macro_rules! graft_warn {
    ($target:expr, $($arg:tt)*) => {
        tracing::warn!(target: $target, $($arg)*)
    };
}
