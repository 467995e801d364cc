//! UI-thread confinement checks.
//!
//! Both the host window system and the foreign toolkit dispatch events on a
//! single platform UI thread, and every factory and bridge call must come
//! from that thread. Window and surface handles are `!Send`, which rules out
//! most mistakes at compile time. The checks here cover the remaining cases,
//! such as a `Send` bridge being moved to a worker thread.
//!
//! ```
//! use horizon_graft_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! affinity.assert_same_thread();
//! ```

use std::sync::OnceLock;
use std::thread::ThreadId;

/// The registered UI thread.
static UI_THREAD_ID: OnceLock<ThreadId> = OnceLock::new();

/// Register the calling thread as the UI thread.
///
/// Call once at startup, before creating windows. Calling again from the same
/// thread is a no-op.
///
/// # Panics
///
/// Panics if a different thread was already registered.
pub fn set_ui_thread() {
    let current = std::thread::current().id();
    if UI_THREAD_ID.set(current).is_err() && UI_THREAD_ID.get() != Some(&current) {
        panic!("set_ui_thread() called from a second thread; the UI thread can only be set once");
    }
}

/// The registered UI thread, if any.
#[inline]
pub fn ui_thread_id() -> Option<ThreadId> {
    UI_THREAD_ID.get().copied()
}

/// Check if the current thread is the UI thread.
///
/// Returns `true` when no UI thread has been registered.
#[inline]
pub fn is_ui_thread() -> bool {
    match UI_THREAD_ID.get() {
        Some(&ui_id) => std::thread::current().id() == ui_id,
        None => true,
    }
}

/// Debug-only assertion that the caller is on the UI thread.
#[macro_export]
macro_rules! debug_assert_ui_thread {
    ($op:expr) => {
        if cfg!(debug_assertions) && !$crate::thread_check::is_ui_thread() {
            $crate::thread_check::panic_not_ui_thread($op);
        }
    };
}

#[cold]
#[inline(never)]
#[doc(hidden)]
pub fn panic_not_ui_thread(op: &str) -> ! {
    let current = std::thread::current();
    panic!(
        "{op} must run on the UI thread (registered: {:?}, current: \"{}\" {:?})",
        ui_thread_id(),
        current.name().unwrap_or("<unnamed>"),
        current.id()
    )
}

/// Records the thread an object was created on.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Affinity for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// The thread this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Panics if called from a different thread.
    pub fn assert_same_thread(&self) {
        if !self.is_same_thread() {
            self.panic_wrong_thread();
        }
    }

    /// Like [`assert_same_thread`](Self::assert_same_thread) but only in
    /// debug builds.
    #[inline]
    pub fn debug_assert_same_thread(&self) {
        #[cfg(debug_assertions)]
        self.assert_same_thread();
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self) -> ! {
        let current = std::thread::current();
        panic!(
            "object created on thread {:?} accessed from \"{}\" ({:?}); \
             window and surface operations must stay on the UI thread",
            self.thread_id,
            current.name().unwrap_or("<unnamed>"),
            current.id()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_affinity_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        affinity.assert_same_thread();
        affinity.debug_assert_same_thread();
    }

    #[test]
    fn test_thread_affinity_different_thread() {
        let affinity = ThreadAffinity::current();
        let same = std::thread::spawn(move || affinity.is_same_thread())
            .join()
            .unwrap();
        assert!(!same);
    }

    #[test]
    fn test_thread_affinity_panics_on_wrong_thread() {
        let affinity = ThreadAffinity::current();
        let result = std::thread::spawn(move || affinity.assert_same_thread()).join();
        assert!(result.is_err());
    }

    #[test]
    fn test_default_is_current() {
        let affinity = ThreadAffinity::default();
        assert_eq!(affinity.thread_id(), std::thread::current().id());
    }
}
