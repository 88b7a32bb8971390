//! Per-manipulator configuration state.

use std::any::Any;

/// Configuration a manipulator derives from session properties during
/// init and consults for the rest of the run. States are stored on the
/// session keyed by their concrete type and never mutated after init.
pub trait State: Any + Send + Sync {
    /// Whether the owning manipulator should run at all.
    fn enabled(&self) -> bool;

    /// Membership in the active-by-default category. A run proceeds only
    /// while at least one state in this category is enabled; everything
    /// else is opt-in and rides on that gate.
    fn active_by_default(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;
}
