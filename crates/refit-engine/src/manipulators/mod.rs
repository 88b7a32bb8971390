//! Shipped manipulation passes.

pub mod dependency_override;
pub mod version_enforcer;

pub use dependency_override::*;
pub use version_enforcer::*;

use crate::manipulator::Manipulator;

/// The shipped passes in their fixed registration order: overrides run
/// first so version enforcement sees the final dependency versions.
pub fn default_manipulators() -> Vec<Box<dyn Manipulator>> {
    vec![
        Box::new(DependencyOverrideManipulator),
        Box::new(ProjectVersionEnforcer),
    ]
}
