//! Pipeline orchestration.

use std::collections::BTreeSet;

use refit_model::{Project, ProjectKey};
use tracing::{debug, info};

use crate::errors::ManipulationResult;
use crate::manipulator::Manipulator;
use crate::manipulators::default_manipulators;
use crate::session::ManipulationSession;

/// Drives the fixed, ordered list of manipulators through the two-phase
/// pipeline: one scan pass over every manipulator, then one apply pass in
/// the same order. Execution is strictly sequential; the first failure
/// aborts the remaining phases and nothing already applied is undone.
pub struct ManipulationManager {
    manipulators: Vec<Box<dyn Manipulator>>,
}

impl ManipulationManager {
    /// Ordering is significant: a pass whose output later passes consume
    /// must be registered before them.
    pub fn new(manipulators: Vec<Box<dyn Manipulator>>) -> Self {
        Self { manipulators }
    }

    pub fn with_default_manipulators() -> Self {
        Self::new(default_manipulators())
    }

    pub fn manipulator_names(&self) -> Vec<&'static str> {
        self.manipulators.iter().map(|m| m.name()).collect()
    }

    /// Derives every manipulator's state from session properties, in
    /// registration order. Configuration errors surface here, before any
    /// scan runs.
    pub fn init(&self, session: &mut ManipulationSession) -> ManipulationResult<()> {
        for manipulator in &self.manipulators {
            debug!(manipulator = manipulator.name(), "deriving state");
            manipulator.init(session)?;
        }
        Ok(())
    }

    /// Runs every scan, then every apply, and returns the union of the
    /// changed project sets. A scan failure aborts before any mutation;
    /// an apply failure aborts with earlier changes retained in memory.
    pub fn scan_and_apply(
        &self,
        projects: &mut [Project],
        session: &ManipulationSession,
    ) -> ManipulationResult<BTreeSet<ProjectKey>> {
        for manipulator in &self.manipulators {
            debug!(manipulator = manipulator.name(), "scanning");
            manipulator.scan(projects, session)?;
        }

        let mut changed = BTreeSet::new();
        for manipulator in &self.manipulators {
            let touched = manipulator.apply_changes(projects, session)?;
            if !touched.is_empty() {
                info!(
                    manipulator = manipulator.name(),
                    changed = touched.len(),
                    "applied changes"
                );
            }
            changed.extend(touched);
        }
        info!(total = changed.len(), "manipulation complete");
        Ok(changed)
    }
}
