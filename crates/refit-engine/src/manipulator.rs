//! The manipulation pass contract.

use std::collections::BTreeSet;

use refit_model::{Project, ProjectKey};

use crate::errors::ManipulationResult;
use crate::session::ManipulationSession;

/// One transformation pass over the project graph.
///
/// Per run, `init` derives the pass's [`State`](crate::State) from session
/// properties, `scan` inspects the loaded graph read-only, and
/// `apply_changes` is the only phase allowed to mutate it. Passes run
/// strictly one at a time in registration order; the pipeline infers no
/// ordering between them and rolls nothing back on failure.
pub trait Manipulator: Send + Sync {
    /// Stable identifier used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Derives and installs this pass's state on the session.
    fn init(&self, session: &mut ManipulationSession) -> ManipulationResult<()>;

    /// Pre-validates the graph. May fail when it is in a shape this pass
    /// could not safely transform later; must not mutate anything.
    fn scan(
        &self,
        projects: &[Project],
        session: &ManipulationSession,
    ) -> ManipulationResult<()>;

    /// Applies this pass's changes and returns the keys of exactly the
    /// projects it visibly changed. Must be a no-op returning an empty
    /// set when the session is disabled, when this pass's own state is
    /// missing or disabled, or when no active-by-default state is
    /// enabled.
    fn apply_changes(
        &self,
        projects: &mut [Project],
        session: &ManipulationSession,
    ) -> ManipulationResult<BTreeSet<ProjectKey>>;
}
