//! Project-version enforcement pass.

use std::any::Any;
use std::collections::BTreeSet;

use refit_model::{Dependency, Project, ProjectKey};
use tracing::{info, warn};

use crate::errors::ManipulationResult;
use crate::manipulator::Manipulator;
use crate::session::ManipulationSession;
use crate::state::State;

/// Version expression that resolves to the declaring project's own
/// version at build time.
pub const VERSION_PLACEHOLDER: &str = "${project.version}";

/// Property toggling project-version enforcement. Enabled unless set to
/// something other than `true`.
pub const ENFORCE_PROJECT_VERSION_PROP: &str = "enforce-project-version";

/// Configuration for [`ProjectVersionEnforcer`].
#[derive(Clone, Debug)]
pub struct ProjectVersionEnforcingState {
    enabled: bool,
}

impl ProjectVersionEnforcingState {
    pub fn from_session(session: &ManipulationSession) -> Self {
        Self {
            enabled: session.flag(ENFORCE_PROJECT_VERSION_PROP, true),
        }
    }
}

impl State for ProjectVersionEnforcingState {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn active_by_default(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Replaces dependency versions containing `${project.version}` with the
/// owning project's literal version, in every `pom`-packaged project.
///
/// Importing a descriptor that still carries the placeholder is harmless,
/// but under inheritance the placeholder resolves against the consuming
/// project and silently drags dependencies to the wrong version.
/// Materializing the literal value removes the hazard; projects with any
/// other packaging are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProjectVersionEnforcer;

impl Manipulator for ProjectVersionEnforcer {
    fn name(&self) -> &'static str {
        "enforce-project-version"
    }

    fn init(&self, session: &mut ManipulationSession) -> ManipulationResult<()> {
        let state = ProjectVersionEnforcingState::from_session(session);
        session.set_state(state);
        Ok(())
    }

    fn scan(
        &self,
        _projects: &[Project],
        _session: &ManipulationSession,
    ) -> ManipulationResult<()> {
        Ok(())
    }

    fn apply_changes(
        &self,
        projects: &mut [Project],
        session: &ManipulationSession,
    ) -> ManipulationResult<BTreeSet<ProjectKey>> {
        let state = session.state::<ProjectVersionEnforcingState>();
        let enabled = session.is_enabled()
            && session.any_state_enabled()
            && state.is_some_and(State::enabled);
        if !enabled {
            info!("project version enforcement is disabled");
            return Ok(BTreeSet::new());
        }

        let mut changed = BTreeSet::new();
        for project in projects.iter_mut() {
            if !project.is_pom_packaging() {
                continue;
            }
            let key = project.key();
            let version = project.version().to_string();
            let mut touched = false;
            for (_, list) in project.descriptor.dependency_lists_mut() {
                for dependency in list.iter_mut() {
                    touched |= enforce_version(&key, &version, dependency);
                }
            }
            if touched {
                changed.insert(key);
            }
        }
        Ok(changed)
    }
}

fn enforce_version(owner: &ProjectKey, version: &str, dependency: &mut Dependency) -> bool {
    let Some(current) = dependency.version.as_deref() else {
        return false;
    };
    if !current.contains(VERSION_PLACEHOLDER) || current == version {
        return false;
    }
    warn!(
        dependency = %dependency.project_ref(),
        project = %owner,
        "replacing a {VERSION_PLACEHOLDER} version with the literal project version"
    );
    dependency.version = Some(version.to_string());
    true
}
