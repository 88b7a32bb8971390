//! Dependency version override pass.

use std::any::Any;
use std::collections::BTreeSet;

use refit_model::{ListKind, Project, ProjectKey, ProjectRef};
use tracing::{debug, info};

use crate::errors::{ManipulationError, ManipulationResult};
use crate::manipulator::Manipulator;
use crate::overrides::{OverrideConflict, OverrideMap};
use crate::session::ManipulationSession;
use crate::state::State;

/// Prefix of the property family declaring overrides:
/// `dependency-override.<group>:<artifact> = <version>`, where the
/// artifact may be the wildcard `*`.
pub const DEPENDENCY_OVERRIDE_PREFIX: &str = "dependency-override.";

/// Configuration for [`DependencyOverrideManipulator`]: the aggregated
/// override map plus every conflict observed while building it.
#[derive(Clone, Debug, Default)]
pub struct DependencyOverrideState {
    overrides: OverrideMap,
    conflicts: Vec<OverrideConflict>,
}

impl DependencyOverrideState {
    /// Aggregates the `dependency-override.` property family in sorted
    /// name order. Clashes between wildcard and exact coordinates follow
    /// the map's precedence rules and are retained as conflicts; a
    /// malformed coordinate or an empty value is a configuration error.
    pub fn from_session(session: &ManipulationSession) -> ManipulationResult<Self> {
        let mut overrides = OverrideMap::new();
        let mut conflicts = Vec::new();
        for (coordinate, value) in session.properties_with_prefix(DEPENDENCY_OVERRIDE_PREFIX) {
            let key: ProjectRef = coordinate.parse().map_err(|_| {
                ManipulationError::Config(format!(
                    "invalid override property '{DEPENDENCY_OVERRIDE_PREFIX}{coordinate}': \
                     expected group:artifact"
                ))
            })?;
            if value.trim().is_empty() {
                return Err(ManipulationError::Config(format!(
                    "override '{DEPENDENCY_OVERRIDE_PREFIX}{coordinate}' has an empty value"
                )));
            }
            conflicts.extend(overrides.insert(key, value));
        }
        Ok(Self {
            overrides,
            conflicts,
        })
    }

    pub fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    pub fn conflicts(&self) -> &[OverrideConflict] {
        &self.conflicts
    }
}

impl State for DependencyOverrideState {
    fn enabled(&self) -> bool {
        !self.overrides.is_empty()
    }

    fn active_by_default(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Rewrites dependency versions to user-supplied overrides wherever the
/// map matches a declaration's `group:artifact` coordinate.
///
/// A declaration carrying a version has it replaced. A versionless entry
/// in a dependency-management list has the override injected. A
/// versionless direct declaration is left alone, since a management block
/// governs its effective version.
#[derive(Clone, Copy, Debug, Default)]
pub struct DependencyOverrideManipulator;

impl Manipulator for DependencyOverrideManipulator {
    fn name(&self) -> &'static str {
        "dependency-override"
    }

    fn init(&self, session: &mut ManipulationSession) -> ManipulationResult<()> {
        let state = DependencyOverrideState::from_session(session)?;
        if !state.conflicts().is_empty() {
            info!(
                conflicts = state.conflicts().len(),
                "override aggregation saw conflicting properties"
            );
        }
        session.set_state(state);
        Ok(())
    }

    /// Every dependency the overrides could visit must carry a usable
    /// coordinate; a blank group or artifact would make matching
    /// ambiguous, so it aborts the run before any mutation.
    fn scan(
        &self,
        projects: &[Project],
        session: &ManipulationSession,
    ) -> ManipulationResult<()> {
        let Some(state) = session.state::<DependencyOverrideState>() else {
            return Ok(());
        };
        if !state.enabled() {
            return Ok(());
        }
        for project in projects {
            for (_, list) in project.descriptor.dependency_lists() {
                for dependency in list {
                    if dependency.group.trim().is_empty() || dependency.artifact.trim().is_empty()
                    {
                        return Err(ManipulationError::Scan {
                            manipulator: self.name(),
                            reason: format!(
                                "project {} declares a dependency with a blank coordinate \
                                 ('{}:{}')",
                                project.key(),
                                dependency.group,
                                dependency.artifact
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn apply_changes(
        &self,
        projects: &mut [Project],
        session: &ManipulationSession,
    ) -> ManipulationResult<BTreeSet<ProjectKey>> {
        let state = session.state::<DependencyOverrideState>();
        let enabled = session.is_enabled()
            && session.any_state_enabled()
            && state.is_some_and(State::enabled);
        let Some(state) = state.filter(|_| enabled) else {
            info!("dependency override is disabled");
            return Ok(BTreeSet::new());
        };

        let overrides = state.overrides();
        let mut changed = BTreeSet::new();
        for project in projects.iter_mut() {
            let key = project.key();
            let mut touched = false;
            for (kind, list) in project.descriptor.dependency_lists_mut() {
                for dependency in list.iter_mut() {
                    let Some(value) = overrides.get(&dependency.project_ref()) else {
                        continue;
                    };
                    match (dependency.version.as_deref(), kind) {
                        (Some(current), _) if current == value => {}
                        (Some(_), _) | (None, ListKind::Managed) => {
                            debug!(
                                dependency = %dependency.project_ref(),
                                project = %key,
                                version = value,
                                "overriding dependency version"
                            );
                            dependency.version = Some(value.to_string());
                            touched = true;
                        }
                        (None, ListKind::Direct) => {}
                    }
                }
            }
            if touched {
                changed.insert(key);
            }
        }
        Ok(changed)
    }
}
