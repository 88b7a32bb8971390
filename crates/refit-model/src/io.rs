use crate::coords::ProjectKey;
use crate::descriptor::Descriptor;
use crate::errors::{ModelError, ModelResult};
use crate::project::Project;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of a module descriptor.
pub const DESCRIPTOR_FILE: &str = "project.toml";

/// Loads the full project graph rooted at `root_descriptor`, following
/// `package.modules` declarations depth-first. The root project comes
/// first; each parent precedes its modules.
///
/// Rejects graphs that declare the same `group:artifact:version` twice and
/// module declarations that lead back to an already-loaded descriptor.
pub fn load_project_graph(root_descriptor: &Path) -> ModelResult<Vec<Project>> {
    let mut projects = Vec::new();
    let mut seen_paths = BTreeSet::new();
    let mut seen_keys = BTreeSet::new();
    load_descriptor(root_descriptor, &mut projects, &mut seen_paths, &mut seen_keys)?;
    debug!(count = projects.len(), "loaded project graph");
    Ok(projects)
}

fn load_descriptor(
    path: &Path,
    projects: &mut Vec<Project>,
    seen_paths: &mut BTreeSet<PathBuf>,
    seen_keys: &mut BTreeSet<ProjectKey>,
) -> ModelResult<()> {
    let canonical = fs::canonicalize(path).map_err(|source| ModelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if !seen_paths.insert(canonical.clone()) {
        return Err(ModelError::ModuleCycle { path: canonical });
    }

    let raw = fs::read_to_string(&canonical).map_err(|source| ModelError::Read {
        path: canonical.clone(),
        source,
    })?;
    let descriptor: Descriptor = toml::from_str(&raw).map_err(|source| ModelError::Parse {
        path: canonical.clone(),
        source,
    })?;

    let project = Project::new(descriptor, canonical.clone());
    let key = project.key();
    if !seen_keys.insert(key.clone()) {
        return Err(ModelError::DuplicateProject {
            key,
            path: canonical,
        });
    }
    debug!(project = %key, path = %canonical.display(), "loaded descriptor");

    let modules = project.descriptor.package.modules.clone();
    projects.push(project);

    let base = canonical.parent().unwrap_or_else(|| Path::new("."));
    for module in &modules {
        let module_descriptor = base.join(module).join(DESCRIPTOR_FILE);
        load_descriptor(&module_descriptor, projects, seen_paths, seen_keys)?;
    }
    Ok(())
}

/// Writes back the descriptors of every project whose key is in `changed`,
/// leaving all others untouched. Returns the number of files written.
pub fn write_changed(projects: &[Project], changed: &BTreeSet<ProjectKey>) -> ModelResult<usize> {
    let mut written = 0;
    for project in projects {
        let key = project.key();
        if !changed.contains(&key) {
            continue;
        }
        let rendered =
            toml::to_string_pretty(&project.descriptor).map_err(|source| ModelError::Serialize {
                key: key.clone(),
                source,
            })?;
        fs::write(&project.path, rendered).map_err(|source| ModelError::Write {
            path: project.path.clone(),
            source,
        })?;
        debug!(project = %key, path = %project.path.display(), "rewrote descriptor");
        written += 1;
    }
    Ok(written)
}
