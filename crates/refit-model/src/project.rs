use crate::coords::{ProjectKey, ProjectRef};
use crate::descriptor::{Descriptor, POM_PACKAGING};
use std::path::PathBuf;

/// One module of the build: a parsed descriptor plus the path it was read
/// from. Constructed by the loader, mutated in place by manipulators,
/// written back by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    pub descriptor: Descriptor,
    pub path: PathBuf,
}

impl Project {
    pub fn new(descriptor: Descriptor, path: impl Into<PathBuf>) -> Self {
        Self {
            descriptor,
            path: path.into(),
        }
    }

    pub fn key(&self) -> ProjectKey {
        ProjectKey::new(
            &self.descriptor.package.group,
            &self.descriptor.package.artifact,
            &self.descriptor.package.version,
        )
    }

    pub fn project_ref(&self) -> ProjectRef {
        ProjectRef::new(
            &self.descriptor.package.group,
            &self.descriptor.package.artifact,
        )
    }

    pub fn version(&self) -> &str {
        &self.descriptor.package.version
    }

    /// Metadata-only projects (parents/aggregators) are the ones whose
    /// dependency declarations other projects inherit.
    pub fn is_pom_packaging(&self) -> bool {
        self.descriptor.package.packaging == POM_PACKAGING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(packaging: &str) -> Descriptor {
        toml::from_str(&format!(
            r#"
            [package]
            group = "org.acme"
            artifact = "acme-parent"
            version = "1.2.3"
            packaging = "{packaging}"
            "#
        ))
        .expect("descriptor should parse")
    }

    #[test]
    fn project_identity_helpers() {
        let project = Project::new(descriptor("pom"), "acme/project.toml");
        assert_eq!(project.key(), ProjectKey::new("org.acme", "acme-parent", "1.2.3"));
        assert_eq!(project.project_ref(), ProjectRef::new("org.acme", "acme-parent"));
        assert_eq!(project.version(), "1.2.3");
        assert!(project.is_pom_packaging());
        assert!(!Project::new(descriptor("jar"), "acme/project.toml").is_pom_packaging());
    }
}
