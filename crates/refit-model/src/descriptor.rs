use serde::{Deserialize, Serialize};

/// Packaging kind of metadata-only (parent/aggregator) projects.
pub const POM_PACKAGING: &str = "pom";

/// Packaging assumed when a descriptor does not declare one.
pub const DEFAULT_PACKAGING: &str = "jar";

/// Parsed contents of one `project.toml` descriptor file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Descriptor {
    pub package: PackageSection,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,

    #[serde(
        default,
        rename = "dependency-management",
        skip_serializing_if = "Option::is_none"
    )]
    pub dependency_management: Option<DependencyManagement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<Profile>,
}

/// The `[package]` section: coordinates, packaging and child modules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    pub group: String,
    pub artifact: String,
    pub version: String,

    #[serde(
        default = "default_packaging",
        skip_serializing_if = "is_default_packaging"
    )]
    pub packaging: String,

    /// Child module directories, relative to this descriptor's directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,
}

/// One dependency declaration. A missing version means the effective
/// version is governed elsewhere (a dependency-management block).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dependency {
    pub group: String,
    pub artifact: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Dependency {
    pub fn project_ref(&self) -> crate::ProjectRef {
        crate::ProjectRef::new(&self.group, &self.artifact)
    }
}

/// Versions pinned for consumers; no direct effect until inherited or
/// imported.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyManagement {
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// A named profile carrying its own dependency lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub id: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,

    #[serde(
        default,
        rename = "dependency-management",
        skip_serializing_if = "Option::is_none"
    )]
    pub dependency_management: Option<DependencyManagement>,
}

/// Whether a dependency list declares dependencies directly or manages
/// their versions for consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Direct,
    Managed,
}

impl Descriptor {
    /// Every dependency list in the descriptor: direct, managed, and both
    /// lists of every profile, in declaration order.
    pub fn dependency_lists(&self) -> Vec<(ListKind, &[Dependency])> {
        let mut lists: Vec<(ListKind, &[Dependency])> =
            vec![(ListKind::Direct, self.dependencies.as_slice())];
        if let Some(managed) = &self.dependency_management {
            lists.push((ListKind::Managed, managed.dependencies.as_slice()));
        }
        for profile in &self.profiles {
            lists.push((ListKind::Direct, profile.dependencies.as_slice()));
            if let Some(managed) = &profile.dependency_management {
                lists.push((ListKind::Managed, managed.dependencies.as_slice()));
            }
        }
        lists
    }

    /// Mutable form of [`Descriptor::dependency_lists`].
    pub fn dependency_lists_mut(&mut self) -> Vec<(ListKind, &mut Vec<Dependency>)> {
        let mut lists: Vec<(ListKind, &mut Vec<Dependency>)> =
            vec![(ListKind::Direct, &mut self.dependencies)];
        if let Some(managed) = self.dependency_management.as_mut() {
            lists.push((ListKind::Managed, &mut managed.dependencies));
        }
        for profile in &mut self.profiles {
            lists.push((ListKind::Direct, &mut profile.dependencies));
            if let Some(managed) = profile.dependency_management.as_mut() {
                lists.push((ListKind::Managed, &mut managed.dependencies));
            }
        }
        lists
    }
}

fn default_packaging() -> String {
    DEFAULT_PACKAGING.to_string()
}

fn is_default_packaging(packaging: &String) -> bool {
    packaging == DEFAULT_PACKAGING
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DESCRIPTOR: &str = r#"
        [package]
        group = "org.acme"
        artifact = "acme-parent"
        version = "1.2.3"
        packaging = "pom"
        modules = ["core", "web"]

        [[dependencies]]
        group = "org.acme"
        artifact = "acme-util"
        version = "${project.version}"
        scope = "test"

        [dependency-management]
        [[dependency-management.dependencies]]
        group = "junit"
        artifact = "junit"
        version = "4.12"

        [[profiles]]
        id = "ci"
        [[profiles.dependencies]]
        group = "org.acme"
        artifact = "acme-extras"
        version = "2.0"
        [profiles.dependency-management]
        [[profiles.dependency-management.dependencies]]
        group = "org.slow"
        artifact = "integration-harness"
        version = "0.9"
    "#;

    #[test]
    fn parse_full_descriptor_expected_model() {
        let descriptor: Descriptor =
            toml::from_str(FULL_DESCRIPTOR).expect("descriptor should parse");

        assert_eq!(descriptor.package.group, "org.acme");
        assert_eq!(descriptor.package.packaging, POM_PACKAGING);
        assert_eq!(descriptor.package.modules, vec!["core", "web"]);
        assert_eq!(descriptor.dependencies.len(), 1);
        assert_eq!(descriptor.dependencies[0].scope.as_deref(), Some("test"));

        let managed = descriptor
            .dependency_management
            .as_ref()
            .expect("dependency management should be present");
        assert_eq!(managed.dependencies[0].version.as_deref(), Some("4.12"));

        let profile = &descriptor.profiles[0];
        assert_eq!(profile.id, "ci");
        assert_eq!(profile.dependencies[0].artifact, "acme-extras");
        let profile_managed = profile
            .dependency_management
            .as_ref()
            .expect("profile dependency management should be present");
        assert_eq!(profile_managed.dependencies[0].group, "org.slow");
    }

    #[test]
    fn parse_minimal_descriptor_expected_defaults() {
        let descriptor: Descriptor = toml::from_str(
            r#"
            [package]
            group = "org.acme"
            artifact = "acme-core"
            version = "1.0"
            "#,
        )
        .expect("descriptor should parse");

        assert_eq!(descriptor.package.packaging, DEFAULT_PACKAGING);
        assert!(descriptor.package.modules.is_empty());
        assert!(descriptor.dependencies.is_empty());
        assert!(descriptor.dependency_management.is_none());
        assert!(descriptor.profiles.is_empty());
    }

    #[test]
    fn parse_unknown_field_expected_rejection() {
        let result: Result<Descriptor, _> = toml::from_str(
            r#"
            [package]
            group = "org.acme"
            artifact = "acme-core"
            version = "1.0"
            flavour = "strawberry"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn dependency_lists_expected_every_section_visited() {
        let mut descriptor: Descriptor =
            toml::from_str(FULL_DESCRIPTOR).expect("descriptor should parse");

        let kinds: Vec<ListKind> = descriptor
            .dependency_lists()
            .into_iter()
            .map(|(kind, _)| kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ListKind::Direct,
                ListKind::Managed,
                ListKind::Direct,
                ListKind::Managed,
            ]
        );

        let total: usize = descriptor
            .dependency_lists_mut()
            .into_iter()
            .map(|(_, list)| list.len())
            .sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn serialize_default_packaging_expected_omitted() {
        let descriptor: Descriptor = toml::from_str(
            r#"
            [package]
            group = "org.acme"
            artifact = "acme-core"
            version = "1.0"
            "#,
        )
        .expect("descriptor should parse");

        let rendered = toml::to_string_pretty(&descriptor).expect("descriptor should serialize");
        assert!(!rendered.contains("packaging"));

        let reparsed: Descriptor = toml::from_str(&rendered).expect("rendered toml should parse");
        assert_eq!(reparsed, descriptor);
    }
}
