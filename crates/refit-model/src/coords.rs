use crate::errors::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Artifact id that matches every artifact under its group.
pub const WILDCARD: &str = "*";

/// A `group:artifact` coordinate, used purely as a lookup key.
///
/// The artifact side may be the wildcard `*`; the group side may not.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    group_id: String,
    artifact_id: String,
}

impl ProjectRef {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    pub fn wildcard(group_id: impl Into<String>) -> Self {
        Self::new(group_id, WILDCARD)
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn is_wildcard(&self) -> bool {
        self.artifact_id == WILDCARD
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

impl FromStr for ProjectRef {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidCoordinate(raw.to_string());
        let (group_id, artifact_id) = raw.split_once(':').ok_or_else(invalid)?;
        if group_id.is_empty() || artifact_id.is_empty() || artifact_id.contains(':') {
            return Err(invalid());
        }
        if group_id == WILDCARD {
            // Wildcards are an artifact-level concept only.
            return Err(invalid());
        }
        Ok(Self::new(group_id, artifact_id))
    }
}

/// The `group:artifact:version` identity of one project in the graph.
///
/// Unique per run by the loader's invariant; the element type of
/// changed-project sets.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectKey {
    group_id: String,
    artifact_id: String,
    version: String,
}

impl ProjectKey {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn project_ref(&self) -> ProjectRef {
        ProjectRef::new(&self.group_id, &self.artifact_id)
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_coordinate_expected_fields() {
        let parsed: ProjectRef = "org.acme:acme-core".parse().expect("coordinate should parse");
        assert_eq!(parsed.group_id(), "org.acme");
        assert_eq!(parsed.artifact_id(), "acme-core");
        assert!(!parsed.is_wildcard());
        assert_eq!(parsed.to_string(), "org.acme:acme-core");
    }

    #[test]
    fn parse_wildcard_artifact_expected_wildcard() {
        let parsed: ProjectRef = "org.acme:*".parse().expect("coordinate should parse");
        assert!(parsed.is_wildcard());
        assert_eq!(parsed, ProjectRef::wildcard("org.acme"));
    }

    #[test]
    fn parse_malformed_coordinates_expected_errors() {
        for raw in ["org.acme", ":acme-core", "org.acme:", "a:b:c", "*:acme-core", ""] {
            let error = raw.parse::<ProjectRef>().expect_err("coordinate should be rejected");
            assert!(matches!(error, ModelError::InvalidCoordinate(bad) if bad == raw));
        }
    }

    #[test]
    fn project_key_display_and_ordering() {
        let first = ProjectKey::new("org.acme", "acme-core", "1.0");
        let second = ProjectKey::new("org.acme", "acme-web", "1.0");
        assert_eq!(first.to_string(), "org.acme:acme-core:1.0");
        assert!(first < second);
        assert_eq!(first.project_ref(), ProjectRef::new("org.acme", "acme-core"));
    }
}
