//! Wildcard-aware override map.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use refit_model::{ProjectRef, WILDCARD};
use serde::Serialize;
use tracing::{debug, warn};

/// Two-level lookup from a `group:artifact` coordinate to an override
/// value.
///
/// The outer level is keyed by group id in sorted order; the inner level
/// by artifact id in insertion order, where the artifact may be the
/// wildcard `*`. For any one group the inner entries are either a single
/// wildcard or exact artifact ids, never a mix; [`OverrideMap::insert`]
/// maintains that shape by fixed precedence rather than failing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverrideMap {
    groups: BTreeMap<String, IndexMap<String, String>>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the group carries a wildcard entry or, absent one, an
    /// exact entry for the key's artifact id.
    pub fn contains(&self, key: &ProjectRef) -> bool {
        match self.groups.get(key.group_id()) {
            None => false,
            Some(entries) if entries.is_empty() => false,
            Some(entries) => {
                entries.contains_key(WILDCARD) || entries.contains_key(key.artifact_id())
            }
        }
    }

    /// The group's wildcard value when one exists, otherwise the exact
    /// value for the key's artifact id, otherwise `None`.
    pub fn get(&self, key: &ProjectRef) -> Option<&str> {
        let entries = self.groups.get(key.group_id())?;
        entries
            .get(WILDCARD)
            .or_else(|| entries.get(key.artifact_id()))
            .map(String::as_str)
    }

    /// Installs an override.
    ///
    /// A wildcard key discards every existing entry for its group before
    /// taking effect; an exact key under a group already covered by a
    /// wildcard is dropped. Either outcome is returned as an
    /// [`OverrideConflict`] and logged as a warning, and the run carries
    /// on. Re-inserting an exact key overwrites its value in place,
    /// keeping the original insertion position.
    pub fn insert(
        &mut self,
        key: ProjectRef,
        value: impl Into<String>,
    ) -> Option<OverrideConflict> {
        let value = value.into();
        let entries = self.groups.entry(key.group_id().to_string()).or_default();

        if key.is_wildcard() {
            let discarded: Vec<String> = entries.keys().cloned().collect();
            entries.clear();
            entries.insert(WILDCARD.to_string(), value);
            if discarded.is_empty() {
                return None;
            }
            let conflict = OverrideConflict::WildcardReplacedEntries {
                group_id: key.group_id().to_string(),
                discarded,
            };
            warn!("{conflict}");
            return Some(conflict);
        }

        if entries.contains_key(WILDCARD) {
            let conflict = OverrideConflict::ShadowedByWildcard { key, value };
            warn!("{conflict}");
            return Some(conflict);
        }

        debug!(key = %key, value = %value, "recorded override");
        entries.insert(key.artifact_id().to_string(), value);
        None
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(IndexMap::is_empty)
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(IndexMap::len).sum()
    }

    /// Every entry as a `(coordinate, value)` pair, groups in sorted
    /// order and exact entries within a group in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ProjectRef, &str)> + '_ {
        self.groups.iter().flat_map(|(group, entries)| {
            entries.iter().map(move |(artifact, value)| {
                (
                    ProjectRef::new(group.as_str(), artifact.as_str()),
                    value.as_str(),
                )
            })
        })
    }
}

/// A non-fatal clash observed while aggregating overrides. The insert
/// that produced it has already been resolved by precedence; the value
/// exists so callers can surface what was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverrideConflict {
    /// A newly inserted wildcard removed the group's previous entries.
    WildcardReplacedEntries {
        group_id: String,
        discarded: Vec<String>,
    },
    /// An exact insert was dropped because its group is already covered
    /// by a wildcard.
    ShadowedByWildcard { key: ProjectRef, value: String },
}

impl fmt::Display for OverrideConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideConflict::WildcardReplacedEntries {
                group_id,
                discarded,
            } => write!(
                f,
                "discarding entries {discarded:?} of group '{group_id}': replaced by a wildcard override"
            ),
            OverrideConflict::ShadowedByWildcard { key, value } => write!(
                f,
                "unable to add override {key}={value}: a wildcard override for '{}' already exists",
                key.group_id()
            ),
        }
    }
}
