//! Per-run session context.

use std::any::TypeId;
use std::collections::BTreeMap;

use tracing::debug;

use crate::state::State;

/// Property that disables the whole manipulation run when set to `true`.
pub const MANIPULATIONS_DISABLED_PROP: &str = "manipulation.disable";

/// Context for a single manipulation run: the aggregated user properties,
/// the global enable flag derived from them, and one [`State`] per
/// manipulator type. A session is created per run and never reused.
pub struct ManipulationSession {
    user_properties: BTreeMap<String, String>,
    enabled: bool,
    states: BTreeMap<TypeId, Box<dyn State>>,
}

impl ManipulationSession {
    pub fn from_properties(user_properties: BTreeMap<String, String>) -> Self {
        let enabled = !user_properties
            .get(MANIPULATIONS_DISABLED_PROP)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));
        if !enabled {
            debug!("manipulation disabled via {MANIPULATIONS_DISABLED_PROP}");
        }
        Self {
            user_properties,
            enabled,
            states: BTreeMap::new(),
        }
    }

    /// Global enable flag. When false every manipulator's apply phase is
    /// a no-op, whatever its own state says.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.user_properties.get(name).map(String::as_str)
    }

    /// Boolean property with a fallback. Only the literal `true`, in any
    /// case, counts as true; any other present value counts as false.
    pub fn flag(&self, name: &str, default: bool) -> bool {
        self.property(name)
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(default)
    }

    /// Properties whose names start with `prefix`, as (suffix, value)
    /// pairs in sorted name order.
    pub fn properties_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.user_properties.iter().filter_map(move |(name, value)| {
            name.strip_prefix(prefix)
                .map(|suffix| (suffix, value.as_str()))
        })
    }

    /// Installs `state` under its concrete type, replacing any previous
    /// state of the same type.
    pub fn set_state<S: State>(&mut self, state: S) {
        self.states.insert(TypeId::of::<S>(), Box::new(state));
    }

    /// The state previously installed for `S`, if any.
    pub fn state<S: State>(&self) -> Option<&S> {
        self.states
            .get(&TypeId::of::<S>())
            .and_then(|state| state.as_any().downcast_ref::<S>())
    }

    /// True while at least one installed active-by-default state is
    /// enabled. Opt-in manipulators use this as their shared gate.
    pub fn any_state_enabled(&self) -> bool {
        self.states
            .values()
            .any(|state| state.active_by_default() && state.enabled())
    }
}
