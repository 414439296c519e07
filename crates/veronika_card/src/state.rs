use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

/// State of a single host entity, as delivered by the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityState {
    /// Primary state string (e.g. "on", "docked", "cleaning").
    #[serde(default)]
    pub state: String,

    /// Free-form attribute mapping.
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl EntityState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: serde_json::Map::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// The `friendly_name` attribute, if it is a non-empty string.
    pub fn friendly_name(&self) -> Option<&str> {
        self.attribute("friendly_name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Snapshot of the host's world at one instant.
///
/// Entity states are shared behind `Arc`s: a host producing a new snapshot
/// reuses the `Arc` of every entity that did not change, which is what lets
/// consumers detect "unchanged" by pointer identity instead of deep equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    states: HashMap<String, Arc<EntityState>>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from a JSON object of `entity_id -> {state, attributes}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Insert or replace an entity, returning the shared handle.
    pub fn insert(&mut self, entity_id: impl Into<String>, state: EntityState) -> Arc<EntityState> {
        let state = Arc::new(state);
        self.states.insert(entity_id.into(), Arc::clone(&state));
        state
    }

    /// Insert an already-shared entity state (keeps its identity).
    pub fn insert_shared(&mut self, entity_id: impl Into<String>, state: Arc<EntityState>) {
        self.states.insert(entity_id.into(), state);
    }

    pub fn get(&self, entity_id: &str) -> Option<&Arc<EntityState>> {
        self.states.get(entity_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let snapshot = StateSnapshot::from_json(
            r#"{
                "vacuum.v1": {"state": "docked", "attributes": {"friendly_name": "Robo"}},
                "sensor.other": {"state": "3"}
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.len(), 2);
        let vacuum = snapshot.get("vacuum.v1").unwrap();
        assert_eq!(vacuum.state, "docked");
        assert_eq!(vacuum.friendly_name(), Some("Robo"));
        assert!(snapshot.get("sensor.other").unwrap().attributes.is_empty());
    }

    #[test]
    fn test_friendly_name_ignores_non_strings() {
        let state = EntityState::new("docked").with_attribute("friendly_name", 42.into());
        assert_eq!(state.friendly_name(), None);

        let state = EntityState::new("docked").with_attribute("friendly_name", "".into());
        assert_eq!(state.friendly_name(), None);
    }

    #[test]
    fn test_clone_preserves_identity() {
        let mut snapshot = StateSnapshot::new();
        assert!(snapshot.is_empty());
        let shared = snapshot.insert("sensor.plan", EntityState::new("ok"));

        let next = snapshot.clone();
        assert!(Arc::ptr_eq(next.get("sensor.plan").unwrap(), &shared));
    }
}
