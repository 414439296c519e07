//! The cleaning plan as published in the plan sensor's `plan` attribute.
//!
//! The plan is computed upstream; this module only reads it. Parsing is
//! lenient: missing or `null` fields take their defaults, a malformed room is
//! skipped, and a malformed vacuum entry degrades to an empty one instead of
//! failing the whole plan.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use strum::Display;
use tracing::warn;

use crate::state::EntityState;

/// Attribute on the plan sensor that carries the plan.
pub const PLAN_ATTRIBUTE: &str = "plan";

/// Ordered mapping of vacuum entity id to its plan.
///
/// Order is the order of the JSON object the host delivered, which is the
/// order vacuums are displayed in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    vacuums: Vec<(String, VacuumPlan)>,
}

impl Plan {
    /// Read the plan from the sensor's attributes.
    ///
    /// Returns an empty plan when the attribute is absent or not an object.
    pub fn from_entity(entity: &EntityState) -> Self {
        match entity.attribute(PLAN_ATTRIBUTE) {
            Some(value) => Self::from_value(value),
            None => Self::default(),
        }
    }

    pub fn from_value(value: &serde_json::Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let vacuums = object
            .iter()
            .map(|(vacuum_id, data)| {
                let plan = VacuumPlan::deserialize(data).unwrap_or_else(|e| {
                    warn!("Malformed plan entry for {}: {}", vacuum_id, e);
                    VacuumPlan::default()
                });
                (vacuum_id.clone(), plan)
            })
            .collect();

        Self { vacuums }
    }

    pub fn is_empty(&self) -> bool {
        self.vacuums.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vacuums.len()
    }

    /// Iterate vacuums in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VacuumPlan)> {
        self.vacuums.iter().map(|(id, plan)| (id.as_str(), plan))
    }

    pub fn vacuum_ids(&self) -> impl Iterator<Item = &str> {
        self.vacuums.iter().map(|(id, _)| id.as_str())
    }

    pub fn get(&self, vacuum_id: &str) -> Option<&VacuumPlan> {
        self.vacuums
            .iter()
            .find(|(id, _)| id == vacuum_id)
            .map(|(_, plan)| plan)
    }
}

/// Plan for a single vacuum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VacuumPlan {
    /// Number of rooms the vacuum will clean.
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: i64,

    #[serde(default, deserialize_with = "rooms_skipping_malformed")]
    pub rooms: Vec<Room>,

    /// Service payload the vacuum would be started with. Only present when
    /// the integration runs in debug mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_command: Option<serde_json::Value>,
}

/// One room in a vacuum's plan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    // Flags are null when the backing switch or sensor is unavailable.
    #[serde(deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub ready: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub will_clean: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub disabled_override: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "reasons_skipping_null"
    )]
    pub reasons: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_entity_id: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn reasons_skipping_null<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let reasons = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(reasons.map(|reasons| reasons.into_iter().flatten().collect()))
}

/// Parse rooms one by one, dropping the ones that do not parse.
fn rooms_skipping_malformed<'de, D>(deserializer: D) -> Result<Vec<Room>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    let rooms = values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match Room::deserialize(value) {
            Ok(room) => Some(room),
            Err(e) => {
                warn!("Skipping malformed room #{}: {}", index, e);
                None
            }
        })
        .collect();
    Ok(rooms)
}

/// Visual state of a room. Exactly one applies to every room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RoomStatus {
    /// The room is part of the next run.
    WillClean,
    /// Not scheduled, or blocked by the override switch.
    Disabled,
    /// Scheduled but its readiness sensor says no.
    NotReady,
    /// Enabled and ready, yet not chosen.
    Idle,
}

impl Room {
    /// Derive the room's status. First match wins.
    pub fn status(&self) -> RoomStatus {
        if self.will_clean {
            RoomStatus::WillClean
        } else if !self.enabled || self.disabled_override {
            RoomStatus::Disabled
        } else if !self.ready {
            RoomStatus::NotReady
        } else {
            RoomStatus::Idle
        }
    }

    /// Secondary line shown under the room name.
    pub fn subtext(&self) -> String {
        if let Some(reasons) = &self.reasons {
            return reasons.join(", ");
        }
        self.reason
            .as_deref()
            .or(self.sensor_reason.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}
