//! Outbound intents: the service calls the card asks the host to perform.

use serde::Deserialize;
use serde::Serialize;

/// Domain of the switch services used by the room toggles.
pub const SWITCH_DOMAIN: &str = "switch";

/// Service that starts every enabled room.
pub const SERVICE_CLEAN_ALL_ENABLED: &str = "clean_all_enabled";

/// Service that sends running vacuums home.
pub const SERVICE_STOP_CLEANING: &str = "stop_cleaning";

/// A named, payloaded request for the host to execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    #[serde(default = "empty_data")]
    pub data: serde_json::Value,
}

fn empty_data() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl ServiceCall {
    /// Create a call with an empty payload.
    pub fn new(domain: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            service: service.into(),
            data: empty_data(),
        }
    }

    /// `switch.turn_on` / `switch.turn_off` for a single entity.
    pub fn switch(entity_id: impl Into<String>, on: bool) -> Self {
        let service = if on { "turn_on" } else { "turn_off" };
        Self::new(SWITCH_DOMAIN, service).with_entity(entity_id)
    }

    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        if let serde_json::Value::Object(map) = &mut self.data {
            map.insert(
                "entity_id".to_string(),
                serde_json::Value::String(entity_id.into()),
            );
        }
        self
    }

    /// The `entity_id` in the payload, if any.
    pub fn entity_id(&self) -> Option<&str> {
        self.data.get("entity_id").and_then(|v| v.as_str())
    }
}

impl std::fmt::Display for ServiceCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.domain, self.service)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Host rejected {call}: {reason}")]
    Rejected { call: String, reason: String },
}

/// The dashboard host, as seen from the card.
///
/// Calls are fire-and-forget: the card never waits on or retries them. The
/// next state delivery is what reflects their outcome.
pub trait Host {
    /// Ask the host to execute a service call.
    fn call_service(&mut self, call: ServiceCall) -> Result<(), ServiceError>;

    /// Show a blocking informational message to the user.
    fn alert(&mut self, message: &str);
}

/// Host that records everything it is asked to do.
///
/// Used by the preview CLI and by tests; optionally fails every call.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<ServiceCall>,
    pub alerts: Vec<String>,
    fail_with: Option<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that records calls but reports every one as rejected.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<ServiceCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Host for RecordingHost {
    fn call_service(&mut self, call: ServiceCall) -> Result<(), ServiceError> {
        let rejected = self.fail_with.clone().map(|reason| ServiceError::Rejected {
            call: call.to_string(),
            reason,
        });
        self.calls.push(call);
        match rejected {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_switch_calls() {
        let on = ServiceCall::switch("switch.veronika_clean_kitchen", true);
        assert_eq!(on.domain, "switch");
        assert_eq!(on.service, "turn_on");
        assert_eq!(on.entity_id(), Some("switch.veronika_clean_kitchen"));

        let off = ServiceCall::switch("switch.veronika_clean_kitchen", false);
        assert_eq!(off.service, "turn_off");
    }

    #[test]
    fn test_serialize_shape() {
        let call = ServiceCall::new("veronika", SERVICE_STOP_CLEANING);
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({"domain": "veronika", "service": "stop_cleaning", "data": {}})
        );
        assert_eq!(call.to_string(), "veronika.stop_cleaning");
    }

    #[test]
    fn test_failing_host_still_records() {
        let mut host = RecordingHost::failing("offline");
        let err = host
            .call_service(ServiceCall::new("veronika", SERVICE_CLEAN_ALL_ENABLED))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Host rejected veronika.clean_all_enabled: offline"
        );
        assert_eq!(host.take_calls().len(), 1);
        assert!(host.calls.is_empty());
    }
}
