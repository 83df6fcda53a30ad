//! Normalized domain-event envelope
//!
//! The envelope is what downstream event-sourced consumers read. Its
//! `command.status` and `command.action` strings are part of the wire
//! contract and must not change spelling.

use serde::{Deserialize, Serialize};

/// Domain status an object transitions to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Uploaded,
    Deleted,
    Restoring,
    Replicated,
    AclChanged,
    Lost,
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Uploaded => "uploaded",
            Status::Deleted => "deleted",
            Status::Restoring => "restoring",
            Status::Replicated => "replicated",
            Status::AclChanged => "acl_changed",
            Status::Lost => "lost",
            Status::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Instruction for the consumer applying the status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SetStatus,
    Noop,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::SetStatus => "set_status",
            Action::Noop => "noop",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying one event name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: Status,
    pub action: Action,
}

impl Classification {
    pub const fn set_status(status: Status) -> Self {
        Self {
            status,
            action: Action::SetStatus,
        }
    }

    /// Outcome for a message that never parsed into records
    pub const fn unparsable() -> Self {
        Self {
            status: Status::Unknown,
            action: Action::Noop,
        }
    }
}

/// The `command` object of an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub action: Action,
    pub status: Status,
}

impl From<Classification> for Command {
    fn from(c: Classification) -> Self {
        Self {
            action: c.action,
            status: c.status,
        }
    }
}

/// Normalized event envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub source: String,
    pub aggregate: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub command: Command,
    pub path: String,
    pub timestamp: String,
    pub raw: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_spelling() {
        assert_eq!(
            serde_json::to_value(Status::AclChanged).unwrap(),
            json!("acl_changed")
        );
        assert_eq!(
            serde_json::to_value(Action::SetStatus).unwrap(),
            json!("set_status")
        );
        for status in [
            Status::Uploaded,
            Status::Deleted,
            Status::Restoring,
            Status::Replicated,
            Status::AclChanged,
            Status::Lost,
            Status::Unknown,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), json!(status.as_str()));
        }
    }

    #[test]
    fn test_envelope_field_set() {
        let event = NormalizedEvent {
            source: "s3-events-handler".into(),
            aggregate: "file".into(),
            aggregate_id: "b:k".into(),
            event_type: "ObjectCreated:Put".into(),
            command: Classification::set_status(Status::Uploaded).into(),
            path: "b/k".into(),
            timestamp: "2026-02-11T00:00:00Z".into(),
            raw: json!({"eventName": "ObjectCreated:Put"}),
        };

        let value = serde_json::to_value(&event).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            [
                "aggregate",
                "aggregate_id",
                "command",
                "event_type",
                "path",
                "raw",
                "source",
                "timestamp"
            ]
        );
        assert_eq!(
            value["command"],
            json!({"action": "set_status", "status": "uploaded"})
        );
    }

    #[test]
    fn test_unparsable_classification() {
        let c = Classification::unparsable();
        assert_eq!(c.status, Status::Unknown);
        assert_eq!(c.action, Action::Noop);
    }
}
