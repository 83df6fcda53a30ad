//! Notification parser
//!
//! Decodes one raw transport message into the notifications it carries.
//! Never fails: a message that does not decode becomes a single
//! [`Notification::Unparsable`] carrying the message verbatim.

use s3events_core::types::{get_field, Notification, ObjectNotification, S3EventRecord};
use s3events_core::{Error, Result};
use serde_json::Value;
use tracing::{debug, warn};

const RECORDS_KEY: &str = "Records";

/// Parse a raw message into notifications, preserving record order
pub fn parse_message(message: &str) -> Vec<Notification> {
    match decode_batch(message) {
        Ok(notifications) => {
            debug!("Decoded {} notification(s) from message", notifications.len());
            notifications
        }
        Err(e) => {
            warn!("Message is not a notification batch, using fallback: {}", e);
            vec![Notification::unparsable(message, e.to_string())]
        }
    }
}

fn decode_batch(message: &str) -> Result<Vec<Notification>> {
    let value: Value =
        serde_json::from_str(message).map_err(|e| Error::Parse(format!("invalid JSON: {}", e)))?;

    let batch = match value {
        Value::Object(batch) => batch,
        other => {
            return Err(Error::Parse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let records = match get_field(&batch, RECORDS_KEY) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(records)) => records,
        Some(other) => {
            return Err(Error::Parse(format!(
                "`{}` must be an array, got {}",
                RECORDS_KEY,
                json_kind(other)
            )))
        }
    };

    records
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let record = S3EventRecord::from_value(raw)
                .map_err(|e| Error::Parse(format!("record {}: {}", index, e)))?;
            Ok(Notification::Object(ObjectNotification::from_record(
                record,
                raw.clone(),
            )))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
