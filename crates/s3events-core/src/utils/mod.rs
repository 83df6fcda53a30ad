//! Utility functions

use chrono::{DateTime, Utc};

/// Build the aggregate ID for an object (`bucket:key`)
pub fn aggregate_id(bucket: &str, key: &str) -> String {
    format!("{}{}{}", bucket, crate::AGGREGATE_ID_SEPARATOR, key)
}

/// Build the object path (`bucket/key`)
pub fn object_path(bucket: &str, key: &str) -> String {
    format!("{}{}{}", bucket, crate::PATH_SEPARATOR, key)
}

/// Format datetime for envelope timestamps (RFC 3339, whole seconds, `Z`)
pub fn format_event_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
