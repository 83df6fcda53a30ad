//! Object notification types
//!
//! Models the AWS S3 event message format as delivered to subscribers:
//! `{"Records": [{"eventName": ..., "s3": {"bucket": {...}, "object": {...}}}]}`.
//! Every field is optional on the wire; missing or `null` fields decode to
//! their empty value so a sparse record still yields a notification. Field
//! names match case-insensitively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Wire names of every modeled field, at any nesting level
const FIELD_NAMES: &[&str] = &[
    "eventVersion",
    "eventSource",
    "awsRegion",
    "eventTime",
    "eventName",
    "userIdentity",
    "principalId",
    "requestParameters",
    "sourceIPAddress",
    "responseElements",
    "x-amz-request-id",
    "x-amz-id-2",
    "s3",
    "s3SchemaVersion",
    "configurationId",
    "bucket",
    "name",
    "ownerIdentity",
    "arn",
    "object",
    "key",
    "size",
    "eTag",
    "versionId",
    "sequencer",
];

/// Decode `null` as the field's empty value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Event Record (S3 Event Message Format)
// ============================================================================

/// S3 Event record (AWS-compatible format)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct S3EventRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub event_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub event_source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub aws_region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub event_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_identity: UserIdentity,
    #[serde(deserialize_with = "null_as_default")]
    pub request_parameters: RequestParameters,
    #[serde(deserialize_with = "null_as_default")]
    pub response_elements: ResponseElements,
    #[serde(deserialize_with = "null_as_default")]
    pub s3: S3Info,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserIdentity {
    #[serde(deserialize_with = "null_as_default")]
    pub principal_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestParameters {
    #[serde(rename = "sourceIPAddress", deserialize_with = "null_as_default")]
    pub source_ip_address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseElements {
    #[serde(rename = "x-amz-request-id", deserialize_with = "null_as_default")]
    pub x_amz_request_id: String,
    #[serde(rename = "x-amz-id-2", deserialize_with = "null_as_default")]
    pub x_amz_id_2: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct S3Info {
    #[serde(deserialize_with = "null_as_default")]
    pub s3_schema_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub configuration_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bucket: S3BucketInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub object: S3ObjectInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct S3BucketInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub owner_identity: UserIdentity,
    #[serde(deserialize_with = "null_as_default")]
    pub arn: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct S3ObjectInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub e_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub sequencer: String,
}

impl S3EventRecord {
    /// Decode one record leniently.
    ///
    /// A `null` record is an empty record, and field names are matched
    /// ignoring ASCII case. An exact spelling wins over a case variant.
    pub fn from_value(raw: &Value) -> serde_json::Result<Self> {
        match raw {
            Value::Null => Ok(Self::default()),
            other => Self::deserialize(fold_field_names(other)),
        }
    }
}

/// Look up `name` in `map`, falling back to a case-insensitive match
pub fn get_field<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    map.get(name).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

fn fold_field_names(value: &Value) -> Value {
    let Value::Object(map) = value else {
        return value.clone();
    };

    let mut folded = Map::with_capacity(map.len());
    for (key, value) in map {
        let name = match FIELD_NAMES.iter().find(|f| f.eq_ignore_ascii_case(key)) {
            Some(name) if *name != key.as_str() && map.contains_key(*name) => continue,
            Some(name) => name.to_string(),
            None => key.clone(),
        };
        folded.insert(name, fold_field_names(value));
    }
    Value::Object(folded)
}

// ============================================================================
// Parsed Notifications
// ============================================================================

/// One lifecycle event on one object, as extracted from a batch
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNotification {
    pub bucket: String,
    pub key: String,
    pub event_name: String,
    /// The record exactly as received, including fields not modeled above
    pub raw: serde_json::Value,
}

impl ObjectNotification {
    pub fn from_record(record: S3EventRecord, raw: serde_json::Value) -> Self {
        Self {
            bucket: record.s3.bucket.name,
            key: record.s3.object.key,
            event_name: record.event_name,
            raw,
        }
    }

    pub fn aggregate_id(&self) -> String {
        crate::utils::aggregate_id(&self.bucket, &self.key)
    }

    pub fn path(&self) -> String {
        crate::utils::object_path(&self.bucket, &self.key)
    }
}

/// Output of parsing one raw transport message
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// A record decoded from a well-formed batch
    Object(ObjectNotification),
    /// The whole message failed to decode; carries it verbatim
    Unparsable { raw: String, reason: String },
}

impl Notification {
    pub fn unparsable(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Notification::Unparsable {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    pub fn is_unparsable(&self) -> bool {
        matches!(self, Notification::Unparsable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_decodes_sparse_fields() {
        let raw = json!({
            "eventName": "ObjectCreated:Put",
            "s3": {"bucket": {"name": "my-bucket"}, "object": {"key": "uploads/foo.jpg"}}
        });
        let record: S3EventRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.event_name, "ObjectCreated:Put");
        assert_eq!(record.s3.object.size, 0);
        assert!(record.event_time.is_none());

        let notification = ObjectNotification::from_record(record, raw.clone());
        assert_eq!(notification.bucket, "my-bucket");
        assert_eq!(notification.key, "uploads/foo.jpg");
        assert_eq!(notification.raw, raw);
    }

    #[test]
    fn test_record_decodes_full_aws_shape() {
        let raw = json!({
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "awsRegion": "us-east-1",
            "eventTime": "2026-02-11T00:00:00.000Z",
            "eventName": "ObjectRemoved:Delete",
            "userIdentity": {"principalId": "AWS:ABC"},
            "requestParameters": {"sourceIPAddress": "10.0.0.1"},
            "responseElements": {"x-amz-request-id": "req", "x-amz-id-2": "id2"},
            "s3": {
                "s3SchemaVersion": "1.0",
                "configurationId": "cfg",
                "bucket": {"name": "b", "ownerIdentity": {"principalId": "o"}, "arn": "arn:aws:s3:::b"},
                "object": {"key": "k", "size": 123, "eTag": "abc", "sequencer": "00A"}
            }
        });
        let record: S3EventRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.aws_region, "us-east-1");
        assert_eq!(record.response_elements.x_amz_request_id, "req");
        assert_eq!(record.s3.object.size, 123);
        assert_eq!(record.s3.bucket.arn, "arn:aws:s3:::b");
        assert!(record.event_time.is_some());
    }

    #[test]
    fn test_record_rejects_wrong_types() {
        let raw = json!({"eventName": 42});
        assert!(serde_json::from_value::<S3EventRecord>(raw).is_err());

        let raw = json!({"eventTime": "yesterday"});
        assert!(serde_json::from_value::<S3EventRecord>(raw).is_err());
    }

    #[test]
    fn test_record_null_fields_decode_empty() {
        let raw = json!({
            "eventName": "ObjectRemoved:Delete",
            "eventTime": null,
            "userIdentity": null,
            "responseElements": {"x-amz-request-id": null},
            "s3": {
                "bucket": {"name": "b", "ownerIdentity": null},
                "object": {"key": "k", "size": null, "eTag": null, "versionId": null, "sequencer": null}
            }
        });
        let record = S3EventRecord::from_value(&raw).unwrap();
        assert_eq!(record.event_name, "ObjectRemoved:Delete");
        assert_eq!(record.user_identity.principal_id, "");
        assert_eq!(record.s3.bucket.name, "b");
        assert_eq!(record.s3.object.key, "k");
        assert_eq!(record.s3.object.size, 0);
        assert_eq!(record.s3.object.e_tag, "");
        assert!(record.s3.object.version_id.is_none());

        let record = S3EventRecord::from_value(&json!({"eventName": null, "s3": null})).unwrap();
        assert_eq!(record.event_name, "");
        assert_eq!(record.s3.bucket.name, "");
    }

    #[test]
    fn test_record_null_is_empty_record() {
        let record = S3EventRecord::from_value(&serde_json::Value::Null).unwrap();
        assert_eq!(record.event_name, "");
        assert_eq!(record.s3.object.key, "");
    }

    #[test]
    fn test_record_field_names_ignore_case() {
        let raw = json!({
            "EventName": "ObjectCreated:Put",
            "S3": {"Bucket": {"NAME": "b"}, "object": {"Key": "k", "ETAG": "abc"}},
            "requestParameters": {"sourceIpAddress": "10.0.0.1"}
        });
        let record = S3EventRecord::from_value(&raw).unwrap();
        assert_eq!(record.event_name, "ObjectCreated:Put");
        assert_eq!(record.s3.bucket.name, "b");
        assert_eq!(record.s3.object.key, "k");
        assert_eq!(record.s3.object.e_tag, "abc");
        assert_eq!(record.request_parameters.source_ip_address, "10.0.0.1");
    }

    #[test]
    fn test_record_exact_field_name_wins() {
        let raw = json!({"eventName": "ObjectCreated:Put", "EVENTNAME": "ObjectRemoved:Delete"});
        let record = S3EventRecord::from_value(&raw).unwrap();
        assert_eq!(record.event_name, "ObjectCreated:Put");
    }

    #[test]
    fn test_get_field() {
        let map = json!({"records": [1], "Other": 2});
        let map = map.as_object().unwrap();
        assert_eq!(get_field(map, "Records"), Some(&json!([1])));
        assert_eq!(get_field(map, "other"), Some(&json!(2)));
        assert_eq!(get_field(map, "missing"), None);
    }

    #[test]
    fn test_identity_helpers() {
        let n = ObjectNotification {
            bucket: "my-bucket".into(),
            key: "a/b.txt".into(),
            event_name: "ObjectAcl:Put".into(),
            raw: serde_json::Value::Null,
        };
        assert_eq!(n.aggregate_id(), "my-bucket:a/b.txt");
        assert_eq!(n.path(), "my-bucket/a/b.txt");
        assert!(!Notification::Object(n).is_unparsable());
        assert!(Notification::unparsable("x", "bad").is_unparsable());
    }
}
