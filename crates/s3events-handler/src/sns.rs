//! SNS delivery unwrapping
//!
//! Object notifications fanned out through an SNS topic arrive as
//! `{"Records": [{"Sns": {"Message": "<notification batch JSON>"}}]}`.
//! Each `Message` string is one raw message for the parser.

use s3events_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// SNS delivery event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnsEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<SnsRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnsRecord {
    #[serde(rename = "EventSource", default, skip_serializing_if = "String::is_empty")]
    pub event_source: String,
    #[serde(rename = "Sns")]
    pub sns: SnsMessage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsMessage {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub topic_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl SnsEvent {
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| Error::InvalidArgument(format!("Not an SNS delivery event: {}", e)))
    }

    /// Wrap raw messages the way SNS would deliver them
    pub fn wrap<I, M>(messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            records: messages
                .into_iter()
                .map(|m| SnsRecord {
                    event_source: "aws:sns".to_string(),
                    sns: SnsMessage {
                        message: m.into(),
                        ..Default::default()
                    },
                })
                .collect(),
        }
    }

    /// Raw messages in delivery order
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.sns.message.as_str())
    }
}
