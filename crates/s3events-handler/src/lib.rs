//! S3 Events Handler
//!
//! Turns raw object-notification messages into normalized domain events.
//!
//! ```text
//!  raw message ──► parser ──► Notification ──► classifier ──► builder ──► encoder ──► sink
//!                   │                                            ▲
//!                   └── unparsable ── (Unknown / noop) ──────────┘
//! ```
//!
//! Each notification is processed independently; a failure on one record
//! never prevents the rest of the batch from being emitted.

mod builder;
mod classifier;
mod handler;
mod parser;
mod sink;
mod sns;

pub use builder::{Clock, EnvelopeBuilder, SystemClock};
pub use classifier::{classify, Rule, RuleOutcome, RULES};
pub use handler::{BatchReport, EventHandler};
pub use parser::parse_message;
pub use sink::{
    EnvelopeEncoder, EventSink, JsonEncoder, MemorySink, TracingSink, WriterSink,
    EVENTS_LOG_TARGET,
};
pub use sns::{SnsEvent, SnsMessage, SnsRecord};

// Re-export types from core
pub use s3events_core::config::FailurePolicy;
pub use s3events_core::types::{
    Action, Classification, Command, NormalizedEvent, Notification, ObjectNotification, Status,
};
