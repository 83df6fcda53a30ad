//! Envelope builder

use chrono::{DateTime, Utc};
use s3events_core::types::{Classification, NormalizedEvent, Notification};
use s3events_core::utils::format_event_timestamp;
use s3events_core::{AGGREGATE_NAME, EVENT_SOURCE, UNKNOWN_EVENT_TYPE};

/// Source of the processing timestamp stamped onto each envelope
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Assembles [`NormalizedEvent`]s from notifications and their classification
#[derive(Debug, Clone, Default)]
pub struct EnvelopeBuilder<C = SystemClock> {
    clock: C,
}

impl EnvelopeBuilder<SystemClock> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> EnvelopeBuilder<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Build the envelope for one notification.
    ///
    /// The clock is read once per call. For unparsable messages the
    /// classification argument is ignored and the fixed `Unknown` / `noop`
    /// outcome is used instead.
    pub fn build(
        &self,
        notification: &Notification,
        classification: Classification,
    ) -> NormalizedEvent {
        let timestamp = format_event_timestamp(&self.clock.now());

        match notification {
            Notification::Object(object) => NormalizedEvent {
                source: EVENT_SOURCE.to_string(),
                aggregate: AGGREGATE_NAME.to_string(),
                aggregate_id: object.aggregate_id(),
                event_type: object.event_name.clone(),
                command: classification.into(),
                path: object.path(),
                timestamp,
                raw: object.raw.clone(),
            },
            Notification::Unparsable { raw, .. } => NormalizedEvent {
                source: EVENT_SOURCE.to_string(),
                aggregate: AGGREGATE_NAME.to_string(),
                aggregate_id: String::new(),
                event_type: UNKNOWN_EVENT_TYPE.to_string(),
                command: Classification::unparsable().into(),
                path: String::new(),
                timestamp,
                raw: serde_json::Value::String(raw.clone()),
            },
        }
    }
}
