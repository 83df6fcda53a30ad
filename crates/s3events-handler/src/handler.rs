//! Batch handler
//!
//! Drives each raw message through parse, classify, build, encode, and
//! emit. Records are processed strictly in arrival order and each one is
//! independent: a record that cannot be encoded or delivered is skipped
//! with a warning and the rest of the batch continues.

use crate::builder::{Clock, EnvelopeBuilder, SystemClock};
use crate::classifier::classify;
use crate::parser::parse_message;
use crate::sink::{EnvelopeEncoder, EventSink, JsonEncoder};
use crate::sns::SnsEvent;
use s3events_core::config::FailurePolicy;
use s3events_core::types::{Classification, Notification};
use s3events_core::{Error, Result};
use tracing::{debug, warn};

/// Counters for one handled batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Raw messages received
    pub messages: usize,
    /// Notifications produced by the parser, fallbacks included
    pub notifications: usize,
    /// Envelopes accepted by the sink
    pub emitted: usize,
    /// Messages that did not parse
    pub fallbacks: usize,
    pub serialization_failures: usize,
    pub sink_failures: usize,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.fallbacks == 0 && self.serialization_failures == 0 && self.sink_failures == 0
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: BatchReport) {
        self.messages += other.messages;
        self.notifications += other.notifications;
        self.emitted += other.emitted;
        self.fallbacks += other.fallbacks;
        self.serialization_failures += other.serialization_failures;
        self.sink_failures += other.sink_failures;
    }

    /// Apply a failure policy to this report
    pub fn into_result(self, policy: FailurePolicy) -> Result<Self> {
        match policy {
            FailurePolicy::Surface if !self.is_clean() => Err(Error::BatchFailed {
                parse_failures: self.fallbacks,
                serialization_failures: self.serialization_failures,
                sink_failures: self.sink_failures,
            }),
            _ => Ok(self),
        }
    }
}

/// Normalizes raw notification messages and hands envelopes to a sink
pub struct EventHandler<S, E = JsonEncoder, C = SystemClock> {
    sink: S,
    encoder: E,
    builder: EnvelopeBuilder<C>,
    policy: FailurePolicy,
}

impl<S: EventSink> EventHandler<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            encoder: JsonEncoder,
            builder: EnvelopeBuilder::new(),
            policy: FailurePolicy::default(),
        }
    }
}

impl<S, E, C> EventHandler<S, E, C>
where
    S: EventSink,
    E: EnvelopeEncoder,
    C: Clock,
{
    pub fn with_encoder<E2: EnvelopeEncoder>(self, encoder: E2) -> EventHandler<S, E2, C> {
        EventHandler {
            sink: self.sink,
            encoder,
            builder: self.builder,
            policy: self.policy,
        }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> EventHandler<S, E, C2> {
        EventHandler {
            sink: self.sink,
            encoder: self.encoder,
            builder: EnvelopeBuilder::with_clock(clock),
            policy: self.policy,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Handle a batch of raw messages.
    ///
    /// Under [`FailurePolicy::BestEffort`] this always returns `Ok`. Under
    /// [`FailurePolicy::Surface`] the whole batch is still processed, then
    /// [`Error::BatchFailed`] is returned if any record degraded.
    pub fn handle_batch<I, M>(&mut self, messages: I) -> Result<BatchReport>
    where
        I: IntoIterator<Item = M>,
        M: AsRef<str>,
    {
        self.process_batch(messages).into_result(self.policy)
    }

    /// Process a batch and return its report without applying the
    /// failure policy
    pub fn process_batch<I, M>(&mut self, messages: I) -> BatchReport
    where
        I: IntoIterator<Item = M>,
        M: AsRef<str>,
    {
        let mut report = BatchReport::default();
        for message in messages {
            report.merge(self.process_message(message.as_ref()));
        }

        debug!(
            "Handled {} message(s): {} emitted, {} fallback(s), {} skipped",
            report.messages,
            report.emitted,
            report.fallbacks,
            report.serialization_failures + report.sink_failures
        );

        report
    }

    /// Handle a single raw message
    pub fn handle_message(&mut self, message: &str) -> Result<BatchReport> {
        self.handle_batch(std::iter::once(message))
    }

    /// Handle every message of an SNS delivery event
    pub fn handle_sns_event(&mut self, event: &SnsEvent) -> Result<BatchReport> {
        self.handle_batch(event.messages())
    }

    fn process_message(&mut self, message: &str) -> BatchReport {
        let mut report = BatchReport {
            messages: 1,
            ..Default::default()
        };

        for notification in parse_message(message) {
            report.notifications += 1;
            if notification.is_unparsable() {
                report.fallbacks += 1;
            }
            self.process_notification(&notification, &mut report);
        }

        report
    }

    fn process_notification(&mut self, notification: &Notification, report: &mut BatchReport) {
        let classification = match notification {
            Notification::Object(object) => classify(&object.event_name),
            Notification::Unparsable { .. } => Classification::unparsable(),
        };
        let event = self.builder.build(notification, classification);

        let payload = match self.encoder.encode(&event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    "Skipping {} event for '{}': {}",
                    event.event_type, event.aggregate_id, e
                );
                report.serialization_failures += 1;
                return;
            }
        };

        match self.sink.emit(&payload) {
            Ok(()) => report.emitted += 1,
            Err(e) => {
                warn!(
                    "Failed to emit {} event for '{}': {}",
                    event.event_type, event.aggregate_id, e
                );
                report.sink_failures += 1;
            }
        }
    }
}
