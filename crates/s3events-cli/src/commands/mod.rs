//! CLI command implementations

pub mod process;
pub mod stream;

use s3events_core::config::OutputTarget;
use s3events_core::HandlerConfig;
use s3events_handler::{BatchReport, EventHandler, EventSink, TracingSink, WriterSink};
use tracing::info;

/// Context passed to all commands
pub struct CommandContext {
    pub config: HandlerConfig,
}

impl CommandContext {
    /// Build a handler writing to the configured output
    pub fn handler(&self) -> EventHandler<Box<dyn EventSink>> {
        let sink: Box<dyn EventSink> = match self.config.output.target {
            OutputTarget::Stdout => Box::new(WriterSink::stdout()),
            OutputTarget::Log => Box::new(TracingSink),
        };
        EventHandler::new(sink).with_failure_policy(self.config.handler.failure_policy)
    }

    /// Log the totals for a run
    pub fn summary(&self, report: &BatchReport) {
        info!(
            "Processed {} message(s), {} notification(s): {} emitted, {} fallback(s), {} serialization failure(s), {} sink failure(s)",
            report.messages,
            report.notifications,
            report.emitted,
            report.fallbacks,
            report.serialization_failures,
            report.sink_failures
        );
    }
}
