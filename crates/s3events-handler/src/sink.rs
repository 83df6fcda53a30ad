//! Envelope encoding and emission targets

use s3events_core::types::NormalizedEvent;
use s3events_core::{Error, Result};
use std::io::Write;
use tracing::info;

/// Log target used by [`TracingSink`]
pub const EVENTS_LOG_TARGET: &str = "s3_events";

/// Turns an envelope into the payload handed to a sink
pub trait EnvelopeEncoder {
    fn encode(&self, event: &NormalizedEvent) -> Result<String>;
}

/// Compact single-line JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl EnvelopeEncoder for JsonEncoder {
    fn encode(&self, event: &NormalizedEvent) -> Result<String> {
        Ok(serde_json::to_string(event)?)
    }
}

/// Receives serialized envelopes in emission order
pub trait EventSink {
    fn emit(&mut self, payload: &str) -> Result<()>;
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, payload: &str) -> Result<()> {
        (**self).emit(payload)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, payload: &str) -> Result<()> {
        (**self).emit(payload)
    }
}

/// Emits each payload as an `info` event on the `s3_events` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, payload: &str) -> Result<()> {
        info!(target: EVENTS_LOG_TARGET, "{}", payload);
        Ok(())
    }
}

/// Writes one payload per line to any [`Write`]
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> EventSink for WriterSink<W> {
    fn emit(&mut self, payload: &str) -> Result<()> {
        writeln!(self.writer, "{}", payload)
            .and_then(|_| self.writer.flush())
            .map_err(|e| Error::Sink(e.to_string()))
    }
}

/// Keeps every payload in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    payloads: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payloads(&self) -> &[String] {
        &self.payloads
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Decode the collected payloads back into envelopes
    pub fn events(&self) -> Result<Vec<NormalizedEvent>> {
        self.payloads
            .iter()
            .map(|p| serde_json::from_str(p).map_err(Error::from))
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, payload: &str) -> Result<()> {
        self.payloads.push(payload.to_string());
        Ok(())
    }
}
