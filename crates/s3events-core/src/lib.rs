//! S3 Events Core Library
//!
//! Core types, configuration, and utilities for normalizing storage-object
//! lifecycle notifications into domain-event envelopes.

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::HandlerConfig;
pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Value of the `source` field on every emitted envelope
pub const EVENT_SOURCE: &str = "s3-events-handler";

/// Aggregate name every envelope is keyed under
pub const AGGREGATE_NAME: &str = "file";

/// `event_type` used for messages that could not be parsed
pub const UNKNOWN_EVENT_TYPE: &str = "Unknown";

/// Separator between bucket and key in an aggregate ID
pub const AGGREGATE_ID_SEPARATOR: char = ':';

/// Separator between bucket and key in an object path
pub const PATH_SEPARATOR: char = '/';
