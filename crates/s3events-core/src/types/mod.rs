//! Core types for the S3 events handler

mod envelope;
mod notification;

pub use envelope::*;
pub use notification::*;
