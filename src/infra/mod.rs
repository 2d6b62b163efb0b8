//! Infrastructure adapters for the filesystem and logging.

pub mod content;
pub mod error;
pub mod output;
pub mod telemetry;
