//! Domain layer types and invariants.

pub mod dates;
pub mod document;
pub mod error;
