//! Shared data model for Casebook case content.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_case};
