//! Shared lookup-table model for quest script tooling.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_tables};
