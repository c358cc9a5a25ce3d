//! Repository layer: entity-scoped database operations.
//!
//! Write paths for the clinic tables. The dashboard reads through its own
//! aggregate queries in `crate::dashboard::store`.

mod allergy;
mod appointment;
mod audit;
mod incident;
mod medication;
mod nurse;
mod student;

#[cfg(test)]
pub mod fixtures;

pub use allergy::*;
pub use appointment::*;
pub use audit::*;
pub use incident::*;
pub use medication::*;
pub use nurse::*;
pub use student::*;
