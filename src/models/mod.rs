//! Domain entities stored in the clinic database.

pub mod allergy;
pub mod appointment;
pub mod enums;
pub mod incident;
pub mod medication;
pub mod nurse;
pub mod student;

pub use allergy::*;
pub use appointment::*;
pub use incident::*;
pub use medication::*;
pub use nurse::*;
pub use student::*;
