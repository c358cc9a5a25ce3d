//! API endpoint handlers. Handlers validate input and delegate to the
//! dashboard service or the safety tables.

pub mod dashboard;
pub mod health;
pub mod medications;
