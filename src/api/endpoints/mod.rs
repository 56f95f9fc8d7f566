//! API endpoint handlers, one module per collection.

pub mod health;
pub mod medications;
pub mod patients;
