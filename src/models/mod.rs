pub mod enums;
pub mod medication;
pub mod patient;

pub use medication::*;
pub use patient::*;
