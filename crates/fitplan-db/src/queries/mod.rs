//! Query functions, one module per table family.

pub mod exercises;
pub mod lookups;
pub mod plans;
pub mod surveys;
pub mod users;
