//! Core fitplan logic: 30-day plan generation from survey answers, survey
//! submission, plan read model and single-exercise replacement.

pub mod details;
pub mod error;
pub mod plan;
pub mod replace;
pub mod survey;

pub use error::PlanError;
