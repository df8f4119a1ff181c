//! Error type shared by the plan generator and the services built on it.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised while generating, storing or editing a plan.
///
/// Input problems the generator tolerates (unknown goal, empty equipment,
/// empty candidate set) are not errors and never show up here.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("unknown fitness level {0:?} (expected Beginner, Intermediate, or Advanced)")]
    UnknownFitnessLevel(String),

    #[error("survey has no fitness level")]
    MissingFitnessLevel,

    #[error("user with uid {0:?} does not exist")]
    UserNotFound(String),

    #[error("user {0} has not submitted a survey")]
    SurveyNotFound(Uuid),

    #[error("plan day exercise {0} not found")]
    AssignmentNotFound(i64),

    #[error("no suitable replacement exercise found")]
    NoReplacement,

    #[error("end date {end} is before start date {start}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Catalog or database failure. Generation aborts and nothing is stored.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl PlanError {
    /// Whether the error was caused by the caller's input rather than by
    /// storage.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}
