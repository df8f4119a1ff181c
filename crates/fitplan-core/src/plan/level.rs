//! Fitness levels and the metrics prescribed at each level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// A user's self-reported fitness level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Sets, reps and cardio minutes prescribed for a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelMetrics {
    pub sets: u32,
    pub reps: u32,
    pub cardio_duration: u32,
}

impl FitnessLevel {
    pub fn metrics(self) -> LevelMetrics {
        match self {
            Self::Beginner => LevelMetrics {
                sets: 2,
                reps: 8,
                cardio_duration: 10,
            },
            Self::Intermediate => LevelMetrics {
                sets: 3,
                reps: 10,
                cardio_duration: 20,
            },
            Self::Advanced => LevelMetrics {
                sets: 4,
                reps: 12,
                cardio_duration: 30,
            },
        }
    }

    /// Resolve the level stored on a survey.
    ///
    /// Surrounding whitespace is ignored but the name must otherwise match
    /// exactly; the survey boundary is responsible for canonical casing.
    pub fn from_survey(raw: Option<&str>) -> Result<Self, PlanError> {
        let raw = raw.ok_or(PlanError::MissingFitnessLevel)?;
        raw.trim()
            .parse()
            .map_err(|_| PlanError::UnknownFitnessLevel(raw.to_owned()))
    }
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        };
        f.write_str(s)
    }
}

impl FromStr for FitnessLevel {
    type Err = FitnessLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(Self::Beginner),
            "Intermediate" => Ok(Self::Intermediate),
            "Advanced" => Ok(Self::Advanced),
            other => Err(FitnessLevelParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`FitnessLevel`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid fitness level: {0:?}")]
pub struct FitnessLevelParseError(pub String);
