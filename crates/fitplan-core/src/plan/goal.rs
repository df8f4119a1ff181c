//! Fitness goals and the workout type each one trains with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A goal a user can pick in the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitnessGoal {
    LoseWeight,
    GetStronger,
    BetterEndurance,
    BuildMuscle,
    BetterFlexibility,
    NotSure,
}

impl FitnessGoal {
    pub const ALL: [FitnessGoal; 6] = [
        Self::LoseWeight,
        Self::GetStronger,
        Self::BetterEndurance,
        Self::BuildMuscle,
        Self::BetterFlexibility,
        Self::NotSure,
    ];

    /// Resolve a stored goal name the way the generator does: trimmed,
    /// case-insensitive, and `lose-weight` for anything missing or
    /// unrecognized.
    pub fn from_survey(raw: Option<&str>) -> Self {
        raw.map(|s| s.trim().to_lowercase())
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::LoseWeight)
    }

    /// The workout type days of this goal are built from.
    pub fn workout_type(self) -> WorkoutType {
        match self {
            Self::LoseWeight => WorkoutType::Cardio,
            Self::GetStronger => WorkoutType::Strength,
            Self::BetterEndurance => WorkoutType::Endurance,
            Self::BuildMuscle => WorkoutType::Muscle,
            Self::BetterFlexibility => WorkoutType::Flexibility,
            Self::NotSure => WorkoutType::Cardio,
        }
    }
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LoseWeight => "lose-weight",
            Self::GetStronger => "get-stronger",
            Self::BetterEndurance => "better-endurance",
            Self::BuildMuscle => "build-muscle",
            Self::BetterFlexibility => "better-flexibility",
            Self::NotSure => "not-sure",
        };
        f.write_str(s)
    }
}

impl FromStr for FitnessGoal {
    type Err = FitnessGoalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lose-weight" => Ok(Self::LoseWeight),
            "get-stronger" => Ok(Self::GetStronger),
            "better-endurance" => Ok(Self::BetterEndurance),
            "build-muscle" => Ok(Self::BuildMuscle),
            "better-flexibility" => Ok(Self::BetterFlexibility),
            "not-sure" => Ok(Self::NotSure),
            other => Err(FitnessGoalParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`FitnessGoal`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid fitness goal: {0:?}")]
pub struct FitnessGoalParseError(pub String);

/// How a workout day picks its exercises and which metrics it prescribes.
///
/// `General` is not produced by any goal; it samples from the whole
/// candidate pool without a type-specific filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Cardio,
    Strength,
    Endurance,
    Muscle,
    Flexibility,
    General,
}

impl WorkoutType {
    /// Cardio days prescribe a duration; every other type prescribes sets
    /// and reps.
    pub fn is_timed(self) -> bool {
        matches!(self, Self::Cardio)
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Cardio => "cardio",
            Self::Strength => "strength",
            Self::Endurance => "endurance",
            Self::Muscle => "muscle",
            Self::Flexibility => "flexibility",
            Self::General => "general",
        };
        f.write_str(s)
    }
}

impl FromStr for WorkoutType {
    type Err = WorkoutTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cardio" => Ok(Self::Cardio),
            "strength" => Ok(Self::Strength),
            "endurance" => Ok(Self::Endurance),
            "muscle" => Ok(Self::Muscle),
            "flexibility" => Ok(Self::Flexibility),
            "general" => Ok(Self::General),
            other => Err(WorkoutTypeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`WorkoutType`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid workout type: {0:?}")]
pub struct WorkoutTypeParseError(pub String);
