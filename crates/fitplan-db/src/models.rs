use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Day of the week a plan day falls on.
///
/// Stored as the capitalized English name (`"Monday"`), which is also the
/// suffix of a generated plan's day key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "PascalCase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// All seven days, starting on Monday.
    pub const ALL: [DayOfWeek; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    /// Weekday for a 0-based position in a Monday-first cycle.
    pub fn from_cycle_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Saturday and Sunday.
    pub fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        };
        f.write_str(s)
    }
}

impl FromStr for DayOfWeek {
    type Err = DayOfWeekParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monday" => Ok(Self::Monday),
            "Tuesday" => Ok(Self::Tuesday),
            "Wednesday" => Ok(Self::Wednesday),
            "Thursday" => Ok(Self::Thursday),
            "Friday" => Ok(Self::Friday),
            "Saturday" => Ok(Self::Saturday),
            "Sunday" => Ok(Self::Sunday),
            other => Err(DayOfWeekParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`DayOfWeek`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid day of week: {0:?}")]
pub struct DayOfWeekParseError(pub String);

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A selectable profile avatar.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Avatar {
    pub id: i32,
    pub name: String,
    pub image_link: Option<String>,
}

/// A registered user. `identity_uid` is the uid issued by the external
/// identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: String,
    pub identity_uid: String,
    pub avatar_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's survey answers, stored with foreign keys into the lookup tables.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Survey {
    pub id: i32,
    pub user_id: Uuid,
    pub body_type_id: Option<i32>,
    pub fitness_goal_id: Option<i32>,
    pub fitness_level_id: Option<i32>,
    /// Comma-joined equipment names.
    pub equipment: String,
    pub created_at: DateTime<Utc>,
}

/// A survey with its lookup ids resolved to names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SurveyAnswersRow {
    pub survey_id: i32,
    pub user_id: Uuid,
    pub body_type: Option<String>,
    pub fitness_goal: Option<String>,
    pub fitness_level: Option<String>,
    pub equipment: String,
}

/// A piece of equipment a user can select in the survey.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
}

/// An exercise catalog entry.
///
/// `equipment` duplicates the name behind `primary_equipment_id`; plan
/// generation filters on the text column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub body_part: String,
    pub target: String,
    pub primary_equipment_id: Option<i32>,
    pub equipment: String,
    pub difficulty_level: Option<i32>,
}

/// A user's generated fitness plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FitnessPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One day of a fitness plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanDay {
    pub id: i64,
    pub plan_id: Uuid,
    /// 1-based position in the plan.
    pub day_index: i32,
    pub day_of_week: DayOfWeek,
}

/// An exercise assigned to a plan day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanDayExercise {
    pub id: i64,
    pub plan_day_id: i64,
    pub exercise_id: i32,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub duration: i32,
    pub rest_time_sec: Option<i32>,
}

/// A plan day exercise joined with the exercise name, for read models.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanDayExerciseWithName {
    pub id: i64,
    pub plan_day_id: i64,
    pub exercise_id: i32,
    pub exercise_name: String,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub duration: i32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
