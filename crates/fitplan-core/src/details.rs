//! Read model: a user's profile, survey answers and current plan.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use fitplan_db::models::DayOfWeek;
use fitplan_db::queries::{lookups, plans as plan_db, surveys as survey_db, users as user_db};

use crate::error::PlanError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetails {
    pub display_name: Option<String>,
    pub avatar: Option<AvatarDetails>,
    pub survey: Option<SurveyDetails>,
    pub fitness_plan: Option<PlanDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarDetails {
    pub avatar_name: String,
    pub avatar_image_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyDetails {
    pub goal: Option<String>,
    /// Body type.
    #[serde(rename = "type")]
    pub body_type: Option<String>,
    pub level: Option<String>,
    pub equipment: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanDetails {
    pub fitness_plan_name: String,
    pub fitness_plan_desc: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<DayDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayDetails {
    pub day_index: i32,
    pub day_of_week: DayOfWeek,
    pub exercises: Vec<ExerciseDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseDetails {
    /// Plan day exercise id, the handle for replacement.
    pub id: i64,
    pub name: String,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub duration: i32,
}

/// Assemble the details view for the user with `identity_uid`.
///
/// Avatar, survey and plan are `None` when the user has not set them up
/// yet. Days come back in plan order, exercises in insertion order.
pub async fn get_user_details(pool: &PgPool, identity_uid: &str) -> Result<UserDetails, PlanError> {
    let user = user_db::get_user_by_uid(pool, identity_uid)
        .await?
        .ok_or_else(|| PlanError::UserNotFound(identity_uid.to_owned()))?;

    let avatar = match user.avatar_id {
        Some(id) => lookups::get_avatar(pool, id).await?.map(|a| AvatarDetails {
            avatar_name: a.name,
            avatar_image_link: a.image_link,
        }),
        None => None,
    };

    let survey = survey_db::get_survey_answers(pool, user.id)
        .await?
        .map(|row| SurveyDetails {
            goal: row.fitness_goal,
            body_type: row.body_type,
            level: row.fitness_level,
            equipment: split_equipment(&row.equipment),
        });

    let fitness_plan = match plan_db::get_plan_for_user(pool, user.id).await? {
        Some(plan) => {
            let days = plan_db::list_plan_days(pool, plan.id).await?;
            let mut by_day: HashMap<i64, Vec<ExerciseDetails>> = HashMap::new();
            for row in plan_db::list_plan_exercises(pool, plan.id).await? {
                by_day.entry(row.plan_day_id).or_default().push(ExerciseDetails {
                    id: row.id,
                    name: row.exercise_name,
                    sets: row.sets,
                    reps: row.reps,
                    duration: row.duration,
                });
            }

            Some(PlanDetails {
                fitness_plan_name: plan.name,
                fitness_plan_desc: plan.description,
                start_date: plan.start_date,
                end_date: plan.end_date,
                days: days
                    .into_iter()
                    .map(|d| DayDetails {
                        day_index: d.day_index,
                        day_of_week: d.day_of_week,
                        exercises: by_day.remove(&d.id).unwrap_or_default(),
                    })
                    .collect(),
            })
        }
        None => None,
    };

    Ok(UserDetails {
        display_name: user.display_name,
        avatar,
        survey,
        fitness_plan,
    })
}

fn split_equipment(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_equipment_drops_blanks() {
        assert_eq!(split_equipment("rope, ,body weight,"), vec!["rope", "body weight"]);
        assert!(split_equipment("").is_empty());
    }

    #[test]
    fn survey_details_serialize_body_type_as_type() {
        let survey = SurveyDetails {
            goal: Some("lose-weight".into()),
            body_type: Some("mesomorph".into()),
            level: Some("Beginner".into()),
            equipment: vec!["rope".into()],
        };
        let json = serde_json::to_value(&survey).unwrap();
        assert_eq!(json["type"], "mesomorph");
        assert!(json.get("body_type").is_none());
    }

    #[test]
    fn empty_user_serializes_nulls() {
        let details = UserDetails {
            display_name: None,
            avatar: None,
            survey: None,
            fitness_plan: None,
        };
        let json = serde_json::to_value(&details).unwrap();
        assert!(json["avatar"].is_null());
        assert!(json["fitness_plan"].is_null());
    }
}
