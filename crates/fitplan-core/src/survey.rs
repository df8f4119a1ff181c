//! Survey submission: store a user's answers and (re)generate their plan.

use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use fitplan_db::models::{FitnessPlan, Survey};
use fitplan_db::queries::{
    exercises as exercise_db, lookups, plans as plan_db, surveys as survey_db, users as user_db,
};

use crate::error::PlanError;
use crate::plan::{
    EquipmentSet, GeneratedPlan, PLAN_LENGTH_DAYS, PersistSummary, PlanInputs, SurveyAnswers, build_plan,
    replace_plan_days,
};

/// Answers submitted by a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveySubmission {
    pub goal: String,
    pub body_type: String,
    pub level: String,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Everything written by [`submit_survey`].
#[derive(Debug, Clone)]
pub struct SubmittedPlan {
    pub survey: Survey,
    pub plan: FitnessPlan,
    pub generated: GeneratedPlan,
    pub summary: PersistSummary,
}

/// Store the survey for the user with `identity_uid` and replace their plan
/// with a freshly generated one.
///
/// Every read and write, the catalog read included, goes through one
/// transaction on one connection. An unknown fitness level, a generation
/// failure or a storage error leaves the previous survey and plan untouched.
pub async fn submit_survey(
    pool: &PgPool,
    identity_uid: &str,
    submission: &SurveySubmission,
) -> Result<SubmittedPlan, PlanError> {
    let start_date = submission
        .start_date
        .unwrap_or_else(|| Utc::now().date_naive());
    let end_date = match submission.end_date {
        Some(end) => end,
        None => start_date
            .checked_add_days(Days::new(PLAN_LENGTH_DAYS as u64))
            .context("plan end date out of range")?,
    };
    if end_date < start_date {
        return Err(PlanError::InvalidDateRange {
            start: start_date,
            end: end_date,
        });
    }

    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let user = user_db::get_user_by_uid(&mut *tx, identity_uid)
        .await?
        .ok_or_else(|| PlanError::UserNotFound(identity_uid.to_owned()))?;

    let body_type = lookups::find_body_type(&mut *tx, submission.body_type.trim()).await?;
    let goal = lookups::find_fitness_goal(&mut *tx, &submission.goal).await?;
    let level_raw = submission.level.trim();
    let level = if level_raw.is_empty() {
        None
    } else {
        Some(
            lookups::find_fitness_level(&mut *tx, level_raw)
                .await?
                .ok_or_else(|| PlanError::UnknownFitnessLevel(level_raw.to_owned()))?,
        )
    };

    let equipment: EquipmentSet = submission.equipment.iter().map(String::as_str).collect();
    let equipment_joined = equipment.joined();

    let survey = survey_db::upsert_survey(
        &mut *tx,
        user.id,
        &survey_db::SurveyRecord {
            body_type_id: body_type.as_ref().map(|e| e.id),
            fitness_goal_id: goal.as_ref().map(|e| e.id),
            fitness_level_id: level.as_ref().map(|e| e.id),
            equipment: &equipment_joined,
        },
    )
    .await?;

    let names: Vec<String> = equipment.iter().map(str::to_owned).collect();
    let known = lookups::find_equipment_by_names(&mut *tx, &names).await?;
    let ids: Vec<i32> = known.iter().map(|e| e.id).collect();
    survey_db::record_user_equipment(&mut *tx, user.id, &ids).await?;

    let answers = SurveyAnswers {
        fitness_goal: goal.as_ref().map(|e| e.name.clone()),
        body_type: body_type.as_ref().map(|e| e.name.clone()),
        fitness_level: level.as_ref().map(|e| e.name.clone()),
        equipment: equipment_joined.clone(),
    };
    let inputs = PlanInputs::from_survey(&answers)?;
    let candidates =
        exercise_db::list_exercises_for_equipment(&mut *tx, &inputs.equipment.pool_equipment())
            .await?;
    let generated = build_plan(&inputs, &candidates, &mut rand::rng());

    let goal_label = goal
        .as_ref()
        .map_or_else(|| submission.goal.trim(), |g| g.name.as_str());
    let name = format!("Fitness Plan for {goal_label}");
    let description = format!(
        "This plan is tailored to help you {goal_label} with {}",
        equipment_phrase(&equipment)
    );
    let plan = plan_db::upsert_fitness_plan(
        &mut *tx,
        user.id,
        &plan_db::PlanHeader {
            name: &name,
            description: Some(&description),
            start_date,
            end_date,
        },
    )
    .await?;

    let summary = replace_plan_days(&mut *tx, plan.id, &generated).await?;

    tx.commit().await.context("failed to commit survey")?;

    info!(
        uid = identity_uid,
        plan_id = %plan.id,
        workout_type = %generated.workout_type,
        exercises = summary.exercises_inserted,
        "survey submitted, plan generated"
    );

    Ok(SubmittedPlan {
        survey,
        plan,
        generated,
        summary,
    })
}

/// Look up the user id behind an identity uid.
pub async fn resolve_user_id(pool: &PgPool, identity_uid: &str) -> Result<Uuid, PlanError> {
    user_db::get_user_by_uid(pool, identity_uid)
        .await?
        .map(|u| u.id)
        .ok_or_else(|| PlanError::UserNotFound(identity_uid.to_owned()))
}

fn equipment_phrase(equipment: &EquipmentSet) -> String {
    if equipment.is_empty() {
        "body weight".to_owned()
    } else {
        equipment.iter().collect::<Vec<_>>().join(", ")
    }
}
