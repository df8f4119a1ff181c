//! Swapping one assigned exercise for another from the same pool.

use anyhow::Context;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use fitplan_db::models::{Exercise, PlanDayExercise};
use fitplan_db::queries::plans::{self as plan_db, AssignmentMetrics};
use fitplan_db::queries::{exercises as exercise_db, surveys as survey_db};

use crate::error::PlanError;
use crate::plan::EquipmentSet;

/// Result of a replacement.
#[derive(Debug, Clone, Serialize)]
pub struct Replacement {
    /// The assignment that was deleted.
    pub removed: PlanDayExercise,
    /// The new assignment on the same day.
    pub assignment: PlanDayExercise,
    pub exercise: Exercise,
}

/// Replace assignment `plan_day_exercise_id` with a random exercise.
pub async fn replace_plan_exercise(pool: &PgPool, plan_day_exercise_id: i64) -> Result<Replacement, PlanError> {
    let mut rng = StdRng::from_rng(&mut rand::rng());
    replace_plan_exercise_with_rng(pool, plan_day_exercise_id, &mut rng).await
}

/// Replace assignment `plan_day_exercise_id` with an exercise drawn by `rng`.
///
/// The replacement comes from the owner's candidate pool (their survey
/// equipment, or body weight), never equals the removed exercise and keeps
/// its sets, reps and duration. Delete and insert share a transaction, so
/// when no replacement exists the assignment stays.
pub async fn replace_plan_exercise_with_rng<R: Rng + ?Sized>(
    pool: &PgPool,
    plan_day_exercise_id: i64,
    rng: &mut R,
) -> Result<Replacement, PlanError> {
    let mut tx = pool.begin().await.context("failed to begin transaction")?;

    let removed = plan_db::get_plan_day_exercise(&mut *tx, plan_day_exercise_id)
        .await?
        .ok_or(PlanError::AssignmentNotFound(plan_day_exercise_id))?;
    let owner = plan_db::get_plan_day_owner(&mut *tx, removed.plan_day_id)
        .await?
        .ok_or(PlanError::AssignmentNotFound(plan_day_exercise_id))?;
    let survey = survey_db::get_survey_answers(&mut *tx, owner)
        .await?
        .ok_or(PlanError::SurveyNotFound(owner))?;

    let equipment = EquipmentSet::parse(&survey.equipment);
    let candidates: Vec<Exercise> =
        exercise_db::list_exercises_for_equipment(&mut *tx, &equipment.pool_equipment())
            .await?
            .into_iter()
            .filter(|e| e.id != removed.exercise_id)
            .collect();
    let exercise = candidates.choose(rng).cloned().ok_or(PlanError::NoReplacement)?;

    plan_db::delete_plan_day_exercise(&mut *tx, removed.id).await?;
    let assignment = plan_db::insert_plan_day_exercise(
        &mut *tx,
        removed.plan_day_id,
        exercise.id,
        AssignmentMetrics {
            sets: removed.sets,
            reps: removed.reps,
            duration: Some(removed.duration),
        },
    )
    .await?;

    tx.commit().await.context("failed to commit replacement")?;

    info!(
        removed = removed.id,
        old_exercise = removed.exercise_id,
        new_exercise = %exercise.name,
        "plan exercise replaced"
    );

    Ok(Replacement {
        removed,
        assignment,
        exercise,
    })
}
