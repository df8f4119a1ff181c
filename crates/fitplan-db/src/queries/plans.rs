//! Database query functions for `fitness_plans`, `plan_days` and
//! `plan_day_exercises`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{DayOfWeek, FitnessPlan, PlanDay, PlanDayExercise, PlanDayExerciseWithName};

/// Header fields of a user's plan.
#[derive(Debug, Clone)]
pub struct PlanHeader<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Metrics for an exercise assigned to a plan day. Absent sets/reps are
/// stored as NULL, an absent duration as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentMetrics {
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub duration: Option<i32>,
}

/// Create the user's plan, or overwrite the header of the one they have.
/// Existing plan days are untouched; see [`delete_plan_days`].
pub async fn upsert_fitness_plan(
    executor: impl PgExecutor<'_>,
    user_id: Uuid,
    header: &PlanHeader<'_>,
) -> Result<FitnessPlan> {
    let plan = sqlx::query_as::<_, FitnessPlan>(
        "INSERT INTO fitness_plans (user_id, name, description, start_date, end_date) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (user_id) DO UPDATE SET \
             name = EXCLUDED.name, \
             description = EXCLUDED.description, \
             start_date = EXCLUDED.start_date, \
             end_date = EXCLUDED.end_date, \
             updated_at = now() \
         RETURNING *",
    )
    .bind(user_id)
    .bind(header.name)
    .bind(header.description)
    .bind(header.start_date)
    .bind(header.end_date)
    .fetch_one(executor)
    .await
    .context("failed to upsert fitness plan")?;

    Ok(plan)
}

/// Fetch the plan belonging to a user.
pub async fn get_plan_for_user(executor: impl PgExecutor<'_>, user_id: Uuid) -> Result<Option<FitnessPlan>> {
    let plan = sqlx::query_as::<_, FitnessPlan>("SELECT * FROM fitness_plans WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch fitness plan")?;
    Ok(plan)
}

/// Delete every day of a plan. Assigned exercises go with them (cascade).
/// Returns the number of days deleted.
pub async fn delete_plan_days(executor: impl PgExecutor<'_>, plan_id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM plan_days WHERE plan_id = $1")
        .bind(plan_id)
        .execute(executor)
        .await
        .context("failed to delete plan days")?;
    Ok(result.rows_affected())
}

/// Insert one plan day.
pub async fn insert_plan_day(
    executor: impl PgExecutor<'_>,
    plan_id: Uuid,
    day_index: i32,
    day_of_week: DayOfWeek,
) -> Result<PlanDay> {
    let day = sqlx::query_as::<_, PlanDay>(
        "INSERT INTO plan_days (plan_id, day_index, day_of_week) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(plan_id)
    .bind(day_index)
    .bind(day_of_week)
    .fetch_one(executor)
    .await
    .with_context(|| format!("failed to insert plan day {day_index}"))?;
    Ok(day)
}

/// Assign an exercise to a plan day.
pub async fn insert_plan_day_exercise(
    executor: impl PgExecutor<'_>,
    plan_day_id: i64,
    exercise_id: i32,
    metrics: AssignmentMetrics,
) -> Result<PlanDayExercise> {
    let row = sqlx::query_as::<_, PlanDayExercise>(
        "INSERT INTO plan_day_exercises (plan_day_id, exercise_id, sets, reps, duration) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING *",
    )
    .bind(plan_day_id)
    .bind(exercise_id)
    .bind(metrics.sets)
    .bind(metrics.reps)
    .bind(metrics.duration.unwrap_or(0))
    .fetch_one(executor)
    .await
    .context("failed to insert plan day exercise")?;
    Ok(row)
}

/// Days of a plan, ordered by day index.
pub async fn list_plan_days(executor: impl PgExecutor<'_>, plan_id: Uuid) -> Result<Vec<PlanDay>> {
    let days = sqlx::query_as::<_, PlanDay>(
        "SELECT * FROM plan_days WHERE plan_id = $1 ORDER BY day_index",
    )
    .bind(plan_id)
    .fetch_all(executor)
    .await
    .context("failed to list plan days")?;
    Ok(days)
}

/// Every assigned exercise of a plan, with exercise names, ordered by day
/// and then insertion order.
pub async fn list_plan_exercises(pool: &PgPool, plan_id: Uuid) -> Result<Vec<PlanDayExerciseWithName>> {
    let rows = sqlx::query_as::<_, PlanDayExerciseWithName>(
        "SELECT pde.id, pde.plan_day_id, pde.exercise_id, e.name AS exercise_name, \
                pde.sets, pde.reps, pde.duration \
         FROM plan_day_exercises pde \
         JOIN plan_days pd ON pd.id = pde.plan_day_id \
         JOIN exercises e ON e.id = pde.exercise_id \
         WHERE pd.plan_id = $1 \
         ORDER BY pd.day_index, pde.id",
    )
    .bind(plan_id)
    .fetch_all(pool)
    .await
    .context("failed to list plan exercises")?;
    Ok(rows)
}

/// Fetch one assigned exercise.
pub async fn get_plan_day_exercise(executor: impl PgExecutor<'_>, id: i64) -> Result<Option<PlanDayExercise>> {
    let row = sqlx::query_as::<_, PlanDayExercise>("SELECT * FROM plan_day_exercises WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch plan day exercise")?;
    Ok(row)
}

/// Delete one assigned exercise. Returns whether a row was deleted.
pub async fn delete_plan_day_exercise(executor: impl PgExecutor<'_>, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM plan_day_exercises WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await
        .context("failed to delete plan day exercise")?;
    Ok(result.rows_affected() > 0)
}

/// Owner (user id) of the plan a plan day belongs to.
pub async fn get_plan_day_owner(executor: impl PgExecutor<'_>, plan_day_id: i64) -> Result<Option<Uuid>> {
    let owner: Option<(Uuid,)> = sqlx::query_as(
        "SELECT fp.user_id FROM plan_days pd \
         JOIN fitness_plans fp ON fp.id = pd.plan_id \
         WHERE pd.id = $1",
    )
    .bind(plan_day_id)
    .fetch_optional(executor)
    .await
    .context("failed to fetch plan day owner")?;
    Ok(owner.map(|(id,)| id))
}
