//! Writing a generated plan into `plan_days` / `plan_day_exercises`.

use std::collections::HashMap;

use anyhow::{Context, Result};
use sqlx::PgConnection;
use tracing::{debug, warn};
use uuid::Uuid;

use fitplan_db::queries::exercises as exercise_db;
use fitplan_db::queries::plans as plan_db;

use super::generate::GeneratedPlan;

/// What [`replace_plan_days`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistSummary {
    pub days_deleted: u64,
    pub days_inserted: usize,
    pub exercises_inserted: usize,
    /// Assigned exercise names with no catalog row. These are skipped.
    pub skipped: Vec<String>,
}

/// Replace every day of `plan_id` with the days of `plan`.
///
/// Existing days and their assignments are deleted first. Run this inside
/// a transaction so a failure leaves the previous days in place.
pub async fn replace_plan_days(
    conn: &mut PgConnection,
    plan_id: Uuid,
    plan: &GeneratedPlan,
) -> Result<PersistSummary> {
    let mut summary = PersistSummary {
        days_deleted: plan_db::delete_plan_days(&mut *conn, plan_id).await?,
        ..PersistSummary::default()
    };

    let mut resolved: HashMap<&str, Option<i32>> = HashMap::new();

    for day in &plan.days {
        let day_index = i32::try_from(day.day_index).context("day index out of range")?;
        let row = plan_db::insert_plan_day(&mut *conn, plan_id, day_index, day.day_of_week).await?;
        summary.days_inserted += 1;

        for assigned in &day.exercises {
            let exercise_id = match resolved.get(assigned.exercise.as_str()) {
                Some(id) => *id,
                None => {
                    let id = exercise_db::get_exercise_by_name(&mut *conn, &assigned.exercise)
                        .await?
                        .map(|e| e.id);
                    resolved.insert(assigned.exercise.as_str(), id);
                    id
                }
            };

            let Some(exercise_id) = exercise_id else {
                warn!(
                    exercise = %assigned.exercise,
                    day = %day.key(),
                    "exercise not in catalog, skipping"
                );
                summary.skipped.push(assigned.exercise.clone());
                continue;
            };

            plan_db::insert_plan_day_exercise(
                &mut *conn,
                row.id,
                exercise_id,
                assigned.metrics.to_assignment()?,
            )
            .await?;
            summary.exercises_inserted += 1;
        }
    }

    debug!(
        %plan_id,
        days = summary.days_inserted,
        exercises = summary.exercises_inserted,
        skipped = summary.skipped.len(),
        "plan days replaced"
    );
    Ok(summary)
}
