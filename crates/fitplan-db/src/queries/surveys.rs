//! Database query functions for the `surveys` and `user_equipment` tables.

use anyhow::{Context, Result};
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::models::{Survey, SurveyAnswersRow};

/// Lookup ids and equipment for a survey write.
#[derive(Debug, Clone, Default)]
pub struct SurveyRecord<'a> {
    pub body_type_id: Option<i32>,
    pub fitness_goal_id: Option<i32>,
    pub fitness_level_id: Option<i32>,
    /// Comma-joined equipment names.
    pub equipment: &'a str,
}

/// Create the user's survey, or overwrite the one they already have.
pub async fn upsert_survey(
    executor: impl PgExecutor<'_>,
    user_id: Uuid,
    record: &SurveyRecord<'_>,
) -> Result<Survey> {
    let survey = sqlx::query_as::<_, Survey>(
        "INSERT INTO surveys (user_id, body_type_id, fitness_goal_id, fitness_level_id, equipment) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (user_id) DO UPDATE SET \
             body_type_id = EXCLUDED.body_type_id, \
             fitness_goal_id = EXCLUDED.fitness_goal_id, \
             fitness_level_id = EXCLUDED.fitness_level_id, \
             equipment = EXCLUDED.equipment, \
             created_at = now() \
         RETURNING *",
    )
    .bind(user_id)
    .bind(record.body_type_id)
    .bind(record.fitness_goal_id)
    .bind(record.fitness_level_id)
    .bind(record.equipment)
    .fetch_one(executor)
    .await
    .context("failed to upsert survey")?;

    Ok(survey)
}

/// Fetch a user's survey with lookup names resolved.
pub async fn get_survey_answers(
    executor: impl PgExecutor<'_>,
    user_id: Uuid,
) -> Result<Option<SurveyAnswersRow>> {
    let row = sqlx::query_as::<_, SurveyAnswersRow>(
        "SELECT s.id AS survey_id, s.user_id, \
                bt.name AS body_type, fg.name AS fitness_goal, fl.name AS fitness_level, \
                s.equipment \
         FROM surveys s \
         LEFT JOIN body_types bt ON bt.id = s.body_type_id \
         LEFT JOIN fitness_goals fg ON fg.id = s.fitness_goal_id \
         LEFT JOIN fitness_levels fl ON fl.id = s.fitness_level_id \
         WHERE s.user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .context("failed to fetch survey")?;

    Ok(row)
}

/// Mark each equipment id as available to the user. Already-recorded pairs
/// are left alone. Returns the number of newly recorded rows.
pub async fn record_user_equipment(
    conn: &mut PgConnection,
    user_id: Uuid,
    equipment_ids: &[i32],
) -> Result<u64> {
    let mut inserted = 0;
    for equipment_id in equipment_ids {
        let result = sqlx::query(
            "INSERT INTO user_equipment (user_id, equipment_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(equipment_id)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("failed to record equipment {equipment_id} for user {user_id}"))?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

/// Names of the equipment recorded for a user, ordered by name.
pub async fn list_user_equipment(executor: impl PgExecutor<'_>, user_id: Uuid) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT e.name FROM user_equipment ue \
         JOIN equipment e ON e.id = ue.equipment_id \
         WHERE ue.user_id = $1 \
         ORDER BY e.name",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
    .context("failed to list user equipment")?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}
