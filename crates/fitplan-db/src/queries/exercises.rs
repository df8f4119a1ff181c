//! Database query functions for the `exercises` catalog.

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::{PgExecutor, PgPool};

use crate::models::Exercise;

/// Equipment name that stands for "no equipment".
pub const BODY_WEIGHT: &str = "body weight";

/// Fields for inserting or updating a catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExercise {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub body_part: String,
    #[serde(default)]
    pub target: String,
    pub equipment: String,
    #[serde(default)]
    pub difficulty_level: Option<i32>,
}

/// Insert a catalog entry, or update the existing entry with the same name.
///
/// `primary_equipment_id` is resolved from the `equipment` table by name and
/// left NULL when the equipment is unknown.
pub async fn upsert_exercise(pool: &PgPool, new: &NewExercise) -> Result<Exercise> {
    let exercise = sqlx::query_as::<_, Exercise>(
        "INSERT INTO exercises \
             (name, description, body_part, target, primary_equipment_id, equipment, difficulty_level) \
         VALUES ($1, $2, $3, $4, (SELECT id FROM equipment WHERE name = $5), $5, $6) \
         ON CONFLICT (name) DO UPDATE SET \
             description = EXCLUDED.description, \
             body_part = EXCLUDED.body_part, \
             target = EXCLUDED.target, \
             primary_equipment_id = EXCLUDED.primary_equipment_id, \
             equipment = EXCLUDED.equipment, \
             difficulty_level = EXCLUDED.difficulty_level \
         RETURNING *",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.body_part)
    .bind(&new.target)
    .bind(&new.equipment)
    .bind(new.difficulty_level)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to upsert exercise {:?}", new.name))?;

    Ok(exercise)
}

/// Fetch an exercise by id.
pub async fn get_exercise(executor: impl PgExecutor<'_>, id: i32) -> Result<Option<Exercise>> {
    let exercise = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch exercise")?;
    Ok(exercise)
}

/// Fetch an exercise by its unique name.
pub async fn get_exercise_by_name(executor: impl PgExecutor<'_>, name: &str) -> Result<Option<Exercise>> {
    let exercise = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE name = $1")
        .bind(name)
        .fetch_optional(executor)
        .await
        .context("failed to fetch exercise by name")?;
    Ok(exercise)
}

/// List the catalog ordered by name, optionally restricted to one
/// equipment name.
pub async fn list_exercises(pool: &PgPool, equipment: Option<&str>) -> Result<Vec<Exercise>> {
    let exercises = sqlx::query_as::<_, Exercise>(
        "SELECT * FROM exercises \
         WHERE $1::text IS NULL OR equipment = $1 \
         ORDER BY name",
    )
    .bind(equipment)
    .fetch_all(pool)
    .await
    .context("failed to list exercises")?;
    Ok(exercises)
}

/// Exercises whose equipment is one of `equipment`, ordered by id.
pub async fn list_exercises_for_equipment(
    executor: impl PgExecutor<'_>,
    equipment: &[String],
) -> Result<Vec<Exercise>> {
    let exercises = sqlx::query_as::<_, Exercise>(
        "SELECT * FROM exercises WHERE equipment = ANY($1) ORDER BY id",
    )
    .bind(equipment)
    .fetch_all(executor)
    .await
    .context("failed to list exercises for equipment")?;
    Ok(exercises)
}

/// Number of catalog entries.
pub async fn count_exercises(pool: &PgPool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
        .fetch_one(pool)
        .await
        .context("failed to count exercises")?;
    Ok(count)
}
