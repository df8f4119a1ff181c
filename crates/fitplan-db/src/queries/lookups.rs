//! Query functions for the survey lookup tables (`body_types`,
//! `fitness_goals`, `fitness_levels`, `equipment`, `avatars`).

use anyhow::{Context, Result};
use sqlx::{PgExecutor, PgPool};

use crate::models::{Avatar, Equipment};

/// A lookup row reduced to its id and canonical name.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LookupEntry {
    pub id: i32,
    pub name: String,
}

/// Find a body type by exact name.
pub async fn find_body_type(executor: impl PgExecutor<'_>, name: &str) -> Result<Option<LookupEntry>> {
    let row = sqlx::query_as::<_, LookupEntry>("SELECT id, name FROM body_types WHERE name = $1")
        .bind(name)
        .fetch_optional(executor)
        .await
        .context("failed to look up body type")?;
    Ok(row)
}

/// Find a fitness goal by name, ignoring case.
pub async fn find_fitness_goal(executor: impl PgExecutor<'_>, name: &str) -> Result<Option<LookupEntry>> {
    let row = sqlx::query_as::<_, LookupEntry>(
        "SELECT id, name FROM fitness_goals WHERE lower(name) = lower($1)",
    )
    .bind(name.trim())
    .fetch_optional(executor)
    .await
    .context("failed to look up fitness goal")?;
    Ok(row)
}

/// Find a fitness level by name, ignoring case. The returned name carries
/// the canonical capitalization (`Beginner`, not `beginner`).
pub async fn find_fitness_level(executor: impl PgExecutor<'_>, name: &str) -> Result<Option<LookupEntry>> {
    let row = sqlx::query_as::<_, LookupEntry>(
        "SELECT id, name FROM fitness_levels WHERE lower(name) = lower($1)",
    )
    .bind(name.trim())
    .fetch_optional(executor)
    .await
    .context("failed to look up fitness level")?;
    Ok(row)
}

/// Find equipment rows by exact name. Unknown names are silently absent
/// from the result.
pub async fn find_equipment_by_names(
    executor: impl PgExecutor<'_>,
    names: &[String],
) -> Result<Vec<Equipment>> {
    let rows = sqlx::query_as::<_, Equipment>(
        "SELECT id, name FROM equipment WHERE name = ANY($1) ORDER BY id",
    )
    .bind(names)
    .fetch_all(executor)
    .await
    .context("failed to look up equipment")?;
    Ok(rows)
}

/// List all equipment, ordered by name.
pub async fn list_equipment(pool: &PgPool) -> Result<Vec<Equipment>> {
    let rows = sqlx::query_as::<_, Equipment>("SELECT id, name FROM equipment ORDER BY name")
        .fetch_all(pool)
        .await
        .context("failed to list equipment")?;
    Ok(rows)
}

/// Find an avatar by exact name.
pub async fn find_avatar(executor: impl PgExecutor<'_>, name: &str) -> Result<Option<Avatar>> {
    let row = sqlx::query_as::<_, Avatar>("SELECT * FROM avatars WHERE name = $1")
        .bind(name)
        .fetch_optional(executor)
        .await
        .context("failed to look up avatar")?;
    Ok(row)
}

/// Fetch an avatar by id.
pub async fn get_avatar(executor: impl PgExecutor<'_>, id: i32) -> Result<Option<Avatar>> {
    let row = sqlx::query_as::<_, Avatar>("SELECT * FROM avatars WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch avatar")?;
    Ok(row)
}

/// Insert an avatar, or update its image link if the name already exists.
pub async fn upsert_avatar(pool: &PgPool, name: &str, image_link: Option<&str>) -> Result<Avatar> {
    let avatar = sqlx::query_as::<_, Avatar>(
        "INSERT INTO avatars (name, image_link) VALUES ($1, $2) \
         ON CONFLICT (name) DO UPDATE SET image_link = EXCLUDED.image_link \
         RETURNING *",
    )
    .bind(name)
    .bind(image_link)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to upsert avatar {name:?}"))?;
    Ok(avatar)
}
