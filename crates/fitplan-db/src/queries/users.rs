//! Database query functions for the `users` table.

use anyhow::{Context, Result, bail};
use sqlx::{PgExecutor, PgPool};

use crate::models::User;
use crate::queries::lookups;

/// Register a user, or refresh an existing registration.
///
/// Users are keyed by email. An existing row gets its identity uid,
/// display name and avatar overwritten. Fails if `avatar_name` names an
/// avatar that does not exist.
pub async fn upsert_user(
    pool: &PgPool,
    email: &str,
    identity_uid: &str,
    display_name: Option<&str>,
    avatar_name: Option<&str>,
) -> Result<User> {
    let avatar_id = match avatar_name {
        Some(name) => match lookups::find_avatar(pool, name).await? {
            Some(avatar) => Some(avatar.id),
            None => bail!("avatar {name:?} not found"),
        },
        None => None,
    };

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, identity_uid, display_name, avatar_id) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (email) DO UPDATE SET \
             identity_uid = EXCLUDED.identity_uid, \
             display_name = EXCLUDED.display_name, \
             avatar_id = EXCLUDED.avatar_id, \
             updated_at = now() \
         RETURNING *",
    )
    .bind(email)
    .bind(identity_uid)
    .bind(display_name)
    .bind(avatar_id)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to upsert user {email:?}"))?;

    Ok(user)
}

/// Fetch a user by identity-provider uid.
pub async fn get_user_by_uid(executor: impl PgExecutor<'_>, identity_uid: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE identity_uid = $1")
        .bind(identity_uid)
        .fetch_optional(executor)
        .await
        .context("failed to fetch user by uid")?;
    Ok(user)
}

/// Fetch a user by email.
pub async fn get_user_by_email(executor: impl PgExecutor<'_>, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(executor)
        .await
        .context("failed to fetch user by email")?;
    Ok(user)
}
