//! CLI handlers for `fitplan user` subcommands.

use anyhow::Result;
use sqlx::PgPool;

use fitplan_db::queries::{lookups, users as user_db};

use crate::UserCommands;

/// Dispatch a `UserCommands` variant to the appropriate handler.
pub async fn run_user_command(command: UserCommands, pool: &PgPool) -> Result<()> {
    match command {
        UserCommands::Register {
            email,
            uid,
            display_name,
            avatar,
        } => {
            let user =
                user_db::upsert_user(pool, &email, &uid, display_name.as_deref(), avatar.as_deref())
                    .await?;
            println!("User registered.");
            println!();
            println!("  ID:           {}", user.id);
            println!("  Email:        {}", user.email);
            println!("  UID:          {}", user.identity_uid);
            println!(
                "  Display name: {}",
                user.display_name.as_deref().unwrap_or("-")
            );
            Ok(())
        }
        UserCommands::AddAvatar { name, image_link } => {
            let avatar = lookups::upsert_avatar(pool, &name, image_link.as_deref()).await?;
            println!("Avatar {} saved (id {}).", avatar.name, avatar.id);
            Ok(())
        }
    }
}
