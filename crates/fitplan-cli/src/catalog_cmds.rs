//! CLI handlers for `fitplan catalog` subcommands.
//!
//! Implements:
//! - `fitplan catalog import <file>`         -- upsert exercises from a JSON array
//! - `fitplan catalog list [--equipment E]`  -- print the catalog
//! - `fitplan catalog equipment`             -- print the equipment vocabulary

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use fitplan_db::queries::exercises::{self as exercise_db, NewExercise};
use fitplan_db::queries::lookups;

use crate::CatalogCommands;

/// Dispatch a `CatalogCommands` variant to the appropriate handler.
pub async fn run_catalog_command(command: CatalogCommands, pool: &PgPool) -> Result<()> {
    match command {
        CatalogCommands::Import { file } => cmd_import(pool, &file).await,
        CatalogCommands::List { equipment } => cmd_list(pool, equipment.as_deref()).await,
        CatalogCommands::Equipment => cmd_equipment(pool).await,
    }
}

// -----------------------------------------------------------------------
// fitplan catalog import <file>
// -----------------------------------------------------------------------

async fn cmd_import(pool: &PgPool, file_path: &str) -> Result<()> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read catalog file: {file_path}"))?;
    let entries = parse_catalog(&content)
        .with_context(|| format!("failed to parse catalog file: {file_path}"))?;

    let imported = import_catalog(pool, &entries).await?;
    let total = exercise_db::count_exercises(pool).await?;

    println!("Imported {imported} exercises ({total} in catalog).");
    Ok(())
}

/// Parse a JSON array of catalog entries.
pub fn parse_catalog(content: &str) -> Result<Vec<NewExercise>> {
    let entries: Vec<NewExercise> = serde_json::from_str(content)?;
    for (i, entry) in entries.iter().enumerate() {
        if entry.name.trim().is_empty() {
            anyhow::bail!("entry {i} has an empty name");
        }
    }
    Ok(entries)
}

/// Upsert every entry. Returns the number written.
pub async fn import_catalog(pool: &PgPool, entries: &[NewExercise]) -> Result<usize> {
    for entry in entries {
        exercise_db::upsert_exercise(pool, entry).await?;
    }
    info!(count = entries.len(), "catalog imported");
    Ok(entries.len())
}

// -----------------------------------------------------------------------
// fitplan catalog list
// -----------------------------------------------------------------------

async fn cmd_list(pool: &PgPool, equipment: Option<&str>) -> Result<()> {
    let exercises = exercise_db::list_exercises(pool, equipment).await?;

    if exercises.is_empty() {
        println!("No exercises found. Use `fitplan catalog import <file>` to add some.");
        return Ok(());
    }

    let id_w = 6;
    let name_w = exercises.iter().map(|e| e.name.len()).max().unwrap_or(4).max(4);
    let part_w = exercises
        .iter()
        .map(|e| e.body_part.len())
        .max()
        .unwrap_or(9)
        .max(9);

    println!(
        "{:<id_w$}  {:<name_w$}  {:<part_w$}  EQUIPMENT",
        "ID", "NAME", "BODY PART",
    );
    println!("{}", "-".repeat(id_w + name_w + part_w + 6 + 9));
    for e in &exercises {
        println!(
            "{:<id_w$}  {:<name_w$}  {:<part_w$}  {}",
            e.id, e.name, e.body_part, e.equipment,
        );
    }
    println!();
    println!("{} exercises", exercises.len());

    Ok(())
}

// -----------------------------------------------------------------------
// fitplan catalog equipment
// -----------------------------------------------------------------------

async fn cmd_equipment(pool: &PgPool) -> Result<()> {
    for e in lookups::list_equipment(pool).await? {
        println!("{}", e.name);
    }
    Ok(())
}
