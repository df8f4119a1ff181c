mod catalog_cmds;
mod config;
mod plan_cmds;
mod serve_cmd;
mod survey_cmd;
#[cfg(test)]
mod test_util;
mod user_cmds;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use fitplan_db::config::DbConfig;
use fitplan_db::pool;

use config::FitplanConfig;

#[derive(Parser)]
#[command(name = "fitplan", about = "Fitness survey backend and 30-day workout plan generator")]
struct Cli {
    /// Database URL (overrides FITPLAN_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a fitplan config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the database and apply migrations
    DbInit,
    /// Exercise catalog management
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// User accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Survey submission
    Survey {
        #[command(subcommand)]
        command: SurveyCommands,
    },
    /// Generated plans
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Serve the JSON API
    Serve {
        /// Address to bind (default from config file, else 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (default from config file, else 8000)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Import exercises from a JSON array file
    Import {
        /// Path to the JSON file
        file: String,
    },
    /// List catalog exercises
    List {
        /// Only exercises using this equipment
        #[arg(long)]
        equipment: Option<String>,
    },
    /// List the equipment vocabulary
    Equipment,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a user, or update the one with the same email
    Register {
        #[arg(long)]
        email: String,
        /// Identity-provider uid
        #[arg(long)]
        uid: String,
        #[arg(long)]
        display_name: Option<String>,
        /// Avatar name (must exist)
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Add or update a selectable avatar
    AddAvatar {
        name: String,
        #[arg(long)]
        image_link: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SurveyCommands {
    /// Submit survey answers and regenerate the user's plan
    Submit {
        /// Identity-provider uid
        #[arg(long)]
        uid: String,
        /// Fitness goal (e.g. lose-weight, get-stronger)
        #[arg(long)]
        goal: String,
        /// Body type (endomorph, mesomorph, ectomorph, not-sure)
        #[arg(long)]
        body_type: String,
        /// Fitness level (beginner, intermediate, advanced)
        #[arg(long)]
        level: String,
        /// Comma-separated equipment names
        #[arg(long, default_value = "")]
        equipment: String,
        /// First day of the plan (YYYY-MM-DD, default today)
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Last day of the plan (YYYY-MM-DD, default start + 30 days)
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show a user's current plan
    Show {
        /// Identity-provider uid
        #[arg(long)]
        uid: String,
    },
    /// Generate a plan from the catalog without storing it, print JSON
    Preview {
        #[arg(long, default_value = "lose-weight")]
        goal: String,
        /// Fitness level (Beginner, Intermediate, Advanced)
        #[arg(long)]
        level: String,
        /// Comma-separated equipment names
        #[arg(long, default_value = "")]
        equipment: String,
        /// Override the workout type derived from the goal
        #[arg(long)]
        workout_type: Option<String>,
        /// Seed for repeatable sampling
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Replace one assigned exercise with a random alternative
    Replace {
        /// Plan day exercise id (shown by `plan show`)
        id: i64,
    },
}

/// Execute the `fitplan init` command: write config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        server: config::ServerSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  server = {}:{}", cfg.server.bind, cfg.server.port);
    println!();
    println!("Next: run `fitplan db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `fitplan db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = FitplanConfig::resolve(cli_db_url)?;

    println!("Initializing fitplan database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    println!("Database ready.");
    for (table, count) in pool::seed_counts(&db_pool).await? {
        println!("  {table:<15} {count} rows");
    }

    db_pool.close().await;

    println!("fitplan db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Catalog { command } => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = catalog_cmds::run_catalog_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::User { command } => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = user_cmds::run_user_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Survey { command } => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = survey_cmd::run_survey_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Plan { command } => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = plan_cmds::run_plan_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
        Commands::Serve { bind, port } => {
            let resolved = FitplanConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let bind = bind.unwrap_or(resolved.server.bind);
            let port = port.unwrap_or(resolved.server.port);
            let result = serve_cmd::run_serve(db_pool.clone(), &bind, port).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
