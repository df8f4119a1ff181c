//! CLI handlers for `fitplan plan` subcommands.
//!
//! Implements:
//! - `fitplan plan show --uid U`   -- print a user's stored plan
//! - `fitplan plan preview ...`    -- generate from the catalog, print JSON, store nothing
//! - `fitplan plan replace <id>`   -- swap one assigned exercise

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::PgPool;

use fitplan_core::details::{PlanDetails, get_user_details};
use fitplan_core::plan::{
    ExerciseCatalog, GeneratedPlan, PgExerciseCatalog, PlanInputs, SurveyAnswers, WorkoutType,
    build_plan,
};
use fitplan_core::replace::replace_plan_exercise;

use crate::PlanCommands;

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `PlanCommands` variant to the appropriate handler.
pub async fn run_plan_command(command: PlanCommands, pool: &PgPool) -> Result<()> {
    match command {
        PlanCommands::Show { uid } => cmd_show(pool, &uid).await,
        PlanCommands::Preview {
            goal,
            level,
            equipment,
            workout_type,
            seed,
        } => {
            let answers = SurveyAnswers {
                fitness_goal: Some(goal),
                body_type: None,
                fitness_level: Some(level),
                equipment,
            };
            let catalog = PgExerciseCatalog::new(pool.clone());
            let plan = preview_plan(&catalog, &answers, workout_type.as_deref(), seed).await?;
            let json = serde_json::to_string_pretty(&plan).context("failed to serialize plan")?;
            println!("{json}");
            Ok(())
        }
        PlanCommands::Replace { id } => cmd_replace(pool, id).await,
    }
}

// -----------------------------------------------------------------------
// fitplan plan show
// -----------------------------------------------------------------------

async fn cmd_show(pool: &PgPool, uid: &str) -> Result<()> {
    let details = get_user_details(pool, uid).await?;

    let Some(plan) = details.fitness_plan else {
        println!("No plan for {uid}. Use `fitplan survey submit` to generate one.");
        return Ok(());
    };

    print!("{}", render_plan(&plan));
    Ok(())
}

/// Text rendering of a stored plan: a header, then one block per day.
fn render_plan(plan: &PlanDetails) -> String {
    let mut out = String::new();
    out.push_str(&format!("Plan:   {}\n", plan.fitness_plan_name));
    if let Some(desc) = &plan.fitness_plan_desc {
        out.push_str(&format!("About:  {desc}\n"));
    }
    out.push_str(&format!("Dates:  {} .. {}\n", plan.start_date, plan.end_date));

    for day in &plan.days {
        out.push('\n');
        out.push_str(&format!("Day {} - {}\n", day.day_index, day.day_of_week));
        if day.exercises.is_empty() {
            out.push_str("  (rest)\n");
            continue;
        }
        for e in &day.exercises {
            let metrics = match (e.sets, e.reps) {
                (Some(sets), Some(reps)) => format!("{sets} x {reps}"),
                _ => format!("{} min", e.duration),
            };
            out.push_str(&format!("  [{:>6}] {:<40} {}\n", e.id, e.name, metrics));
        }
    }
    out
}

// -----------------------------------------------------------------------
// fitplan plan preview
// -----------------------------------------------------------------------

/// Generate a plan without storing it. `workout_type` overrides the type
/// the goal maps to; `seed` makes sampling repeatable.
pub async fn preview_plan<C>(
    catalog: &C,
    answers: &SurveyAnswers,
    workout_type: Option<&str>,
    seed: Option<u64>,
) -> Result<GeneratedPlan>
where
    C: ExerciseCatalog + ?Sized,
{
    let mut inputs = PlanInputs::from_survey(answers)?;
    if let Some(raw) = workout_type {
        inputs.workout_type = raw.parse::<WorkoutType>()?;
    }
    let pool = catalog.candidate_pool(&inputs.equipment).await?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    Ok(build_plan(&inputs, &pool, &mut rng))
}

// -----------------------------------------------------------------------
// fitplan plan replace <id>
// -----------------------------------------------------------------------

async fn cmd_replace(pool: &PgPool, id: i64) -> Result<()> {
    let replaced = replace_plan_exercise(pool, id).await?;
    println!(
        "Replaced assignment {} with {} (new assignment {}).",
        replaced.removed.id, replaced.exercise.name, replaced.assignment.id
    );
    Ok(())
}
