//! CLI handler for `fitplan survey submit`.

use anyhow::Result;
use sqlx::PgPool;

use fitplan_core::survey::{SurveySubmission, submit_survey};

use crate::SurveyCommands;

/// Dispatch a `SurveyCommands` variant to the appropriate handler.
pub async fn run_survey_command(command: SurveyCommands, pool: &PgPool) -> Result<()> {
    match command {
        SurveyCommands::Submit {
            uid,
            goal,
            body_type,
            level,
            equipment,
            start_date,
            end_date,
        } => {
            let submission = SurveySubmission {
                goal,
                body_type,
                level,
                equipment: split_list(&equipment),
                start_date,
                end_date,
            };
            let submitted = submit_survey(pool, &uid, &submission).await?;

            println!("Survey submitted and plan generated.");
            println!();
            println!("  Plan ID:      {}", submitted.plan.id);
            println!("  Name:         {}", submitted.plan.name);
            println!("  Workout type: {}", submitted.generated.workout_type);
            println!("  Level:        {}", submitted.generated.fitness_level);
            println!(
                "  Dates:        {} .. {}",
                submitted.plan.start_date, submitted.plan.end_date
            );
            println!("  Days:         {}", submitted.summary.days_inserted);
            println!("  Exercises:    {}", submitted.summary.exercises_inserted);

            if !submitted.summary.skipped.is_empty() {
                println!();
                println!("Skipped (not in catalog):");
                for name in &submitted.summary.skipped {
                    println!("  - {name}");
                }
            }
            Ok(())
        }
    }
}

/// Split a comma-separated flag value, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(split_list(" rope , ,body weight"), vec!["rope", "body weight"]);
        assert!(split_list("").is_empty());
    }
}
