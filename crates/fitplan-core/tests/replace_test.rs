//! Integration tests for replacing a single assigned exercise.

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sqlx::PgPool;

use fitplan_core::PlanError;
use fitplan_core::replace::{replace_plan_exercise, replace_plan_exercise_with_rng};
use fitplan_core::survey::{SurveySubmission, submit_survey};
use fitplan_db::models::PlanDayExerciseWithName;
use fitplan_db::queries::plans;
use fitplan_test_utils::{create_test_db, drop_test_db, seed_catalog, seed_user};

async fn seed(pool: &PgPool, names: &[(&str, &str)]) {
    let rows: Vec<(&str, &str, &str)> = names
        .iter()
        .map(|(name, body_part)| (*name, *body_part, "body weight"))
        .collect();
    seed_catalog(pool, &rows).await;
    seed_user(pool, "uid-rep").await;
}

async fn submit(pool: &PgPool, goal: &str) -> Vec<PlanDayExerciseWithName> {
    let submitted = submit_survey(
        pool,
        "uid-rep",
        &SurveySubmission {
            goal: goal.to_owned(),
            body_type: "not-sure".to_owned(),
            level: "Advanced".to_owned(),
            equipment: vec!["body weight".to_owned()],
            start_date: Some(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()),
            end_date: None,
        },
    )
    .await
    .unwrap();
    plans::list_plan_exercises(pool, submitted.plan.id).await.unwrap()
}

#[tokio::test]
async fn replacement_keeps_metrics_and_day() {
    let (pool, db_name) = create_test_db().await;
    seed(
        &pool,
        &[
            ("push up", "chest"),
            ("pike push up", "shoulders"),
            ("superman", "back"),
            ("squat", "upper legs"),
            ("lunge", "upper legs"),
        ],
    )
    .await;
    let rows = submit(&pool, "get-stronger").await;
    let target = rows.first().expect("plan should have exercises").clone();

    let replaced = replace_plan_exercise_with_rng(&pool, target.id, &mut StdRng::seed_from_u64(3))
        .await
        .unwrap();

    assert_eq!(replaced.removed.id, target.id);
    assert_ne!(replaced.exercise.id, target.exercise_id);
    assert_eq!(replaced.assignment.plan_day_id, target.plan_day_id);
    assert_eq!(replaced.assignment.exercise_id, replaced.exercise.id);
    assert_eq!(replaced.assignment.sets, Some(4));
    assert_eq!(replaced.assignment.reps, Some(12));
    assert_eq!(replaced.assignment.duration, 0);

    assert!(plans::get_plan_day_exercise(&pool, target.id).await.unwrap().is_none());
    assert!(
        plans::get_plan_day_exercise(&pool, replaced.assignment.id)
            .await
            .unwrap()
            .is_some()
    );

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn replacement_carries_duration_for_cardio() {
    let (pool, db_name) = create_test_db().await;
    seed(&pool, &[("jumping jack", "cardio"), ("run in place", "cardio")]).await;
    let rows = submit(&pool, "lose-weight").await;
    let target = rows.first().unwrap().clone();
    assert_eq!(target.duration, 30);

    let replaced = replace_plan_exercise(&pool, target.id).await.unwrap();
    assert_eq!(replaced.assignment.duration, 30);
    assert_eq!(replaced.assignment.sets, None);
    assert_ne!(replaced.exercise.name, target.exercise_name);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn no_candidate_leaves_assignment_in_place() {
    let (pool, db_name) = create_test_db().await;
    seed(&pool, &[("jumping jack", "cardio")]).await;
    let rows = submit(&pool, "lose-weight").await;
    let target = rows.first().unwrap().clone();

    let err = replace_plan_exercise(&pool, target.id).await.unwrap_err();
    assert!(matches!(err, PlanError::NoReplacement));
    assert!(plans::get_plan_day_exercise(&pool, target.id).await.unwrap().is_some());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn missing_assignment_is_not_found() {
    let (pool, db_name) = create_test_db().await;
    let err = replace_plan_exercise(&pool, 424242).await.unwrap_err();
    assert!(matches!(err, PlanError::AssignmentNotFound(424242)));
    pool.close().await;
    drop_test_db(&db_name).await;
}
