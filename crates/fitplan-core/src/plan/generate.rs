//! 30-day plan generation.
//!
//! Days cycle Monday through Sunday starting with day 1 on a Monday.
//! Saturdays and Sundays are rest days. Every other day gets up to five
//! exercises sampled from the user's candidate pool after a filter chosen
//! by the workout type of the user's goal:
//!
//! | workout type        | day filter                                              |
//! |---------------------|---------------------------------------------------------|
//! | cardio              | cardio equipment or cardio-sounding name                |
//! | strength / muscle   | upper body on even day indexes, lower body on odd ones  |
//! | flexibility         | flexibility equipment the user owns, else body weight   |
//! | endurance           | body part `cardio`, `upper body` or `lower body`        |
//! | general             | none                                                    |
//!
//! Sampling is random, so two runs over the same inputs differ. Pass a
//! seeded rng to [`generate_plan_with_rng`] for repeatable output.

use anyhow::Context;
use rand::Rng;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use fitplan_db::models::{DayOfWeek, Exercise};
use fitplan_db::queries::plans::AssignmentMetrics;

use super::catalog::{CandidatePool, ExerciseCatalog};
use super::equipment::{BODY_WEIGHT, CARDIO_EQUIPMENT, EquipmentSet, FLEXIBILITY_EQUIPMENT};
use super::goal::{FitnessGoal, WorkoutType};
use super::level::{FitnessLevel, LevelMetrics};
use crate::error::PlanError;

/// Number of days in a generated plan.
pub const PLAN_LENGTH_DAYS: usize = 30;

/// Most exercises assigned to a single day.
pub const EXERCISES_PER_DAY: usize = 5;

/// Name fragments that mark an exercise as cardio.
const CARDIO_KEYWORDS: &[&str] = &["run", "jump", "cardio", "aerobic", "bike", "cycle", "row"];

/// Name fragments accepted by the body-weight cardio fallback.
const BODY_WEIGHT_CARDIO_KEYWORDS: &[&str] = &["run", "jump", "cardio", "aerobic"];

const UPPER_BODY_PARTS: &[&str] = &["back", "upper arms", "shoulders", "chest", "lower arms"];

const LOWER_BODY_PARTS: &[&str] = &["waist", "upper legs", "lower legs"];

// The catalog's body-part vocabulary has no "upper body"/"lower body"
// entries, so endurance days usually come out empty. Kept as-is.
const ENDURANCE_BODY_PARTS: &[&str] = &["cardio", "upper body", "lower body"];

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Survey answers as stored: names, not ids.
#[derive(Debug, Clone, Default)]
pub struct SurveyAnswers {
    pub fitness_goal: Option<String>,
    pub body_type: Option<String>,
    pub fitness_level: Option<String>,
    /// Comma-joined equipment names.
    pub equipment: String,
}

/// Survey answers resolved into the values the generator works with.
#[derive(Debug, Clone)]
pub struct PlanInputs {
    pub goal: FitnessGoal,
    pub workout_type: WorkoutType,
    pub level: FitnessLevel,
    pub equipment: EquipmentSet,
}

impl PlanInputs {
    /// Resolve survey answers. The goal falls back to `lose-weight` and the
    /// equipment to an empty set; only the fitness level can fail.
    pub fn from_survey(survey: &SurveyAnswers) -> Result<Self, PlanError> {
        let goal = FitnessGoal::from_survey(survey.fitness_goal.as_deref());
        let level = FitnessLevel::from_survey(survey.fitness_level.as_deref())?;
        Ok(Self {
            goal,
            workout_type: goal.workout_type(),
            level,
            equipment: EquipmentSet::parse(&survey.equipment),
        })
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Metrics attached to an assigned exercise. Cardio days carry a duration
/// in minutes, every other workout type carries sets and reps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExerciseMetrics {
    Timed { duration: u32 },
    Counted { sets: u32, reps: u32 },
}

impl ExerciseMetrics {
    /// Column values for this assignment: duration for timed work, sets
    /// and reps otherwise.
    pub fn to_assignment(self) -> anyhow::Result<AssignmentMetrics> {
        let metrics = match self {
            Self::Timed { duration } => AssignmentMetrics {
                duration: Some(i32::try_from(duration).context("duration out of range")?),
                ..AssignmentMetrics::default()
            },
            Self::Counted { sets, reps } => AssignmentMetrics {
                sets: Some(i32::try_from(sets).context("sets out of range")?),
                reps: Some(i32::try_from(reps).context("reps out of range")?),
                duration: None,
            },
        };
        Ok(metrics)
    }

    fn for_type(workout_type: WorkoutType, metrics: LevelMetrics) -> Self {
        if workout_type.is_timed() {
            Self::Timed {
                duration: metrics.cardio_duration,
            }
        } else {
            Self::Counted {
                sets: metrics.sets,
                reps: metrics.reps,
            }
        }
    }
}

/// An exercise placed on a plan day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedExercise {
    /// Exercise name, the catalog's unique key.
    pub exercise: String,
    #[serde(skip)]
    pub body_part: String,
    #[serde(flatten)]
    pub metrics: ExerciseMetrics,
}

/// One day of a generated plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDayOutline {
    /// 1-based position in the plan.
    pub day_index: usize,
    pub day_of_week: DayOfWeek,
    pub exercises: Vec<AssignedExercise>,
}

impl PlanDayOutline {
    /// `Day {n} - {Weekday}`.
    pub fn key(&self) -> String {
        format!("Day {} - {}", self.day_index, self.day_of_week)
    }

    pub fn is_rest_day(&self) -> bool {
        self.day_of_week.is_weekend()
    }
}

/// A generated plan: exactly [`PLAN_LENGTH_DAYS`] days in order.
///
/// Serializes as `{"workout_type": .., "fitness_level": .., "days": {"Day 1 -
/// Monday": [...], ...}}` with the day map in plan order.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPlan {
    pub goal: FitnessGoal,
    pub workout_type: WorkoutType,
    pub fitness_level: FitnessLevel,
    #[serde(serialize_with = "serialize_days")]
    pub days: Vec<PlanDayOutline>,
}

impl GeneratedPlan {
    /// Look a day up by its key.
    pub fn day(&self, key: &str) -> Option<&PlanDayOutline> {
        self.days.iter().find(|d| d.key() == key)
    }

    /// Total number of assigned exercises.
    pub fn exercise_count(&self) -> usize {
        self.days.iter().map(|d| d.exercises.len()).sum()
    }
}

fn serialize_days<S: Serializer>(days: &[PlanDayOutline], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(days.len()))?;
    for day in days {
        map.serialize_entry(&day.key(), &day.exercises)?;
    }
    map.end()
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a plan for `survey` from `catalog`, sampling with the thread rng.
pub async fn generate_plan<C>(survey: &SurveyAnswers, catalog: &C) -> Result<GeneratedPlan, PlanError>
where
    C: ExerciseCatalog + ?Sized,
{
    let inputs = PlanInputs::from_survey(survey)?;
    let pool = catalog.candidate_pool(&inputs.equipment).await?;
    Ok(build_plan(&inputs, &pool, &mut rand::rng()))
}

/// Generate a plan for `survey` from `catalog`, sampling with `rng`.
pub async fn generate_plan_with_rng<C, R>(
    survey: &SurveyAnswers,
    catalog: &C,
    rng: &mut R,
) -> Result<GeneratedPlan, PlanError>
where
    C: ExerciseCatalog + ?Sized,
    R: Rng + ?Sized,
{
    let inputs = PlanInputs::from_survey(survey)?;
    let pool = catalog.candidate_pool(&inputs.equipment).await?;
    Ok(build_plan(&inputs, &pool, rng))
}

/// Lay out the 30 days over an already-fetched candidate pool.
pub fn build_plan<R: Rng + ?Sized>(inputs: &PlanInputs, pool: &[Exercise], rng: &mut R) -> GeneratedPlan {
    let candidates = CandidatePool::new(pool);
    let metrics = ExerciseMetrics::for_type(inputs.workout_type, inputs.level.metrics());
    let mut rotation = BodyPartRotation::default();
    let mut days = Vec::with_capacity(PLAN_LENGTH_DAYS);

    for day_idx in 0..PLAN_LENGTH_DAYS {
        let day_of_week = DayOfWeek::from_cycle_index(day_idx);
        let mut day = PlanDayOutline {
            day_index: day_idx + 1,
            day_of_week,
            exercises: Vec::new(),
        };

        if day.is_rest_day() {
            debug!(day = %day.key(), "rest day");
            days.push(day);
            continue;
        }

        let picked = select_day_exercises(inputs, &candidates, day_idx, &mut rotation, rng);
        day.exercises = picked
            .into_iter()
            .map(|e| AssignedExercise {
                exercise: e.name.clone(),
                body_part: e.body_part.clone(),
                metrics,
            })
            .collect();

        debug!(
            day = %day.key(),
            workout_type = %inputs.workout_type,
            count = day.exercises.len(),
            "generated exercises"
        );
        days.push(day);
    }

    GeneratedPlan {
        goal: inputs.goal,
        workout_type: inputs.workout_type,
        fitness_level: inputs.level,
        days,
    }
}

fn select_day_exercises<'a, R: Rng + ?Sized>(
    inputs: &PlanInputs,
    candidates: &CandidatePool<'a>,
    day_idx: usize,
    rotation: &mut BodyPartRotation,
    rng: &mut R,
) -> Vec<&'a Exercise> {
    match inputs.workout_type {
        WorkoutType::Cardio => {
            let picked = candidates
                .filter(|e| {
                    CARDIO_EQUIPMENT.contains(&e.equipment.as_str())
                        || super::catalog::name_contains_any(&e.name, CARDIO_KEYWORDS)
                })
                .sample(rng, EXERCISES_PER_DAY);
            if !picked.is_empty() {
                return picked;
            }
            candidates
                .with_equipment_in(&[BODY_WEIGHT])
                .with_name_containing_any(BODY_WEIGHT_CARDIO_KEYWORDS)
                .sample(rng, EXERCISES_PER_DAY)
        }
        WorkoutType::Strength | WorkoutType::Muscle => {
            let side = if day_idx % 2 == 0 {
                BodySide::Upper
            } else {
                BodySide::Lower
            };
            let picked = candidates
                .with_body_part_in(side.parts())
                .excluding_body_part(rotation.last(side))
                .sample(rng, EXERCISES_PER_DAY);
            if let Some(first) = picked.first() {
                rotation.record(side, &first.body_part);
            }
            picked
        }
        WorkoutType::Flexibility => {
            let owned = inputs.equipment.intersect(FLEXIBILITY_EQUIPMENT);
            if owned.is_empty() {
                candidates
                    .with_equipment_in(&[BODY_WEIGHT])
                    .sample(rng, EXERCISES_PER_DAY)
            } else {
                candidates
                    .with_equipment_in(&owned)
                    .sample(rng, EXERCISES_PER_DAY)
            }
        }
        WorkoutType::Endurance => candidates
            .with_body_part_in(ENDURANCE_BODY_PARTS)
            .sample(rng, EXERCISES_PER_DAY),
        WorkoutType::General => candidates.sample(rng, EXERCISES_PER_DAY),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodySide {
    Upper,
    Lower,
}

impl BodySide {
    fn parts(self) -> &'static [&'static str] {
        match self {
            Self::Upper => UPPER_BODY_PARTS,
            Self::Lower => LOWER_BODY_PARTS,
        }
    }
}

/// Last body part trained on each side, scoped to one generation call.
///
/// Recording one side clears the other, so the exclusion only bites when
/// the days in between produced nothing.
#[derive(Debug, Default)]
struct BodyPartRotation {
    last_upper: Option<String>,
    last_lower: Option<String>,
}

impl BodyPartRotation {
    fn last(&self, side: BodySide) -> Option<&str> {
        match side {
            BodySide::Upper => self.last_upper.as_deref(),
            BodySide::Lower => self.last_lower.as_deref(),
        }
    }

    fn record(&mut self, side: BodySide, body_part: &str) {
        match side {
            BodySide::Upper => {
                self.last_upper = Some(body_part.to_owned());
                self.last_lower = None;
            }
            BodySide::Lower => {
                self.last_lower = Some(body_part.to_owned());
                self.last_upper = None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::plan::catalog::InMemoryCatalog;

    fn exercise(id: i32, name: &str, body_part: &str, equipment: &str) -> Exercise {
        Exercise {
            id,
            name: name.into(),
            description: String::new(),
            body_part: body_part.into(),
            target: String::new(),
            primary_equipment_id: None,
            equipment: equipment.into(),
            difficulty_level: None,
        }
    }

    fn survey(goal: &str, level: &str, equipment: &str) -> SurveyAnswers {
        SurveyAnswers {
            fitness_goal: Some(goal.into()),
            body_type: Some("mesomorph".into()),
            fitness_level: Some(level.into()),
            equipment: equipment.into(),
        }
    }

    /// A catalog spread over every body part and a few equipment types.
    fn mixed_catalog() -> Vec<Exercise> {
        let mut out = Vec::new();
        let mut id = 0;
        let parts = UPPER_BODY_PARTS
            .iter()
            .chain(LOWER_BODY_PARTS)
            .chain(&["cardio"]);
        for part in parts {
            for equipment in ["body weight", "dumbbell", "resistance band"] {
                for n in 0..3 {
                    id += 1;
                    out.push(exercise(id, &format!("{part} {equipment} {n}"), part, equipment));
                }
            }
        }
        out.push(exercise(1000, "jump squat", "upper legs", "body weight"));
        out.push(exercise(1001, "stationary bike sprint", "cardio", "stationary bike"));
        out
    }

    fn inputs(goal: &str, level: &str, equipment: &str) -> PlanInputs {
        PlanInputs::from_survey(&survey(goal, level, equipment)).unwrap()
    }

    #[test]
    fn plan_has_thirty_ordered_unique_days() {
        let catalog = mixed_catalog();
        let plan = build_plan(
            &inputs("get-stronger", "Beginner", "dumbbell"),
            &catalog,
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(plan.days.len(), PLAN_LENGTH_DAYS);
        let keys: Vec<_> = plan.days.iter().map(PlanDayOutline::key).collect();
        assert_eq!(keys.iter().collect::<HashSet<_>>().len(), PLAN_LENGTH_DAYS);
        assert_eq!(keys[0], "Day 1 - Monday");
        assert_eq!(keys[5], "Day 6 - Saturday");
        assert_eq!(keys[29], "Day 30 - Tuesday");
        for (i, day) in plan.days.iter().enumerate() {
            assert_eq!(day.day_index, i + 1);
        }
    }

    #[test]
    fn weekends_are_always_empty() {
        let catalog = mixed_catalog();
        let mut rng = StdRng::seed_from_u64(2);
        for goal in FitnessGoal::ALL {
            for equipment in ["", "dumbbell,body weight", "resistance band"] {
                let plan = build_plan(&inputs(&goal.to_string(), "Advanced", equipment), &catalog, &mut rng);
                for day in &plan.days {
                    if day.is_rest_day() {
                        assert!(day.exercises.is_empty(), "{} should be empty", day.key());
                    }
                    assert!(day.exercises.len() <= EXERCISES_PER_DAY);
                }
            }
        }
    }

    #[test]
    fn cardio_days_carry_duration_only() {
        let catalog = mixed_catalog();
        for (level, minutes) in [("Beginner", 10), ("Intermediate", 20), ("Advanced", 30)] {
            let plan = build_plan(
                &inputs("lose-weight", level, "body weight"),
                &catalog,
                &mut StdRng::seed_from_u64(3),
            );
            assert!(plan.exercise_count() > 0);
            for day in &plan.days {
                for a in &day.exercises {
                    assert_eq!(a.metrics, ExerciseMetrics::Timed { duration: minutes });
                    let json = serde_json::to_value(a).unwrap();
                    assert_eq!(json["duration"], minutes);
                    assert!(json.get("sets").is_none());
                    assert!(json.get("reps").is_none());
                }
            }
        }
    }

    #[test]
    fn non_cardio_days_carry_sets_and_reps_only() {
        let catalog = mixed_catalog();
        for (goal, level, sets, reps) in [
            ("get-stronger", "Beginner", 2, 8),
            ("build-muscle", "Intermediate", 3, 10),
            ("better-flexibility", "Advanced", 4, 12),
        ] {
            let plan = build_plan(
                &inputs(goal, level, "dumbbell,resistance band"),
                &catalog,
                &mut StdRng::seed_from_u64(4),
            );
            assert!(plan.exercise_count() > 0, "{goal} should assign something");
            for a in plan.days.iter().flat_map(|d| &d.exercises) {
                assert_eq!(a.metrics, ExerciseMetrics::Counted { sets, reps });
                let json = serde_json::to_value(a).unwrap();
                assert!(json.get("duration").is_none());
                assert_eq!(json["sets"], sets);
                assert_eq!(json["reps"], reps);
            }
        }
    }

    #[test]
    fn cardio_filter_matches_equipment_or_name() {
        let catalog = vec![
            exercise(1, "seated row", "back", "cable"),
            exercise(2, "bench press", "chest", "barbell"),
            exercise(3, "air bike", "waist", "body weight"),
            exercise(4, "curl", "upper arms", "cable"),
        ];
        let plan = build_plan(
            &inputs("not-sure", "Beginner", "cable,barbell,body weight"),
            &catalog,
            &mut StdRng::seed_from_u64(5),
        );
        for a in plan.days.iter().flat_map(|d| &d.exercises) {
            assert!(
                a.exercise == "seated row" || a.exercise == "air bike",
                "unexpected cardio pick {}",
                a.exercise
            );
        }
        assert_eq!(plan.days[0].exercises.len(), 2);
    }

    #[test]
    fn cardio_without_matches_yields_empty_days() {
        let catalog = vec![exercise(1, "bench press", "chest", "barbell")];
        let plan = build_plan(
            &inputs("lose-weight", "Beginner", "barbell"),
            &catalog,
            &mut StdRng::seed_from_u64(6),
        );
        assert_eq!(plan.exercise_count(), 0);
        assert_eq!(plan.days.len(), PLAN_LENGTH_DAYS);
    }

    #[test]
    fn strength_alternates_upper_and_lower_body() {
        let catalog = mixed_catalog();
        let plan = build_plan(
            &inputs("get-stronger", "Intermediate", "dumbbell"),
            &catalog,
            &mut StdRng::seed_from_u64(7),
        );
        for (idx, day) in plan.days.iter().enumerate() {
            let group = if idx % 2 == 0 { UPPER_BODY_PARTS } else { LOWER_BODY_PARTS };
            for a in &day.exercises {
                assert!(
                    group.contains(&a.body_part.as_str()),
                    "{}: {} is not in the expected group",
                    day.key(),
                    a.body_part
                );
            }
        }
    }

    /// Replays the rotation over the output: a day never contains the body
    /// part recorded for its side by the previous non-empty day.
    fn assert_rotation_respected(plan: &GeneratedPlan) {
        let mut last_upper: Option<String> = None;
        let mut last_lower: Option<String> = None;
        for (idx, day) in plan.days.iter().enumerate() {
            if day.is_rest_day() {
                continue;
            }
            let upper = idx % 2 == 0;
            let excluded = if upper { &last_upper } else { &last_lower };
            if let Some(excluded) = excluded {
                assert!(
                    day.exercises.iter().all(|a| &a.body_part != excluded),
                    "{} repeats body part {excluded}",
                    day.key()
                );
            }
            if let Some(first) = day.exercises.first() {
                if upper {
                    last_upper = Some(first.body_part.clone());
                    last_lower = None;
                } else {
                    last_lower = Some(first.body_part.clone());
                    last_upper = None;
                }
            }
        }
    }

    #[test]
    fn strength_rotation_never_repeats_the_tracked_body_part() {
        let catalog = mixed_catalog();
        for seed in 0..25 {
            let plan = build_plan(
                &inputs("get-stronger", "Beginner", "dumbbell,body weight"),
                &catalog,
                &mut StdRng::seed_from_u64(seed),
            );
            assert_rotation_respected(&plan);
        }
    }

    #[test]
    fn rotation_excludes_previous_upper_part_when_lower_days_are_empty() {
        // No lower-body exercises: every lower day is empty, so the upper
        // tracker survives and consecutive upper days must differ.
        let catalog = vec![
            exercise(1, "row a", "back", "dumbbell"),
            exercise(2, "row b", "back", "dumbbell"),
            exercise(3, "press a", "chest", "dumbbell"),
            exercise(4, "press b", "chest", "dumbbell"),
        ];
        for seed in 0..25 {
            let plan = build_plan(
                &inputs("build-muscle", "Beginner", "dumbbell"),
                &catalog,
                &mut StdRng::seed_from_u64(seed),
            );
            let mut previous: Option<&str> = None;
            for (idx, day) in plan.days.iter().enumerate() {
                if day.is_rest_day() || idx % 2 == 1 {
                    assert!(day.exercises.is_empty());
                    continue;
                }
                assert_eq!(day.exercises.len(), 2, "{}", day.key());
                let part = day.exercises[0].body_part.as_str();
                assert!(day.exercises.iter().all(|a| a.body_part == part));
                assert_ne!(Some(part), previous, "{} repeats {part}", day.key());
                previous = Some(part);
            }
        }
    }

    #[test]
    fn flexibility_uses_owned_flexibility_equipment() {
        let catalog = mixed_catalog();
        let plan = build_plan(
            &inputs("better-flexibility", "Beginner", "resistance band,dumbbell"),
            &catalog,
            &mut StdRng::seed_from_u64(8),
        );
        let picks: Vec<_> = plan.days.iter().flat_map(|d| &d.exercises).collect();
        assert!(!picks.is_empty());
        for a in picks {
            assert!(a.exercise.contains("resistance band"), "{}", a.exercise);
        }
    }

    #[test]
    fn flexibility_without_owned_equipment_uses_body_weight() {
        let catalog = mixed_catalog();
        let plan = build_plan(
            &inputs("better-flexibility", "Beginner", "dumbbell"),
            &catalog,
            &mut StdRng::seed_from_u64(9),
        );
        // The pool only holds dumbbell work, so the body-weight filter
        // leaves nothing.
        let pool: Vec<_> = catalog.iter().filter(|e| e.equipment == "dumbbell").cloned().collect();
        let from_pool = build_plan(
            &inputs("better-flexibility", "Beginner", "dumbbell"),
            &pool,
            &mut StdRng::seed_from_u64(9),
        );
        assert_eq!(from_pool.exercise_count(), 0);
        for a in plan.days.iter().flat_map(|d| &d.exercises) {
            assert!(a.exercise.contains("body weight"), "{}", a.exercise);
        }
    }

    #[test]
    fn endurance_matches_body_parts_exactly() {
        let catalog = vec![
            exercise(1, "burpee", "cardio", "body weight"),
            exercise(2, "plank", "core", "body weight"),
            exercise(3, "push up", "upper arms", "body weight"),
            exercise(4, "sprint", "Cardio", "body weight"),
        ];
        let plan = build_plan(
            &inputs("better-endurance", "Advanced", ""),
            &catalog,
            &mut StdRng::seed_from_u64(10),
        );
        for day in plan.days.iter().filter(|d| !d.is_rest_day()) {
            let names: Vec<_> = day.exercises.iter().map(|a| a.exercise.as_str()).collect();
            assert_eq!(names, vec!["burpee"], "{}", day.key());
        }
    }

    #[test]
    fn endurance_with_catalog_vocabulary_is_empty() {
        // Real catalog body parts never say "upper body" or "lower body".
        let catalog: Vec<_> = mixed_catalog()
            .into_iter()
            .filter(|e| e.body_part != "cardio")
            .collect();
        let plan = build_plan(
            &inputs("better-endurance", "Beginner", "dumbbell,body weight"),
            &catalog,
            &mut StdRng::seed_from_u64(11),
        );
        assert_eq!(plan.exercise_count(), 0);
    }

    #[test]
    fn general_samples_the_whole_pool() {
        let catalog = vec![
            exercise(1, "a", "back", "band"),
            exercise(2, "b", "waist", "band"),
            exercise(3, "c", "neck", "band"),
        ];
        let mut general = inputs("get-stronger", "Beginner", "band");
        general.workout_type = WorkoutType::General;
        let plan = build_plan(&general, &catalog, &mut StdRng::seed_from_u64(12));
        for day in plan.days.iter().filter(|d| !d.is_rest_day()) {
            assert_eq!(day.exercises.len(), 3);
        }
    }

    #[test]
    fn serialized_day_map_keeps_plan_order() {
        let catalog = mixed_catalog();
        let plan = build_plan(
            &inputs("lose-weight", "Beginner", ""),
            &catalog,
            &mut StdRng::seed_from_u64(13),
        );
        let json = serde_json::to_string(&plan).unwrap();
        let day2 = json.find("\"Day 2 - Tuesday\"").unwrap();
        let day10 = json.find("\"Day 10 - Wednesday\"").unwrap();
        assert!(day2 < day10, "days must serialize in plan order");
        assert!(json.contains("\"workout_type\":\"cardio\""));
    }

    #[test]
    fn day_lookup_by_key() {
        let plan = build_plan(
            &inputs("lose-weight", "Beginner", ""),
            &[],
            &mut StdRng::seed_from_u64(14),
        );
        let day = plan.day("Day 7 - Sunday").unwrap();
        assert_eq!(day.day_index, 7);
        assert!(plan.day("Day 31 - Wednesday").is_none());
    }

    #[tokio::test]
    async fn generate_plan_end_to_end_with_seeded_catalog() {
        let catalog = InMemoryCatalog::new(vec![
            exercise(1, "Jump Rope", "cardio", "rope"),
            exercise(2, "Running", "cardio", "body weight"),
            exercise(3, "Push Up", "upper arms", "body weight"),
            exercise(4, "Squat", "lower legs", "body weight"),
            exercise(5, "Plank", "core", "body weight"),
        ]);
        let plan = generate_plan(&survey("lose-weight", "Beginner", "rope,body weight"), &catalog)
            .await
            .unwrap();

        assert_eq!(plan.days.len(), 30);
        assert_eq!(plan.workout_type, WorkoutType::Cardio);
        for day in &plan.days {
            if day.is_rest_day() {
                assert!(day.exercises.is_empty());
            } else {
                assert!(day.exercises.len() <= 5);
                for a in &day.exercises {
                    assert_eq!(a.metrics, ExerciseMetrics::Timed { duration: 10 });
                }
            }
        }
    }

    #[tokio::test]
    async fn unknown_level_fails_before_touching_the_catalog() {
        let catalog = InMemoryCatalog::new(mixed_catalog());
        let err = generate_plan(&survey("lose-weight", "Expert", ""), &catalog)
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::UnknownFitnessLevel(ref v) if v == "Expert"));
    }

    #[tokio::test]
    async fn seeded_generation_is_repeatable() {
        let catalog = InMemoryCatalog::new(mixed_catalog());
        let answers = survey("build-muscle", "Advanced", "dumbbell,body weight");
        let a = generate_plan_with_rng(&answers, &catalog, &mut StdRng::seed_from_u64(99))
            .await
            .unwrap();
        let b = generate_plan_with_rng(&answers, &catalog, &mut StdRng::seed_from_u64(99))
            .await
            .unwrap();
        assert_eq!(a.days, b.days);
    }

    #[tokio::test]
    async fn blank_equipment_draws_from_body_weight_pool() {
        let catalog = InMemoryCatalog::new(mixed_catalog());
        let plan = generate_plan(&survey("get-stronger", "Beginner", " , ,"), &catalog)
            .await
            .unwrap();
        assert!(plan.exercise_count() > 0);
        for a in plan.days.iter().flat_map(|d| &d.exercises) {
            assert!(
                a.exercise.contains("body weight") || a.exercise == "jump squat",
                "{} is not a body-weight exercise",
                a.exercise
            );
        }
    }

    struct FailingCatalog;

    #[async_trait::async_trait]
    impl ExerciseCatalog for FailingCatalog {
        async fn candidate_pool(&self, _equipment: &EquipmentSet) -> anyhow::Result<Vec<Exercise>> {
            Err(anyhow::anyhow!("catalog unavailable"))
        }
    }

    #[tokio::test]
    async fn catalog_failure_aborts_generation() {
        let err = generate_plan(&survey("get-stronger", "Beginner", "dumbbell"), &FailingCatalog)
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::Storage(_)));
        assert_eq!(err.to_string(), "catalog unavailable");

        let err = generate_plan_with_rng(
            &survey("lose-weight", "Advanced", ""),
            &FailingCatalog,
            &mut StdRng::seed_from_u64(3),
        )
        .await
        .unwrap_err();
        assert!(!err.is_client_error());
    }

    #[test]
    fn timed_metrics_store_duration_only() {
        let m = ExerciseMetrics::Timed { duration: 20 }.to_assignment().unwrap();
        assert_eq!(
            m,
            AssignmentMetrics {
                sets: None,
                reps: None,
                duration: Some(20)
            }
        );
    }

    #[test]
    fn counted_metrics_store_sets_and_reps() {
        let m = ExerciseMetrics::Counted { sets: 4, reps: 12 }
            .to_assignment()
            .unwrap();
        assert_eq!(m.sets, Some(4));
        assert_eq!(m.reps, Some(12));
        assert_eq!(m.duration, None);
    }
}
