//! Plan generation: survey lookup tables, the exercise catalog seam, the
//! 30-day generator, and persistence of a generated plan.

pub mod catalog;
pub mod equipment;
pub mod generate;
pub mod goal;
pub mod level;
pub mod persist;

pub use catalog::{CandidatePool, ExerciseCatalog, InMemoryCatalog, PgExerciseCatalog};
pub use equipment::EquipmentSet;
pub use generate::{
    AssignedExercise, ExerciseMetrics, GeneratedPlan, PLAN_LENGTH_DAYS, PlanDayOutline, PlanInputs,
    SurveyAnswers, build_plan, generate_plan, generate_plan_with_rng,
};
pub use goal::{FitnessGoal, WorkoutType};
pub use level::{FitnessLevel, LevelMetrics};
pub use persist::{PersistSummary, replace_plan_days};
