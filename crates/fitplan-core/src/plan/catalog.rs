//! The exercise catalog seam and in-memory candidate filtering.
//!
//! Generation fetches the user's candidate pool once through
//! [`ExerciseCatalog`], then narrows it per day with [`CandidatePool`].

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::PgPool;

use fitplan_db::models::Exercise;
use fitplan_db::queries::exercises as exercise_db;

use super::equipment::EquipmentSet;

/// Read access to the exercise catalog.
#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Exercises whose equipment is in `equipment`, or the body-weight
    /// exercises when `equipment` is empty.
    async fn candidate_pool(&self, equipment: &EquipmentSet) -> Result<Vec<Exercise>>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn ExerciseCatalog) {}
};

/// Catalog backed by the `exercises` table.
#[derive(Debug, Clone)]
pub struct PgExerciseCatalog {
    pool: PgPool,
}

impl PgExerciseCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExerciseCatalog for PgExerciseCatalog {
    async fn candidate_pool(&self, equipment: &EquipmentSet) -> Result<Vec<Exercise>> {
        exercise_db::list_exercises_for_equipment(&self.pool, &equipment.pool_equipment()).await
    }
}

/// Catalog held in memory. Used for previews and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    exercises: Vec<Exercise>,
}

impl InMemoryCatalog {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self { exercises }
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }
}

#[async_trait]
impl ExerciseCatalog for InMemoryCatalog {
    async fn candidate_pool(&self, equipment: &EquipmentSet) -> Result<Vec<Exercise>> {
        let wanted = equipment.pool_equipment();
        Ok(self
            .exercises
            .iter()
            .filter(|e| wanted.contains(&e.equipment))
            .cloned()
            .collect())
    }
}

/// A borrowed, filterable view over a candidate pool.
#[derive(Debug, Clone)]
pub struct CandidatePool<'a> {
    exercises: Vec<&'a Exercise>,
}

impl<'a> CandidatePool<'a> {
    pub fn new(exercises: &'a [Exercise]) -> Self {
        Self {
            exercises: exercises.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Keep the exercises matching `pred`.
    pub fn filter(&self, pred: impl Fn(&Exercise) -> bool) -> Self {
        Self {
            exercises: self.exercises.iter().copied().filter(|e| pred(e)).collect(),
        }
    }

    /// Keep exercises whose equipment is one of `names`.
    pub fn with_equipment_in<S: AsRef<str>>(&self, names: &[S]) -> Self {
        self.filter(|e| names.iter().any(|n| n.as_ref() == e.equipment))
    }

    /// Keep exercises whose body part is exactly one of `parts`.
    pub fn with_body_part_in(&self, parts: &[&str]) -> Self {
        self.filter(|e| parts.contains(&e.body_part.as_str()))
    }

    /// Drop exercises on `part`. `None` drops nothing.
    pub fn excluding_body_part(&self, part: Option<&str>) -> Self {
        match part {
            Some(part) => self.filter(|e| e.body_part != part),
            None => self.clone(),
        }
    }

    /// Keep exercises whose name contains any of `keywords`, ignoring case.
    pub fn with_name_containing_any(&self, keywords: &[&str]) -> Self {
        self.filter(|e| name_contains_any(&e.name, keywords))
    }

    /// Up to `limit` exercises drawn uniformly at random without
    /// replacement, in random order.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, limit: usize) -> Vec<&'a Exercise> {
        let mut picked = self.exercises.clone();
        picked.shuffle(rng);
        picked.truncate(limit);
        picked
    }
}

/// Case-insensitive substring test against any keyword.
pub fn name_contains_any(name: &str, keywords: &[&str]) -> bool {
    let name = name.to_lowercase();
    keywords.iter().any(|k| name.contains(&k.to_lowercase()))
}
