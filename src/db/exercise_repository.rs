use crate::error::Result;
use crate::models::{Difficulty, Exercise, MuscleGroup};
use async_trait::async_trait;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Shared row-to-Exercise conversion (used by both Pg and SQLite repos)
// ---------------------------------------------------------------------------

/// Raw catalog fields extracted from a database row, before validation.
pub(super) struct RawExerciseRow {
    pub id: Uuid,
    pub name: String,
    pub muscle_group: String,
    pub secondary_muscles: Vec<String>,
    pub equipment: String,
    pub difficulty: String,
    pub tags: Vec<String>,
    pub alternate_exercise_ids: Vec<String>,
    pub instructions: Vec<String>,
    pub tips: Vec<String>,
    pub image_urls: Vec<String>,
}

impl RawExerciseRow {
    pub fn into_exercise(self) -> Exercise {
        let muscle_group = self.muscle_group.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid muscle group '{}' for exercise '{}' (id: {}), defaulting to full-body",
                self.muscle_group,
                self.name,
                self.id
            );
            MuscleGroup::FullBody
        });

        let secondary_muscles = self
            .secondary_muscles
            .iter()
            .filter_map(|m| match m.parse::<MuscleGroup>() {
                Ok(group) => Some(group),
                Err(_) => {
                    tracing::warn!(
                        "Dropping unknown secondary muscle '{}' for exercise '{}'",
                        m,
                        self.name
                    );
                    None
                }
            })
            .collect();

        let difficulty = self.difficulty.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid difficulty '{}' for exercise '{}', defaulting to intermediate",
                self.difficulty,
                self.name
            );
            Difficulty::Intermediate
        });

        let alternate_exercise_ids = self
            .alternate_exercise_ids
            .iter()
            .filter_map(|raw| match raw.parse::<Uuid>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(
                        "Dropping malformed alternate id '{}' for exercise '{}'",
                        raw,
                        self.name
                    );
                    None
                }
            })
            .collect();

        Exercise {
            id: self.id,
            name: self.name,
            muscle_group,
            secondary_muscles,
            equipment: self.equipment,
            difficulty,
            tags: self.tags,
            alternate_exercise_ids,
            instructions: self.instructions,
            tips: self.tips,
            image_urls: self.image_urls,
        }
    }
}

/// Catalog column values for an insert, shared by both backends.
pub(super) fn muscle_strings(muscles: &[MuscleGroup]) -> Vec<String> {
    muscles.iter().map(|m| m.to_string()).collect()
}

pub(super) fn id_strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    /// Every exercise in the catalog, ordered by name.
    async fn fetch_all(&self) -> Result<Vec<Exercise>>;

    /// Insert one exercise. Existing ids are left untouched.
    async fn insert(&self, exercise: &Exercise) -> Result<Uuid>;

    async fn count(&self) -> Result<i64>;
}

pub struct PgExerciseRepository {
    pool: sqlx::PgPool,
}

impl PgExerciseRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}

#[async_trait]
impl ExerciseRepository for PgExerciseRepository {
    async fn fetch_all(&self) -> Result<Vec<Exercise>> {
        Ok(super::exercise_queries::fetch_all_exercises(&self.pool).await?)
    }

    async fn insert(&self, exercise: &Exercise) -> Result<Uuid> {
        Ok(super::exercise_queries::insert_exercise(&self.pool, exercise).await?)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
