use crate::models::Exercise;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::exercise_repository::{id_strings, muscle_strings, RawExerciseRow};

pub async fn fetch_all_exercises(pool: &PgPool) -> Result<Vec<Exercise>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ExerciseRow>(
        r#"
        SELECT id, name, muscle_group, secondary_muscles, equipment, difficulty,
               tags, alternate_exercise_ids, instructions, tips, image_urls
        FROM exercises
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| row.into_raw().into_exercise())
        .collect())
}

pub async fn insert_exercise(pool: &PgPool, exercise: &Exercise) -> Result<Uuid, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO exercises (id, name, muscle_group, secondary_muscles, equipment, difficulty,
                               tags, alternate_exercise_ids, instructions, tips, image_urls)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(exercise.id)
    .bind(&exercise.name)
    .bind(exercise.muscle_group.to_string())
    .bind(Json(muscle_strings(&exercise.secondary_muscles)))
    .bind(&exercise.equipment)
    .bind(exercise.difficulty.to_string())
    .bind(Json(&exercise.tags))
    .bind(Json(id_strings(&exercise.alternate_exercise_ids)))
    .bind(Json(&exercise.instructions))
    .bind(Json(&exercise.tips))
    .bind(Json(&exercise.image_urls))
    .execute(pool)
    .await?;

    Ok(exercise.id)
}

#[derive(sqlx::FromRow)]
struct ExerciseRow {
    id: Uuid,
    name: String,
    muscle_group: String,
    secondary_muscles: Json<Vec<String>>,
    equipment: String,
    difficulty: String,
    tags: Json<Vec<String>>,
    alternate_exercise_ids: Json<Vec<String>>,
    instructions: Json<Vec<String>>,
    tips: Json<Vec<String>>,
    image_urls: Json<Vec<String>>,
}

impl ExerciseRow {
    fn into_raw(self) -> RawExerciseRow {
        RawExerciseRow {
            id: self.id,
            name: self.name,
            muscle_group: self.muscle_group,
            secondary_muscles: self.secondary_muscles.0,
            equipment: self.equipment,
            difficulty: self.difficulty,
            tags: self.tags.0,
            alternate_exercise_ids: self.alternate_exercise_ids.0,
            instructions: self.instructions.0,
            tips: self.tips.0,
            image_urls: self.image_urls.0,
        }
    }
}
