use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Exercise, GeneratedRoutine, RoutineDetail, StoredDay, StoredRoutine, StoredRoutineExercise,
};

use super::exercise_repository::{id_strings, muscle_strings, ExerciseRepository, RawExerciseRow};
use super::routine_repository::{
    build_weeks, parse_status, persistence_error, plan_routine, DayRow, ExerciseRow,
    RoutineRepository, WeekRow,
};

// ---------------------------------------------------------------------------
// Row types (SQLite-specific: ids are TEXT, arrays are JSON TEXT)
// ---------------------------------------------------------------------------

fn parse_id(raw: &str, context: &str) -> Uuid {
    raw.parse::<Uuid>().unwrap_or_else(|_| {
        tracing::warn!("Invalid UUID '{}' for {}, using nil", raw, context);
        Uuid::nil()
    })
}

fn parse_json_list(raw: &str, context: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Invalid JSON list for {}: {}", context, e);
        Vec::new()
    })
}

fn to_json_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

#[derive(sqlx::FromRow)]
struct SqliteExerciseRow {
    id: String,
    name: String,
    muscle_group: String,
    secondary_muscles: String,
    equipment: String,
    difficulty: String,
    tags: String,
    alternate_exercise_ids: String,
    instructions: String,
    tips: String,
    image_urls: String,
}

impl SqliteExerciseRow {
    fn into_exercise(self) -> Exercise {
        let context = format!("exercise '{}'", self.name);
        RawExerciseRow {
            id: parse_id(&self.id, &context),
            secondary_muscles: parse_json_list(&self.secondary_muscles, &context),
            tags: parse_json_list(&self.tags, &context),
            alternate_exercise_ids: parse_json_list(&self.alternate_exercise_ids, &context),
            instructions: parse_json_list(&self.instructions, &context),
            tips: parse_json_list(&self.tips, &context),
            image_urls: parse_json_list(&self.image_urls, &context),
            name: self.name,
            muscle_group: self.muscle_group,
            equipment: self.equipment,
            difficulty: self.difficulty,
        }
        .into_exercise()
    }
}

#[derive(sqlx::FromRow)]
struct SqliteRoutineRow {
    id: String,
    user_id: String,
    name: String,
    goal: String,
    status: String,
    days_per_week: i64,
    session_duration_min: i64,
    fitness_level: String,
    available_equipment: String,
    total_weeks: i64,
    current_week: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl SqliteRoutineRow {
    fn into_routine(self) -> StoredRoutine {
        let id = parse_id(&self.id, "routine");
        StoredRoutine {
            id,
            user_id: parse_id(&self.user_id, "routine owner"),
            name: self.name,
            goal: self.goal,
            status: parse_status(&self.status, id),
            days_per_week: self.days_per_week as u32,
            session_duration_min: self.session_duration_min as u32,
            fitness_level: self.fitness_level,
            available_equipment: parse_json_list(&self.available_equipment, "routine equipment"),
            total_weeks: self.total_weeks as u32,
            current_week: self.current_week as u32,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SqliteDayRow {
    id: String,
    week_id: String,
    day_number: i64,
    focus: String,
    is_rest_day: bool,
    completed: bool,
}

#[derive(sqlx::FromRow)]
struct SqliteRoutineExerciseRow {
    id: String,
    day_id: String,
    exercise_id: String,
    exercise_order: i64,
    sets: i64,
    reps: i64,
    rest_seconds: i64,
    target_weight: Option<f64>,
    alternate_ids: String,
}

const ROUTINE_COLUMNS: &str = "id, user_id, name, goal, status, days_per_week, session_duration_min,
    fitness_level, available_equipment, total_weeks, current_week, created_at, updated_at";

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Catalog and routine storage in a single SQLite database.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the SQLite schema. Idempotent.
    pub async fn create_schema(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                muscle_group TEXT NOT NULL,
                secondary_muscles TEXT NOT NULL DEFAULT '[]',
                equipment TEXT NOT NULL,
                difficulty TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '[]',
                alternate_exercise_ids TEXT NOT NULL DEFAULT '[]',
                instructions TEXT NOT NULL DEFAULT '[]',
                tips TEXT NOT NULL DEFAULT '[]',
                image_urls TEXT NOT NULL DEFAULT '[]'
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS routines (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                goal TEXT NOT NULL,
                status TEXT NOT NULL,
                days_per_week INTEGER NOT NULL,
                session_duration_min INTEGER NOT NULL,
                fitness_level TEXT NOT NULL,
                available_equipment TEXT NOT NULL DEFAULT '[]',
                total_weeks INTEGER NOT NULL,
                current_week INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS routine_weeks (
                id TEXT PRIMARY KEY,
                routine_id TEXT NOT NULL REFERENCES routines(id) ON DELETE CASCADE,
                week_number INTEGER NOT NULL,
                is_deload INTEGER NOT NULL DEFAULT 0,
                UNIQUE (routine_id, week_number)
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS routine_days (
                id TEXT PRIMARY KEY,
                week_id TEXT NOT NULL REFERENCES routine_weeks(id) ON DELETE CASCADE,
                day_number INTEGER NOT NULL,
                focus TEXT NOT NULL,
                is_rest_day INTEGER NOT NULL DEFAULT 0,
                completed INTEGER NOT NULL DEFAULT 0,
                UNIQUE (week_id, day_number)
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS routine_exercises (
                id TEXT PRIMARY KEY,
                day_id TEXT NOT NULL REFERENCES routine_days(id) ON DELETE CASCADE,
                exercise_id TEXT NOT NULL REFERENCES exercises(id),
                exercise_order INTEGER NOT NULL,
                sets INTEGER NOT NULL,
                reps INTEGER NOT NULL,
                rest_seconds INTEGER NOT NULL,
                target_weight REAL,
                alternate_ids TEXT NOT NULL DEFAULT '[]'
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_routines_user ON routines(user_id)")
            .execute(pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_exercises_muscle ON exercises(muscle_group)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Insert a batch of exercises in a single transaction.
    ///
    /// Uses `INSERT OR IGNORE` so existing ids are silently skipped.
    /// Returns the number of exercises actually inserted.
    pub async fn insert_batch(
        &self,
        exercises: &[Exercise],
    ) -> std::result::Result<usize, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0usize;

        for exercise in exercises {
            let result = bind_exercise(sqlx::query(INSERT_EXERCISE_SQL), exercise)
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() > 0 {
                inserted += 1;
            }
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn insert_routine_tree(
        &self,
        detail: &RoutineDetail,
    ) -> std::result::Result<(), sqlx::Error> {
        let routine = &detail.routine;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO routines (id, user_id, name, goal, status, days_per_week,
                                   session_duration_min, fitness_level, available_equipment,
                                   total_weeks, current_week, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(routine.id.to_string())
        .bind(routine.user_id.to_string())
        .bind(&routine.name)
        .bind(&routine.goal)
        .bind(routine.status.to_string())
        .bind(routine.days_per_week as i64)
        .bind(routine.session_duration_min as i64)
        .bind(&routine.fitness_level)
        .bind(to_json_list(&routine.available_equipment))
        .bind(routine.total_weeks as i64)
        .bind(routine.current_week as i64)
        .bind(routine.created_at)
        .bind(routine.updated_at)
        .execute(&mut *tx)
        .await?;

        for week in &detail.weeks {
            sqlx::query(
                "INSERT INTO routine_weeks (id, routine_id, week_number, is_deload)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(week.id.to_string())
            .bind(routine.id.to_string())
            .bind(week.week_number as i64)
            .bind(week.is_deload)
            .execute(&mut *tx)
            .await?;

            for day in &week.days {
                sqlx::query(
                    "INSERT INTO routine_days (id, week_id, day_number, focus, is_rest_day, completed)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .bind(day.id.to_string())
                .bind(week.id.to_string())
                .bind(day.day_number as i64)
                .bind(&day.focus)
                .bind(day.is_rest_day)
                .bind(day.completed)
                .execute(&mut *tx)
                .await?;

                for exercise in &day.exercises {
                    sqlx::query(
                        "INSERT INTO routine_exercises (id, day_id, exercise_id, exercise_order,
                                                        sets, reps, rest_seconds, target_weight,
                                                        alternate_ids)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    )
                    .bind(exercise.id.to_string())
                    .bind(day.id.to_string())
                    .bind(exercise.exercise_id.to_string())
                    .bind(exercise.order as i64)
                    .bind(exercise.sets as i64)
                    .bind(exercise.reps as i64)
                    .bind(exercise.rest_seconds as i64)
                    .bind(exercise.target_weight)
                    .bind(to_json_list(&id_strings(&exercise.alternate_ids)))
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

const INSERT_EXERCISE_SQL: &str =
    "INSERT OR IGNORE INTO exercises (id, name, muscle_group, secondary_muscles, equipment,
                                      difficulty, tags, alternate_exercise_ids, instructions,
                                      tips, image_urls)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

fn bind_exercise<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    exercise: &'q Exercise,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    query
        .bind(exercise.id.to_string())
        .bind(&exercise.name)
        .bind(exercise.muscle_group.to_string())
        .bind(to_json_list(&muscle_strings(&exercise.secondary_muscles)))
        .bind(&exercise.equipment)
        .bind(exercise.difficulty.to_string())
        .bind(to_json_list(&exercise.tags))
        .bind(to_json_list(&id_strings(&exercise.alternate_exercise_ids)))
        .bind(to_json_list(&exercise.instructions))
        .bind(to_json_list(&exercise.tips))
        .bind(to_json_list(&exercise.image_urls))
}

#[async_trait]
impl ExerciseRepository for SqliteRepository {
    async fn fetch_all(&self) -> Result<Vec<Exercise>> {
        let rows: Vec<SqliteExerciseRow> = sqlx::query_as(
            "SELECT id, name, muscle_group, secondary_muscles, equipment, difficulty,
                    tags, alternate_exercise_ids, instructions, tips, image_urls
             FROM exercises
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(SqliteExerciseRow::into_exercise)
            .collect())
    }

    async fn insert(&self, exercise: &Exercise) -> Result<Uuid> {
        bind_exercise(sqlx::query(INSERT_EXERCISE_SQL), exercise)
            .execute(&self.pool)
            .await?;
        Ok(exercise.id)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl RoutineRepository for SqliteRepository {
    async fn persist_routine(
        &self,
        user_id: Uuid,
        preview: &GeneratedRoutine,
    ) -> Result<StoredRoutine> {
        let detail = plan_routine(user_id, preview);
        self.insert_routine_tree(&detail)
            .await
            .map_err(|e| persistence_error(detail.routine.id, e))?;
        Ok(detail.routine)
    }

    async fn find_routine(&self, id: Uuid) -> Result<Option<RoutineDetail>> {
        let sql = format!("SELECT {ROUTINE_COLUMNS} FROM routines WHERE id = ?1");
        let Some(row) = sqlx::query_as::<_, SqliteRoutineRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let weeks: Vec<(String, i64, bool)> = sqlx::query_as(
            "SELECT id, week_number, is_deload FROM routine_weeks
             WHERE routine_id = ?1 ORDER BY week_number",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let days: Vec<SqliteDayRow> = sqlx::query_as(
            "SELECT d.id, d.week_id, d.day_number, d.focus, d.is_rest_day, d.completed
             FROM routine_days d
             JOIN routine_weeks w ON w.id = d.week_id
             WHERE w.routine_id = ?1
             ORDER BY w.week_number, d.day_number",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let exercises: Vec<SqliteRoutineExerciseRow> = sqlx::query_as(
            "SELECT e.id, e.day_id, e.exercise_id, e.exercise_order, e.sets, e.reps,
                    e.rest_seconds, e.target_weight, e.alternate_ids
             FROM routine_exercises e
             JOIN routine_days d ON d.id = e.day_id
             JOIN routine_weeks w ON w.id = d.week_id
             WHERE w.routine_id = ?1
             ORDER BY w.week_number, d.day_number, e.exercise_order",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let weeks = build_weeks(
            weeks
                .into_iter()
                .map(|(week_id, week_number, is_deload)| WeekRow {
                    id: parse_id(&week_id, "routine week"),
                    week_number: week_number as u32,
                    is_deload,
                })
                .collect(),
            days.into_iter()
                .map(|row| {
                    let id = parse_id(&row.id, "routine day");
                    DayRow {
                        id,
                        week_id: parse_id(&row.week_id, "routine day week"),
                        day: StoredDay {
                            id,
                            day_number: row.day_number as u32,
                            focus: row.focus,
                            is_rest_day: row.is_rest_day,
                            completed: row.completed,
                            exercises: vec![],
                        },
                    }
                })
                .collect(),
            exercises
                .into_iter()
                .map(|row| ExerciseRow {
                    day_id: parse_id(&row.day_id, "routine exercise day"),
                    exercise: StoredRoutineExercise {
                        id: parse_id(&row.id, "routine exercise"),
                        exercise_id: parse_id(&row.exercise_id, "routine exercise catalog id"),
                        order: row.exercise_order as u32,
                        sets: row.sets as u32,
                        reps: row.reps as u32,
                        rest_seconds: row.rest_seconds as u32,
                        target_weight: row.target_weight,
                        alternate_ids: parse_json_list(&row.alternate_ids, "routine exercise")
                            .iter()
                            .filter_map(|raw| raw.parse().ok())
                            .collect(),
                    },
                })
                .collect(),
        );

        Ok(Some(RoutineDetail {
            routine: row.into_routine(),
            weeks,
        }))
    }

    async fn list_routines(&self, user_id: Uuid) -> Result<Vec<StoredRoutine>> {
        let sql = format!(
            "SELECT {ROUTINE_COLUMNS} FROM routines WHERE user_id = ?1 ORDER BY created_at DESC"
        );
        let rows: Vec<SqliteRoutineRow> = sqlx::query_as(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(SqliteRoutineRow::into_routine).collect())
    }

    async fn delete_routine(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM routines WHERE id = ?1 AND user_id = ?2")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[path = "sqlite_repo_tests.rs"]
mod sqlite_repo_tests;
