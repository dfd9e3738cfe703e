use crate::models::{RoutineDetail, StoredDay, StoredRoutine, StoredRoutineExercise};
use sqlx::types::Json;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::routine_repository::{build_weeks, parse_status, DayRow, ExerciseRow, WeekRow};

const ROUTINE_COLUMNS: &str = "id, user_id, name, goal, status, days_per_week, session_duration_min,
    fitness_level, available_equipment, total_weeks, current_week, created_at, updated_at";

/// Insert the routine and its children in one transaction. Dropping the
/// transaction on an early return rolls everything back.
pub async fn insert_routine_tree(pool: &PgPool, detail: &RoutineDetail) -> Result<(), sqlx::Error> {
    let routine = &detail.routine;
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO routines (id, user_id, name, goal, status, days_per_week, session_duration_min,
                              fitness_level, available_equipment, total_weeks, current_week,
                              created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(routine.id)
    .bind(routine.user_id)
    .bind(&routine.name)
    .bind(&routine.goal)
    .bind(routine.status.to_string())
    .bind(routine.days_per_week as i32)
    .bind(routine.session_duration_min as i32)
    .bind(&routine.fitness_level)
    .bind(Json(&routine.available_equipment))
    .bind(routine.total_weeks as i32)
    .bind(routine.current_week as i32)
    .bind(routine.created_at)
    .bind(routine.updated_at)
    .execute(&mut *tx)
    .await?;

    for week in &detail.weeks {
        sqlx::query(
            "INSERT INTO routine_weeks (id, routine_id, week_number, is_deload)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(week.id)
        .bind(routine.id)
        .bind(week.week_number as i32)
        .bind(week.is_deload)
        .execute(&mut *tx)
        .await?;

        for day in &week.days {
            sqlx::query(
                "INSERT INTO routine_days (id, week_id, day_number, focus, is_rest_day, completed)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(day.id)
            .bind(week.id)
            .bind(day.day_number as i32)
            .bind(&day.focus)
            .bind(day.is_rest_day)
            .bind(day.completed)
            .execute(&mut *tx)
            .await?;

            for exercise in &day.exercises {
                sqlx::query(
                    r#"
                    INSERT INTO routine_exercises (id, day_id, exercise_id, exercise_order, sets, reps,
                                                   rest_seconds, target_weight, alternate_ids)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    "#,
                )
                .bind(exercise.id)
                .bind(day.id)
                .bind(exercise.exercise_id)
                .bind(exercise.order as i32)
                .bind(exercise.sets as i32)
                .bind(exercise.reps as i32)
                .bind(exercise.rest_seconds as i32)
                .bind(exercise.target_weight)
                .bind(Json(&exercise.alternate_ids))
                .execute(&mut *tx)
                .await?;
            }
        }
    }

    tx.commit().await?;
    Ok(())
}

pub async fn find_routine_tree(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<RoutineDetail>, sqlx::Error> {
    let sql = format!("SELECT {ROUTINE_COLUMNS} FROM routines WHERE id = $1");
    let Some(row) = sqlx::query_as::<_, RoutineRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let weeks: Vec<(Uuid, i32, bool)> = sqlx::query_as(
        "SELECT id, week_number, is_deload FROM routine_weeks
         WHERE routine_id = $1 ORDER BY week_number",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let days = sqlx::query_as::<_, DayDbRow>(
        r#"
        SELECT d.id, d.week_id, d.day_number, d.focus, d.is_rest_day, d.completed
        FROM routine_days d
        JOIN routine_weeks w ON w.id = d.week_id
        WHERE w.routine_id = $1
        ORDER BY w.week_number, d.day_number
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let exercises = sqlx::query_as::<_, ExerciseDbRow>(
        r#"
        SELECT e.id, e.day_id, e.exercise_id, e.exercise_order, e.sets, e.reps,
               e.rest_seconds, e.target_weight, e.alternate_ids
        FROM routine_exercises e
        JOIN routine_days d ON d.id = e.day_id
        JOIN routine_weeks w ON w.id = d.week_id
        WHERE w.routine_id = $1
        ORDER BY w.week_number, d.day_number, e.exercise_order
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let weeks = build_weeks(
        weeks
            .into_iter()
            .map(|(id, week_number, is_deload)| WeekRow {
                id,
                week_number: week_number as u32,
                is_deload,
            })
            .collect(),
        days.into_iter().map(DayDbRow::into_row).collect(),
        exercises.into_iter().map(ExerciseDbRow::into_row).collect(),
    );

    Ok(Some(RoutineDetail {
        routine: row.into_routine(),
        weeks,
    }))
}

pub async fn list_routines_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<StoredRoutine>, sqlx::Error> {
    let sql = format!(
        "SELECT {ROUTINE_COLUMNS} FROM routines WHERE user_id = $1 ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, RoutineRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(RoutineRow::into_routine).collect())
}

#[derive(sqlx::FromRow)]
struct RoutineRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    goal: String,
    status: String,
    days_per_week: i32,
    session_duration_min: i32,
    fitness_level: String,
    available_equipment: Json<Vec<String>>,
    total_weeks: i32,
    current_week: i32,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl RoutineRow {
    fn into_routine(self) -> StoredRoutine {
        StoredRoutine {
            status: parse_status(&self.status, self.id),
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            goal: self.goal,
            days_per_week: self.days_per_week as u32,
            session_duration_min: self.session_duration_min as u32,
            fitness_level: self.fitness_level,
            available_equipment: self.available_equipment.0,
            total_weeks: self.total_weeks as u32,
            current_week: self.current_week as u32,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DayDbRow {
    id: Uuid,
    week_id: Uuid,
    day_number: i32,
    focus: String,
    is_rest_day: bool,
    completed: bool,
}

impl DayDbRow {
    fn into_row(self) -> DayRow {
        DayRow {
            id: self.id,
            week_id: self.week_id,
            day: StoredDay {
                id: self.id,
                day_number: self.day_number as u32,
                focus: self.focus,
                is_rest_day: self.is_rest_day,
                completed: self.completed,
                exercises: vec![],
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct ExerciseDbRow {
    id: Uuid,
    day_id: Uuid,
    exercise_id: Uuid,
    exercise_order: i32,
    sets: i32,
    reps: i32,
    rest_seconds: i32,
    target_weight: Option<f64>,
    alternate_ids: Json<Vec<Uuid>>,
}

impl ExerciseDbRow {
    fn into_row(self) -> ExerciseRow {
        ExerciseRow {
            day_id: self.day_id,
            exercise: StoredRoutineExercise {
                id: self.id,
                exercise_id: self.exercise_id,
                order: self.exercise_order as u32,
                sets: self.sets as u32,
                reps: self.reps as u32,
                rest_seconds: self.rest_seconds as u32,
                target_weight: self.target_weight,
                alternate_ids: self.alternate_ids.0,
            },
        }
    }
}
