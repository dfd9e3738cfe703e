use crate::error::{AppError, Result};
use crate::models::{
    GeneratedRoutine, RoutineDetail, RoutineStatus, StoredDay, StoredRoutine,
    StoredRoutineExercise, StoredWeek,
};
use async_trait::async_trait;
use std::collections::HashMap;
use time::OffsetDateTime;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Shared helpers (used by both Pg and SQLite repos)
// ---------------------------------------------------------------------------

/// Assign fresh ids to every node of a preview. The result is exactly what
/// gets written, so a successful persist can return it without re-reading.
pub(super) fn plan_routine(user_id: Uuid, preview: &GeneratedRoutine) -> RoutineDetail {
    let now = OffsetDateTime::now_utc();
    // Postgres keeps microseconds; drop the rest so reads compare equal.
    let now = now.replace_microsecond(now.microsecond()).unwrap_or(now);

    let routine = StoredRoutine {
        id: Uuid::new_v4(),
        user_id,
        name: preview.name.clone(),
        goal: preview.goal.clone(),
        status: RoutineStatus::Active,
        days_per_week: preview.days_per_week,
        session_duration_min: preview.session_duration_min,
        fitness_level: preview.fitness_level.clone(),
        available_equipment: preview.available_equipment.clone(),
        total_weeks: preview.total_weeks,
        current_week: 1,
        created_at: now,
        updated_at: now,
    };

    let weeks = preview
        .weeks
        .iter()
        .map(|week| StoredWeek {
            id: Uuid::new_v4(),
            week_number: week.week_number,
            is_deload: week.is_deload,
            days: week
                .days
                .iter()
                .map(|day| StoredDay {
                    id: Uuid::new_v4(),
                    day_number: day.day_number,
                    focus: day.focus.clone(),
                    is_rest_day: day.is_rest_day,
                    completed: false,
                    exercises: day
                        .exercises
                        .iter()
                        .map(|e| StoredRoutineExercise {
                            id: Uuid::new_v4(),
                            exercise_id: e.exercise_id,
                            order: e.order,
                            sets: e.sets,
                            reps: e.reps,
                            rest_seconds: e.rest_seconds,
                            target_weight: e.target_weight,
                            alternate_ids: e.alternate_ids.clone(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    RoutineDetail { routine, weeks }
}

pub(super) fn parse_status(raw: &str, routine_id: Uuid) -> RoutineStatus {
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!(
            "Invalid status '{}' for routine {}, defaulting to generated",
            raw,
            routine_id
        );
        RoutineStatus::Generated
    })
}

/// Flat child rows of one routine, ordered by their numbers.
pub(super) struct WeekRow {
    pub id: Uuid,
    pub week_number: u32,
    pub is_deload: bool,
}

pub(super) struct DayRow {
    pub id: Uuid,
    pub week_id: Uuid,
    pub day: StoredDay,
}

pub(super) struct ExerciseRow {
    pub day_id: Uuid,
    pub exercise: StoredRoutineExercise,
}

/// Nest flat rows back into the week -> day -> exercise tree. Input order is
/// kept within each parent.
pub(super) fn build_weeks(
    weeks: Vec<WeekRow>,
    days: Vec<DayRow>,
    exercises: Vec<ExerciseRow>,
) -> Vec<StoredWeek> {
    let mut exercises_by_day: HashMap<Uuid, Vec<StoredRoutineExercise>> = HashMap::new();
    for row in exercises {
        exercises_by_day
            .entry(row.day_id)
            .or_default()
            .push(row.exercise);
    }

    let mut days_by_week: HashMap<Uuid, Vec<StoredDay>> = HashMap::new();
    for row in days {
        let mut day = row.day;
        day.exercises = exercises_by_day.remove(&row.id).unwrap_or_default();
        days_by_week.entry(row.week_id).or_default().push(day);
    }

    weeks
        .into_iter()
        .map(|week| StoredWeek {
            id: week.id,
            week_number: week.week_number,
            is_deload: week.is_deload,
            days: days_by_week.remove(&week.id).unwrap_or_default(),
        })
        .collect()
}

pub(super) fn persistence_error(routine_id: Uuid, e: sqlx::Error) -> AppError {
    AppError::Persistence(format!("routine {}: {}", routine_id, e))
}

#[async_trait]
pub trait RoutineRepository: Send + Sync {
    /// Write the whole preview tree in one transaction and return the new
    /// routine record. Nothing is left behind on failure.
    async fn persist_routine(&self, user_id: Uuid, preview: &GeneratedRoutine)
        -> Result<StoredRoutine>;

    async fn find_routine(&self, id: Uuid) -> Result<Option<RoutineDetail>>;

    /// Routines of one user, newest first.
    async fn list_routines(&self, user_id: Uuid) -> Result<Vec<StoredRoutine>>;

    /// Returns false when no routine with that id belongs to the user.
    async fn delete_routine(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
}

pub struct PgRoutineRepository {
    pool: sqlx::PgPool,
}

impl PgRoutineRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoutineRepository for PgRoutineRepository {
    async fn persist_routine(
        &self,
        user_id: Uuid,
        preview: &GeneratedRoutine,
    ) -> Result<StoredRoutine> {
        let detail = plan_routine(user_id, preview);
        super::routine_queries::insert_routine_tree(&self.pool, &detail)
            .await
            .map_err(|e| persistence_error(detail.routine.id, e))?;
        Ok(detail.routine)
    }

    async fn find_routine(&self, id: Uuid) -> Result<Option<RoutineDetail>> {
        Ok(super::routine_queries::find_routine_tree(&self.pool, id).await?)
    }

    async fn list_routines(&self, user_id: Uuid) -> Result<Vec<StoredRoutine>> {
        Ok(super::routine_queries::list_routines_for_user(&self.pool, user_id).await?)
    }

    async fn delete_routine(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM routines WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeneratedDay, GeneratedExercise, GeneratedWeek, MuscleGroup, ProgressionStrategy};

    fn preview() -> GeneratedRoutine {
        let exercise = GeneratedExercise {
            exercise_id: Uuid::new_v4(),
            exercise_name: "Deadlift".to_string(),
            muscle_group: MuscleGroup::Back,
            equipment: "barbell".to_string(),
            image_urls: vec![],
            instructions: vec![],
            tips: vec![],
            sets: 4,
            reps: 5,
            rest_seconds: 180,
            target_weight: Some(2.5),
            order: 1,
            alternate_ids: vec![Uuid::new_v4()],
        };
        GeneratedRoutine {
            name: "Strength – 2 Day Plan".to_string(),
            goal: "strength".to_string(),
            days_per_week: 2,
            session_duration_min: 60,
            fitness_level: "advanced".to_string(),
            available_equipment: vec!["barbell".to_string()],
            total_weeks: 1,
            progression_strategy: ProgressionStrategy::WaveLoading,
            weeks: vec![GeneratedWeek {
                week_number: 1,
                is_deload: false,
                days: vec![GeneratedDay {
                    day_number: 1,
                    focus: "Upper Body".to_string(),
                    is_rest_day: false,
                    exercises: vec![exercise],
                }],
            }],
        }
    }

    #[test]
    fn test_plan_routine_starts_active_at_week_one() {
        let user = Uuid::new_v4();
        let source = preview();
        let detail = plan_routine(user, &source);

        assert_eq!(detail.routine.user_id, user);
        assert_eq!(detail.routine.status, RoutineStatus::Active);
        assert_eq!(detail.routine.current_week, 1);
        assert_eq!(detail.routine.created_at, detail.routine.updated_at);
        assert_eq!(detail.routine.name, source.name);

        let day = &detail.weeks[0].days[0];
        assert!(!day.completed);
        assert_eq!(day.exercises[0].exercise_id, source.weeks[0].days[0].exercises[0].exercise_id);
        assert_eq!(day.exercises[0].target_weight, Some(2.5));
    }

    #[test]
    fn test_build_weeks_nests_rows() {
        let detail = plan_routine(Uuid::new_v4(), &preview());
        let week = &detail.weeks[0];
        let day = &week.days[0];

        let rebuilt = build_weeks(
            vec![WeekRow {
                id: week.id,
                week_number: week.week_number,
                is_deload: week.is_deload,
            }],
            vec![DayRow {
                id: day.id,
                week_id: week.id,
                day: StoredDay {
                    exercises: vec![],
                    ..day.clone()
                },
            }],
            day.exercises
                .iter()
                .map(|e| ExerciseRow {
                    day_id: day.id,
                    exercise: e.clone(),
                })
                .collect(),
        );

        assert_eq!(rebuilt, detail.weeks);
    }

    #[test]
    fn test_parse_status_fallback() {
        assert_eq!(parse_status("active", Uuid::nil()), RoutineStatus::Active);
        assert_eq!(parse_status("paused", Uuid::nil()), RoutineStatus::Generated);
    }
}
