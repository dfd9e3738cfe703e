use serial_test::serial;
use uuid::Uuid;
use vibefit::db::{
    ExerciseRepository, PgExerciseRepository, PgRoutineRepository, RoutineRepository,
};
use vibefit::models::RoutineStatus;
use vibefit::services::catalog_service::CatalogService;
use vibefit::services::routine_generator::RoutineGenerator;
use vibefit::AppError;
use std::sync::Arc;

mod common;

async fn seeded_pool() -> sqlx::PgPool {
    let pool = common::setup_test_db().await;
    common::cleanup_test_db(&pool).await;

    let repo = PgExerciseRepository::new(pool.clone());
    for exercise in common::seed_catalog() {
        repo.insert(&exercise).await.expect("Failed to insert exercise");
    }
    pool
}

#[tokio::test]
#[ignore] // Requires database
#[serial]
async fn test_catalog_insert_and_fetch() {
    let pool = seeded_pool().await;
    let repo = PgExerciseRepository::new(pool.clone());

    assert_eq!(repo.count().await.unwrap(), 36);

    // Re-inserting existing ids is a no-op
    for exercise in common::seed_catalog().iter().take(3) {
        repo.insert(exercise).await.unwrap();
    }
    assert_eq!(repo.count().await.unwrap(), 36);

    let mut expected = common::seed_catalog();
    expected.sort_by(|a, b| a.name.cmp(&b.name));
    let fetched = repo.fetch_all().await.unwrap();
    assert_eq!(fetched.len(), expected.len());
    assert_eq!(fetched[0].name, expected[0].name);

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[ignore] // Requires database
#[serial]
async fn test_routine_round_trip() {
    let pool = seeded_pool().await;
    let exercises = Arc::new(PgExerciseRepository::new(pool.clone()));
    let routines = PgRoutineRepository::new(pool.clone());
    let generator = RoutineGenerator::new(
        CatalogService::new(exercises, None),
        common::get_test_config().generator,
    );

    let request = common::request("strength", 4, 60, "advanced", &["barbell", "bodyweight"], Some(4));
    let preview = generator.generate_preview(&request).await.unwrap();
    let user_id = Uuid::new_v4();

    let stored = routines.persist_routine(user_id, &preview).await.unwrap();
    assert_eq!(stored.status, RoutineStatus::Active);

    let detail = routines.find_routine(stored.id).await.unwrap().unwrap();
    assert_eq!(detail.routine, stored);
    assert_eq!(detail.weeks.len(), preview.weeks.len());
    for (week, source) in detail.weeks.iter().zip(&preview.weeks) {
        assert_eq!(week.is_deload, source.is_deload);
        assert_eq!(week.days.len(), source.days.len());
        for (day, source_day) in week.days.iter().zip(&source.days) {
            let ids: Vec<Uuid> = day.exercises.iter().map(|e| e.exercise_id).collect();
            let expected: Vec<Uuid> = source_day.exercises.iter().map(|e| e.exercise_id).collect();
            assert_eq!(ids, expected);
            let orders: Vec<u32> = day.exercises.iter().map(|e| e.order).collect();
            assert_eq!(orders, (1..=ids.len() as u32).collect::<Vec<u32>>());
        }
    }

    assert_eq!(routines.list_routines(user_id).await.unwrap().len(), 1);
    assert!(routines.delete_routine(stored.id, user_id).await.unwrap());
    assert!(routines.find_routine(stored.id).await.unwrap().is_none());

    common::cleanup_test_db(&pool).await;
}

#[tokio::test]
#[ignore] // Requires database
#[serial]
async fn test_failed_persist_rolls_back() {
    let pool = seeded_pool().await;
    let exercises = Arc::new(PgExerciseRepository::new(pool.clone()));
    let routines = PgRoutineRepository::new(pool.clone());
    let generator = RoutineGenerator::new(
        CatalogService::new(exercises, None),
        common::get_test_config().generator,
    );

    let request = common::request("general-fitness", 3, 45, "intermediate", &[], Some(2));
    let mut preview = generator.generate_preview(&request).await.unwrap();
    // Unknown catalog id on the last exercise of the last day
    let last_day = preview
        .weeks
        .last_mut()
        .and_then(|w| w.days.last_mut())
        .unwrap();
    last_day.exercises.last_mut().unwrap().exercise_id = Uuid::new_v4();

    let user_id = Uuid::new_v4();
    let result = routines.persist_routine(user_id, &preview).await;
    assert!(matches!(result, Err(AppError::Persistence(_))));
    assert!(routines.list_routines(user_id).await.unwrap().is_empty());

    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM routine_weeks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);

    common::cleanup_test_db(&pool).await;
}
