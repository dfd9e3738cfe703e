use crate::cache::CatalogCache;
use crate::db::ExerciseRepository;
use crate::error::Result;
use crate::models::Exercise;
use std::sync::Arc;

/// Read-only view of the exercise catalog used by the generator.
///
/// Reads go to the cache first when one is configured; a miss loads the full
/// catalog from the repository and refills the cache.
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ExerciseRepository>,
    cache: Option<Arc<dyn CatalogCache>>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn ExerciseRepository>, cache: Option<Arc<dyn CatalogCache>>) -> Self {
        CatalogService { repo, cache }
    }

    /// Full catalog snapshot for one generation call.
    pub async fn snapshot(&self) -> Result<Vec<Exercise>> {
        if let Some(ref cache) = self.cache {
            if let Some(exercises) = cache.get_catalog().await {
                tracing::debug!("Catalog served from {} cache", cache.backend_name());
                return Ok(exercises);
            }
        }

        let exercises = self.repo.fetch_all().await?;
        tracing::debug!("Loaded {} exercises from catalog store", exercises.len());

        if let Some(ref cache) = self.cache {
            if !exercises.is_empty() {
                cache.cache_catalog(&exercises).await;
            }
        }

        Ok(exercises)
    }

    pub async fn count(&self) -> Result<i64> {
        self.repo.count().await
    }

    /// Add an exercise and drop any cached snapshot.
    pub async fn add_exercise(&self, exercise: &Exercise) -> Result<()> {
        self.repo.insert(exercise).await?;
        if let Some(ref cache) = self.cache {
            cache.invalidate().await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCatalogCache;
    use crate::error::AppError;
    use crate::models::{Difficulty, MuscleGroup};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct CountingRepo {
        exercises: Mutex<Vec<Exercise>>,
        fetches: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ExerciseRepository for CountingRepo {
        async fn fetch_all(&self) -> Result<Vec<Exercise>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::Database(sqlx::Error::PoolClosed));
            }
            Ok(self.exercises.lock().unwrap().clone())
        }

        async fn insert(&self, exercise: &Exercise) -> Result<Uuid> {
            self.exercises.lock().unwrap().push(exercise.clone());
            Ok(exercise.id)
        }

        async fn count(&self) -> Result<i64> {
            Ok(self.exercises.lock().unwrap().len() as i64)
        }
    }

    fn make_exercise(name: &str) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            name: name.to_string(),
            muscle_group: MuscleGroup::Legs,
            secondary_muscles: vec![MuscleGroup::Glutes],
            equipment: "barbell".to_string(),
            difficulty: Difficulty::Intermediate,
            tags: vec!["compound".to_string()],
            alternate_exercise_ids: vec![],
            instructions: vec![],
            tips: vec![],
            image_urls: vec![],
        }
    }

    fn repo_with(names: &[&str]) -> Arc<CountingRepo> {
        Arc::new(CountingRepo {
            exercises: Mutex::new(names.iter().map(|n| make_exercise(n)).collect()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn snapshot_without_cache_hits_repository_each_time() {
        let repo = repo_with(&["Squat"]);
        let service = CatalogService::new(repo.clone(), None);

        service.snapshot().await.unwrap();
        service.snapshot().await.unwrap();

        assert_eq!(repo.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn snapshot_is_served_from_cache_after_first_load() {
        let repo = repo_with(&["Squat", "Deadlift"]);
        let cache: Arc<dyn CatalogCache> = Arc::new(MemoryCatalogCache::new(60, 4));
        let service = CatalogService::new(repo.clone(), Some(cache.clone()));

        let first = service.snapshot().await.unwrap();
        let second = service.snapshot().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get_stats().await.hits, 1);
    }

    #[tokio::test]
    async fn add_exercise_invalidates_cached_snapshot() {
        let repo = repo_with(&["Squat"]);
        let cache: Arc<dyn CatalogCache> = Arc::new(MemoryCatalogCache::new(60, 4));
        let service = CatalogService::new(repo.clone(), Some(cache));

        assert_eq!(service.snapshot().await.unwrap().len(), 1);
        service.add_exercise(&make_exercise("Lunge")).await.unwrap();

        assert_eq!(service.snapshot().await.unwrap().len(), 2);
        assert_eq!(service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn repository_failure_propagates() {
        let repo = Arc::new(CountingRepo {
            fail: true,
            ..Default::default()
        });
        let service = CatalogService::new(repo, None);

        assert!(matches!(
            service.snapshot().await,
            Err(AppError::Database(_))
        ));
    }
}
