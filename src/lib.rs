// Library exports for the server binary, the seeding tool and tests

pub mod cache;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use cache::CatalogCache;
use db::{ExerciseRepository, RoutineRepository};
use services::routine_generator::RoutineGenerator;
use std::sync::Arc;

// App state shared across request handlers
pub struct AppState {
    pub exercise_repo: Arc<dyn ExerciseRepository>,
    pub routine_repo: Arc<dyn RoutineRepository>,
    pub routine_generator: RoutineGenerator,
    pub cache: Option<Arc<dyn CatalogCache>>,
}
