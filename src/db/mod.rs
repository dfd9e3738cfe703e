use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

mod exercise_queries;
pub mod exercise_repository;
mod routine_queries;
pub mod routine_repository;
#[cfg(feature = "sqlite")]
pub mod sqlite_repo;

/// Postgres query functions, for callers that hold a pool directly
pub mod queries {
    pub use super::exercise_queries::*;
    pub use super::routine_queries::*;
}

pub use exercise_repository::{ExerciseRepository, PgExerciseRepository};
pub use routine_repository::{PgRoutineRepository, RoutineRepository};
#[cfg(feature = "sqlite")]
pub use sqlite_repo::SqliteRepository;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Open (creating if needed) a SQLite database and ensure its schema.
///
/// In-memory databases are per connection, so they get a single-connection pool.
#[cfg(feature = "sqlite")]
pub async fn create_sqlite_pool(database_url: &str) -> Result<sqlx::SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let in_memory = database_url.contains(":memory:");

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 5 })
        .acquire_timeout(Duration::from_secs(5));
    if in_memory {
        pool_options = pool_options.idle_timeout(None).max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    SqliteRepository::create_schema(&pool).await?;
    Ok(pool)
}
