//! CLI tool that loads a JSON exercise catalog into the configured store.
//!
//! ```text
//! DATABASE_URL=sqlite://vibefit.db cargo run --bin seed_catalog -- \
//!     --input=data/exercises.json
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use std::{env, fs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibefit::cache::{CatalogCache, RedisCatalogCache};
use vibefit::config::Config;
use vibefit::db::{ExerciseRepository, PgExerciseRepository};
use vibefit::models::Exercise;
use vibefit::services::catalog_service::CatalogService;

const DEFAULT_INPUT: &str = "data/exercises.json";

fn print_help() {
    eprintln!(
        "\
Usage: seed_catalog [OPTIONS]

Load exercises from a JSON array into the database named by DATABASE_URL.
Exercises whose id already exists are skipped. When REDIS_URL is set the
cached catalog snapshot is dropped so running servers pick up the changes.

Options:
  --input=PATH     Path to the JSON catalog (default: {DEFAULT_INPUT})
  --help           Show this help message"
    );
}

/// Reject entries the generator could never use before touching the store.
fn check_catalog(exercises: &[Exercise]) -> Result<(), String> {
    for (idx, exercise) in exercises.iter().enumerate() {
        if exercise.name.trim().is_empty() {
            return Err(format!("Exercise #{} ({}) has no name", idx, exercise.id));
        }
        if exercise.equipment.trim().is_empty() {
            return Err(format!("Exercise '{}' has no equipment", exercise.name));
        }
    }

    let mut ids: Vec<_> = exercises.iter().map(|e| e.id).collect();
    ids.sort();
    ids.dedup();
    if ids.len() != exercises.len() {
        return Err("Catalog contains duplicate exercise ids".to_string());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vibefit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help") {
        print_help();
        return Ok(());
    }

    let input = args
        .iter()
        .find_map(|a| a.strip_prefix("--input="))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

    if !input.exists() {
        return Err(format!("Input file does not exist: {}", input.display()).into());
    }

    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    let start = Instant::now();
    let exercises: Vec<Exercise> = serde_json::from_str(&fs::read_to_string(&input)?)?;
    check_catalog(&exercises)?;
    eprintln!("Read {} exercises from {}", exercises.len(), input.display());

    let catalog = CatalogService::new(
        open_repository(&config).await?,
        open_cache(&config).await,
    );
    let before = catalog.count().await?;

    for exercise in &exercises {
        catalog.add_exercise(exercise).await?;
    }

    let after = catalog.count().await?;
    eprintln!(
        "Inserted {} new exercises ({} total) in {:.1}s",
        after - before,
        after,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

async fn open_repository(
    config: &Config,
) -> Result<Arc<dyn ExerciseRepository>, Box<dyn std::error::Error>> {
    if config.uses_sqlite() {
        #[cfg(feature = "sqlite")]
        {
            let pool = vibefit::db::create_sqlite_pool(&config.database_url).await?;
            let repo: Arc<dyn ExerciseRepository> =
                Arc::new(vibefit::db::SqliteRepository::new(pool));
            return Ok(repo);
        }

        #[cfg(not(feature = "sqlite"))]
        return Err("DATABASE_URL is a SQLite URL but the sqlite feature is disabled".into());
    }

    let pool = vibefit::db::create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(Arc::new(PgExerciseRepository::new(pool)))
}

async fn open_cache(config: &Config) -> Option<Arc<dyn CatalogCache>> {
    let redis_url = config.redis_url.as_ref()?;
    match RedisCatalogCache::new(redis_url, config.catalog_cache_ttl).await {
        Ok(cache) => Some(Arc::new(cache)),
        Err(e) => {
            tracing::warn!("Redis unavailable, cached catalog will expire on its own: {}", e);
            None
        }
    }
}
