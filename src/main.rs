use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibefit::cache::{CatalogCache, MemoryCatalogCache, RedisCatalogCache};
use vibefit::config::Config;
use vibefit::constants::DEFAULT_MEMORY_CACHE_MAX_ENTRIES;
use vibefit::db::{
    ExerciseRepository, PgExerciseRepository, PgRoutineRepository, RoutineRepository,
};
use vibefit::services::catalog_service::CatalogService;
use vibefit::services::routine_generator::RoutineGenerator;
use vibefit::AppState;

type Repositories = (Arc<dyn ExerciseRepository>, Arc<dyn RoutineRepository>);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vibefit=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting VibeFit API server");
    tracing::info!("Configuration loaded successfully");

    let (exercise_repo, routine_repo) = connect_store(&config).await?;

    match exercise_repo.count().await {
        Ok(0) => tracing::warn!("Exercise catalog is empty. Run seed_catalog to load exercises."),
        Ok(count) => tracing::info!("Exercise catalog holds {} exercises", count),
        Err(e) => tracing::warn!("Could not count exercises: {}", e),
    }

    // Initialize cache: try Redis, fall back to in-memory
    let cache: Arc<dyn CatalogCache> = if let Some(ref redis_url) = config.redis_url {
        tracing::info!("Connecting to Redis cache...");
        match RedisCatalogCache::new(redis_url, config.catalog_cache_ttl).await {
            Ok(redis_cache) => {
                tracing::info!("Redis cache connection established");
                Arc::new(redis_cache)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to connect to Redis: {}. Falling back to in-memory cache.",
                    e
                );
                Arc::new(MemoryCatalogCache::new(
                    config.catalog_cache_ttl,
                    DEFAULT_MEMORY_CACHE_MAX_ENTRIES,
                ))
            }
        }
    } else {
        tracing::info!("Redis URL not configured. Using in-memory cache.");
        Arc::new(MemoryCatalogCache::new(
            config.catalog_cache_ttl,
            DEFAULT_MEMORY_CACHE_MAX_ENTRIES,
        ))
    };

    // Initialize services
    let catalog = CatalogService::new(exercise_repo.clone(), Some(cache.clone()));
    let routine_generator = RoutineGenerator::new(catalog, config.generator.clone());

    // Create application state
    let state = Arc::new(AppState {
        exercise_repo,
        routine_repo,
        routine_generator,
        cache: Some(cache),
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", vibefit::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Pick the store from `DATABASE_URL`: SQLite for `sqlite:` URLs, Postgres otherwise.
async fn connect_store(config: &Config) -> Result<Repositories, Box<dyn std::error::Error>> {
    if config.uses_sqlite() {
        #[cfg(feature = "sqlite")]
        {
            tracing::info!("Opening SQLite database...");
            let pool = vibefit::db::create_sqlite_pool(&config.database_url).await?;
            let repo = Arc::new(vibefit::db::SqliteRepository::new(pool));
            tracing::info!("SQLite database ready");
            let exercise_repo: Arc<dyn ExerciseRepository> = repo.clone();
            let routine_repo: Arc<dyn RoutineRepository> = repo;
            return Ok((exercise_repo, routine_repo));
        }

        #[cfg(not(feature = "sqlite"))]
        return Err("DATABASE_URL is a SQLite URL but the sqlite feature is disabled".into());
    }

    tracing::info!("Connecting to database...");
    let db_pool = vibefit::db::create_pool(&config.database_url).await?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Database migrations completed");

    let exercise_repo: Arc<dyn ExerciseRepository> =
        Arc::new(PgExerciseRepository::new(db_pool.clone()));
    let routine_repo: Arc<dyn RoutineRepository> = Arc::new(PgRoutineRepository::new(db_pool));
    Ok((exercise_repo, routine_repo))
}
