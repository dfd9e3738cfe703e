use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /health - Check that the catalog store and cache are reachable
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    // Catalog store (also proves the database answers)
    match state.exercise_repo.count().await {
        Ok(count) => {
            status["checks"]["database"] = json!("ok");
            status["checks"]["exercise_count"] = json!(count);
            if count == 0 {
                status["checks"]["catalog"] = json!("empty");
            }
        }
        Err(e) => {
            status["checks"]["database"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    match state.cache {
        Some(ref cache) => {
            let healthy = cache.health_check().await;
            status["checks"]["cache"] = json!({
                "backend": cache.backend_name(),
                "healthy": healthy,
                "stats": cache.get_stats().await,
            });
            // Generation still works without the cache
            if !healthy && status["status"] == "ok" {
                status["status"] = json!("degraded");
            }
        }
        None => {
            status["checks"]["cache"] = json!("disabled");
        }
    }

    Json(status)
}
