use crate::error::{AppError, Result};
use crate::models::routine::{
    GenerateAndSaveRequest, GenerateAndSaveResponse, SavePreviewRequest, UserQuery,
};
use crate::models::{GenerateRoutineRequest, GeneratedRoutine, RoutineDetail, StoredRoutine};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

fn validate_request(state: &AppState, request: &GenerateRoutineRequest) -> Result<()> {
    request
        .validate(state.routine_generator.config().max_total_weeks)
        .map_err(AppError::InvalidRequest)
}

/// POST /routines/preview
/// Generate a routine without saving it
pub async fn preview_routine(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRoutineRequest>,
) -> Result<Json<GeneratedRoutine>> {
    validate_request(&state, &request)?;

    tracing::info!(
        goal = %request.goal,
        days_per_week = request.days_per_week,
        session_duration_min = request.session_duration_min,
        fitness_level = %request.fitness_level,
        "Routine preview request"
    );

    let preview = state.routine_generator.generate_preview(&request).await?;
    Ok(Json(preview))
}

/// POST /routines/generate
/// Generate a routine and persist it for the user in one call
pub async fn generate_routine(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateAndSaveRequest>,
) -> Result<(StatusCode, Json<GenerateAndSaveResponse>)> {
    validate_request(&state, &body.request)?;

    tracing::info!(
        user_id = %body.user_id,
        goal = %body.request.goal,
        days_per_week = body.request.days_per_week,
        "Routine generate-and-save request"
    );

    let preview = state
        .routine_generator
        .generate_preview(&body.request)
        .await?;
    let routine = state
        .routine_repo
        .persist_routine(body.user_id, &preview)
        .await?;

    tracing::info!("Saved routine {} for user {}", routine.id, routine.user_id);

    Ok((
        StatusCode::CREATED,
        Json(GenerateAndSaveResponse { routine, preview }),
    ))
}

/// POST /routines
/// Persist a preview the client already holds, without regenerating it.
/// The preview is checked against the plan invariants and the catalog first.
pub async fn save_preview(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SavePreviewRequest>,
) -> Result<(StatusCode, Json<StoredRoutine>)> {
    let generator = &state.routine_generator;
    body.preview
        .validate(generator.config().max_total_weeks)
        .map_err(AppError::InvalidRequest)?;

    let known: HashSet<Uuid> = generator
        .catalog()
        .snapshot()
        .await?
        .iter()
        .map(|e| e.id)
        .collect();
    if let Some(unknown) = body.preview.exercise_ids().find(|id| !known.contains(id)) {
        return Err(AppError::InvalidRequest(format!(
            "Unknown exercise id {}",
            unknown
        )));
    }

    let routine = state
        .routine_repo
        .persist_routine(body.user_id, &body.preview)
        .await?;

    tracing::info!("Saved preview as routine {} for user {}", routine.id, routine.user_id);

    Ok((StatusCode::CREATED, Json(routine)))
}

/// GET /routines?userId=
pub async fn list_routines(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<StoredRoutine>>> {
    let routines = state.routine_repo.list_routines(query.user_id).await?;
    tracing::debug!("Listed {} routines for user {}", routines.len(), query.user_id);
    Ok(Json(routines))
}

/// GET /routines/{id}
pub async fn get_routine(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoutineDetail>> {
    state
        .routine_repo
        .find_routine(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", id)))
}

/// DELETE /routines/{id}?userId=
pub async fn delete_routine(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode> {
    if state.routine_repo.delete_routine(id, query.user_id).await? {
        tracing::info!("Deleted routine {} for user {}", id, query.user_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Routine {} not found", id)))
    }
}
