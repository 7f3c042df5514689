use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::services::{create_bulk, import_csv};
use crate::models::*;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/academic-groups", get(list_groups).post(create_group))
        .route("/venues", get(list_venues).post(create_venue))
        .route("/schedules", get(list_schedules).post(create_schedule))
        .route("/schedules/bulk", post(bulk_create_schedules))
        .route("/schedules/import", post(import_schedules_csv))
        .route("/schedules/{id}", get(get_schedule).put(update_schedule))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_groups(State(state): State<AppState>) -> Result<Json<Vec<AcademicGroup>>, AppError> {
    let groups = state.groups.list().await?;
    Ok(Json(groups))
}

async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<NewAcademicGroupRequest>
) -> Result<(StatusCode, Json<AcademicGroup>), AppError> {
    let group = state.groups.create(req).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

async fn list_venues(State(state): State<AppState>) -> Result<Json<Vec<Venue>>, AppError> {
    let venues = state.venues.list().await?;
    Ok(Json(venues))
}

async fn create_venue(
    State(state): State<AppState>,
    Json(req): Json<NewVenueRequest>
) -> Result<(StatusCode, Json<Venue>), AppError> {
    let venue = state.venues.create(req).await?;
    Ok((StatusCode::CREATED, Json(venue)))
}

async fn list_schedules(
    State(state): State<AppState>,
    Query(filter): Query<ScheduleFilter>
) -> Result<Json<Vec<Schedule>>, AppError> {
    let schedules = state.schedules.list(&filter).await?;
    Ok(Json(schedules))
}

async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<NewScheduleRequest>
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let schedule = state.schedules.create(req).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>
) -> Result<Json<Schedule>, AppError> {
    let schedule = state.schedules.get(id).await?;
    Ok(Json(schedule))
}

async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateScheduleRequest>
) -> Result<Json<Schedule>, AppError> {
    let schedule = state.schedules.update(id, req).await?;
    Ok(Json(schedule))
}

async fn bulk_create_schedules(
    State(state): State<AppState>,
    Json(items): Json<Vec<NewScheduleRequest>>
) -> Json<BulkCreateResult> {
    Json(create_bulk(&state.schedules, items).await)
}

/// Body is the raw CSV text.
async fn import_schedules_csv(
    State(state): State<AppState>,
    body: Bytes
) -> Result<Json<CsvImportResult>, AppError> {
    let result = import_csv(&state.schedules, body.as_ref()).await?;
    Ok(Json(result))
}
