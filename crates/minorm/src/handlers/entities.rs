//! Generic CRUD routes over every wired entity.
//!
//! The `{entity}` path segment is the table name; names with no mapper
//! answer 404.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use minorm_core::entity::EntityMapper;
use minorm_core::storage::{MutateResult, OrmError, Row};

use crate::{handlers::AppError, state::AppState};

fn mapper(state: &AppState, entity: &str) -> Result<Arc<EntityMapper>, AppError> {
    state.models.get(entity).cloned().ok_or_else(|| {
        AppError::from(OrmError::NotFound {
            table: "entity".to_string(),
            id: entity.to_string(),
        })
    })
}

/// List every row of an entity (GET /api/{entity}).
pub async fn list_rows(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> Result<Json<Vec<Row>>, AppError> {
    let rows = mapper(&state, &entity)?.all().await?;
    Ok(Json(rows))
}

/// Create a row (POST /api/{entity}).
pub async fn create_row(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(record): Json<Row>,
) -> Result<impl IntoResponse, AppError> {
    let result = mapper(&state, &entity)?.create(&record).await?;

    tracing::info!(
        entity = %entity,
        inserted_id = ?result.inserted_id,
        "Created row"
    );

    Ok((StatusCode::CREATED, Json(result)))
}

/// Get a single row by ID (GET /api/{entity}/{id}).
pub async fn get_row(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, i64)>,
) -> Result<Json<Row>, AppError> {
    mapper(&state, &entity)?
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::from(OrmError::NotFound {
                table: entity,
                id: id.to_string(),
            })
        })
}

/// Update a row by ID (PUT /api/{entity}/{id}).
pub async fn update_row(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, i64)>,
    Json(record): Json<Row>,
) -> Result<Json<MutateResult>, AppError> {
    let result = mapper(&state, &entity)?.update(id, &record).await?;

    tracing::info!(entity = %entity, id, affected = result.affected_count, "Updated row");

    Ok(Json(result))
}

/// Delete a row by ID (DELETE /api/{entity}/{id}).
pub async fn delete_row(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, i64)>,
) -> Result<Json<MutateResult>, AppError> {
    let result = mapper(&state, &entity)?.delete(id).await?;

    tracing::info!(entity = %entity, id, affected = result.affected_count, "Deleted row");

    Ok(Json(result))
}
