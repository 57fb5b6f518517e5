//! Handlers for the catalog items API.

use crate::{AppState, ITEM_TABLE};
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use slate_db::DbError;
use slate_schema::Model;
use slate_types::Value;
use slate_validate::{validate, ValidationError};
use std::sync::Arc;

/// Hard ceiling on page size; larger `limit` values are clamped, never
/// rejected.
const MAX_PAGE_SIZE: u32 = 100;

/// Error responses carry a JSON body alongside the status code.
type ApiError = (StatusCode, Json<JsonValue>);

/// Pagination parameters for the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Number of rows to skip, in insertion order.
    #[serde(default)]
    pub offset: u32,
    /// Page size; defaults to and is clamped at [`MAX_PAGE_SIZE`].
    pub limit: Option<u32>,
}

fn internal_error(context: &'static str, e: impl std::fmt::Display) -> ApiError {
    tracing::error!(error = %e, "{context}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "internal server error"})),
    )
}

/// Maps a validation failure to 422 with the full per-field error list.
fn validation_error_response(e: ValidationError) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"errors": e.errors})),
    )
}

/// Maps storage failures: constraint breaches are the client's problem
/// (409), everything else is ours (500).
fn db_error_response(e: DbError) -> ApiError {
    match e {
        DbError::IntegrityViolation { ref message, .. } => (
            StatusCode::CONFLICT,
            Json(json!({"error": message.clone()})),
        ),
        other => internal_error("storage operation failed", other),
    }
}

fn item_model(state: &AppState) -> Result<&Model, ApiError> {
    state.registry.get(ITEM_TABLE).ok_or_else(|| {
        internal_error("model lookup failed", format!("'{ITEM_TABLE}' not registered"))
    })
}

/// POST /api/items
///
/// Validates the body against the input projection (the auto-generated key
/// is not part of the request shape), inserts, and returns the stored row —
/// assigned key and applied defaults included.
pub async fn create_item_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<JsonValue>,
) -> Result<Json<JsonValue>, ApiError> {
    let stored = tokio::task::spawn_blocking(move || -> Result<JsonValue, ApiError> {
        let model = item_model(&state)?;
        let row = validate(&model.input_projection(), &payload)
            .map_err(validation_error_response)?;

        let conn = state
            .pool
            .get()
            .map_err(|e| internal_error("failed to get db connection", e))?;
        let key = slate_db::insert(&conn, model, &row).map_err(db_error_response)?;

        let stored = slate_db::get(&conn, model, &Value::Integer(key))
            .map_err(db_error_response)?
            .ok_or_else(|| {
                internal_error("read-back failed", format!("row {key} vanished after insert"))
            })?;
        Ok(stored.to_json())
    })
    .await
    .map_err(|e| internal_error("task join failed", e))??;

    Ok(Json(stored))
}

/// GET /api/items/{itemId}
pub async fn get_item_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> Result<Json<JsonValue>, ApiError> {
    let found = tokio::task::spawn_blocking(move || -> Result<Option<JsonValue>, ApiError> {
        let model = item_model(&state)?;
        let conn = state
            .pool
            .get()
            .map_err(|e| internal_error("failed to get db connection", e))?;
        let row = slate_db::get(&conn, model, &Value::Integer(item_id))
            .map_err(db_error_response)?;
        Ok(row.map(|r| r.to_json()))
    })
    .await
    .map_err(|e| internal_error("task join failed", e))??;

    match found {
        Some(item) => Ok(Json(item)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "item not found"})),
        )),
    }
}

/// GET /api/items?offset=..&limit=..
///
/// Returns rows in insertion order: exactly `min(limit, total - offset)` of
/// them, with `limit` clamped to [`MAX_PAGE_SIZE`].
pub async fn list_items_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<JsonValue>, ApiError> {
    let offset = params.offset;
    let limit = params.limit.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE);

    let items = tokio::task::spawn_blocking(move || -> Result<Vec<JsonValue>, ApiError> {
        let model = item_model(&state)?;
        let conn = state
            .pool
            .get()
            .map_err(|e| internal_error("failed to get db connection", e))?;
        let rows = slate_db::list(&conn, model, offset, limit).map_err(db_error_response)?;
        Ok(rows.iter().map(|r| r.to_json()).collect())
    })
    .await
    .map_err(|e| internal_error("task join failed", e))??;

    Ok(Json(JsonValue::Array(items)))
}
