//! Slate demo server library logic.
//!
//! A small catalog API that exercises the whole pipeline: one model
//! definition drives request validation, the stored table, and the response
//! shape. The registry is built once at startup and shared read-only with
//! the handlers.

pub mod api_items;
pub mod config;

use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use slate_db::DbPool;
use slate_schema::{FieldDecl, Model, SchemaError, SchemaRegistry};
use slate_types::FieldType;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Table name of the demo catalog model.
pub const ITEM_TABLE: &str = "item";

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Compiled models, read-only after startup.
    pub registry: Arc<SchemaRegistry>,
}

/// The catalog item model.
///
/// `warehouse` demonstrates the override path: the declared type is optional
/// (a null *value* passes validation) while the column is forced NOT NULL,
/// so a null makes it to the storage layer and is rejected there.
fn item_model() -> Result<Model, SchemaError> {
    Model::builder(ITEM_TABLE)
        .field(
            FieldDecl::new("id", FieldType::Integer)
                .optional()
                .default(slate_types::Value::Null)
                .primary_key(),
        )
        .field(FieldDecl::new("name", FieldType::Text).max_length(120))
        .field(FieldDecl::new("description", FieldType::Text).optional())
        .field(FieldDecl::new("quantity", FieldType::Integer).default(slate_types::Value::from(0)))
        .field(
            FieldDecl::new("warehouse", FieldType::Text)
                .optional()
                .default(slate_types::Value::from("main"))
                .nullable(false),
        )
        .build()
}

/// Builds the registry of every model this server owns.
///
/// # Errors
///
/// Fails if a model definition is invalid; the server cannot start without
/// its schemas.
pub fn build_registry() -> Result<SchemaRegistry, SchemaError> {
    let mut registry = SchemaRegistry::new();
    registry.register(item_model()?)?;
    Ok(registry)
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/items",
            post(api_items::create_item_handler).get(api_items::list_items_handler),
        )
        .route("/api/items/{itemId}", get(api_items::get_item_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
