use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::info;
use utoipa::ToSchema;

use super::error::ApiError;
use crate::errors::ErrorRecord;
use super::validation::{FieldViolation, Validate, ValidatedJson, ValidationFailure};

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

const MAX_NAME_LENGTH: usize = 100;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub items: RwLock<HashMap<String, Item>>,
    pub instance_id: String,
}

impl AppStateInner {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            instance_id: instance_id.into(),
        }
    }
}

/// Item stored by the demo service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Caller-chosen identifier
    pub id: String,
    /// Display name
    pub name: String,
}

impl Validate for Item {
    fn validate(&self) -> Result<(), ValidationFailure> {
        let mut violations = Vec::new();

        if self.id.trim().is_empty() {
            violations.push(FieldViolation::new("id", "id must not be blank"));
        }
        if self.name.trim().is_empty() {
            violations.push(FieldViolation::new("name", "name must not be blank"));
        } else if self.name.chars().count() > MAX_NAME_LENGTH {
            violations.push(FieldViolation::new(
                "name",
                format!("name must be at most {} characters", MAX_NAME_LENGTH),
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::from_violations(violations))
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy")
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "rest-error-mapper",
        "version": env!("CARGO_PKG_VERSION"),
        "instance_id": state.instance_id,
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// Create an item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = Item,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Validation failed", body = ErrorRecord),
        (status = 409, description = "Item already exists", body = ErrorRecord)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    ValidatedJson(item): ValidatedJson<Item>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    info!("Create item request: id={}", item.id);

    let mut items = state.items.write().await;
    if items.contains_key(&item.id) {
        return Err(ApiError::conflict(format!("Item already exists: {}", item.id)));
    }
    items.insert(item.id.clone(), item.clone());

    Ok((StatusCode::CREATED, Json(item)))
}

/// Get an item by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = String, Path, description = "Item identifier")
    ),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 404, description = "Item not found", body = ErrorRecord)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    info!("Get item request: id={}", id);

    let item = state.items.read().await.get(&id).cloned();

    item.map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Item not found: {}", id)))
}
