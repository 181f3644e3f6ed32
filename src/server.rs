//! HTTP API over the catalog.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/items` | Create an item (dual-store write) |
//! | `GET`  | `/items/search` | Structured search with filters, sort, and pagination |
//! | `GET`  | `/items/autocomplete` | Name-prefix suggestions (max 5) |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one JSON shape:
//!
//! ```json
//! { "error": { "code": "conflict", "message": "item named \"Widget\" already exists" } }
//! ```
//!
//! Error codes: `bad_request` (400), `conflict` (409), `indexing_failed`,
//! `persistence_failed`, `search_failed` (all 502).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser
//! clients.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::CatalogError;
use crate::models::{Item, NewItem, SearchQuery};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
}

/// Starts the HTTP server on the configured bind address. Runs until the
/// process is terminated.
pub async fn run_server(config: &Config, catalog: Arc<Catalog>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState { catalog };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/items", post(handle_create))
        .route("/items/search", get(handle_search))
        .route("/items/autocomplete", get(handle_autocomplete))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!("catalogd listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Maps a catalog failure to its HTTP representation. The conflict is the
/// only caller-correctable case; store faults surface as 502 with the
/// failing store identified by the error code.
fn classify_catalog_error(err: CatalogError) -> AppError {
    let (status, code) = match &err {
        CatalogError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
        CatalogError::Indexing(_) => (StatusCode::BAD_GATEWAY, "indexing_failed"),
        CatalogError::Persistence(_) => (StatusCode::BAD_GATEWAY, "persistence_failed"),
        CatalogError::Search(_) => (StatusCode::BAD_GATEWAY, "search_failed"),
    };
    AppError {
        status,
        code: code.to_string(),
        message: format!("{:#}", anyhow::Error::new(err)),
    }
}

// ============ POST /items ============

/// Handler for `POST /items`.
///
/// Validates the candidate, then runs the dual-store create. Returns 201
/// with the persisted item on success.
async fn handle_create(
    State(state): State<AppState>,
    Json(candidate): Json<NewItem>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    candidate.validate().map_err(bad_request)?;

    let item = state
        .catalog
        .create_item(candidate)
        .await
        .map_err(classify_catalog_error)?;

    Ok((StatusCode::CREATED, Json(item)))
}

// ============ GET /items/search ============

/// Handler for `GET /items/search`.
async fn handle_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Item>>, AppError> {
    let items = state
        .catalog
        .search_items(&query)
        .await
        .map_err(classify_catalog_error)?;
    Ok(Json(items))
}

// ============ GET /items/autocomplete ============

/// Query parameters for `GET /items/autocomplete`.
#[derive(Deserialize)]
struct AutocompleteParams {
    text: String,
}

/// Handler for `GET /items/autocomplete`.
async fn handle_autocomplete(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> Result<Json<Vec<String>>, AppError> {
    if params.text.trim().is_empty() {
        return Err(bad_request("text must not be empty"));
    }

    let names = state
        .catalog
        .autocomplete(&params.text)
        .await
        .map_err(classify_catalog_error)?;
    Ok(Json(names))
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Handler for `GET /health`. Used by load balancers and monitoring.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_candidate_maps_to_400() {
        let candidate = NewItem {
            name: "Widget".to_string(),
            description: "a widget".to_string(),
            price: -1.0,
            stock: 3,
            category: "Tools".to_string(),
            subcategory: "Hand tools".to_string(),
            location: "Berlin".to_string(),
        };
        let err = candidate.validate().map_err(bad_request).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "bad_request");
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = classify_catalog_error(CatalogError::Conflict {
            name: "Widget".to_string(),
        });
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, "conflict");
    }

    #[test]
    fn test_store_faults_map_to_502() {
        let err = classify_catalog_error(CatalogError::Indexing(anyhow::anyhow!("down")));
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.code, "indexing_failed");
        assert!(err.message.contains("down"));
    }
}
