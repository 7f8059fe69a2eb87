//! HTTP API handlers

use std::{sync::Arc, time::Duration};

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use cartpath_core::{CartItem, CrowdLevels, OptimizedRoute, Section};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower::{ServiceBuilder, limit::ConcurrencyLimitLayer, timeout::TimeoutLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{config::HttpConfig, state::AppState};

/// Build the Axum router
pub fn build_router(state: Arc<AppState>, http: &HttpConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let limits = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TimeoutLayer::new(Duration::from_secs(http.request_timeout_secs)))
        .layer(ConcurrencyLimitLayer::new(http.max_concurrent_requests));

    Router::new()
        .route("/api/navigation", get(navigation_data).post(navigation_route))
        .route("/api/navigation/geojson", post(navigation_geojson))
        .route("/health", get(health))
        .layer(limits)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    let body = ErrorBody {
        success: false,
        error: error.into(),
    };
    (status, Json(body)).into_response()
}

#[derive(Debug, Serialize)]
struct Success<T> {
    success: bool,
    data: T,
}

fn success<T: Serialize>(data: T) -> Response {
    Json(Success {
        success: true,
        data,
    })
    .into_response()
}

async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        error_response(StatusCode::REQUEST_TIMEOUT, "Request timed out")
    } else {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {err}"),
        )
    }
}

async fn health() -> &'static str {
    "ok"
}

// ============ Route Endpoints ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteData {
    route: OptimizedRoute,
    crowd_levels: CrowdLevels,
    preferences: Value,
    generated_at: DateTime<Utc>,
}

/// Pulls the cart out of a request body shaped `{ items: [...] }`
#[allow(clippy::result_large_err)]
fn parse_items(body: &Value) -> Result<Vec<CartItem>, Response> {
    let items = body
        .get("items")
        .filter(|items| items.is_array())
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "Items array is required"))?;

    serde_json::from_value(items.clone())
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, format!("Invalid item: {e}")))
}

async fn navigation_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Response {
    let items = match parse_items(&body) {
        Ok(items) => items,
        Err(response) => return response,
    };

    let crowd = state.crowd().await;
    let route = state.assembler().build_route(&items, &crowd.levels);

    let preferences = body
        .get("preferences")
        .cloned()
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

    success(RouteData {
        route,
        crowd_levels: crowd.levels,
        preferences,
        generated_at: Utc::now(),
    })
}

async fn navigation_geojson(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Response {
    let items = match parse_items(&body) {
        Ok(items) => items,
        Err(response) => return response,
    };

    let crowd = state.crowd().await;
    let route = state.assembler().build_route(&items, &crowd.levels);

    match route.to_geojson() {
        Ok(collection) => Json(collection).into_response(),
        Err(e) => {
            warn!("GeoJSON export failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to export route")
        }
    }
}

// ============ Data Endpoint ============

#[derive(Debug, Deserialize)]
struct NavigationQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CrowdData {
    crowd_levels: CrowdLevels,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutData<'a> {
    layout: &'a [Section],
    updated_at: DateTime<Utc>,
}

async fn navigation_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NavigationQuery>,
) -> Response {
    match query.kind.as_deref().unwrap_or("crowd-levels") {
        "crowd-levels" => {
            let crowd = state.crowd().await;
            success(CrowdData {
                crowd_levels: crowd.levels,
                updated_at: crowd.updated_at,
            })
        }
        "store-layout" => success(LayoutData {
            layout: state.graph().sections(),
            updated_at: Utc::now(),
        }),
        _ => error_response(StatusCode::BAD_REQUEST, "Invalid type parameter"),
    }
}
