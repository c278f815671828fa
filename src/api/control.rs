//! Fleet control endpoints
//!
//! Thin shim over the dispatcher: parse the request, hand it to the core,
//! report the result. Validation failures are client errors; a
//! FleetResult that contains per-device failures is still a successful
//! call and reported as 200 data.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::fleet::{FleetResult, Target};
use crate::Error;

/// Error body returned for rejected requests
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiResult = Result<Json<FleetResult>, (StatusCode, Json<ErrorResponse>)>;

/// Query parameters for the status endpoint
#[derive(Deserialize)]
struct StatusQuery {
    display: Option<String>,
}

/// Power control request
#[derive(Deserialize)]
struct PowerRequest {
    display: Option<String>,
    power_on: bool,
}

/// Volume/mute control request; exactly one of the two fields is used
#[derive(Deserialize)]
struct VolumeRequest {
    display: Option<String>,
    volume: Option<i64>,
    mute: Option<bool>,
}

/// Input source control request
#[derive(Deserialize)]
struct InputRequest {
    display: Option<String>,
    input_source: String,
}

/// Get reachability of the addressed displays
async fn get_status(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<StatusQuery>,
) -> ApiResult {
    let target = parse_target(query.display.as_deref())?;
    state.dispatcher.status(target).await.map(Json).map_err(reject)
}

/// Control power of the addressed displays
async fn control_power(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<PowerRequest>,
) -> ApiResult {
    let target = parse_target(request.display.as_deref())?;
    state
        .dispatcher
        .set_power(target, request.power_on)
        .await
        .map(Json)
        .map_err(reject)
}

/// Control volume or mute of the addressed displays
async fn control_volume(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<VolumeRequest>,
) -> ApiResult {
    let target = parse_target(request.display.as_deref())?;
    let result = match (request.volume, request.mute) {
        (Some(level), _) => state.dispatcher.set_volume(target, level).await,
        (None, Some(muted)) => state.dispatcher.set_mute(target, muted).await,
        (None, None) => {
            return Err(bad_request("no volume or mute parameter provided"));
        }
    };
    result.map(Json).map_err(reject)
}

/// Change the input source of the addressed displays
async fn control_input(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<InputRequest>,
) -> ApiResult {
    let target = parse_target(request.display.as_deref())?;
    state
        .dispatcher
        .set_input(target, &request.input_source)
        .await
        .map(Json)
        .map_err(reject)
}

/// Parse the caller-facing display selector; absent means all
fn parse_target(display: Option<&str>) -> Result<Target, (StatusCode, Json<ErrorResponse>)> {
    display.map_or(Ok(Target::All), |s| s.parse().map_err(reject))
}

/// Map a core error onto an HTTP response
fn reject(error: Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = match error {
        Error::InvalidTarget(_) | Error::InvalidInputSource(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Build the control router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/power", post(control_power))
        .route("/api/volume", post(control_volume))
        .route("/api/input", post(control_input))
        .with_state(state)
}
