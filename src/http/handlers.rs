//! Control API handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;

use crate::control::{
    ConnectRequest, ConnectResponse, ControlError, GenerateRequest, GenerateResponse,
    HealthResponse, IndustryListing, ScenarioListing, ScenarioQuery, StopResponse,
};
use crate::http::server::AppState;
use crate::scheduler::GenerationStats;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ControlError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| ControlError::InvalidRequest(e.body_text()))
}

pub async fn connect(
    State(state): State<AppState>,
    payload: Result<Json<ConnectRequest>, JsonRejection>,
) -> Result<Json<ConnectResponse>, ControlError> {
    let request = body(payload)?;
    state.session.connect(request).await.map(Json)
}

pub async fn industries(State(state): State<AppState>) -> Json<IndustryListing> {
    Json(state.session.list_industries())
}

pub async fn scenarios(
    State(state): State<AppState>,
    Query(query): Query<ScenarioQuery>,
) -> Result<Json<ScenarioListing>, ControlError> {
    state.session.list_scenarios(query.industry.as_deref()).map(Json)
}

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ControlError> {
    let request = body(payload)?;
    state.session.start(request).await.map(Json)
}

pub async fn stop(State(state): State<AppState>) -> Json<StopResponse> {
    Json(state.session.stop().await)
}

pub async fn stats(State(state): State<AppState>) -> Json<GenerationStats> {
    Json(state.session.stats().await)
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.session.health().await)
}
