//! HTTP routes for the planner

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::VERSION;
use crate::models::{PlanResponse, ResponseData};
use crate::planner::TripPlanner;

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub input: String,
}

/// Successful `/plan` body
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanReply {
    pub message: String,
    pub data: ResponseData,
}

pub fn router(planner: Arc<TripPlanner>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/plan", post(plan))
        .route("/health", get(health))
        .with_state(planner)
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Use POST /plan with {'input': 'your question'}"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}

async fn plan(
    State(planner): State<Arc<TripPlanner>>,
    Json(request): Json<PlanRequest>,
) -> Response {
    let PlanResponse { ok, message, data } = planner.plan(&request.input).await;

    if !ok {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": message }))).into_response();
    }

    Json(PlanReply { message, data }).into_response()
}
