use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{Institute, InstituteApplication};
use crate::error::AppResult;
use crate::services::institute_service::Dashboard;
use crate::services::InstituteService;
use crate::websocket::publish_event;

#[derive(Debug, Deserialize)]
pub struct ApplyPayload {
    pub user_id: Uuid,
    pub application: InstituteApplication,
}

#[derive(Debug, Deserialize)]
pub struct RejectPayload {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Uuid,
}

pub async fn apply(
    State(state): State<AppState>,
    Json(payload): Json<ApplyPayload>,
) -> AppResult<Json<Institute>> {
    let institute =
        InstituteService::apply(&state.db, payload.user_id, &payload.application).await?;
    Ok(Json(institute))
}

pub async fn get_institute(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Institute>> {
    let institute = InstituteService::get(&state.db, id).await?;
    Ok(Json(institute))
}

pub async fn approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Institute>> {
    let institute = InstituteService::approve(&state.db, id).await?;
    publish_event(
        &state.events,
        json!({ "type": "institute.approved", "institute_id": institute.id }),
    );
    Ok(Json(institute))
}

pub async fn reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectPayload>,
) -> AppResult<Json<Institute>> {
    let institute =
        InstituteService::reject(&state.db, id, payload.message.as_deref()).await?;
    publish_event(
        &state.events,
        json!({ "type": "institute.rejected", "institute_id": institute.id }),
    );
    Ok(Json(institute))
}

/// Owner dashboard: the application in each state plus catalog and incoming
/// admissions when approved.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<Dashboard>> {
    let dashboard = InstituteService::dashboard(&state.db, query.user_id).await?;
    Ok(Json(dashboard))
}
