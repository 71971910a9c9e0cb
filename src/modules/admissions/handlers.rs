use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{
    Admission, AdmissionAction, AdmissionDocument, NewAdmission, NewAdmissionDocument,
};
use crate::error::AppResult;
use crate::services::{AdmissionService, TransitionOutcome};
use crate::websocket::publish_event;

#[derive(Debug, Deserialize)]
pub struct TransitionPayload {
    pub action: AdmissionAction,
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: TransitionOutcome,
}

pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<NewAdmission>,
) -> AppResult<Json<Admission>> {
    let admission = AdmissionService::submit(&state.db, &payload).await?;
    publish_event(
        &state.events,
        json!({
            "type": "admission.submitted",
            "admission_id": admission.id,
            "institute_id": admission.institute_id,
        }),
    );
    Ok(Json(admission))
}

pub async fn get_admission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Admission>> {
    let admission = AdmissionService::get(&state.db, id).await?;
    Ok(Json(admission))
}

/// Applies shortlist/accept/reject. Acceptance side effects (seat decrement,
/// enrollment) happen inside the service's transaction; this handler only
/// reports the outcome.
pub async fn transition(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionPayload>,
) -> AppResult<Json<TransitionResponse>> {
    let now = state.clock.now();
    let outcome = AdmissionService::transition(&state.db, id, payload.action, now).await?;
    publish_event(
        &state.events,
        json!({
            "type": "admission.transition",
            "admission_id": id,
            "status": outcome.admission.status,
        }),
    );
    Ok(Json(TransitionResponse {
        message: outcome.message(),
        outcome,
    }))
}

pub async fn remove_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Admission>> {
    let admission = AdmissionService::remove_course(&state.db, id).await?;
    Ok(Json(admission))
}

pub async fn mock_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Admission>> {
    let admission = AdmissionService::record_mock_payment(&state.db, id).await?;
    Ok(Json(admission))
}

pub async fn add_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NewAdmissionDocument>,
) -> AppResult<Json<AdmissionDocument>> {
    let document = AdmissionService::add_document(&state.db, id, &payload).await?;
    Ok(Json(document))
}

pub async fn list_documents(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<AdmissionDocument>>> {
    let documents = AdmissionService::list_documents(&state.db, id).await?;
    Ok(Json(documents))
}
