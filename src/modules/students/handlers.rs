use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{
    Admission, Enrollment, NewStudentFeedback, NewUser, Profile, StudentFeedback, UpdateProfile,
};
use crate::db::repositories::{EnrollmentRepository, FeedbackRepository, StudentRepository};
use crate::error::{AppError, AppResult};
use crate::services::registration_service::Registration;
use crate::services::{AdmissionService, RegistrationService};

/// Registers an account and its student identity + profile in one go.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> AppResult<Json<Registration>> {
    let registration = RegistrationService::register(&state.db, &payload).await?;
    Ok(Json(registration))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<crate::db::models::User>> {
    let user = RegistrationService::get_user(&state.db, user_id).await?;
    Ok(Json(user))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    let profile = StudentRepository::get_profile_by_user_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateProfile>,
) -> AppResult<Json<Profile>> {
    payload.validate()?;
    let profile = StudentRepository::update_profile(&state.db, user_id, &payload).await?;
    Ok(Json(profile))
}

pub async fn list_admissions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<Admission>>> {
    let admissions = AdmissionService::list_for_user(&state.db, user_id).await?;
    Ok(Json(admissions))
}

pub async fn list_enrollments(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<Enrollment>>> {
    let student = StudentRepository::resolve_student_identity_pool(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student profile not found".into()))?;
    let enrollments = EnrollmentRepository::list_for_student(&state.db, student.id).await?;
    Ok(Json(enrollments))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(payload): Json<NewStudentFeedback>,
) -> AppResult<Json<StudentFeedback>> {
    payload.validate()?;
    let feedback = FeedbackRepository::insert(&state.db, &payload).await?;
    Ok(Json(feedback))
}

pub async fn list_feedback(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StudentFeedback>>> {
    let feedback = FeedbackRepository::list(&state.db).await?;
    Ok(Json(feedback))
}
