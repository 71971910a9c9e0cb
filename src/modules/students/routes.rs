use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_profile, get_user, list_admissions, list_enrollments, list_feedback, register,
    submit_feedback, update_profile,
};
use crate::app_state::AppState;

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}/profile", get(get_profile).put(update_profile))
        .route("/users/{user_id}/admissions", get(list_admissions))
        .route("/users/{user_id}/enrollments", get(list_enrollments))
        .route("/feedback", get(list_feedback).post(submit_feedback))
}
