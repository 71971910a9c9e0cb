use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{apply, approve, dashboard, get_institute, reject};
use crate::app_state::AppState;

pub fn institute_routes() -> Router<AppState> {
    Router::new()
        .route("/institutes", post(apply))
        .route("/institutes/mine", get(dashboard))
        .route("/institutes/{id}", get(get_institute))
        .route("/institutes/{id}/approve", post(approve))
        .route("/institutes/{id}/reject", post(reject))
}
