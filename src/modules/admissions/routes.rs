use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    add_document, get_admission, list_documents, mock_payment, remove_course, submit, transition,
};
use crate::app_state::AppState;

pub fn admission_routes() -> Router<AppState> {
    Router::new()
        .route("/admissions", post(submit))
        .route("/admissions/{id}", get(get_admission))
        .route("/admissions/{id}/transition", post(transition))
        .route("/admissions/{id}/remove-course", post(remove_course))
        .route("/admissions/{id}/payment/mock", post(mock_payment))
        .route(
            "/admissions/{id}/documents",
            get(list_documents).post(add_document),
        )
}
