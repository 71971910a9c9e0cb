use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{
    create_category, create_course, delete_category, delete_course, get_course,
    list_categories, list_category_courses, list_courses, search, update_category, update_course,
};
use crate::app_state::AppState;

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/categories/{id}/courses", get(list_category_courses))
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/search", get(search))
}
