use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{
    Course, CourseCategory, NewCourse, NewCourseCategory, UpdateCourse, UpdateCourseCategory,
};
use crate::error::AppResult;
use crate::services::catalog_service::SearchResults;
use crate::services::CatalogService;

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryPayload {
    pub user_id: Uuid,
    pub category: NewCourseCategory,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryPayload {
    pub user_id: Uuid,
    pub category: UpdateCourseCategory,
}

#[derive(Debug, Deserialize)]
pub struct CreateCoursePayload {
    pub user_id: Uuid,
    pub course: NewCourse,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCoursePayload {
    pub user_id: Uuid,
    pub course: UpdateCourse,
}

// Categories

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryPayload>,
) -> AppResult<Json<CourseCategory>> {
    let category =
        CatalogService::create_category(&state.db, payload.user_id, &payload.category).await?;
    Ok(Json(category))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CourseCategory>>> {
    let categories = CatalogService::list_categories(&state.db).await?;
    Ok(Json(categories))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryPayload>,
) -> AppResult<Json<CourseCategory>> {
    let category =
        CatalogService::update_category(&state.db, payload.user_id, id, &payload.category)
            .await?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<serde_json::Value>> {
    CatalogService::delete_category(&state.db, query.user_id, id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

pub async fn list_category_courses(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Course>>> {
    let courses = CatalogService::list_courses_for_category(&state.db, id).await?;
    Ok(Json(courses))
}

// Courses

pub async fn create_course(
    State(state): State<AppState>,
    Json(payload): Json<CreateCoursePayload>,
) -> AppResult<Json<Course>> {
    let course = CatalogService::create_course(&state.db, payload.user_id, &payload.course).await?;
    Ok(Json(course))
}

pub async fn list_courses(State(state): State<AppState>) -> AppResult<Json<Vec<Course>>> {
    let courses = CatalogService::list_courses(&state.db).await?;
    Ok(Json(courses))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Course>> {
    let course = CatalogService::course_detail(&state.db, id).await?;
    Ok(Json(course))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCoursePayload>,
) -> AppResult<Json<Course>> {
    let course =
        CatalogService::update_course(&state.db, payload.user_id, id, &payload.course).await?;
    Ok(Json(course))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<serde_json::Value>> {
    CatalogService::delete_course(&state.db, query.user_id, id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchResults>> {
    let results = CatalogService::search(&state.db, &query.q).await?;
    Ok(Json(results))
}
