use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CourseCategory {
    pub id: Uuid,
    pub institute_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_key: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewCourseCategory {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    pub image_key: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourseCategory {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_key: Option<String>,
}
