use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub full_name: String,
    pub avatar_key: Option<String>,
    pub date_of_birth: Option<Date>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: Option<String>,
    pub avatar_key: Option<String>,
    pub date_of_birth: Option<Date>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
