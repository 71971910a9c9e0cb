use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

/// Append-only: feedback is never edited after creation.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct StudentFeedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub feedback_text: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewStudentFeedback {
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "Feedback must not be empty"))]
    pub feedback_text: String,
}
