use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

/// Materialized fact that a student attends a course at an institute.
/// Created only by the admission acceptance flow, never directly by users.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Option<Uuid>,
    pub institute_id: Uuid,
    pub enrolled_at: OffsetDateTime,
}
