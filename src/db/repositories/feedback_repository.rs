use sqlx::{Error, PgPool};

use crate::db::models::{NewStudentFeedback, StudentFeedback};

pub struct FeedbackRepository;

impl FeedbackRepository {
    pub async fn insert(
        pool: &PgPool,
        feedback: &NewStudentFeedback,
    ) -> Result<StudentFeedback, Error> {
        sqlx::query_as::<_, StudentFeedback>(
            r#"
            INSERT INTO student_feedback (user_id, feedback_text)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(feedback.user_id)
        .bind(&feedback.feedback_text)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<StudentFeedback>, Error> {
        sqlx::query_as::<_, StudentFeedback>(
            "SELECT * FROM student_feedback ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await
    }
}
