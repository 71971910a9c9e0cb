use sqlx::{Error, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::Enrollment;

pub struct EnrollmentRepository;

impl EnrollmentRepository {
    /// Idempotent create keyed on (student, course). The unique index is the
    /// arbiter, so two racing calls cannot both insert; the loser falls
    /// through to the select and reports "already enrolled".
    pub async fn ensure_enrollment(
        tx: &mut Transaction<'_, Postgres>,
        student_id: Uuid,
        course_id: Uuid,
        institute_id: Uuid,
        enrolled_at: OffsetDateTime,
    ) -> Result<(Enrollment, bool), Error> {
        let inserted = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (student_id, course_id, institute_id, enrolled_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (student_id, course_id) WHERE course_id IS NOT NULL DO NOTHING
            RETURNING *
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .bind(institute_id)
        .bind(enrolled_at)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(enrollment) = inserted {
            return Ok((enrollment, true));
        }

        let existing = sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE student_id = $1 AND course_id = $2",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok((existing, false))
    }

    pub async fn list_for_student(
        pool: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<Enrollment>, Error> {
        sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE student_id = $1 ORDER BY enrolled_at DESC",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await
    }
}
