use rust_decimal::Decimal;
use sqlx::{Error, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::{
    Admission, AdmissionDocument, AdmissionStatus, NewAdmission, NewAdmissionDocument,
};

pub struct AdmissionRepository;

impl AdmissionRepository {
    /// `amount` is fixed here, at submission time; later course price edits
    /// never touch it.
    pub async fn insert(
        pool: &PgPool,
        new_admission: &NewAdmission,
        institute_id: Uuid,
        category_id: Uuid,
        amount: Decimal,
        payment_token: &str,
    ) -> Result<Admission, Error> {
        sqlx::query_as::<_, Admission>(
            r#"
            INSERT INTO admissions (
                user_id, student_name, email, phone, address, date_of_birth, gender,
                institute_id, category_id, course_id, amount, payment_token
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(new_admission.user_id)
        .bind(&new_admission.student_name)
        .bind(new_admission.email.to_lowercase())
        .bind(&new_admission.phone)
        .bind(&new_admission.address)
        .bind(new_admission.date_of_birth)
        .bind(new_admission.gender)
        .bind(institute_id)
        .bind(category_id)
        .bind(new_admission.course_id)
        .bind(amount)
        .bind(payment_token)
        .fetch_one(pool)
        .await
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Admission>, Error> {
        sqlx::query_as::<_, Admission>("SELECT * FROM admissions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Locks the admission row for the rest of the transaction. Concurrent
    /// transitions on the same admission serialize here, which is what makes
    /// the already-accepted check reliable.
    pub async fn get_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<Admission>, Error> {
        sqlx::query_as::<_, Admission>("SELECT * FROM admissions WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn set_status(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: AdmissionStatus,
    ) -> Result<Admission, Error> {
        sqlx::query_as::<_, Admission>(
            "UPDATE admissions SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Detach the course without deleting the admission record.
    pub async fn detach_course(pool: &PgPool, id: Uuid) -> Result<Admission, Error> {
        sqlx::query_as::<_, Admission>(
            "UPDATE admissions SET course_id = NULL WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn mark_paid(
        pool: &PgPool,
        id: Uuid,
        payment_ref: &str,
    ) -> Result<Admission, Error> {
        sqlx::query_as::<_, Admission>(
            "UPDATE admissions SET is_paid = TRUE, payment_ref = $1 WHERE id = $2 RETURNING *",
        )
        .bind(payment_ref)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn list_for_institute(
        pool: &PgPool,
        institute_id: Uuid,
    ) -> Result<Vec<Admission>, Error> {
        sqlx::query_as::<_, Admission>(
            r#"
            SELECT * FROM admissions
            WHERE institute_id = $1 AND course_id IS NOT NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(institute_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Admission>, Error> {
        sqlx::query_as::<_, Admission>(
            "SELECT * FROM admissions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn add_document(
        pool: &PgPool,
        admission_id: Uuid,
        doc: &NewAdmissionDocument,
    ) -> Result<AdmissionDocument, Error> {
        sqlx::query_as::<_, AdmissionDocument>(
            r#"
            INSERT INTO admission_documents (admission_id, doc_type, file_key)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(admission_id)
        .bind(doc.doc_type)
        .bind(&doc.file_key)
        .fetch_one(pool)
        .await
    }

    pub async fn list_documents(
        pool: &PgPool,
        admission_id: Uuid,
    ) -> Result<Vec<AdmissionDocument>, Error> {
        sqlx::query_as::<_, AdmissionDocument>(
            "SELECT * FROM admission_documents WHERE admission_id = $1 ORDER BY created_at",
        )
        .bind(admission_id)
        .fetch_all(pool)
        .await
    }
}
