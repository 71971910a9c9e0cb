use sqlx::{Error, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::{Institute, InstituteApplication, InstituteStatus};

pub struct InstituteRepository;

impl InstituteRepository {
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Institute>, Error> {
        sqlx::query_as::<_, Institute>("SELECT * FROM institutes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn get_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<Institute>, Error> {
        sqlx::query_as::<_, Institute>("SELECT * FROM institutes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// The owner's live application, if any: pending or approved. Backed by
    /// a partial unique index, so there is at most one.
    pub async fn find_active_for_owner(
        tx: &mut Transaction<'_, Postgres>,
        owner_id: Uuid,
    ) -> Result<Option<Institute>, Error> {
        sqlx::query_as::<_, Institute>(
            "SELECT * FROM institutes WHERE owner_id = $1 AND status IN ('pending', 'approved')",
        )
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await
    }

    pub async fn find_approved_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<Option<Institute>, Error> {
        sqlx::query_as::<_, Institute>(
            "SELECT * FROM institutes WHERE owner_id = $1 AND status = 'approved'",
        )
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_rejected_for_owner(
        tx: &mut Transaction<'_, Postgres>,
        owner_id: Uuid,
    ) -> Result<Option<Institute>, Error> {
        sqlx::query_as::<_, Institute>(
            r#"
            SELECT * FROM institutes
            WHERE owner_id = $1 AND status = 'rejected'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(owner_id)
        .fetch_optional(&mut **tx)
        .await
    }

    pub async fn insert_application(
        tx: &mut Transaction<'_, Postgres>,
        owner_id: Uuid,
        app: &InstituteApplication,
    ) -> Result<Institute, Error> {
        sqlx::query_as::<_, Institute>(
            r#"
            INSERT INTO institutes (
                owner_id, name, description, established, email, phone, website,
                address, logo_key, background_key, signature_key, stamp_key,
                register_number, register_doc_key, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, 'pending')
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&app.name)
        .bind(&app.description)
        .bind(&app.established)
        .bind(app.email.to_lowercase())
        .bind(&app.phone)
        .bind(&app.website)
        .bind(&app.address)
        .bind(&app.logo_key)
        .bind(&app.background_key)
        .bind(&app.signature_key)
        .bind(&app.stamp_key)
        .bind(&app.register_number)
        .bind(&app.register_doc_key)
        .fetch_one(&mut **tx)
        .await
    }

    /// Reapplication after a rejection reuses the rejected row: details are
    /// replaced, status returns to pending and the admin message is cleared.
    pub async fn reapply(
        tx: &mut Transaction<'_, Postgres>,
        institute_id: Uuid,
        app: &InstituteApplication,
    ) -> Result<Institute, Error> {
        sqlx::query_as::<_, Institute>(
            r#"
            UPDATE institutes
            SET
                name = $1,
                description = $2,
                established = $3,
                email = $4,
                phone = $5,
                website = $6,
                address = $7,
                logo_key = COALESCE($8, logo_key),
                background_key = COALESCE($9, background_key),
                signature_key = COALESCE($10, signature_key),
                stamp_key = COALESCE($11, stamp_key),
                register_number = $12,
                register_doc_key = COALESCE($13, register_doc_key),
                status = 'pending',
                admin_message = NULL
            WHERE id = $14
            RETURNING *
            "#,
        )
        .bind(&app.name)
        .bind(&app.description)
        .bind(&app.established)
        .bind(app.email.to_lowercase())
        .bind(&app.phone)
        .bind(&app.website)
        .bind(&app.address)
        .bind(&app.logo_key)
        .bind(&app.background_key)
        .bind(&app.signature_key)
        .bind(&app.stamp_key)
        .bind(&app.register_number)
        .bind(&app.register_doc_key)
        .bind(institute_id)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn set_status(
        pool: &PgPool,
        institute_id: Uuid,
        status: InstituteStatus,
        admin_message: Option<&str>,
    ) -> Result<Institute, Error> {
        sqlx::query_as::<_, Institute>(
            r#"
            UPDATE institutes
            SET status = $1, admin_message = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(admin_message)
        .bind(institute_id)
        .fetch_one(pool)
        .await
    }

    pub async fn search_by_name(
        pool: &PgPool,
        query: &str,
        limit: i64,
    ) -> Result<Vec<Institute>, Error> {
        sqlx::query_as::<_, Institute>(
            "SELECT * FROM institutes WHERE name ILIKE $1 ORDER BY name LIMIT $2",
        )
        .bind(format!("%{}%", query))
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
