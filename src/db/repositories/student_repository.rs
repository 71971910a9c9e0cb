use sqlx::{Error, PgPool, Postgres, Transaction};
use time::Date;
use uuid::Uuid;

use crate::db::models::{NewUser, Profile, Student, UpdateProfile, User};

pub struct StudentRepository;

impl StudentRepository {
    pub async fn create_user(
        tx: &mut Transaction<'_, Postgres>,
        new_user: &NewUser,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, full_name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&new_user.username)
        .bind(new_user.email.to_lowercase())
        .bind(&new_user.full_name)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The student identity is created together with the account, mirroring
    /// the one-to-one invariant. Idempotent for safety on re-runs.
    pub async fn create_student(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> Result<Student, Error> {
        if let Some(existing) =
            sqlx::query_as::<_, Student>("SELECT * FROM students WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&mut **tx)
                .await?
        {
            return Ok(existing);
        }
        sqlx::query_as::<_, Student>(
            "INSERT INTO students (user_id) VALUES ($1) RETURNING *",
        )
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Typed capability query: does this principal have a linked student
    /// identity? Evaluated once at service entry points.
    pub async fn resolve_student_identity(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> Result<Option<Student>, Error> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn resolve_student_identity_pool(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<Student>, Error> {
        sqlx::query_as::<_, Student>("SELECT * FROM students WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create_profile(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        full_name: &str,
        date_of_birth: Option<Date>,
    ) -> Result<Profile, Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, full_name, date_of_birth)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(date_of_birth)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn get_profile_by_user_id(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<Profile>, Error> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        update: &UpdateProfile,
    ) -> Result<Profile, Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET
                full_name = COALESCE($1, full_name),
                avatar_key = COALESCE($2, avatar_key),
                date_of_birth = COALESCE($3, date_of_birth),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                updated_at = NOW()
            WHERE user_id = $6
            RETURNING *
            "#,
        )
        .bind(&update.full_name)
        .bind(&update.avatar_key)
        .bind(update.date_of_birth)
        .bind(&update.phone)
        .bind(&update.address)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
