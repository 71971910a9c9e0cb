use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::db::models::{NewUser, Profile, Student, User};
use crate::db::repositories::StudentRepository;
use crate::error::{AppError, AppResult};

#[derive(Debug, serde::Serialize)]
pub struct Registration {
    pub user: User,
    pub student: Student,
    pub profile: Profile,
}

pub struct RegistrationService;

impl RegistrationService {
    /// Create the account, its student identity and its profile in one
    /// transaction. This is the explicit replacement for implicit
    /// on-creation hooks: there is exactly one place where the bookkeeping
    /// happens, and it cannot half-complete.
    pub async fn register(pool: &PgPool, new_user: &NewUser) -> AppResult<Registration> {
        new_user.validate()?;

        let mut tx = pool.begin().await?;
        let user = StudentRepository::create_user(&mut tx, new_user).await?;
        let student = StudentRepository::create_student(&mut tx, user.id).await?;
        let profile =
            StudentRepository::create_profile(&mut tx, user.id, &user.full_name, None).await?;
        tx.commit().await?;

        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(Registration {
            user,
            student,
            profile,
        })
    }

    pub async fn get_user(pool: &PgPool, user_id: Uuid) -> AppResult<User> {
        StudentRepository::get_user_by_id(pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}
