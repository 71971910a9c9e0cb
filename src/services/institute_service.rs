use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::db::models::{
    Admission, CourseCategory, Institute, InstituteApplication, InstituteStatus,
};
use crate::db::repositories::{
    AdmissionRepository, CourseRepository, InstituteRepository, StudentRepository,
};
use crate::error::{AppError, AppResult};

/// What an institute owner sees on their dashboard: the application in each
/// state plus, when approved, the catalog and incoming admissions.
#[derive(Debug, serde::Serialize)]
pub struct Dashboard {
    pub approved: Option<Institute>,
    pub pending: Option<Institute>,
    pub rejected: Option<Institute>,
    pub categories: Vec<CourseCategory>,
    pub admissions: Vec<Admission>,
}

pub struct InstituteService;

impl InstituteService {
    /// Submit an institute application for the given principal. A rejected
    /// application is resubmitted in place (status back to pending, admin
    /// message cleared); a live one makes this a conflict.
    pub async fn apply(
        pool: &PgPool,
        user_id: Uuid,
        application: &InstituteApplication,
    ) -> AppResult<Institute> {
        application.validate()?;

        let mut tx = pool.begin().await?;

        let student = StudentRepository::resolve_student_identity(&mut tx, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student profile not found".into()))?;

        if InstituteRepository::find_active_for_owner(&mut tx, student.id)
            .await?
            .is_some()
        {
            return Err(AppError::ActiveApplicationExists);
        }

        let institute =
            match InstituteRepository::find_rejected_for_owner(&mut tx, student.id).await? {
                Some(rejected) => {
                    info!(institute_id = %rejected.id, "resubmitting rejected institute application");
                    InstituteRepository::reapply(&mut tx, rejected.id, application).await?
                }
                None => {
                    InstituteRepository::insert_application(&mut tx, student.id, application)
                        .await?
                }
            };

        tx.commit().await?;
        Ok(institute)
    }

    pub async fn approve(pool: &PgPool, institute_id: Uuid) -> AppResult<Institute> {
        Self::ensure_exists(pool, institute_id).await?;
        let institute =
            InstituteRepository::set_status(pool, institute_id, InstituteStatus::Approved, None)
                .await?;
        info!(institute_id = %institute.id, "institute approved");
        Ok(institute)
    }

    pub async fn reject(
        pool: &PgPool,
        institute_id: Uuid,
        message: Option<&str>,
    ) -> AppResult<Institute> {
        Self::ensure_exists(pool, institute_id).await?;
        let institute =
            InstituteRepository::set_status(pool, institute_id, InstituteStatus::Rejected, message)
                .await?;
        info!(institute_id = %institute.id, "institute rejected");
        Ok(institute)
    }

    pub async fn get(pool: &PgPool, institute_id: Uuid) -> AppResult<Institute> {
        InstituteRepository::get(pool, institute_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Institute not found".into()))
    }

    /// The approval gate for owner-side operations: resolves the principal's
    /// approved institute or fails.
    pub async fn approved_institute_for(pool: &PgPool, user_id: Uuid) -> AppResult<Institute> {
        let student = StudentRepository::resolve_student_identity_pool(pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student profile not found".into()))?;

        InstituteRepository::find_approved_for_owner(pool, student.id)
            .await?
            .ok_or(AppError::InstituteNotApproved)
    }

    pub async fn dashboard(pool: &PgPool, user_id: Uuid) -> AppResult<Dashboard> {
        let student = StudentRepository::resolve_student_identity_pool(pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student profile not found".into()))?;

        let mut tx = pool.begin().await?;
        let active = InstituteRepository::find_active_for_owner(&mut tx, student.id).await?;
        let rejected = InstituteRepository::find_rejected_for_owner(&mut tx, student.id).await?;
        tx.commit().await?;

        let (approved, pending) = match active {
            Some(inst) if inst.status == InstituteStatus::Approved => (Some(inst), None),
            Some(inst) => (None, Some(inst)),
            None => (None, None),
        };

        let (categories, admissions) = match &approved {
            Some(inst) => (
                CourseRepository::list_categories_for_institute(pool, inst.id).await?,
                AdmissionRepository::list_for_institute(pool, inst.id).await?,
            ),
            None => (Vec::new(), Vec::new()),
        };

        Ok(Dashboard {
            approved,
            pending,
            rejected,
            categories,
            admissions,
        })
    }

    async fn ensure_exists(pool: &PgPool, institute_id: Uuid) -> AppResult<()> {
        InstituteRepository::get(pool, institute_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Institute not found".into()))
    }
}
