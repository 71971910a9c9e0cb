use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::models::{
    Course, CourseCategory, Institute, NewCourse, NewCourseCategory, UpdateCourse,
    UpdateCourseCategory,
};
use crate::db::repositories::{CourseRepository, InstituteRepository};
use crate::error::{AppError, AppResult};
use crate::services::institute_service::InstituteService;

#[derive(Debug, serde::Serialize)]
pub struct SearchResults {
    pub categories: Vec<CourseCategory>,
    pub courses: Vec<Course>,
    pub institutes: Vec<Institute>,
}

const SEARCH_LIMIT: i64 = 5;

pub struct CatalogService;

impl CatalogService {
    // Owner-side catalog management; everything behind the approval gate.

    pub async fn create_category(
        pool: &PgPool,
        user_id: Uuid,
        new_category: &NewCourseCategory,
    ) -> AppResult<CourseCategory> {
        new_category.validate()?;
        let institute = InstituteService::approved_institute_for(pool, user_id).await?;
        Ok(CourseRepository::create_category(pool, institute.id, new_category).await?)
    }

    pub async fn update_category(
        pool: &PgPool,
        user_id: Uuid,
        category_id: Uuid,
        update: &UpdateCourseCategory,
    ) -> AppResult<CourseCategory> {
        update.validate()?;
        let institute = InstituteService::approved_institute_for(pool, user_id).await?;
        Self::owned_category(pool, &institute, category_id).await?;
        Ok(CourseRepository::update_category(pool, category_id, update).await?)
    }

    pub async fn delete_category(
        pool: &PgPool,
        user_id: Uuid,
        category_id: Uuid,
    ) -> AppResult<()> {
        let institute = InstituteService::approved_institute_for(pool, user_id).await?;
        Self::owned_category(pool, &institute, category_id).await?;
        Ok(CourseRepository::delete_category(pool, category_id).await?)
    }

    pub async fn create_course(
        pool: &PgPool,
        user_id: Uuid,
        new_course: &NewCourse,
    ) -> AppResult<Course> {
        new_course.validate()?;
        let institute = InstituteService::approved_institute_for(pool, user_id).await?;
        // The category must belong to the owner's institute.
        Self::owned_category(pool, &institute, new_course.category_id).await?;
        Ok(CourseRepository::create_course(pool, institute.id, new_course).await?)
    }

    pub async fn update_course(
        pool: &PgPool,
        user_id: Uuid,
        course_id: Uuid,
        update: &UpdateCourse,
    ) -> AppResult<Course> {
        update.validate()?;
        let institute = InstituteService::approved_institute_for(pool, user_id).await?;
        let course = Self::owned_course(pool, &institute, course_id).await?;
        Ok(CourseRepository::update_course(pool, &course, update).await?)
    }

    pub async fn delete_course(pool: &PgPool, user_id: Uuid, course_id: Uuid) -> AppResult<()> {
        let institute = InstituteService::approved_institute_for(pool, user_id).await?;
        Self::owned_course(pool, &institute, course_id).await?;
        Ok(CourseRepository::delete_course(pool, course_id).await?)
    }

    // Student-side reads.

    pub async fn list_courses(pool: &PgPool) -> AppResult<Vec<Course>> {
        Ok(CourseRepository::list_courses(pool).await?)
    }

    pub async fn list_courses_for_category(
        pool: &PgPool,
        category_id: Uuid,
    ) -> AppResult<Vec<Course>> {
        Ok(CourseRepository::list_courses_for_category(pool, category_id).await?)
    }

    pub async fn course_detail(pool: &PgPool, course_id: Uuid) -> AppResult<Course> {
        CourseRepository::get_course(pool, course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".into()))
    }

    pub async fn list_categories(pool: &PgPool) -> AppResult<Vec<CourseCategory>> {
        Ok(CourseRepository::list_categories(pool).await?)
    }

    pub async fn search(pool: &PgPool, query: &str) -> AppResult<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults {
                categories: Vec::new(),
                courses: Vec::new(),
                institutes: Vec::new(),
            });
        }
        Ok(SearchResults {
            categories: CourseRepository::search_categories_by_title(pool, query, SEARCH_LIMIT)
                .await?,
            courses: CourseRepository::search_by_title(pool, query, SEARCH_LIMIT).await?,
            institutes: InstituteRepository::search_by_name(pool, query, SEARCH_LIMIT).await?,
        })
    }

    async fn owned_category(
        pool: &PgPool,
        institute: &Institute,
        category_id: Uuid,
    ) -> AppResult<CourseCategory> {
        let category = CourseRepository::get_category(pool, category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".into()))?;
        if category.institute_id != institute.id {
            return Err(AppError::NotFound("Category not found".into()));
        }
        Ok(category)
    }

    async fn owned_course(
        pool: &PgPool,
        institute: &Institute,
        course_id: Uuid,
    ) -> AppResult<Course> {
        let course = CourseRepository::get_course(pool, course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".into()))?;
        if course.institute_id != institute.id {
            return Err(AppError::NotFound("Course not found".into()));
        }
        Ok(course)
    }
}
