use sqlx::{Error, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::models::{
    discounted_price, Course, CourseCategory, NewCourse, NewCourseCategory, UpdateCourse,
    UpdateCourseCategory,
};

/// Result of attempting to consume one seat of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatReservation {
    /// One seat was consumed; the remaining count after the decrement.
    Reserved { remaining: i32 },
    /// No seats left. The counter is left at zero, never negative.
    Exhausted,
}

pub struct CourseRepository;

impl CourseRepository {
    // Categories

    pub async fn create_category(
        pool: &PgPool,
        institute_id: Uuid,
        new_category: &NewCourseCategory,
    ) -> Result<CourseCategory, Error> {
        sqlx::query_as::<_, CourseCategory>(
            r#"
            INSERT INTO course_categories (institute_id, title, description, image_key)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(institute_id)
        .bind(&new_category.title)
        .bind(&new_category.description)
        .bind(&new_category.image_key)
        .fetch_one(pool)
        .await
    }

    pub async fn get_category(pool: &PgPool, id: Uuid) -> Result<Option<CourseCategory>, Error> {
        sqlx::query_as::<_, CourseCategory>("SELECT * FROM course_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_categories_for_institute(
        pool: &PgPool,
        institute_id: Uuid,
    ) -> Result<Vec<CourseCategory>, Error> {
        sqlx::query_as::<_, CourseCategory>(
            "SELECT * FROM course_categories WHERE institute_id = $1 ORDER BY title",
        )
        .bind(institute_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_categories(pool: &PgPool) -> Result<Vec<CourseCategory>, Error> {
        sqlx::query_as::<_, CourseCategory>("SELECT * FROM course_categories ORDER BY title")
            .fetch_all(pool)
            .await
    }

    pub async fn update_category(
        pool: &PgPool,
        id: Uuid,
        update: &UpdateCourseCategory,
    ) -> Result<CourseCategory, Error> {
        sqlx::query_as::<_, CourseCategory>(
            r#"
            UPDATE course_categories
            SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                image_key = COALESCE($3, image_key)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.image_key)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_category(pool: &PgPool, id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM course_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    // Courses

    /// The derived discount price is recomputed on every insert, the same
    /// way it is on every update.
    pub async fn create_course(
        pool: &PgPool,
        institute_id: Uuid,
        new_course: &NewCourse,
    ) -> Result<Course, Error> {
        let discount_price =
            discounted_price(new_course.original_price, new_course.discount_percent);
        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (
                institute_id, category_id, title, description, image_key, duration,
                level, class_type, seats, original_price, discount_percent, discount_price
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(institute_id)
        .bind(new_course.category_id)
        .bind(&new_course.title)
        .bind(&new_course.description)
        .bind(&new_course.image_key)
        .bind(&new_course.duration)
        .bind(new_course.level)
        .bind(new_course.class_type)
        .bind(new_course.seats)
        .bind(new_course.original_price)
        .bind(new_course.discount_percent)
        .bind(discount_price)
        .fetch_one(pool)
        .await
    }

    pub async fn get_course(pool: &PgPool, id: Uuid) -> Result<Option<Course>, Error> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_courses(pool: &PgPool) -> Result<Vec<Course>, Error> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
    }

    pub async fn list_courses_for_category(
        pool: &PgPool,
        category_id: Uuid,
    ) -> Result<Vec<Course>, Error> {
        sqlx::query_as::<_, Course>(
            "SELECT * FROM courses WHERE category_id = $1 ORDER BY created_at DESC",
        )
        .bind(category_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update_course(
        pool: &PgPool,
        course: &Course,
        update: &UpdateCourse,
    ) -> Result<Course, Error> {
        let original_price = update.original_price.unwrap_or(course.original_price);
        let discount_percent = update.discount_percent.unwrap_or(course.discount_percent);
        let discount_price = discounted_price(original_price, discount_percent);
        sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                image_key = COALESCE($3, image_key),
                duration = COALESCE($4, duration),
                level = COALESCE($5, level),
                class_type = COALESCE($6, class_type),
                seats = COALESCE($7, seats),
                original_price = $8,
                discount_percent = $9,
                discount_price = $10,
                updated_at = NOW()
            WHERE id = $11
            RETURNING *
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.image_key)
        .bind(&update.duration)
        .bind(update.level)
        .bind(update.class_type)
        .bind(update.seats)
        .bind(original_price)
        .bind(discount_percent)
        .bind(discount_price)
        .bind(course.id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_course(pool: &PgPool, id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn search_by_title(
        pool: &PgPool,
        query: &str,
        limit: i64,
    ) -> Result<Vec<Course>, Error> {
        sqlx::query_as::<_, Course>(
            "SELECT * FROM courses WHERE title ILIKE $1 ORDER BY title LIMIT $2",
        )
        .bind(format!("%{}%", query))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn search_categories_by_title(
        pool: &PgPool,
        query: &str,
        limit: i64,
    ) -> Result<Vec<CourseCategory>, Error> {
        sqlx::query_as::<_, CourseCategory>(
            "SELECT * FROM course_categories WHERE title ILIKE $1 ORDER BY title LIMIT $2",
        )
        .bind(format!("%{}%", query))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    // Seat ledger

    /// Consume one seat inside the caller's transaction. The course row is
    /// locked FOR UPDATE first, so concurrent acceptances serialize here and
    /// the counter cannot be driven below zero or double-counted.
    pub async fn reserve_seat(
        tx: &mut Transaction<'_, Postgres>,
        course_id: Uuid,
    ) -> Result<SeatReservation, Error> {
        let seats: i32 =
            sqlx::query_scalar("SELECT seats FROM courses WHERE id = $1 FOR UPDATE")
                .bind(course_id)
                .fetch_one(&mut **tx)
                .await?;

        if seats <= 0 {
            return Ok(SeatReservation::Exhausted);
        }

        sqlx::query("UPDATE courses SET seats = seats - 1, updated_at = NOW() WHERE id = $1")
            .bind(course_id)
            .execute(&mut **tx)
            .await?;

        Ok(SeatReservation::Reserved { remaining: seats - 1 })
    }
}
