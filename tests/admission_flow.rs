//! End-to-end admission lifecycle tests. These need a running Postgres and
//! are ignored by default: `DATABASE_URL=... cargo test -- --ignored`.

use rust_decimal_macros::dec;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use admissions_backend::db::models::{
    Admission, AdmissionAction, ClassType, Course, CourseLevel, InstituteApplication,
    InstituteStatus, NewAdmission, NewCourse, NewCourseCategory, NewUser, UpdateCourse,
};
use admissions_backend::db::repositories::EnrollmentRepository;
use admissions_backend::services::registration_service::Registration;
use admissions_backend::services::{
    AdmissionService, CatalogService, InstituteService, RegistrationService,
};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

async fn register(pool: &PgPool) -> Registration {
    let tag = Uuid::new_v4().simple().to_string();
    RegistrationService::register(
        pool,
        &NewUser {
            username: format!("student_{tag}"),
            email: format!("student_{tag}@example.com"),
            full_name: "Test Student".into(),
        },
    )
    .await
    .expect("register user")
}

fn application(name: &str) -> InstituteApplication {
    InstituteApplication {
        name: name.into(),
        description: "A test institute".into(),
        established: "2001".into(),
        email: "contact@test-institute.edu".into(),
        phone: "01-555-0100".into(),
        website: None,
        address: None,
        logo_key: None,
        background_key: None,
        signature_key: None,
        stamp_key: None,
        register_number: "REG-0001".into(),
        register_doc_key: None,
    }
}

/// Registers an owner, applies, approves and returns (owner, institute id).
async fn approved_institute(pool: &PgPool) -> (Registration, Uuid) {
    let owner = register(pool).await;
    let institute = InstituteService::apply(pool, owner.user.id, &application("Test Institute"))
        .await
        .expect("apply for institute");
    let institute = InstituteService::approve(pool, institute.id)
        .await
        .expect("approve institute");
    (owner, institute.id)
}

async fn seeded_course(
    pool: &PgPool,
    owner_user_id: Uuid,
    seats: i32,
    original_price: rust_decimal::Decimal,
    discount_percent: i32,
) -> Course {
    let category = CatalogService::create_category(
        pool,
        owner_user_id,
        &NewCourseCategory {
            title: "Programming".into(),
            description: None,
            image_key: None,
        },
    )
    .await
    .expect("create category");

    CatalogService::create_course(
        pool,
        owner_user_id,
        &NewCourse {
            category_id: category.id,
            title: "Rust Fundamentals".into(),
            description: "Ownership and borrowing".into(),
            image_key: None,
            duration: "3 months".into(),
            level: CourseLevel::Beginner,
            class_type: ClassType::Online,
            seats,
            original_price,
            discount_percent,
        },
    )
    .await
    .expect("create course")
}

async fn submit_admission(pool: &PgPool, user_id: Uuid, course: &Course) -> Admission {
    AdmissionService::submit(
        pool,
        &NewAdmission {
            user_id,
            student_name: "Test Applicant".into(),
            email: "applicant@example.com".into(),
            phone: "555-0101".into(),
            address: None,
            date_of_birth: None,
            gender: None,
            course_id: course.id,
        },
    )
    .await
    .expect("submit admission")
}

async fn course_seats(pool: &PgPool, course_id: Uuid) -> i32 {
    sqlx::query_scalar("SELECT seats FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_one(pool)
        .await
        .expect("read seats")
}

async fn enrollment_count(pool: &PgPool, course_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
        .bind(course_id)
        .fetch_one(pool)
        .await
        .expect("count enrollments")
}

#[tokio::test]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn acceptance_decrements_seat_and_enrolls_once() {
    let pool = pool().await;
    let (owner, _) = approved_institute(&pool).await;
    let course = seeded_course(&pool, owner.user.id, 5, dec!(1000.00), 10).await;

    let applicant = register(&pool).await;
    let admission = submit_admission(&pool, applicant.user.id, &course).await;
    assert_eq!(admission.amount, dec!(900.00));

    let outcome =
        AdmissionService::transition(&pool, admission.id, AdmissionAction::Accept, now())
            .await
            .expect("accept admission");
    assert!(outcome.enrollment_created);
    assert!(!outcome.seats_exhausted);
    assert_eq!(course_seats(&pool, course.id).await, 4);
    assert_eq!(enrollment_count(&pool, course.id).await, 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn re_accepting_is_a_no_op() {
    let pool = pool().await;
    let (owner, _) = approved_institute(&pool).await;
    let course = seeded_course(&pool, owner.user.id, 5, dec!(1000.00), 0).await;

    let applicant = register(&pool).await;
    let admission = submit_admission(&pool, applicant.user.id, &course).await;

    AdmissionService::transition(&pool, admission.id, AdmissionAction::Accept, now())
        .await
        .expect("first accept");
    let outcome =
        AdmissionService::transition(&pool, admission.id, AdmissionAction::Accept, now())
            .await
            .expect("second accept");

    assert!(outcome.already_accepted);
    assert_eq!(course_seats(&pool, course.id).await, 4);
    assert_eq!(enrollment_count(&pool, course.id).await, 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn concurrent_acceptances_serialize_on_the_seat_counter() {
    let pool = pool().await;
    let (owner, _) = approved_institute(&pool).await;
    let course = seeded_course(&pool, owner.user.id, 5, dec!(1000.00), 0).await;

    let mut admissions = Vec::new();
    for _ in 0..3 {
        let applicant = register(&pool).await;
        admissions.push(submit_admission(&pool, applicant.user.id, &course).await);
    }

    let (a, b, c) = tokio::join!(
        AdmissionService::transition(&pool, admissions[0].id, AdmissionAction::Accept, now()),
        AdmissionService::transition(&pool, admissions[1].id, AdmissionAction::Accept, now()),
        AdmissionService::transition(&pool, admissions[2].id, AdmissionAction::Accept, now()),
    );
    a.expect("accept 1");
    b.expect("accept 2");
    c.expect("accept 3");

    assert_eq!(course_seats(&pool, course.id).await, 2);
    assert_eq!(enrollment_count(&pool, course.id).await, 3);
}

#[tokio::test]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn acceptance_with_zero_seats_succeeds_and_never_goes_negative() {
    let pool = pool().await;
    let (owner, _) = approved_institute(&pool).await;
    let course = seeded_course(&pool, owner.user.id, 0, dec!(1000.00), 0).await;

    let applicant = register(&pool).await;
    let admission = submit_admission(&pool, applicant.user.id, &course).await;

    let outcome =
        AdmissionService::transition(&pool, admission.id, AdmissionAction::Accept, now())
            .await
            .expect("accept with zero seats");

    assert!(outcome.seats_exhausted);
    assert!(outcome.enrollment_created);
    assert_eq!(course_seats(&pool, course.id).await, 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn concurrent_ensure_enrollment_yields_one_row() {
    let pool = pool().await;
    let (owner, institute_id) = approved_institute(&pool).await;
    let course = seeded_course(&pool, owner.user.id, 5, dec!(1000.00), 0).await;
    let student = register(&pool).await.student;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = pool.clone();
        let course_id = course.id;
        let student_id = student.id;
        handles.push(tokio::spawn(async move {
            let mut tx = pool.begin().await.expect("begin");
            let result = EnrollmentRepository::ensure_enrollment(
                &mut tx,
                student_id,
                course_id,
                institute_id,
                OffsetDateTime::now_utc(),
            )
            .await
            .expect("ensure enrollment");
            tx.commit().await.expect("commit");
            result.1
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.expect("join") {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(enrollment_count(&pool, course.id).await, 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn reapplication_after_rejection_resets_status_and_message() {
    let pool = pool().await;
    let owner = register(&pool).await;

    let institute = InstituteService::apply(&pool, owner.user.id, &application("First Try"))
        .await
        .expect("apply");
    InstituteService::reject(&pool, institute.id, Some("Incomplete paperwork"))
        .await
        .expect("reject");

    let resubmitted =
        InstituteService::apply(&pool, owner.user.id, &application("Second Try"))
            .await
            .expect("reapply");

    assert_eq!(resubmitted.id, institute.id);
    assert_eq!(resubmitted.status, InstituteStatus::Pending);
    assert_eq!(resubmitted.admin_message, None);
    assert_eq!(resubmitted.name, "Second Try");
}

#[tokio::test]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn admission_amount_is_fixed_at_submission_time() {
    let pool = pool().await;
    let (owner, _) = approved_institute(&pool).await;
    let course = seeded_course(&pool, owner.user.id, 5, dec!(1000.00), 10).await;

    let applicant = register(&pool).await;
    let admission = submit_admission(&pool, applicant.user.id, &course).await;
    assert_eq!(admission.amount, dec!(900.00));

    CatalogService::update_course(
        &pool,
        owner.user.id,
        course.id,
        &UpdateCourse {
            title: None,
            description: None,
            image_key: None,
            duration: None,
            level: None,
            class_type: None,
            seats: None,
            original_price: Some(dec!(2000.00)),
            discount_percent: None,
        },
    )
    .await
    .expect("raise course price");

    let unchanged = AdmissionService::get(&pool, admission.id)
        .await
        .expect("reload admission");
    assert_eq!(unchanged.amount, dec!(900.00));
}

#[tokio::test]
#[ignore = "requires a running Postgres (set DATABASE_URL)"]
async fn unapproved_institute_cannot_take_admissions() {
    let pool = pool().await;
    let (owner, institute_id) = approved_institute(&pool).await;
    let course = seeded_course(&pool, owner.user.id, 5, dec!(1000.00), 0).await;

    // Push the institute back out of the approved state.
    sqlx::query("UPDATE institutes SET status = 'pending' WHERE id = $1")
        .bind(institute_id)
        .execute(&pool)
        .await
        .expect("reset institute status");

    let applicant = register(&pool).await;
    let result = AdmissionService::submit(
        &pool,
        &NewAdmission {
            user_id: applicant.user.id,
            student_name: "Blocked Applicant".into(),
            email: "blocked@example.com".into(),
            phone: "555-0102".into(),
            address: None,
            date_of_birth: None,
            gender: None,
            course_id: course.id,
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(admissions_backend::error::AppError::InstituteNotApproved)
    ));
}
