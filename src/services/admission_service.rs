use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::db::models::{
    discounted_price, Admission, AdmissionAction, AdmissionDocument, AdmissionStatus,
    NewAdmission, NewAdmissionDocument, Transition,
};
use crate::db::repositories::{
    AdmissionRepository, CourseRepository, EnrollmentRepository, InstituteRepository,
    SeatReservation, StudentRepository,
};
use crate::error::{AppError, AppResult};

/// What happened when an action was applied to an admission. The flags feed
/// the user-facing message; none of them is an error.
#[derive(Debug, serde::Serialize)]
pub struct TransitionOutcome {
    pub admission: Admission,
    pub already_accepted: bool,
    pub enrollment_created: bool,
    pub already_enrolled: bool,
    pub seats_exhausted: bool,
}

impl TransitionOutcome {
    fn status_only(admission: Admission) -> Self {
        Self {
            admission,
            already_accepted: false,
            enrollment_created: false,
            already_enrolled: false,
            seats_exhausted: false,
        }
    }

    pub fn message(&self) -> String {
        if self.already_accepted {
            return "Admission was already accepted; nothing to do.".to_string();
        }
        match self.admission.status {
            AdmissionStatus::Shortlisted => "Student shortlisted successfully!".to_string(),
            AdmissionStatus::Rejected => "Student rejected successfully!".to_string(),
            AdmissionStatus::Accepted => {
                let mut msg = if self.enrollment_created {
                    "Student accepted and auto-enrolled successfully!".to_string()
                } else {
                    "Student was already enrolled in this course.".to_string()
                };
                if self.seats_exhausted {
                    msg.push_str(" Note: the course has no seats left.");
                }
                msg
            }
            AdmissionStatus::Pending => "Admission is pending.".to_string(),
        }
    }
}

pub struct AdmissionService;

impl AdmissionService {
    /// Submit an application for a course. The amount is computed here, once,
    /// from the course's current discounted price.
    pub async fn submit(pool: &PgPool, new_admission: &NewAdmission) -> AppResult<Admission> {
        new_admission.validate()?;

        let course = CourseRepository::get_course(pool, new_admission.course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".into()))?;

        let institute = InstituteRepository::get(pool, course.institute_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Institute not found".into()))?;
        if !institute.is_actionable() {
            return Err(AppError::InstituteNotApproved);
        }

        let amount = discounted_price(course.original_price, course.discount_percent);
        let payment_token = Uuid::new_v4().to_string();

        let admission = AdmissionRepository::insert(
            pool,
            new_admission,
            course.institute_id,
            course.category_id,
            amount,
            &payment_token,
        )
        .await?;
        info!(admission_id = %admission.id, course_id = %course.id, "admission submitted");
        Ok(admission)
    }

    /// The single authoritative entry point for admission status changes.
    /// Owns the whole side-effect sequence for acceptance: status write,
    /// seat decrement and enrollment creation run in one transaction, with
    /// the admission row locked first so concurrent calls serialize.
    pub async fn transition(
        pool: &PgPool,
        admission_id: Uuid,
        action: AdmissionAction,
        now: OffsetDateTime,
    ) -> AppResult<TransitionOutcome> {
        let mut tx = pool.begin().await?;

        let admission = AdmissionRepository::get_for_update(&mut tx, admission_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Admission not found".into()))?;

        let institute = InstituteRepository::get_in_tx(&mut tx, admission.institute_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Institute not found".into()))?;
        if !institute.is_actionable() {
            return Err(AppError::InstituteNotApproved);
        }

        let next = match admission.status.apply(action) {
            Ok(Transition::Move(next)) => next,
            Ok(Transition::AlreadyAccepted) => {
                // Guarded no-op: no status write, no seat decrement, no
                // enrollment attempt.
                tx.commit().await?;
                return Ok(TransitionOutcome {
                    already_accepted: true,
                    ..TransitionOutcome::status_only(admission)
                });
            }
            Err(invalid) => {
                return Err(AppError::InvalidTransition {
                    from: invalid.from,
                    action: invalid.action,
                });
            }
        };

        if next != AdmissionStatus::Accepted {
            let admission = AdmissionRepository::set_status(&mut tx, admission_id, next).await?;
            tx.commit().await?;
            return Ok(TransitionOutcome::status_only(admission));
        }

        // Preconditions are checked before the status write, so a failure
        // aborts with the admission untouched.
        let course_id = admission.course_id.ok_or_else(|| {
            AppError::IncompleteApplicant("no course attached to this admission".into())
        })?;
        let user_id = admission.user_id.ok_or_else(|| {
            AppError::IncompleteApplicant("admission has no linked user account".into())
        })?;
        let student = StudentRepository::resolve_student_identity(&mut tx, user_id)
            .await?
            .ok_or_else(|| {
                AppError::IncompleteApplicant("user has no student identity".into())
            })?;

        let admission =
            AdmissionRepository::set_status(&mut tx, admission_id, AdmissionStatus::Accepted)
                .await?;

        let seats_exhausted =
            match CourseRepository::reserve_seat(&mut tx, course_id).await? {
                SeatReservation::Reserved { remaining } => {
                    info!(course_id = %course_id, remaining, "seat reserved");
                    false
                }
                SeatReservation::Exhausted => {
                    // Acceptance still proceeds; the counter stays at zero.
                    warn!(course_id = %course_id, "course seats exhausted at acceptance");
                    true
                }
            };

        let (_, enrollment_created) = EnrollmentRepository::ensure_enrollment(
            &mut tx,
            student.id,
            course_id,
            admission.institute_id,
            now,
        )
        .await?;

        tx.commit().await?;
        info!(
            admission_id = %admission_id,
            enrollment_created,
            seats_exhausted,
            "admission accepted"
        );

        Ok(TransitionOutcome {
            admission,
            already_accepted: false,
            enrollment_created,
            already_enrolled: !enrollment_created,
            seats_exhausted,
        })
    }

    /// Detach the course from an admission without deleting the record.
    /// Seats are not released here; nothing releases seats.
    pub async fn remove_course(pool: &PgPool, admission_id: Uuid) -> AppResult<Admission> {
        Self::get(pool, admission_id).await?;
        Ok(AdmissionRepository::detach_course(pool, admission_id).await?)
    }

    pub async fn get(pool: &PgPool, admission_id: Uuid) -> AppResult<Admission> {
        AdmissionRepository::get(pool, admission_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Admission not found".into()))
    }

    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> AppResult<Vec<Admission>> {
        Ok(AdmissionRepository::list_for_user(pool, user_id).await?)
    }

    /// Mock payment provider: flags the admission as paid and stamps a
    /// reference. No gateway is involved.
    pub async fn record_mock_payment(pool: &PgPool, admission_id: Uuid) -> AppResult<Admission> {
        Self::get(pool, admission_id).await?;
        let payment_ref = format!("MOCK-{}", Uuid::new_v4());
        let admission = AdmissionRepository::mark_paid(pool, admission_id, &payment_ref).await?;
        info!(admission_id = %admission.id, payment_ref = %payment_ref, "mock payment recorded");
        Ok(admission)
    }

    pub async fn add_document(
        pool: &PgPool,
        admission_id: Uuid,
        doc: &NewAdmissionDocument,
    ) -> AppResult<AdmissionDocument> {
        doc.validate()?;
        Self::get(pool, admission_id).await?;
        Ok(AdmissionRepository::add_document(pool, admission_id, doc).await?)
    }

    pub async fn list_documents(
        pool: &PgPool,
        admission_id: Uuid,
    ) -> AppResult<Vec<AdmissionDocument>> {
        Self::get(pool, admission_id).await?;
        Ok(AdmissionRepository::list_documents(pool, admission_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::TransitionOutcome;
    use crate::db::models::{Admission, AdmissionStatus};
    use rust_decimal_macros::dec;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn admission(status: AdmissionStatus) -> Admission {
        Admission {
            id: Uuid::nil(),
            user_id: Some(Uuid::nil()),
            student_name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: "555".into(),
            address: None,
            date_of_birth: None,
            gender: None,
            institute_id: Uuid::nil(),
            category_id: Uuid::nil(),
            course_id: Some(Uuid::nil()),
            status,
            is_paid: false,
            payment_token: None,
            payment_ref: None,
            amount: dec!(900.00),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn acceptance_message_reports_fresh_enrollment() {
        let outcome = TransitionOutcome {
            enrollment_created: true,
            ..TransitionOutcome::status_only(admission(AdmissionStatus::Accepted))
        };
        assert_eq!(
            outcome.message(),
            "Student accepted and auto-enrolled successfully!"
        );
    }

    #[test]
    fn acceptance_message_reports_existing_enrollment() {
        let outcome = TransitionOutcome {
            already_enrolled: true,
            ..TransitionOutcome::status_only(admission(AdmissionStatus::Accepted))
        };
        assert_eq!(
            outcome.message(),
            "Student was already enrolled in this course."
        );
    }

    #[test]
    fn exhausted_seats_are_mentioned_but_not_fatal() {
        let outcome = TransitionOutcome {
            enrollment_created: true,
            seats_exhausted: true,
            ..TransitionOutcome::status_only(admission(AdmissionStatus::Accepted))
        };
        assert!(outcome.message().contains("no seats left"));
    }

    #[test]
    fn re_acceptance_message_signals_the_no_op() {
        let outcome = TransitionOutcome {
            already_accepted: true,
            ..TransitionOutcome::status_only(admission(AdmissionStatus::Accepted))
        };
        assert!(outcome.message().contains("already accepted"));
    }
}
