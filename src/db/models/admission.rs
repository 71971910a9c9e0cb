use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use std::fmt;
use time::{Date, OffsetDateTime};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "admission_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStatus {
    Pending,
    Shortlisted,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionAction {
    Shortlist,
    Accept,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "gender", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "document_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Photo,
    Marksheet,
    IdCard,
    Other,
}

/// Outcome of applying an action to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The status changes; the caller performs any side effects.
    Move(AdmissionStatus),
    /// Re-accepting an accepted admission: nothing to do. Detected here so
    /// the seat decrement and enrollment creation run at most once.
    AlreadyAccepted,
}

/// The action is not allowed from the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: AdmissionStatus,
    pub action: AdmissionAction,
}

impl AdmissionStatus {
    /// The transition table. Shortlisting is optional on the way to a
    /// decision; both terminal states are reached directly from pending.
    pub fn apply(self, action: AdmissionAction) -> Result<Transition, InvalidTransition> {
        use AdmissionAction::*;
        use AdmissionStatus::*;

        match (self, action) {
            (Pending, Shortlist) => Ok(Transition::Move(Shortlisted)),
            (Pending | Shortlisted, Accept) => Ok(Transition::Move(Accepted)),
            (Pending | Shortlisted, Reject) => Ok(Transition::Move(Rejected)),
            (Accepted, Accept) => Ok(Transition::AlreadyAccepted),
            (from, action) => Err(InvalidTransition { from, action }),
        }
    }
}

impl fmt::Display for AdmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdmissionStatus::Pending => "pending",
            AdmissionStatus::Shortlisted => "shortlisted",
            AdmissionStatus::Accepted => "accepted",
            AdmissionStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

impl fmt::Display for AdmissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdmissionAction::Shortlist => "shortlist",
            AdmissionAction::Accept => "accept",
            AdmissionAction::Reject => "reject",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Admission {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub student_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<Gender>,
    pub institute_id: Uuid,
    pub category_id: Uuid,
    pub course_id: Option<Uuid>,
    pub status: AdmissionStatus,
    pub is_paid: bool,
    pub payment_token: Option<String>,
    pub payment_ref: Option<String>,
    /// Fixed at submission time from the course's discounted price; later
    /// course price changes do not touch it.
    pub amount: Decimal,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewAdmission {
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "Student name must not be empty"))]
    pub student_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    pub address: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<Gender>,
    pub course_id: Uuid,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AdmissionDocument {
    pub id: Uuid,
    pub admission_id: Uuid,
    pub doc_type: DocumentType,
    pub file_key: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewAdmissionDocument {
    pub doc_type: DocumentType,
    #[validate(length(min = 1, message = "File key must not be empty"))]
    pub file_key: String,
}

#[cfg(test)]
mod tests {
    use super::AdmissionAction::*;
    use super::AdmissionStatus::*;
    use super::{InvalidTransition, Transition};

    #[test]
    fn pending_reaches_every_other_status() {
        assert_eq!(Pending.apply(Shortlist), Ok(Transition::Move(Shortlisted)));
        assert_eq!(Pending.apply(Accept), Ok(Transition::Move(Accepted)));
        assert_eq!(Pending.apply(Reject), Ok(Transition::Move(Rejected)));
    }

    #[test]
    fn shortlisted_can_be_decided_either_way() {
        assert_eq!(Shortlisted.apply(Accept), Ok(Transition::Move(Accepted)));
        assert_eq!(Shortlisted.apply(Reject), Ok(Transition::Move(Rejected)));
        assert_eq!(
            Shortlisted.apply(Shortlist),
            Err(InvalidTransition {
                from: Shortlisted,
                action: Shortlist
            })
        );
    }

    #[test]
    fn re_accepting_is_a_guarded_no_op() {
        assert_eq!(Accepted.apply(Accept), Ok(Transition::AlreadyAccepted));
    }

    #[test]
    fn terminal_states_reject_other_actions() {
        assert!(Accepted.apply(Reject).is_err());
        assert!(Accepted.apply(Shortlist).is_err());
        assert!(Rejected.apply(Accept).is_err());
        assert!(Rejected.apply(Reject).is_err());
        assert!(Rejected.apply(Shortlist).is_err());
    }
}
