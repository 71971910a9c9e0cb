use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "institute_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InstituteStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Institute {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub established: String,
    pub email: String,
    pub phone: String,
    pub website: Option<String>,
    pub address: Option<String>,
    pub logo_key: Option<String>,
    pub background_key: Option<String>,
    pub signature_key: Option<String>,
    pub stamp_key: Option<String>,
    pub register_number: String,
    pub register_doc_key: Option<String>,
    pub status: InstituteStatus,
    pub admin_message: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Institute {
    /// The approval gate: categories, courses and admission processing are
    /// only actionable for an approved institute.
    pub fn is_actionable(&self) -> bool {
        self.status == InstituteStatus::Approved
    }
}

/// Application details, used both for a first application and for
/// resubmitting after a rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct InstituteApplication {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub established: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(url)]
    pub website: Option<String>,
    pub address: Option<String>,
    pub logo_key: Option<String>,
    pub background_key: Option<String>,
    pub signature_key: Option<String>,
    pub stamp_key: Option<String>,
    #[validate(length(min = 1, message = "Register number is required"))]
    pub register_number: String,
    pub register_doc_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn institute(status: InstituteStatus) -> Institute {
        Institute {
            id: Uuid::nil(),
            owner_id: Uuid::nil(),
            name: "Test Institute".into(),
            description: "desc".into(),
            established: "2001".into(),
            email: "info@test.edu".into(),
            phone: "123".into(),
            website: None,
            address: None,
            logo_key: None,
            background_key: None,
            signature_key: None,
            stamp_key: None,
            register_number: "REG-1".into(),
            register_doc_key: None,
            status,
            admin_message: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn only_approved_institutes_are_actionable() {
        assert!(institute(InstituteStatus::Approved).is_actionable());
        assert!(!institute(InstituteStatus::Pending).is_actionable());
        assert!(!institute(InstituteStatus::Rejected).is_actionable());
    }
}
