pub mod admission_service;
pub mod catalog_service;
pub mod institute_service;
pub mod registration_service;

pub use admission_service::{AdmissionService, TransitionOutcome};
pub use catalog_service::CatalogService;
pub use institute_service::InstituteService;
pub use registration_service::RegistrationService;
