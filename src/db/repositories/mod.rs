mod student_repository;
mod institute_repository;
mod course_repository;
mod admission_repository;
mod enrollment_repository;
mod feedback_repository;

pub use student_repository::StudentRepository;
pub use institute_repository::InstituteRepository;
pub use course_repository::{CourseRepository, SeatReservation};
pub use admission_repository::AdmissionRepository;
pub use enrollment_repository::EnrollmentRepository;
pub use feedback_repository::FeedbackRepository;
