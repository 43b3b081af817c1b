//! Application Layer - Use Cases
//!
//! Orchestrates validation, domain rules and repositories.

pub mod config;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod grades;
pub mod students;
pub mod validation;

pub use config::AcademicsConfig;
pub use courses::CourseService;
pub use dashboard::DashboardService;
pub use enrollments::EnrollmentService;
pub use grades::GradeService;
pub use students::StudentService;
pub use validation::{CourseInput, EnrollmentInput, GradeInput, StudentInput};
