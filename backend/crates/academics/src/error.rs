//! Academics Error Types
//!
//! Domain errors for student records, courses, enrollments and grades,
//! converted into the unified `kernel::error::AppError` envelope.

use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, FieldErrors},
    kind::ErrorKind,
};
use thiserror::Error;

/// Academics result type alias
pub type AcademicsResult<T> = Result<T, AcademicsError>;

#[derive(Debug, Error)]
pub enum AcademicsError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Student not found")]
    StudentNotFound,

    #[error("Course not found")]
    CourseNotFound,

    #[error("Enrollment not found")]
    EnrollmentNotFound,

    #[error("Grade not found")]
    GradeNotFound,

    /// Duplicate student number or email
    #[error("Student ID or email already exists")]
    StudentExists,

    #[error("Course code already exists")]
    CourseCodeExists,

    /// Active enrollment for the same student and course
    #[error("Student is already enrolled in this course")]
    EnrollmentExists,

    #[error("Student has already been enrolled in this course")]
    AlreadyEnrolledOnce,

    #[error("Instructor must be an active user with the instructor role")]
    InvalidInstructor,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AcademicsError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AcademicsError::Validation(_) | AcademicsError::InvalidInstructor => {
                ErrorKind::BadRequest
            }
            AcademicsError::StudentNotFound
            | AcademicsError::CourseNotFound
            | AcademicsError::EnrollmentNotFound
            | AcademicsError::GradeNotFound => ErrorKind::NotFound,
            AcademicsError::StudentExists
            | AcademicsError::CourseCodeExists
            | AcademicsError::EnrollmentExists
            | AcademicsError::AlreadyEnrolledOnce => ErrorKind::Conflict,
            AcademicsError::Database(_) | AcademicsError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AcademicsError::Validation(_) => "VALIDATION_ERROR",
            AcademicsError::StudentNotFound => "STUDENT_NOT_FOUND",
            AcademicsError::CourseNotFound => "COURSE_NOT_FOUND",
            AcademicsError::EnrollmentNotFound => "ENROLLMENT_NOT_FOUND",
            AcademicsError::GradeNotFound => "GRADE_NOT_FOUND",
            AcademicsError::StudentExists => "STUDENT_EXISTS",
            AcademicsError::CourseCodeExists => "COURSE_CODE_EXISTS",
            AcademicsError::EnrollmentExists => "ENROLLMENT_EXISTS",
            AcademicsError::AlreadyEnrolledOnce => "ALREADY_ENROLLED_ONCE",
            AcademicsError::InvalidInstructor => "INVALID_INSTRUCTOR",
            AcademicsError::Database(_) | AcademicsError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Build a validation error for a single field
    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), message.to_string());
        AcademicsError::Validation(errors)
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            AcademicsError::Validation(errors) => AppError::validation(errors),
            AcademicsError::Database(e) => AppError::from(e),
            other => {
                let kind = other.kind();
                let code = other.code();
                let message = other.to_string();
                AppError::new(kind, message).with_code(code).with_source(other)
            }
        }
    }

    /// Log the error with appropriate level
    ///
    /// Server errors are logged again by `AppError` with their source chain.
    fn log(&self) {
        match self {
            AcademicsError::Internal(msg) => {
                tracing::error!(message = %msg, "Academics internal error");
            }
            AcademicsError::EnrollmentExists | AcademicsError::AlreadyEnrolledOnce => {
                tracing::info!(error = %self, "Enrollment rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Academics error");
            }
        }
    }
}

impl From<AcademicsError> for AppError {
    fn from(err: AcademicsError) -> Self {
        err.into_app_error()
    }
}

impl IntoResponse for AcademicsError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
