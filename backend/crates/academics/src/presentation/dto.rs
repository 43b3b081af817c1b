//! API DTOs
//!
//! Field names are snake_case, as the existing front end expects.

use serde::{Deserialize, Serialize};

use crate::application::validation::{CourseInput, EnrollmentInput, GradeInput, StudentInput};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentRequest {
    pub student_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub year_level: Option<i64>,
    pub program: Option<String>,
}

impl From<StudentRequest> for StudentInput {
    fn from(req: StudentRequest) -> Self {
        Self {
            student_id: req.student_id,
            full_name: req.full_name,
            email: req.email,
            year_level: req.year_level,
            program: req.program,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseRequest {
    pub course_code: Option<String>,
    pub title: Option<String>,
    pub units: Option<i64>,
    pub instructor_id: Option<i64>,
}

impl From<CourseRequest> for CourseInput {
    fn from(req: CourseRequest) -> Self {
        Self {
            course_code: req.course_code,
            title: req.title,
            units: req.units,
            instructor_id: req.instructor_id,
        }
    }
}

/// `{"instructor_id": null}` unassigns
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignInstructorRequest {
    pub instructor_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentRequest {
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
}

impl From<EnrollmentRequest> for EnrollmentInput {
    fn from(req: EnrollmentRequest) -> Self {
        Self {
            student_id: req.student_id,
            course_id: req.course_id,
        }
    }
}

/// `assigned_by` is never read from the body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeRequest {
    pub enrollment_id: Option<i64>,
    pub grade: Option<String>,
}

impl From<GradeRequest> for GradeInput {
    fn from(req: GradeRequest) -> Self {
        Self {
            enrollment_id: req.enrollment_id,
            grade: req.grade,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeUpdateRequest {
    pub grade: Option<String>,
}

/// `?include_inactive=true`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}
