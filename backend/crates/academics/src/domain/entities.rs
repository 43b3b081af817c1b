//! Domain Entities
//!
//! Student records, the course catalog, enrollments and grades, plus the
//! read models the handlers return.

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, EnrollmentId, GradeId, StudentId, UserId};
use serde::Serialize;

use crate::domain::value_objects::{GradeCode, Units, YearLevel};

// ============================================================================
// Student
// ============================================================================

/// Student record
///
/// Separate from the login account; linked to a user only by email.
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub id: StudentId,
    /// Business key (e.g. "2024-0001")
    pub student_id: String,
    pub full_name: String,
    pub email: String,
    pub year_level: i32,
    pub program: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub student_id: String,
    pub full_name: String,
    pub email: String,
    pub year_level: YearLevel,
    pub program: String,
}

/// Replacement values for `PUT /students/{id}`; the business key is immutable
#[derive(Debug, Clone)]
pub struct StudentChanges {
    pub full_name: String,
    pub email: String,
    pub year_level: YearLevel,
    pub program: String,
}

// ============================================================================
// Course
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Course {
    pub id: CourseId,
    pub course_code: String,
    pub title: String,
    pub units: i32,
    pub instructor_id: Option<UserId>,
    /// Joined from `users.full_name`
    pub instructor_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub course_code: String,
    pub title: String,
    pub units: Units,
    pub instructor_id: Option<UserId>,
}

#[derive(Debug, Clone)]
pub struct CourseChanges {
    pub title: String,
    pub units: Units,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseSummary {
    pub id: CourseId,
    pub course_code: String,
    pub title: String,
}

// ============================================================================
// Enrollment
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Utc>,
    pub dropped_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    pub fn is_active(&self) -> bool {
        self.dropped_at.is_none()
    }
}

/// Enrollment with display fields and the current grade
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentDetails {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub enrolled_at: DateTime<Utc>,
    pub dropped_at: Option<DateTime<Utc>>,
    /// `students.student_id`
    pub student_number: String,
    pub student_name: String,
    pub course_code: String,
    pub course_title: String,
    pub current_grade: Option<String>,
}

// ============================================================================
// Grade
// ============================================================================

/// One grade assignment; an enrollment keeps its whole history
#[derive(Debug, Clone, Serialize)]
pub struct Grade {
    pub id: GradeId,
    pub enrollment_id: EnrollmentId,
    pub grade: String,
    pub assigned_by: Option<UserId>,
    pub assigned_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGrade {
    pub enrollment_id: EnrollmentId,
    pub grade: GradeCode,
    pub assigned_by: UserId,
}

/// Grade with the enrollment it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct GradeDetails {
    pub id: GradeId,
    pub enrollment_id: EnrollmentId,
    pub grade: String,
    pub assigned_by: Option<UserId>,
    pub assigned_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub course_code: String,
    pub course_title: String,
    pub enrollment_dropped: bool,
}

// ============================================================================
// Dashboards
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructorLoad {
    pub instructor_id: UserId,
    pub full_name: String,
    pub assigned_courses: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub total_students: i64,
    pub total_courses: i64,
    pub total_enrollments: i64,
    pub instructors: Vec<InstructorLoad>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrarDashboard {
    pub total_students: i64,
    pub total_enrollments: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstructorDashboard {
    pub assigned_courses: usize,
    pub courses: Vec<CourseSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    pub student_id: StudentId,
    pub student_number: String,
    pub full_name: String,
    pub enrolled_courses: i64,
    pub grades_received: i64,
}
