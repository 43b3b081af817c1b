//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{CourseId, EnrollmentId, GradeId, StudentId, UserId};

use crate::domain::entities::{
    Course, CourseChanges, CourseSummary, Enrollment, EnrollmentDetails, Grade, GradeDetails,
    InstructorLoad, NewCourse, NewGrade, NewStudent, Student, StudentChanges,
};
use crate::domain::value_objects::GradeCode;
use crate::error::AcademicsResult;

#[trait_variant::make(StudentRepository: Send)]
pub trait LocalStudentRepository {
    /// Fails with `StudentExists` on a duplicate student id or email
    async fn create(&self, student: &NewStudent) -> AcademicsResult<StudentId>;

    async fn get_all(&self, active_only: bool) -> AcademicsResult<Vec<Student>>;

    /// Any student, active or not
    async fn get_by_id(&self, id: StudentId) -> AcademicsResult<Option<Student>>;

    /// Active student by exact email
    async fn get_by_email(&self, email: &str) -> AcademicsResult<Option<Student>>;

    async fn update(
        &self,
        id: StudentId,
        changes: &StudentChanges,
    ) -> AcademicsResult<Option<Student>>;

    /// Soft delete
    async fn deactivate(&self, id: StudentId) -> AcademicsResult<Option<Student>>;
}

#[trait_variant::make(CourseRepository: Send)]
pub trait LocalCourseRepository {
    /// Fails with `CourseCodeExists` on a duplicate code
    async fn create(&self, course: &NewCourse) -> AcademicsResult<CourseId>;

    async fn get_all(&self, active_only: bool) -> AcademicsResult<Vec<Course>>;

    async fn get_by_id(&self, id: CourseId) -> AcademicsResult<Option<Course>>;

    /// Title and units only; the course code never changes
    async fn update(&self, id: CourseId, changes: &CourseChanges)
    -> AcademicsResult<Option<Course>>;

    /// `None` unassigns
    async fn assign_instructor(
        &self,
        id: CourseId,
        instructor_id: Option<UserId>,
    ) -> AcademicsResult<Option<Course>>;

    /// Active courses taught by the user
    async fn get_by_instructor(&self, instructor_id: UserId)
    -> AcademicsResult<Vec<CourseSummary>>;
}

#[trait_variant::make(EnrollmentRepository: Send)]
pub trait LocalEnrollmentRepository {
    /// Fails with `EnrollmentExists` when an active enrollment already exists
    async fn enroll(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> AcademicsResult<EnrollmentId>;

    /// Sets `dropped_at` to now, even if already dropped
    async fn drop_enrollment(&self, id: EnrollmentId) -> AcademicsResult<Option<Enrollment>>;

    async fn get_by_id(&self, id: EnrollmentId) -> AcademicsResult<Option<Enrollment>>;

    /// Every enrollment, active or dropped, for the pair
    async fn find_by_pair(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> AcademicsResult<Vec<Enrollment>>;

    async fn get_all(&self, active_only: bool) -> AcademicsResult<Vec<EnrollmentDetails>>;

    /// Active enrollments of one student
    async fn get_by_student(&self, student_id: StudentId)
    -> AcademicsResult<Vec<EnrollmentDetails>>;
}

#[trait_variant::make(GradeRepository: Send)]
pub trait LocalGradeRepository {
    /// Inserts a new row; earlier grades are kept as history
    async fn assign(&self, grade: &NewGrade) -> AcademicsResult<Grade>;

    async fn update(&self, id: GradeId, grade: GradeCode) -> AcademicsResult<Option<Grade>>;

    async fn get_all(&self) -> AcademicsResult<Vec<GradeDetails>>;

    /// Grades across all of a student's enrollments, dropped ones included
    async fn get_by_student(&self, student_id: StudentId) -> AcademicsResult<Vec<GradeDetails>>;
}

/// Read-only view of the user accounts owned by the auth crate
#[trait_variant::make(InstructorDirectory: Send)]
pub trait LocalInstructorDirectory {
    /// Active user whose role is named `instructor`
    async fn is_active_instructor(&self, user_id: UserId) -> AcademicsResult<bool>;

    /// Every active instructor with the number of active courses assigned
    async fn instructor_loads(&self) -> AcademicsResult<Vec<InstructorLoad>>;
}

/// Aggregate counts for the dashboards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub active_students: i64,
    pub active_courses: i64,
    pub active_enrollments: i64,
}

#[trait_variant::make(DashboardRepository: Send)]
pub trait LocalDashboardRepository {
    async fn totals(&self) -> AcademicsResult<Totals>;

    /// (active enrollments, grades received) for one student
    async fn student_totals(&self, student_id: StudentId) -> AcademicsResult<(i64, i64)>;
}
