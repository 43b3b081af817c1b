//! Enrollment use cases

use kernel::id::{EnrollmentId, StudentId};
use std::sync::Arc;

use crate::application::config::ReEnrollmentPolicy;
use crate::application::validation::{self, EnrollmentInput};
use crate::domain::entities::{Enrollment, EnrollmentDetails};
use crate::domain::repository::{CourseRepository, EnrollmentRepository, StudentRepository};
use crate::domain::services::admit_enrollment;
use crate::error::{AcademicsError, AcademicsResult};

pub struct EnrollmentService<E, S, C>
where
    E: EnrollmentRepository,
    S: StudentRepository,
    C: CourseRepository,
{
    enrollments: Arc<E>,
    students: Arc<S>,
    courses: Arc<C>,
    policy: ReEnrollmentPolicy,
}

impl<E, S, C> EnrollmentService<E, S, C>
where
    E: EnrollmentRepository,
    S: StudentRepository,
    C: CourseRepository,
{
    pub fn new(
        enrollments: Arc<E>,
        students: Arc<S>,
        courses: Arc<C>,
        policy: ReEnrollmentPolicy,
    ) -> Self {
        Self {
            enrollments,
            students,
            courses,
            policy,
        }
    }

    /// Both the student and the course must exist and be active
    pub async fn enroll(&self, input: EnrollmentInput) -> AcademicsResult<EnrollmentId> {
        let (student_id, course_id) = validation::enrollment(&input)?;

        self.students
            .get_by_id(student_id)
            .await?
            .filter(|s| s.is_active)
            .ok_or(AcademicsError::StudentNotFound)?;
        self.courses
            .get_by_id(course_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or(AcademicsError::CourseNotFound)?;

        let prior = self.enrollments.find_by_pair(student_id, course_id).await?;
        admit_enrollment(self.policy, &prior)?;

        let id = self.enrollments.enroll(student_id, course_id).await?;

        tracing::info!(
            enrollment_id = %id,
            student_id = %student_id,
            course_id = %course_id,
            "Student enrolled"
        );

        Ok(id)
    }

    pub async fn drop_enrollment(&self, id: EnrollmentId) -> AcademicsResult<Enrollment> {
        let enrollment = self
            .enrollments
            .drop_enrollment(id)
            .await?
            .ok_or(AcademicsError::EnrollmentNotFound)?;

        tracing::info!(enrollment_id = %id, "Enrollment dropped");

        Ok(enrollment)
    }

    pub async fn list(&self, include_dropped: bool) -> AcademicsResult<Vec<EnrollmentDetails>> {
        self.enrollments.get_all(!include_dropped).await
    }

    pub async fn by_student(&self, student_id: StudentId) -> AcademicsResult<Vec<EnrollmentDetails>> {
        self.students
            .get_by_id(student_id)
            .await?
            .ok_or(AcademicsError::StudentNotFound)?;

        self.enrollments.get_by_student(student_id).await
    }
}
