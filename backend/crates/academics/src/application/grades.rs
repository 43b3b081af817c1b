//! Grade use cases

use kernel::id::{GradeId, StudentId, UserId};
use std::sync::Arc;

use crate::application::validation::{self, GradeInput};
use crate::domain::entities::{Grade, GradeDetails, NewGrade};
use crate::domain::repository::{EnrollmentRepository, GradeRepository, StudentRepository};
use crate::error::{AcademicsError, AcademicsResult};

pub struct GradeService<G, E, S>
where
    G: GradeRepository,
    E: EnrollmentRepository,
    S: StudentRepository,
{
    grades: Arc<G>,
    enrollments: Arc<E>,
    students: Arc<S>,
}

impl<G, E, S> GradeService<G, E, S>
where
    G: GradeRepository,
    E: EnrollmentRepository,
    S: StudentRepository,
{
    pub fn new(grades: Arc<G>, enrollments: Arc<E>, students: Arc<S>) -> Self {
        Self {
            grades,
            enrollments,
            students,
        }
    }

    /// Record a new grade; dropped enrollments may still be graded
    pub async fn assign(&self, input: GradeInput, assigned_by: UserId) -> AcademicsResult<Grade> {
        let (enrollment_id, grade) = validation::grade_assignment(&input)?;

        self.enrollments
            .get_by_id(enrollment_id)
            .await?
            .ok_or(AcademicsError::EnrollmentNotFound)?;

        let grade = self
            .grades
            .assign(&NewGrade {
                enrollment_id,
                grade,
                assigned_by,
            })
            .await?;

        tracing::info!(
            grade_id = %grade.id,
            enrollment_id = %enrollment_id,
            assigned_by = %assigned_by,
            "Grade assigned"
        );

        Ok(grade)
    }

    pub async fn update(&self, id: GradeId, grade: Option<&str>) -> AcademicsResult<Grade> {
        let code = validation::grade_code(grade)?;
        let grade = self
            .grades
            .update(id, code)
            .await?
            .ok_or(AcademicsError::GradeNotFound)?;

        tracing::info!(grade_id = %id, grade = %code, "Grade updated");

        Ok(grade)
    }

    pub async fn list(&self) -> AcademicsResult<Vec<GradeDetails>> {
        self.grades.get_all().await
    }

    pub async fn by_student(&self, student_id: StudentId) -> AcademicsResult<Vec<GradeDetails>> {
        self.students
            .get_by_id(student_id)
            .await?
            .ok_or(AcademicsError::StudentNotFound)?;

        self.grades.get_by_student(student_id).await
    }
}
