//! Student record use cases

use kernel::id::StudentId;
use std::sync::Arc;

use crate::application::validation::{self, StudentInput};
use crate::domain::entities::Student;
use crate::domain::repository::StudentRepository;
use crate::error::{AcademicsError, AcademicsResult};

pub struct StudentService<S>
where
    S: StudentRepository,
{
    students: Arc<S>,
}

impl<S> StudentService<S>
where
    S: StudentRepository,
{
    pub fn new(students: Arc<S>) -> Self {
        Self { students }
    }

    pub async fn create(&self, input: StudentInput) -> AcademicsResult<StudentId> {
        let new = validation::new_student(&input)?;
        let id = self.students.create(&new).await?;

        tracing::info!(student_id = %id, number = %new.student_id, "Student created");

        Ok(id)
    }

    pub async fn list(&self, include_inactive: bool) -> AcademicsResult<Vec<Student>> {
        self.students.get_all(!include_inactive).await
    }

    /// Inactive students are hidden unless asked for
    pub async fn get(&self, id: StudentId, include_inactive: bool) -> AcademicsResult<Student> {
        self.students
            .get_by_id(id)
            .await?
            .filter(|s| include_inactive || s.is_active)
            .ok_or(AcademicsError::StudentNotFound)
    }

    pub async fn update(&self, id: StudentId, input: StudentInput) -> AcademicsResult<Student> {
        let changes = validation::student_changes(&input)?;
        let student = self
            .students
            .update(id, &changes)
            .await?
            .ok_or(AcademicsError::StudentNotFound)?;

        tracing::info!(student_id = %id, "Student updated");

        Ok(student)
    }

    pub async fn deactivate(&self, id: StudentId) -> AcademicsResult<Student> {
        let student = self
            .students
            .deactivate(id)
            .await?
            .ok_or(AcademicsError::StudentNotFound)?;

        tracing::info!(student_id = %id, "Student deactivated");

        Ok(student)
    }
}
