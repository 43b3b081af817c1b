//! Course catalog use cases

use kernel::id::{CourseId, UserId};
use std::sync::Arc;

use crate::application::validation::{self, CourseInput};
use crate::domain::entities::Course;
use crate::domain::repository::{CourseRepository, InstructorDirectory};
use crate::error::{AcademicsError, AcademicsResult};

pub struct CourseService<C, I>
where
    C: CourseRepository,
    I: InstructorDirectory,
{
    courses: Arc<C>,
    instructors: Arc<I>,
}

impl<C, I> CourseService<C, I>
where
    C: CourseRepository,
    I: InstructorDirectory,
{
    pub fn new(courses: Arc<C>, instructors: Arc<I>) -> Self {
        Self {
            courses,
            instructors,
        }
    }

    pub async fn create(&self, input: CourseInput) -> AcademicsResult<CourseId> {
        let new = validation::new_course(&input)?;
        if let Some(instructor_id) = new.instructor_id {
            self.ensure_instructor(instructor_id).await?;
        }

        let id = self.courses.create(&new).await?;

        tracing::info!(course_id = %id, code = %new.course_code, "Course created");

        Ok(id)
    }

    pub async fn list(&self, include_inactive: bool) -> AcademicsResult<Vec<Course>> {
        self.courses.get_all(!include_inactive).await
    }

    pub async fn get(&self, id: CourseId) -> AcademicsResult<Course> {
        self.courses
            .get_by_id(id)
            .await?
            .ok_or(AcademicsError::CourseNotFound)
    }

    pub async fn update(&self, id: CourseId, input: CourseInput) -> AcademicsResult<Course> {
        let changes = validation::course_changes(&input)?;
        let course = self
            .courses
            .update(id, &changes)
            .await?
            .ok_or(AcademicsError::CourseNotFound)?;

        tracing::info!(course_id = %id, "Course updated");

        Ok(course)
    }

    /// `None` unassigns the current instructor
    pub async fn assign_instructor(
        &self,
        id: CourseId,
        instructor_id: Option<i64>,
    ) -> AcademicsResult<Course> {
        let instructor_id = validation::instructor_assignment(instructor_id)?;

        self.get(id).await?;
        if let Some(instructor_id) = instructor_id {
            self.ensure_instructor(instructor_id).await?;
        }

        let course = self
            .courses
            .assign_instructor(id, instructor_id)
            .await?
            .ok_or(AcademicsError::CourseNotFound)?;

        match instructor_id {
            Some(user_id) => {
                tracing::info!(course_id = %id, instructor_id = %user_id, "Instructor assigned")
            }
            None => tracing::info!(course_id = %id, "Instructor unassigned"),
        }

        Ok(course)
    }

    async fn ensure_instructor(&self, user_id: UserId) -> AcademicsResult<()> {
        if self.instructors.is_active_instructor(user_id).await? {
            Ok(())
        } else {
            Err(AcademicsError::InvalidInstructor)
        }
    }
}
