//! Per-role dashboards

use auth::domain::value_object::Email;
use kernel::id::UserId;
use std::sync::Arc;

use crate::domain::entities::{
    AdminDashboard, InstructorDashboard, RegistrarDashboard, StudentDashboard,
};
use crate::domain::repository::{
    CourseRepository, DashboardRepository, InstructorDirectory, StudentRepository,
};
use crate::error::{AcademicsError, AcademicsResult};

pub struct DashboardService<D, C, I, S>
where
    D: DashboardRepository,
    C: CourseRepository,
    I: InstructorDirectory,
    S: StudentRepository,
{
    dashboards: Arc<D>,
    courses: Arc<C>,
    instructors: Arc<I>,
    students: Arc<S>,
}

impl<D, C, I, S> DashboardService<D, C, I, S>
where
    D: DashboardRepository,
    C: CourseRepository,
    I: InstructorDirectory,
    S: StudentRepository,
{
    pub fn new(dashboards: Arc<D>, courses: Arc<C>, instructors: Arc<I>, students: Arc<S>) -> Self {
        Self {
            dashboards,
            courses,
            instructors,
            students,
        }
    }

    pub async fn admin(&self) -> AcademicsResult<AdminDashboard> {
        let totals = self.dashboards.totals().await?;
        let instructors = self.instructors.instructor_loads().await?;

        Ok(AdminDashboard {
            total_students: totals.active_students,
            total_courses: totals.active_courses,
            total_enrollments: totals.active_enrollments,
            instructors,
        })
    }

    pub async fn registrar(&self) -> AcademicsResult<RegistrarDashboard> {
        let totals = self.dashboards.totals().await?;

        Ok(RegistrarDashboard {
            total_students: totals.active_students,
            total_enrollments: totals.active_enrollments,
        })
    }

    pub async fn instructor(&self, user_id: UserId) -> AcademicsResult<InstructorDashboard> {
        let courses = self.courses.get_by_instructor(user_id).await?;

        Ok(InstructorDashboard {
            assigned_courses: courses.len(),
            courses,
        })
    }

    /// The caller's student record is the active one with the same email
    pub async fn student(&self, email: Option<&Email>) -> AcademicsResult<StudentDashboard> {
        let email = email.ok_or(AcademicsError::StudentNotFound)?;
        let student = self
            .students
            .get_by_email(email.as_str())
            .await?
            .ok_or(AcademicsError::StudentNotFound)?;

        let (enrolled_courses, grades_received) =
            self.dashboards.student_totals(student.id).await?;

        Ok(StudentDashboard {
            student_id: student.id,
            student_number: student.student_id,
            full_name: student.full_name,
            enrolled_courses,
            grades_received,
        })
    }
}
