//! Domain Services
//!
//! Pure rules shared by the repositories and use cases.

use crate::domain::entities::{Enrollment, Grade};
use crate::domain::value_objects::ReEnrollmentPolicy;
use crate::error::{AcademicsError, AcademicsResult};

/// The grade currently in force for an enrollment
///
/// Latest `assigned_at` wins; ties go to the highest id.
pub fn current_grade<'a, I>(grades: I) -> Option<&'a Grade>
where
    I: IntoIterator<Item = &'a Grade>,
{
    grades
        .into_iter()
        .max_by(|a, b| a.assigned_at.cmp(&b.assigned_at).then(a.id.cmp(&b.id)))
}

/// Decide whether a new enrollment may be created
///
/// `prior` holds every enrollment (active or dropped) for the same
/// student and course.
pub fn admit_enrollment(policy: ReEnrollmentPolicy, prior: &[Enrollment]) -> AcademicsResult<()> {
    if prior.is_empty() {
        return Ok(());
    }
    match policy {
        ReEnrollmentPolicy::OncePerCourse => Err(AcademicsError::AlreadyEnrolledOnce),
        ReEnrollmentPolicy::AllowAfterDrop if prior.iter().any(Enrollment::is_active) => {
            Err(AcademicsError::EnrollmentExists)
        }
        ReEnrollmentPolicy::AllowAfterDrop => Ok(()),
    }
}
