//! Application Configuration

pub use crate::domain::value_objects::ReEnrollmentPolicy;

/// Academics application configuration
#[derive(Debug, Clone, Default)]
pub struct AcademicsConfig {
    /// Whether a dropped course may be taken again
    pub reenrollment_policy: ReEnrollmentPolicy,
}

impl AcademicsConfig {
    pub fn with_policy(reenrollment_policy: ReEnrollmentPolicy) -> Self {
        Self {
            reenrollment_policy,
        }
    }

    /// Config for local development
    pub fn development() -> Self {
        Self::default()
    }
}
