//! Domain Layer - Entities and rules
//!
//! This layer contains:
//! - Entities and read models (Student, Course, Enrollment, Grade, dashboards)
//! - Value objects (GradeCode, YearLevel, Units, ReEnrollmentPolicy)
//! - Domain services (current grade, enrollment admission)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod value_objects;
