//! Domain Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letter grade
///
/// Parsed case-insensitively; always stored upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GradeCode(&'static str);

impl GradeCode {
    pub const ALLOWED: [&'static str; 13] = [
        "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F",
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALLOWED
            .into_iter()
            .find(|code| code.eq_ignore_ascii_case(raw))
            .map(Self)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for GradeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Year of study, 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearLevel(i32);

impl YearLevel {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 10;

    pub fn new(value: i64) -> Option<Self> {
        i32::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

/// Course credit units, 1..=12
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Units(i32);

impl Units {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 12;

    pub fn new(value: i64) -> Option<Self> {
        i32::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

/// What happens when a student enrolls again in a course they dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReEnrollmentPolicy {
    /// A new enrollment row is created; the dropped one keeps its grades
    #[default]
    AllowAfterDrop,
    /// Any prior enrollment for the pair blocks a new one
    OncePerCourse,
}

impl ReEnrollmentPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReEnrollmentPolicy::AllowAfterDrop => "allow_after_drop",
            ReEnrollmentPolicy::OncePerCourse => "once_per_course",
        }
    }
}

impl FromStr for ReEnrollmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow_after_drop" => Ok(ReEnrollmentPolicy::AllowAfterDrop),
            "once_per_course" => Ok(ReEnrollmentPolicy::OncePerCourse),
            other => Err(format!("unknown re-enrollment policy: {other}")),
        }
    }
}

impl fmt::Display for ReEnrollmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
