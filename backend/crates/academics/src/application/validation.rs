//! Request validation
//!
//! Every check runs so that the response reports all bad fields at once.

use auth::domain::value_object::Email;
use kernel::error::app_error::FieldErrors;
use kernel::id::{CourseId, EnrollmentId, StudentId, UserId};

use crate::domain::entities::{CourseChanges, NewCourse, NewStudent, StudentChanges};
use crate::domain::value_objects::{GradeCode, Units, YearLevel};
use crate::error::{AcademicsError, AcademicsResult};

pub const STUDENT_ID_MAX: usize = 20;
pub const FULL_NAME_MAX: usize = 255;
pub const PROGRAM_MAX: usize = 100;
pub const COURSE_CODE_MAX: usize = 20;
pub const TITLE_MAX: usize = 255;

pub const GRADE_ERROR_MESSAGE: &str =
    "Grade must be one of A+, A, A-, B+, B, B-, C+, C, C-, D+, D, D-, F";

/// Student fields as sent by the client
#[derive(Debug, Clone, Default)]
pub struct StudentInput {
    pub student_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub year_level: Option<i64>,
    pub program: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseInput {
    pub course_code: Option<String>,
    pub title: Option<String>,
    pub units: Option<i64>,
    pub instructor_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentInput {
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct GradeInput {
    pub enrollment_id: Option<i64>,
    pub grade: Option<String>,
}

struct Checker {
    errors: FieldErrors,
}

impl Checker {
    fn new() -> Self {
        Self {
            errors: FieldErrors::new(),
        }
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Trimmed, non-empty, at most `max` characters
    fn text(
        &mut self,
        field: &str,
        label: &str,
        value: Option<&str>,
        max: usize,
    ) -> Option<String> {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            self.fail(field, format!("{label} is required"));
            return None;
        }
        if value.chars().count() > max {
            self.fail(field, format!("{label} must be at most {max} characters"));
            return None;
        }
        Some(value.to_string())
    }

    fn email(&mut self, value: Option<&str>) -> Option<String> {
        match Email::new(value.unwrap_or_default()) {
            Ok(email) => Some(email.into_db()),
            Err(message) => {
                self.fail("email", message);
                None
            }
        }
    }

    fn year_level(&mut self, value: Option<i64>) -> Option<YearLevel> {
        let level = value.and_then(YearLevel::new);
        if level.is_none() {
            self.fail(
                "year_level",
                format!(
                    "Year level must be between {} and {}",
                    YearLevel::MIN,
                    YearLevel::MAX
                ),
            );
        }
        level
    }

    fn units(&mut self, value: Option<i64>) -> Option<Units> {
        let units = value.and_then(Units::new);
        if units.is_none() {
            self.fail(
                "units",
                format!("Units must be between {} and {}", Units::MIN, Units::MAX),
            );
        }
        units
    }

    /// Required positive key
    fn key(&mut self, field: &str, label: &str, value: Option<i64>) -> Option<i64> {
        match value {
            Some(v) if v > 0 => Some(v),
            Some(_) => {
                self.fail(field, format!("{label} must be a positive integer"));
                None
            }
            None => {
                self.fail(field, format!("{label} is required"));
                None
            }
        }
    }

    fn grade(&mut self, value: Option<&str>) -> Option<GradeCode> {
        let grade = value.and_then(GradeCode::parse);
        if grade.is_none() {
            self.fail("grade", GRADE_ERROR_MESSAGE);
        }
        grade
    }

    fn finish<T>(self, value: Option<T>) -> AcademicsResult<T> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(AcademicsError::Validation(self.errors)),
        }
    }
}

pub fn new_student(input: &StudentInput) -> AcademicsResult<NewStudent> {
    let mut check = Checker::new();
    let student_id = check.text(
        "student_id",
        "Student ID",
        input.student_id.as_deref(),
        STUDENT_ID_MAX,
    );
    let changes = student_fields(&mut check, input);

    let value = student_id.zip(changes).map(|(student_id, c)| NewStudent {
        student_id,
        full_name: c.full_name,
        email: c.email,
        year_level: c.year_level,
        program: c.program,
    });
    check.finish(value)
}

pub fn student_changes(input: &StudentInput) -> AcademicsResult<StudentChanges> {
    let mut check = Checker::new();
    let changes = student_fields(&mut check, input);
    check.finish(changes)
}

fn student_fields(check: &mut Checker, input: &StudentInput) -> Option<StudentChanges> {
    let full_name = check.text(
        "full_name",
        "Full name",
        input.full_name.as_deref(),
        FULL_NAME_MAX,
    );
    let email = check.email(input.email.as_deref());
    let year_level = check.year_level(input.year_level);
    let program = check.text("program", "Program", input.program.as_deref(), PROGRAM_MAX);

    Some(StudentChanges {
        full_name: full_name?,
        email: email?,
        year_level: year_level?,
        program: program?,
    })
}

pub fn new_course(input: &CourseInput) -> AcademicsResult<NewCourse> {
    let mut check = Checker::new();
    let course_code = check.text(
        "course_code",
        "Course code",
        input.course_code.as_deref(),
        COURSE_CODE_MAX,
    );
    let title = check.text("title", "Title", input.title.as_deref(), TITLE_MAX);
    let units = check.units(input.units);
    let instructor_id = match input.instructor_id {
        Some(_) => check
            .key("instructor_id", "Instructor ID", input.instructor_id)
            .map(|id| Some(UserId::new(id))),
        None => Some(None),
    };

    let value = match (course_code, title, units, instructor_id) {
        (Some(course_code), Some(title), Some(units), Some(instructor_id)) => Some(NewCourse {
            course_code,
            title,
            units,
            instructor_id,
        }),
        _ => None,
    };
    check.finish(value)
}

pub fn course_changes(input: &CourseInput) -> AcademicsResult<CourseChanges> {
    let mut check = Checker::new();
    let title = check.text("title", "Title", input.title.as_deref(), TITLE_MAX);
    let units = check.units(input.units);

    let value = title.zip(units).map(|(title, units)| CourseChanges { title, units });
    check.finish(value)
}

/// `None` unassigns; a present id must be positive
pub fn instructor_assignment(instructor_id: Option<i64>) -> AcademicsResult<Option<UserId>> {
    match instructor_id {
        None => Ok(None),
        Some(id) => {
            let mut check = Checker::new();
            let id = check.key("instructor_id", "Instructor ID", Some(id));
            check.finish(id).map(|id| Some(UserId::new(id)))
        }
    }
}

pub fn enrollment(input: &EnrollmentInput) -> AcademicsResult<(StudentId, CourseId)> {
    let mut check = Checker::new();
    let student_id = check.key("student_id", "Student ID", input.student_id);
    let course_id = check.key("course_id", "Course ID", input.course_id);

    let value = student_id
        .zip(course_id)
        .map(|(s, c)| (StudentId::new(s), CourseId::new(c)));
    check.finish(value)
}

pub fn grade_assignment(input: &GradeInput) -> AcademicsResult<(EnrollmentId, GradeCode)> {
    let mut check = Checker::new();
    let enrollment_id = check.key("enrollment_id", "Enrollment ID", input.enrollment_id);
    let grade = check.grade(input.grade.as_deref());

    let value = enrollment_id
        .zip(grade)
        .map(|(id, grade)| (EnrollmentId::new(id), grade));
    check.finish(value)
}

pub fn grade_code(grade: Option<&str>) -> AcademicsResult<GradeCode> {
    let mut check = Checker::new();
    let grade = check.grade(grade);
    check.finish(grade)
}
