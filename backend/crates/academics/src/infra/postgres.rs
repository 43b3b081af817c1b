//! PostgreSQL Repository Implementations

use auth::domain::value_object::Role;
use chrono::{DateTime, Utc};
use kernel::error::conversions::unique_violation;
use kernel::id::{CourseId, EnrollmentId, GradeId, StudentId, UserId};
use sqlx::PgPool;

use crate::domain::entities::{
    Course, CourseChanges, CourseSummary, Enrollment, EnrollmentDetails, Grade, GradeDetails,
    InstructorLoad, NewCourse, NewGrade, NewStudent, Student, StudentChanges,
};
use crate::domain::repository::{
    CourseRepository, DashboardRepository, EnrollmentRepository, GradeRepository,
    InstructorDirectory, StudentRepository, Totals,
};
use crate::domain::value_objects::GradeCode;
use crate::error::{AcademicsError, AcademicsResult};

/// PostgreSQL-backed academics repository
#[derive(Clone)]
pub struct PgAcademicsRepository {
    pool: PgPool,
}

impl PgAcademicsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique violation to a domain conflict, anything else to `Database`
fn conflict_or(err: sqlx::Error, conflict: AcademicsError) -> AcademicsError {
    match unique_violation(&err) {
        Some(constraint) => {
            tracing::debug!(constraint = %constraint, "Unique constraint violated");
            conflict
        }
        None => AcademicsError::Database(err),
    }
}

const STUDENT_COLUMNS: &str =
    "id, student_id, full_name, email, year_level, program, is_active, created_at, updated_at";

const COURSE_SELECT: &str = r#"
    SELECT c.id, c.course_code, c.title, c.units, c.instructor_id,
           u.full_name AS instructor_name, c.is_active, c.created_at, c.updated_at
"#;

const ENROLLMENT_DETAILS_SELECT: &str = r#"
    SELECT e.id, e.student_id, e.course_id, e.enrolled_at, e.dropped_at,
           s.student_id AS student_number, s.full_name AS student_name,
           c.course_code, c.title AS course_title, cg.grade AS current_grade
    FROM enrollments e
    JOIN students s ON s.id = e.student_id
    JOIN courses c ON c.id = e.course_id
    LEFT JOIN (
        SELECT DISTINCT ON (enrollment_id) enrollment_id, grade
        FROM grades
        ORDER BY enrollment_id, assigned_at DESC, id DESC
    ) cg ON cg.enrollment_id = e.id
"#;

const GRADE_DETAILS_SELECT: &str = r#"
    SELECT g.id, g.enrollment_id, g.grade, g.assigned_by, g.assigned_at, g.updated_at,
           e.student_id, e.course_id, c.course_code, c.title AS course_title,
           (e.dropped_at IS NOT NULL) AS enrollment_dropped
    FROM grades g
    JOIN enrollments e ON e.id = g.enrollment_id
    JOIN courses c ON c.id = e.course_id
"#;

// ============================================================================
// Student Repository Implementation
// ============================================================================

impl StudentRepository for PgAcademicsRepository {
    async fn create(&self, student: &NewStudent) -> AcademicsResult<StudentId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO students (student_id, full_name, email, year_level, program)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&student.student_id)
        .bind(&student.full_name)
        .bind(&student.email)
        .bind(student.year_level.get())
        .bind(&student.program)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, AcademicsError::StudentExists))?;

        Ok(StudentId::new(id))
    }

    async fn get_all(&self, active_only: bool) -> AcademicsResult<Vec<Student>> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students \
             WHERE ($1 = FALSE OR is_active = TRUE) \
             ORDER BY full_name, id"
        );
        let rows = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(StudentRow::into_student).collect())
    }

    async fn get_by_id(&self, id: StudentId) -> AcademicsResult<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1");
        let row = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(StudentRow::into_student))
    }

    async fn get_by_email(&self, email: &str) -> AcademicsResult<Option<Student>> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE email = $1 AND is_active = TRUE LIMIT 1"
        );
        let row = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(StudentRow::into_student))
    }

    async fn update(
        &self,
        id: StudentId,
        changes: &StudentChanges,
    ) -> AcademicsResult<Option<Student>> {
        let sql = format!(
            "UPDATE students \
             SET full_name = $2, email = $3, year_level = $4, program = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {STUDENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(id.get())
            .bind(&changes.full_name)
            .bind(&changes.email)
            .bind(changes.year_level.get())
            .bind(&changes.program)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_or(e, AcademicsError::StudentExists))?;

        Ok(row.map(StudentRow::into_student))
    }

    async fn deactivate(&self, id: StudentId) -> AcademicsResult<Option<Student>> {
        let sql = format!(
            "UPDATE students SET is_active = FALSE, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {STUDENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, StudentRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(StudentRow::into_student))
    }
}

// ============================================================================
// Course Repository Implementation
// ============================================================================

impl CourseRepository for PgAcademicsRepository {
    async fn create(&self, course: &NewCourse) -> AcademicsResult<CourseId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO courses (course_code, title, units, instructor_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&course.course_code)
        .bind(&course.title)
        .bind(course.units.get())
        .bind(course.instructor_id.map(|id| id.get()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, AcademicsError::CourseCodeExists))?;

        Ok(CourseId::new(id))
    }

    async fn get_all(&self, active_only: bool) -> AcademicsResult<Vec<Course>> {
        let sql = format!(
            "{COURSE_SELECT} FROM courses c LEFT JOIN users u ON u.id = c.instructor_id \
             WHERE ($1 = FALSE OR c.is_active = TRUE) \
             ORDER BY c.course_code"
        );
        let rows = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(CourseRow::into_course).collect())
    }

    async fn get_by_id(&self, id: CourseId) -> AcademicsResult<Option<Course>> {
        let sql = format!(
            "{COURSE_SELECT} FROM courses c LEFT JOIN users u ON u.id = c.instructor_id \
             WHERE c.id = $1"
        );
        let row = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CourseRow::into_course))
    }

    async fn update(
        &self,
        id: CourseId,
        changes: &CourseChanges,
    ) -> AcademicsResult<Option<Course>> {
        let sql = format!(
            "WITH c AS ( \
                 UPDATE courses SET title = $2, units = $3, updated_at = NOW() \
                 WHERE id = $1 RETURNING * \
             ) \
             {COURSE_SELECT} FROM c LEFT JOIN users u ON u.id = c.instructor_id"
        );
        let row = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(id.get())
            .bind(&changes.title)
            .bind(changes.units.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CourseRow::into_course))
    }

    async fn assign_instructor(
        &self,
        id: CourseId,
        instructor_id: Option<UserId>,
    ) -> AcademicsResult<Option<Course>> {
        let sql = format!(
            "WITH c AS ( \
                 UPDATE courses SET instructor_id = $2, updated_at = NOW() \
                 WHERE id = $1 RETURNING * \
             ) \
             {COURSE_SELECT} FROM c LEFT JOIN users u ON u.id = c.instructor_id"
        );
        let row = sqlx::query_as::<_, CourseRow>(&sql)
            .bind(id.get())
            .bind(instructor_id.map(|id| id.get()))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(CourseRow::into_course))
    }

    async fn get_by_instructor(
        &self,
        instructor_id: UserId,
    ) -> AcademicsResult<Vec<CourseSummary>> {
        let rows = sqlx::query_as::<_, (i64, String, String)>(
            r#"
            SELECT id, course_code, title
            FROM courses
            WHERE instructor_id = $1 AND is_active = TRUE
            ORDER BY course_code
            "#,
        )
        .bind(instructor_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, course_code, title)| CourseSummary {
                id: CourseId::new(id),
                course_code,
                title,
            })
            .collect())
    }
}

// ============================================================================
// Enrollment Repository Implementation
// ============================================================================

impl EnrollmentRepository for PgAcademicsRepository {
    async fn enroll(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> AcademicsResult<EnrollmentId> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(student_id.get())
        .bind(course_id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or(e, AcademicsError::EnrollmentExists))?;

        Ok(EnrollmentId::new(id))
    }

    async fn drop_enrollment(&self, id: EnrollmentId) -> AcademicsResult<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            UPDATE enrollments SET dropped_at = NOW()
            WHERE id = $1
            RETURNING id, student_id, course_id, enrolled_at, dropped_at
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EnrollmentRow::into_enrollment))
    }

    async fn get_by_id(&self, id: EnrollmentId) -> AcademicsResult<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            "SELECT id, student_id, course_id, enrolled_at, dropped_at FROM enrollments WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EnrollmentRow::into_enrollment))
    }

    async fn find_by_pair(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> AcademicsResult<Vec<Enrollment>> {
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            r#"
            SELECT id, student_id, course_id, enrolled_at, dropped_at
            FROM enrollments
            WHERE student_id = $1 AND course_id = $2
            ORDER BY enrolled_at, id
            "#,
        )
        .bind(student_id.get())
        .bind(course_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EnrollmentRow::into_enrollment).collect())
    }

    async fn get_all(&self, active_only: bool) -> AcademicsResult<Vec<EnrollmentDetails>> {
        let sql = format!(
            "{ENROLLMENT_DETAILS_SELECT} \
             WHERE ($1 = FALSE OR e.dropped_at IS NULL) \
             ORDER BY e.enrolled_at DESC, e.id DESC"
        );
        let rows = sqlx::query_as::<_, EnrollmentDetailsRow>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(EnrollmentDetailsRow::into_details).collect())
    }

    async fn get_by_student(
        &self,
        student_id: StudentId,
    ) -> AcademicsResult<Vec<EnrollmentDetails>> {
        let sql = format!(
            "{ENROLLMENT_DETAILS_SELECT} \
             WHERE e.student_id = $1 AND e.dropped_at IS NULL \
             ORDER BY e.enrolled_at DESC, e.id DESC"
        );
        let rows = sqlx::query_as::<_, EnrollmentDetailsRow>(&sql)
            .bind(student_id.get())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(EnrollmentDetailsRow::into_details).collect())
    }
}

// ============================================================================
// Grade Repository Implementation
// ============================================================================

impl GradeRepository for PgAcademicsRepository {
    async fn assign(&self, grade: &NewGrade) -> AcademicsResult<Grade> {
        let row = sqlx::query_as::<_, GradeRow>(
            r#"
            INSERT INTO grades (enrollment_id, grade, assigned_by)
            VALUES ($1, $2, $3)
            RETURNING id, enrollment_id, grade, assigned_by, assigned_at, updated_at
            "#,
        )
        .bind(grade.enrollment_id.get())
        .bind(grade.grade.as_str())
        .bind(grade.assigned_by.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_grade())
    }

    async fn update(&self, id: GradeId, grade: GradeCode) -> AcademicsResult<Option<Grade>> {
        let row = sqlx::query_as::<_, GradeRow>(
            r#"
            UPDATE grades SET grade = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, enrollment_id, grade, assigned_by, assigned_at, updated_at
            "#,
        )
        .bind(id.get())
        .bind(grade.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(GradeRow::into_grade))
    }

    async fn get_all(&self) -> AcademicsResult<Vec<GradeDetails>> {
        let sql = format!("{GRADE_DETAILS_SELECT} ORDER BY g.assigned_at DESC, g.id DESC");
        let rows = sqlx::query_as::<_, GradeDetailsRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(GradeDetailsRow::into_details).collect())
    }

    async fn get_by_student(&self, student_id: StudentId) -> AcademicsResult<Vec<GradeDetails>> {
        let sql = format!(
            "{GRADE_DETAILS_SELECT} WHERE e.student_id = $1 \
             ORDER BY g.assigned_at DESC, g.id DESC"
        );
        let rows = sqlx::query_as::<_, GradeDetailsRow>(&sql)
            .bind(student_id.get())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(GradeDetailsRow::into_details).collect())
    }
}

// ============================================================================
// Instructor directory and dashboards
// ============================================================================

impl InstructorDirectory for PgAcademicsRepository {
    async fn is_active_instructor(&self, user_id: UserId) -> AcademicsResult<bool> {
        let found = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM users u
                JOIN roles r ON r.id = u.role_id
                WHERE u.id = $1 AND u.is_active = TRUE AND r.role_name = $2
            )
            "#,
        )
        .bind(user_id.get())
        .bind(Role::Instructor.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }

    async fn instructor_loads(&self) -> AcademicsResult<Vec<InstructorLoad>> {
        let rows = sqlx::query_as::<_, (i64, String, i64)>(
            r#"
            SELECT u.id, u.full_name, COUNT(c.id)
            FROM users u
            JOIN roles r ON r.id = u.role_id
            LEFT JOIN courses c ON c.instructor_id = u.id AND c.is_active = TRUE
            WHERE u.is_active = TRUE AND r.role_name = $1
            GROUP BY u.id, u.full_name
            ORDER BY u.full_name, u.id
            "#,
        )
        .bind(Role::Instructor.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, full_name, assigned_courses)| InstructorLoad {
                instructor_id: UserId::new(id),
                full_name,
                assigned_courses,
            })
            .collect())
    }
}

impl DashboardRepository for PgAcademicsRepository {
    async fn totals(&self) -> AcademicsResult<Totals> {
        let (active_students, active_courses, active_enrollments) =
            sqlx::query_as::<_, (i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM students WHERE is_active = TRUE),
                    (SELECT COUNT(*) FROM courses WHERE is_active = TRUE),
                    (SELECT COUNT(*) FROM enrollments WHERE dropped_at IS NULL)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(Totals {
            active_students,
            active_courses,
            active_enrollments,
        })
    }

    async fn student_totals(&self, student_id: StudentId) -> AcademicsResult<(i64, i64)> {
        let totals = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM enrollments
                 WHERE student_id = $1 AND dropped_at IS NULL),
                (SELECT COUNT(*) FROM grades g
                 JOIN enrollments e ON e.id = g.enrollment_id
                 WHERE e.student_id = $1)
            "#,
        )
        .bind(student_id.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct StudentRow {
    id: i64,
    student_id: String,
    full_name: String,
    email: String,
    year_level: i32,
    program: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StudentRow {
    fn into_student(self) -> Student {
        Student {
            id: StudentId::new(self.id),
            student_id: self.student_id,
            full_name: self.full_name,
            email: self.email,
            year_level: self.year_level,
            program: self.program,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CourseRow {
    id: i64,
    course_code: String,
    title: String,
    units: i32,
    instructor_id: Option<i64>,
    instructor_name: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self) -> Course {
        Course {
            id: CourseId::new(self.id),
            course_code: self.course_code,
            title: self.title,
            units: self.units,
            instructor_id: self.instructor_id.map(UserId::new),
            instructor_name: self.instructor_name,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    id: i64,
    student_id: i64,
    course_id: i64,
    enrolled_at: DateTime<Utc>,
    dropped_at: Option<DateTime<Utc>>,
}

impl EnrollmentRow {
    fn into_enrollment(self) -> Enrollment {
        Enrollment {
            id: EnrollmentId::new(self.id),
            student_id: StudentId::new(self.student_id),
            course_id: CourseId::new(self.course_id),
            enrolled_at: self.enrolled_at,
            dropped_at: self.dropped_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EnrollmentDetailsRow {
    id: i64,
    student_id: i64,
    course_id: i64,
    enrolled_at: DateTime<Utc>,
    dropped_at: Option<DateTime<Utc>>,
    student_number: String,
    student_name: String,
    course_code: String,
    course_title: String,
    current_grade: Option<String>,
}

impl EnrollmentDetailsRow {
    fn into_details(self) -> EnrollmentDetails {
        EnrollmentDetails {
            id: EnrollmentId::new(self.id),
            student_id: StudentId::new(self.student_id),
            course_id: CourseId::new(self.course_id),
            enrolled_at: self.enrolled_at,
            dropped_at: self.dropped_at,
            student_number: self.student_number,
            student_name: self.student_name,
            course_code: self.course_code,
            course_title: self.course_title,
            current_grade: self.current_grade,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GradeRow {
    id: i64,
    enrollment_id: i64,
    grade: String,
    assigned_by: Option<i64>,
    assigned_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GradeRow {
    fn into_grade(self) -> Grade {
        Grade {
            id: GradeId::new(self.id),
            enrollment_id: EnrollmentId::new(self.enrollment_id),
            grade: self.grade,
            assigned_by: self.assigned_by.map(UserId::new),
            assigned_at: self.assigned_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GradeDetailsRow {
    #[sqlx(flatten)]
    grade: GradeRow,
    student_id: i64,
    course_id: i64,
    course_code: String,
    course_title: String,
    enrollment_dropped: bool,
}

impl GradeDetailsRow {
    fn into_details(self) -> GradeDetails {
        let grade = self.grade.into_grade();
        GradeDetails {
            id: grade.id,
            enrollment_id: grade.enrollment_id,
            grade: grade.grade,
            assigned_by: grade.assigned_by,
            assigned_at: grade.assigned_at,
            updated_at: grade.updated_at,
            student_id: StudentId::new(self.student_id),
            course_id: CourseId::new(self.course_id),
            course_code: self.course_code,
            course_title: self.course_title,
            enrollment_dropped: self.enrollment_dropped,
        }
    }
}
