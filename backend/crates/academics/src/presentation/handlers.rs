//! HTTP Handlers

use axum::extract::{Query, State};
use std::sync::Arc;

use auth::RequestIdentity;
use kernel::extract::{ApiJson, ApiPath};
use kernel::id::{CourseId, EnrollmentId, GradeId, StudentId};
use kernel::response::ApiResponse;

use crate::application::{
    AcademicsConfig, CourseService, DashboardService, EnrollmentService, GradeService,
    StudentService,
};
use crate::domain::entities::{
    AdminDashboard, Course, Enrollment, EnrollmentDetails, Grade, GradeDetails, InstructorDashboard,
    RegistrarDashboard, Student, StudentDashboard,
};
use crate::domain::repository::{
    CourseRepository, DashboardRepository, EnrollmentRepository, GradeRepository,
    InstructorDirectory, StudentRepository,
};
use crate::error::AcademicsResult;
use crate::presentation::dto::{
    AssignInstructorRequest, CourseRequest, CreatedResponse, EnrollmentRequest, GradeRequest,
    GradeUpdateRequest, ListQuery, StudentRequest,
};

/// Everything the academics routes need from storage
pub trait AcademicsRepository:
    StudentRepository
    + CourseRepository
    + EnrollmentRepository
    + GradeRepository
    + InstructorDirectory
    + DashboardRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> AcademicsRepository for T where
    T: StudentRepository
        + CourseRepository
        + EnrollmentRepository
        + GradeRepository
        + InstructorDirectory
        + DashboardRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}

/// Shared state for academics handlers
pub struct AcademicsAppState<R: AcademicsRepository> {
    pub repo: Arc<R>,
    pub config: Arc<AcademicsConfig>,
}

impl<R: AcademicsRepository> Clone for AcademicsAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R: AcademicsRepository> AcademicsAppState<R> {
    fn students(&self) -> StudentService<R> {
        StudentService::new(self.repo.clone())
    }

    fn courses(&self) -> CourseService<R, R> {
        CourseService::new(self.repo.clone(), self.repo.clone())
    }

    fn enrollments(&self) -> EnrollmentService<R, R, R> {
        EnrollmentService::new(
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
            self.config.reenrollment_policy,
        )
    }

    fn grades(&self) -> GradeService<R, R, R> {
        GradeService::new(self.repo.clone(), self.repo.clone(), self.repo.clone())
    }

    fn dashboards(&self) -> DashboardService<R, R, R, R> {
        DashboardService::new(
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
            self.repo.clone(),
        )
    }
}

// ============================================================================
// Students
// ============================================================================

/// POST /api/students
pub async fn create_student<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiJson(req): ApiJson<StudentRequest>,
) -> AcademicsResult<ApiResponse<CreatedResponse>> {
    let id = state.students().create(req.into()).await?;

    Ok(ApiResponse::created(
        "STUDENT_CREATED",
        "Student created",
        CreatedResponse { id: id.get() },
    ))
}

/// GET /api/students
pub async fn list_students<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    Query(query): Query<ListQuery>,
) -> AcademicsResult<ApiResponse<Vec<Student>>> {
    let students = state.students().list(query.include_inactive).await?;

    Ok(ApiResponse::ok(
        "STUDENTS_SUCCESS",
        "Students retrieved successfully",
        students,
    ))
}

/// GET /api/students/{id}
pub async fn get_student<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiPath(id): ApiPath<i64>,
    Query(query): Query<ListQuery>,
) -> AcademicsResult<ApiResponse<Student>> {
    let student = state
        .students()
        .get(StudentId::new(id), query.include_inactive)
        .await?;

    Ok(ApiResponse::ok(
        "STUDENT_SUCCESS",
        "Student retrieved successfully",
        student,
    ))
}

/// PUT /api/students/{id}
pub async fn update_student<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<StudentRequest>,
) -> AcademicsResult<ApiResponse<Student>> {
    let student = state
        .students()
        .update(StudentId::new(id), req.into())
        .await?;

    Ok(ApiResponse::ok("STUDENT_UPDATED", "Student updated", student))
}

/// PATCH /api/students/{id}/deactivate
pub async fn deactivate_student<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiPath(id): ApiPath<i64>,
) -> AcademicsResult<ApiResponse<Student>> {
    let student = state.students().deactivate(StudentId::new(id)).await?;

    Ok(ApiResponse::ok(
        "STUDENT_DEACTIVATED",
        "Student deactivated",
        student,
    ))
}

// ============================================================================
// Courses
// ============================================================================

/// POST /api/courses
pub async fn create_course<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiJson(req): ApiJson<CourseRequest>,
) -> AcademicsResult<ApiResponse<CreatedResponse>> {
    let id = state.courses().create(req.into()).await?;

    Ok(ApiResponse::created(
        "COURSE_CREATED",
        "Course created",
        CreatedResponse { id: id.get() },
    ))
}

/// GET /api/courses
pub async fn list_courses<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    Query(query): Query<ListQuery>,
) -> AcademicsResult<ApiResponse<Vec<Course>>> {
    let courses = state.courses().list(query.include_inactive).await?;

    Ok(ApiResponse::ok(
        "COURSES_SUCCESS",
        "Courses retrieved successfully",
        courses,
    ))
}

/// GET /api/courses/{id}
pub async fn get_course<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiPath(id): ApiPath<i64>,
) -> AcademicsResult<ApiResponse<Course>> {
    let course = state.courses().get(CourseId::new(id)).await?;

    Ok(ApiResponse::ok(
        "COURSE_SUCCESS",
        "Course retrieved successfully",
        course,
    ))
}

/// PUT /api/courses/{id}
pub async fn update_course<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<CourseRequest>,
) -> AcademicsResult<ApiResponse<Course>> {
    let course = state
        .courses()
        .update(CourseId::new(id), req.into())
        .await?;

    Ok(ApiResponse::ok("COURSE_UPDATED", "Course updated", course))
}

/// PATCH /api/courses/{id}/assign-instructor
pub async fn assign_instructor<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<AssignInstructorRequest>,
) -> AcademicsResult<ApiResponse<Course>> {
    let course = state
        .courses()
        .assign_instructor(CourseId::new(id), req.instructor_id)
        .await?;

    let message = if course.instructor_id.is_some() {
        "Instructor assigned"
    } else {
        "Instructor unassigned"
    };

    Ok(ApiResponse::ok("INSTRUCTOR_ASSIGNED", message, course))
}

// ============================================================================
// Enrollments
// ============================================================================

/// POST /api/enrollments
pub async fn enroll<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiJson(req): ApiJson<EnrollmentRequest>,
) -> AcademicsResult<ApiResponse<CreatedResponse>> {
    let id = state.enrollments().enroll(req.into()).await?;

    Ok(ApiResponse::created(
        "ENROLLMENT_CREATED",
        "Student enrolled",
        CreatedResponse { id: id.get() },
    ))
}

/// DELETE /api/enrollments/{id}
///
/// Sets `dropped_at`; the row and its grades are kept.
pub async fn drop_enrollment<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiPath(id): ApiPath<i64>,
) -> AcademicsResult<ApiResponse<Enrollment>> {
    let enrollment = state
        .enrollments()
        .drop_enrollment(EnrollmentId::new(id))
        .await?;

    Ok(ApiResponse::ok("ENROLLMENT_DROPPED", "Course dropped", enrollment))
}

/// GET /api/enrollments
///
/// Dropped enrollments are included with `?include_inactive=true`.
pub async fn list_enrollments<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    Query(query): Query<ListQuery>,
) -> AcademicsResult<ApiResponse<Vec<EnrollmentDetails>>> {
    let enrollments = state.enrollments().list(query.include_inactive).await?;

    Ok(ApiResponse::ok(
        "ENROLLMENTS_SUCCESS",
        "Enrollments retrieved successfully",
        enrollments,
    ))
}

/// GET /api/enrollments/student/{student_id}
pub async fn student_enrollments<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiPath(student_id): ApiPath<i64>,
) -> AcademicsResult<ApiResponse<Vec<EnrollmentDetails>>> {
    let enrollments = state
        .enrollments()
        .by_student(StudentId::new(student_id))
        .await?;

    Ok(ApiResponse::ok(
        "ENROLLMENTS_SUCCESS",
        "Enrollments retrieved successfully",
        enrollments,
    ))
}

// ============================================================================
// Grades
// ============================================================================

/// POST /api/grades
///
/// The grader is always the authenticated caller.
pub async fn assign_grade<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    identity: RequestIdentity,
    ApiJson(req): ApiJson<GradeRequest>,
) -> AcademicsResult<ApiResponse<Grade>> {
    let grade = state.grades().assign(req.into(), identity.user_id).await?;

    Ok(ApiResponse::created("GRADE_ASSIGNED", "Grade assigned", grade))
}

/// PUT /api/grades/{id}
pub async fn update_grade<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<GradeUpdateRequest>,
) -> AcademicsResult<ApiResponse<Grade>> {
    let grade = state
        .grades()
        .update(GradeId::new(id), req.grade.as_deref())
        .await?;

    Ok(ApiResponse::ok("GRADE_UPDATED", "Grade updated", grade))
}

/// GET /api/grades
pub async fn list_grades<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
) -> AcademicsResult<ApiResponse<Vec<GradeDetails>>> {
    let grades = state.grades().list().await?;

    Ok(ApiResponse::ok(
        "GRADES_SUCCESS",
        "Grades retrieved successfully",
        grades,
    ))
}

/// GET /api/grades/student/{student_id}
pub async fn student_grades<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    ApiPath(student_id): ApiPath<i64>,
) -> AcademicsResult<ApiResponse<Vec<GradeDetails>>> {
    let grades = state
        .grades()
        .by_student(StudentId::new(student_id))
        .await?;

    Ok(ApiResponse::ok(
        "GRADES_SUCCESS",
        "Grades retrieved successfully",
        grades,
    ))
}

// ============================================================================
// Dashboards
// ============================================================================

/// GET /api/dashboard/admin
pub async fn admin_dashboard<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
) -> AcademicsResult<ApiResponse<AdminDashboard>> {
    let dashboard = state.dashboards().admin().await?;
    Ok(ApiResponse::ok("DASHBOARD_SUCCESS", "Admin dashboard", dashboard))
}

/// GET /api/dashboard/registrar
pub async fn registrar_dashboard<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
) -> AcademicsResult<ApiResponse<RegistrarDashboard>> {
    let dashboard = state.dashboards().registrar().await?;
    Ok(ApiResponse::ok(
        "DASHBOARD_SUCCESS",
        "Registrar dashboard",
        dashboard,
    ))
}

/// GET /api/dashboard/instructor
pub async fn instructor_dashboard<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    identity: RequestIdentity,
) -> AcademicsResult<ApiResponse<InstructorDashboard>> {
    let dashboard = state.dashboards().instructor(identity.user_id).await?;
    Ok(ApiResponse::ok(
        "DASHBOARD_SUCCESS",
        "Instructor dashboard",
        dashboard,
    ))
}

/// GET /api/dashboard/student
///
/// The caller is matched to a student record by email.
pub async fn student_dashboard<R: AcademicsRepository>(
    State(state): State<AcademicsAppState<R>>,
    identity: RequestIdentity,
) -> AcademicsResult<ApiResponse<StudentDashboard>> {
    let dashboard = state
        .dashboards()
        .student(identity.email.as_ref())
        .await?;
    Ok(ApiResponse::ok(
        "DASHBOARD_SUCCESS",
        "Student dashboard",
        dashboard,
    ))
}
