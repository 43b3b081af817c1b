//! Router-level tests for the academics crate
//!
//! Drive the role-gated router over the in-memory repository with tokens
//! minted by the auth crate's token service.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use auth::domain::value_object::Email;
use auth::{AuthConfig, Role, TokenService};
use kernel::id::UserId;

use crate::application::AcademicsConfig;
use crate::domain::value_objects::ReEnrollmentPolicy;
use crate::infra::memory::MemoryAcademicsRepository;
use crate::presentation::router::academics_router_generic;

const ADMIN_ID: i64 = 1;
const REGISTRAR_ID: i64 = 2;
const INSTRUCTOR_ID: i64 = 3;
const STUDENT_ID: i64 = 4;
const OTHER_INSTRUCTOR_ID: i64 = 5;

struct Harness {
    app: Router,
    repo: MemoryAcademicsRepository,
    tokens: Arc<TokenService>,
}

impl Harness {
    fn new() -> Self {
        Self::with_policy(ReEnrollmentPolicy::AllowAfterDrop)
    }

    fn with_policy(policy: ReEnrollmentPolicy) -> Self {
        let tokens = Arc::new(TokenService::new(&AuthConfig::with_secrets(
            "test-access-secret-0123456789abcdef",
            "test-refresh-secret-0123456789abcdef",
        )));

        let repo = MemoryAcademicsRepository::default();
        repo.add_account(ADMIN_ID, "Admin User", Role::Admin);
        repo.add_account(REGISTRAR_ID, "Rita Registrar", Role::Registrar);
        repo.add_account(INSTRUCTOR_ID, "Ian Instructor", Role::Instructor);
        repo.add_account(STUDENT_ID, "Sam Student", Role::Student);
        repo.add_account(OTHER_INSTRUCTOR_ID, "Olga Other", Role::Instructor);

        let app = academics_router_generic(
            repo.clone(),
            tokens.clone(),
            AcademicsConfig::with_policy(policy),
        );

        Self { app, repo, tokens }
    }

    fn token(&self, id: i64, role: Role, email: &str) -> String {
        let email = Email::new(email).unwrap();
        self.tokens
            .generate_access_token(UserId::new(id), role, &email)
            .unwrap()
    }

    fn admin(&self) -> String {
        self.token(ADMIN_ID, Role::Admin, "admin@test.com")
    }

    fn registrar(&self) -> String {
        self.token(REGISTRAR_ID, Role::Registrar, "registrar@test.com")
    }

    fn instructor(&self) -> String {
        self.token(INSTRUCTOR_ID, Role::Instructor, "instructor@test.com")
    }

    fn student(&self) -> String {
        self.token(STUDENT_ID, Role::Student, "sam@test.com")
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create_student(&self, number: &str, email: &str) -> i64 {
        let token = self.registrar();
        let (status, body) = self
            .send(
                Method::POST,
                "/students",
                Some(&token),
                Some(json!({
                    "student_id": number,
                    "full_name": "Sam Student",
                    "email": email,
                    "year_level": 2,
                    "program": "BS Computer Science",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn create_course(&self, code: &str, instructor_id: Option<i64>) -> i64 {
        let token = self.registrar();
        let (status, body) = self
            .send(
                Method::POST,
                "/courses",
                Some(&token),
                Some(json!({
                    "course_code": code,
                    "title": format!("{code} Lecture"),
                    "units": 3,
                    "instructor_id": instructor_id,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn enroll(&self, student_id: i64, course_id: i64) -> (StatusCode, Value) {
        let token = self.registrar();
        self.send(
            Method::POST,
            "/enrollments",
            Some(&token),
            Some(json!({ "student_id": student_id, "course_id": course_id })),
        )
        .await
    }

    async fn assign_grade(&self, enrollment_id: i64, grade: &str) -> (StatusCode, Value) {
        let token = self.instructor();
        self.send(
            Method::POST,
            "/grades",
            Some(&token),
            Some(json!({ "enrollment_id": enrollment_id, "grade": grade })),
        )
        .await
    }
}

mod gates {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let h = Harness::new();

        let (status, body) = h.send(Method::GET, "/students", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "NO_TOKEN");
        assert_eq!(body["success"], false);

        let (status, _) = h.send(Method::GET, "/courses", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_student_cannot_read_roster() {
        let h = Harness::new();
        let token = h.student();

        let (status, body) = h.send(Method::GET, "/students", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "INSUFFICIENT_PERMISSION");
    }

    #[tokio::test]
    async fn test_instructor_reads_but_cannot_write_students() {
        let h = Harness::new();
        let token = h.instructor();

        let (status, _) = h.send(Method::GET, "/students", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = h
            .send(
                Method::POST,
                "/students",
                Some(&token),
                Some(json!({ "student_id": "2024-0001" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "INSUFFICIENT_PERMISSION");
    }

    #[tokio::test]
    async fn test_any_role_can_browse_courses() {
        let h = Harness::new();
        h.create_course("CS101", None).await;
        let token = h.student();

        let (status, body) = h.send(Method::GET, "/courses", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = h
            .send(Method::POST, "/courses", Some(&token), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_dashboards_require_matching_role() {
        let h = Harness::new();
        let registrar = h.registrar();
        let admin = h.admin();

        let (status, _) = h
            .send(Method::GET, "/dashboard/admin", Some(&registrar), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = h
            .send(Method::GET, "/dashboard/registrar", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = h
            .send(Method::GET, "/dashboard/admin", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

mod students {
    use super::*;

    #[tokio::test]
    async fn test_create_and_fetch() {
        let h = Harness::new();
        let id = h.create_student("2024-0001", "Sam@Test.com").await;
        let token = h.instructor();

        let (status, body) = h
            .send(Method::GET, &format!("/students/{id}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "STUDENT_SUCCESS");
        assert_eq!(body["data"]["student_id"], "2024-0001");
        assert_eq!(body["data"]["email"], "sam@test.com");
        assert_eq!(body["data"]["year_level"], 2);
        assert_eq!(body["data"]["is_active"], true);
    }

    #[tokio::test]
    async fn test_validation_reports_each_field() {
        let h = Harness::new();
        let token = h.registrar();

        let (status, body) = h
            .send(
                Method::POST,
                "/students",
                Some(&token),
                Some(json!({
                    "student_id": "2024-0001",
                    "full_name": "  ",
                    "email": "not-an-email",
                    "year_level": 11,
                    "program": "BSCS",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["errors"]["full_name"], "Full name is required");
        assert_eq!(
            body["errors"]["year_level"],
            "Year level must be between 1 and 10"
        );
        assert!(body["errors"]["email"].is_string());
        assert!(body["errors"].get("student_id").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_number_or_email_conflicts() {
        let h = Harness::new();
        h.create_student("2024-0001", "sam@test.com").await;
        let token = h.registrar();

        for (number, email) in [("2024-0001", "other@test.com"), ("2024-0002", "SAM@test.com")] {
            let (status, body) = h
                .send(
                    Method::POST,
                    "/students",
                    Some(&token),
                    Some(json!({
                        "student_id": number,
                        "full_name": "Dup",
                        "email": email,
                        "year_level": 1,
                        "program": "BSCS",
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(body["code"], "STUDENT_EXISTS");
        }
    }

    #[tokio::test]
    async fn test_deactivated_student_is_hidden_by_default() {
        let h = Harness::new();
        let id = h.create_student("2024-0001", "sam@test.com").await;
        h.create_student("2024-0002", "kim@test.com").await;
        let token = h.registrar();

        let (status, body) = h
            .send(
                Method::PATCH,
                &format!("/students/{id}/deactivate"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "STUDENT_DEACTIVATED");
        assert_eq!(body["data"]["is_active"], false);

        let (_, body) = h.send(Method::GET, "/students", Some(&token), None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = h
            .send(
                Method::GET,
                "/students?include_inactive=true",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (status, body) = h
            .send(Method::GET, &format!("/students/{id}"), Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "STUDENT_NOT_FOUND");

        let (status, _) = h
            .send(
                Method::GET,
                &format!("/students/{id}?include_inactive=true"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_and_missing_student() {
        let h = Harness::new();
        let id = h.create_student("2024-0001", "sam@test.com").await;
        let token = h.admin();
        let changes = json!({
            "full_name": "Samantha Student",
            "email": "samantha@test.com",
            "year_level": 3,
            "program": "BS Mathematics",
        });

        let (status, body) = h
            .send(
                Method::PUT,
                &format!("/students/{id}"),
                Some(&token),
                Some(changes.clone()),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["full_name"], "Samantha Student");
        assert_eq!(body["data"]["year_level"], 3);
        assert_eq!(body["data"]["student_id"], "2024-0001");

        let (status, body) = h
            .send(Method::PUT, "/students/999", Some(&token), Some(changes))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "STUDENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let h = Harness::new();
        let token = h.registrar();

        let (status, body) = h
            .send(Method::GET, "/students/abc", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

mod courses {
    use super::*;

    #[tokio::test]
    async fn test_instructor_must_hold_the_role() {
        let h = Harness::new();
        let token = h.registrar();

        for instructor_id in [STUDENT_ID, 999] {
            let (status, body) = h
                .send(
                    Method::POST,
                    "/courses",
                    Some(&token),
                    Some(json!({
                        "course_code": "CS101",
                        "title": "Intro",
                        "units": 3,
                        "instructor_id": instructor_id,
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], "INVALID_INSTRUCTOR");
        }
    }

    #[tokio::test]
    async fn test_deactivated_instructor_is_rejected() {
        let h = Harness::new();
        let course = h.create_course("CS101", None).await;
        h.repo.deactivate_account(INSTRUCTOR_ID);
        let token = h.registrar();

        let (status, body) = h
            .send(
                Method::PATCH,
                &format!("/courses/{course}/assign-instructor"),
                Some(&token),
                Some(json!({ "instructor_id": INSTRUCTOR_ID })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INSTRUCTOR");
    }

    #[tokio::test]
    async fn test_assign_and_unassign_instructor() {
        let h = Harness::new();
        let course = h.create_course("CS101", None).await;
        let token = h.registrar();
        let uri = format!("/courses/{course}/assign-instructor");

        let (status, body) = h
            .send(
                Method::PATCH,
                &uri,
                Some(&token),
                Some(json!({ "instructor_id": INSTRUCTOR_ID })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "INSTRUCTOR_ASSIGNED");
        assert_eq!(body["data"]["instructor_id"], INSTRUCTOR_ID);
        assert_eq!(body["data"]["instructor_name"], "Ian Instructor");

        let (status, body) = h
            .send(
                Method::PATCH,
                &uri,
                Some(&token),
                Some(json!({ "instructor_id": null })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["instructor_id"].is_null());
        assert_eq!(body["message"], "Instructor unassigned");

        let (status, body) = h
            .send(
                Method::PATCH,
                "/courses/999/assign-instructor",
                Some(&token),
                Some(json!({ "instructor_id": INSTRUCTOR_ID })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "COURSE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_duplicate_code_and_bad_units() {
        let h = Harness::new();
        h.create_course("CS101", None).await;
        let token = h.registrar();

        let (status, body) = h
            .send(
                Method::POST,
                "/courses",
                Some(&token),
                Some(json!({ "course_code": "CS101", "title": "Again", "units": 3 })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "COURSE_CODE_EXISTS");

        let (status, body) = h
            .send(
                Method::POST,
                "/courses",
                Some(&token),
                Some(json!({ "course_code": "CS102", "title": "Zero", "units": 0 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["units"], "Units must be between 1 and 12");
    }

    #[tokio::test]
    async fn test_update_keeps_code() {
        let h = Harness::new();
        let course = h.create_course("CS101", None).await;
        let token = h.admin();

        let (status, body) = h
            .send(
                Method::PUT,
                &format!("/courses/{course}"),
                Some(&token),
                Some(json!({ "title": "Programming I", "units": 4 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["title"], "Programming I");
        assert_eq!(body["data"]["units"], 4);
        assert_eq!(body["data"]["course_code"], "CS101");
    }
}

mod enrollments {
    use super::*;

    #[tokio::test]
    async fn test_active_enrollment_is_unique() {
        let h = Harness::new();
        let student = h.create_student("2024-0001", "sam@test.com").await;
        let course = h.create_course("CS101", None).await;

        let (status, body) = h.enroll(student, course).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["code"], "ENROLLMENT_CREATED");

        let (status, body) = h.enroll(student, course).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "ENROLLMENT_EXISTS");
    }

    #[tokio::test]
    async fn test_reenroll_after_drop_when_allowed() {
        let h = Harness::with_policy(ReEnrollmentPolicy::AllowAfterDrop);
        let student = h.create_student("2024-0001", "sam@test.com").await;
        let course = h.create_course("CS101", None).await;
        let (_, body) = h.enroll(student, course).await;
        let enrollment = body["data"]["id"].as_i64().unwrap();
        let token = h.registrar();

        let (status, body) = h
            .send(
                Method::DELETE,
                &format!("/enrollments/{enrollment}"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "ENROLLMENT_DROPPED");
        assert!(body["data"]["dropped_at"].is_string());

        let (status, body) = h.enroll(student, course).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_ne!(body["data"]["id"].as_i64().unwrap(), enrollment);
    }

    #[tokio::test]
    async fn test_reenroll_after_drop_when_once_per_course() {
        let h = Harness::with_policy(ReEnrollmentPolicy::OncePerCourse);
        let student = h.create_student("2024-0001", "sam@test.com").await;
        let course = h.create_course("CS101", None).await;
        let (_, body) = h.enroll(student, course).await;
        let enrollment = body["data"]["id"].as_i64().unwrap();
        let token = h.registrar();

        h.send(
            Method::DELETE,
            &format!("/enrollments/{enrollment}"),
            Some(&token),
            None,
        )
        .await;

        let (status, body) = h.enroll(student, course).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "ALREADY_ENROLLED_ONCE");
    }

    #[tokio::test]
    async fn test_enroll_requires_active_records() {
        let h = Harness::new();
        let student = h.create_student("2024-0001", "sam@test.com").await;
        let course = h.create_course("CS101", None).await;
        let token = h.registrar();

        let (status, body) = h.enroll(999, course).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "STUDENT_NOT_FOUND");

        let (status, body) = h.enroll(student, 999).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "COURSE_NOT_FOUND");

        h.send(
            Method::PATCH,
            &format!("/students/{student}/deactivate"),
            Some(&token),
            None,
        )
        .await;
        let (status, _) = h.enroll(student, course).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = h
            .send(
                Method::POST,
                "/enrollments",
                Some(&token),
                Some(json!({ "student_id": -1 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["student_id"], "Student ID must be a positive integer");
        assert_eq!(body["errors"]["course_id"], "Course ID is required");
    }

    #[tokio::test]
    async fn test_listing_hides_dropped_unless_asked() {
        let h = Harness::new();
        let student = h.create_student("2024-0001", "sam@test.com").await;
        let first = h.create_course("CS101", None).await;
        let second = h.create_course("CS102", None).await;
        let (_, body) = h.enroll(student, first).await;
        let dropped = body["data"]["id"].as_i64().unwrap();
        h.enroll(student, second).await;
        let token = h.registrar();

        h.send(
            Method::DELETE,
            &format!("/enrollments/{dropped}"),
            Some(&token),
            None,
        )
        .await;

        let (_, body) = h.send(Method::GET, "/enrollments", Some(&token), None).await;
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["course_code"], "CS102");
        assert_eq!(rows[0]["student_number"], "2024-0001");

        let (_, body) = h
            .send(
                Method::GET,
                "/enrollments?include_inactive=true",
                Some(&token),
                None,
            )
            .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (status, body) = h
            .send(
                Method::GET,
                &format!("/enrollments/student/{student}"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_enrollment_and_student() {
        let h = Harness::new();
        let token = h.registrar();

        let (status, body) = h
            .send(Method::DELETE, "/enrollments/999", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ENROLLMENT_NOT_FOUND");

        let (status, body) = h
            .send(Method::GET, "/enrollments/student/999", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "STUDENT_NOT_FOUND");
    }
}

mod grades {
    use super::*;

    async fn enrolled(h: &Harness) -> (i64, i64) {
        let student = h.create_student("2024-0001", "sam@test.com").await;
        let course = h.create_course("CS101", Some(INSTRUCTOR_ID)).await;
        let (_, body) = h.enroll(student, course).await;
        (student, body["data"]["id"].as_i64().unwrap())
    }

    #[tokio::test]
    async fn test_grader_is_the_caller() {
        let h = Harness::new();
        let (_, enrollment) = enrolled(&h).await;
        let token = h.instructor();

        let (status, body) = h
            .send(
                Method::POST,
                "/grades",
                Some(&token),
                Some(json!({
                    "enrollment_id": enrollment,
                    "grade": "b+",
                    "assigned_by": ADMIN_ID,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["code"], "GRADE_ASSIGNED");
        assert_eq!(body["data"]["grade"], "B+");
        assert_eq!(body["data"]["assigned_by"], INSTRUCTOR_ID);
    }

    #[tokio::test]
    async fn test_invalid_grade_and_missing_enrollment() {
        let h = Harness::new();
        let (_, enrollment) = enrolled(&h).await;

        let (status, body) = h.assign_grade(enrollment, "E").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"]["grade"],
            "Grade must be one of A+, A, A-, B+, B, B-, C+, C, C-, D+, D, D-, F"
        );

        let (status, body) = h.assign_grade(999, "A").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ENROLLMENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_latest_grade_is_current() {
        let h = Harness::new();
        let (student, enrollment) = enrolled(&h).await;
        h.assign_grade(enrollment, "C").await;
        h.assign_grade(enrollment, "A-").await;
        let token = h.registrar();

        let (_, body) = h
            .send(
                Method::GET,
                &format!("/enrollments/student/{student}"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(body["data"][0]["current_grade"], "A-");

        let (_, body) = h
            .send(
                Method::GET,
                &format!("/grades/student/{student}"),
                Some(&token),
                None,
            )
            .await;
        let grades = body["data"].as_array().unwrap();
        assert_eq!(grades.len(), 2);
        assert_eq!(grades[0]["grade"], "A-");
    }

    #[tokio::test]
    async fn test_dropped_enrollment_keeps_grades() {
        let h = Harness::new();
        let (student, enrollment) = enrolled(&h).await;
        h.assign_grade(enrollment, "F").await;
        let token = h.registrar();

        h.send(
            Method::DELETE,
            &format!("/enrollments/{enrollment}"),
            Some(&token),
            None,
        )
        .await;

        let (status, body) = h
            .send(
                Method::GET,
                &format!("/grades/student/{student}"),
                Some(&token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let grades = body["data"].as_array().unwrap();
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0]["grade"], "F");
        assert_eq!(grades[0]["enrollment_dropped"], true);
        assert_eq!(grades[0]["course_code"], "CS101");
    }

    #[tokio::test]
    async fn test_update_grade() {
        let h = Harness::new();
        let (_, enrollment) = enrolled(&h).await;
        let (_, body) = h.assign_grade(enrollment, "B").await;
        let grade = body["data"]["id"].as_i64().unwrap();
        let token = h.admin();

        let (status, body) = h
            .send(
                Method::PUT,
                &format!("/grades/{grade}"),
                Some(&token),
                Some(json!({ "grade": "A" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "GRADE_UPDATED");
        assert_eq!(body["data"]["grade"], "A");

        let (status, body) = h
            .send(
                Method::PUT,
                "/grades/999",
                Some(&token),
                Some(json!({ "grade": "A" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "GRADE_NOT_FOUND");

        let (_, body) = h.send(Method::GET, "/grades", Some(&token), None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_students_cannot_grade() {
        let h = Harness::new();
        let (_, enrollment) = enrolled(&h).await;
        let token = h.student();

        let (status, _) = h
            .send(
                Method::POST,
                "/grades",
                Some(&token),
                Some(json!({ "enrollment_id": enrollment, "grade": "A+" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

mod dashboards {
    use super::*;

    #[tokio::test]
    async fn test_admin_counts_active_records() {
        let h = Harness::new();
        let student = h.create_student("2024-0001", "sam@test.com").await;
        let inactive = h.create_student("2024-0002", "kim@test.com").await;
        let course = h.create_course("CS101", Some(INSTRUCTOR_ID)).await;
        h.create_course("CS102", Some(INSTRUCTOR_ID)).await;
        h.enroll(student, course).await;
        let token = h.admin();

        h.send(
            Method::PATCH,
            &format!("/students/{inactive}/deactivate"),
            Some(&token),
            None,
        )
        .await;

        let (status, body) = h
            .send(Method::GET, "/dashboard/admin", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["total_students"], 1);
        assert_eq!(data["total_courses"], 2);
        assert_eq!(data["total_enrollments"], 1);

        let instructors = data["instructors"].as_array().unwrap();
        assert_eq!(instructors.len(), 2);
        assert_eq!(instructors[0]["full_name"], "Ian Instructor");
        assert_eq!(instructors[0]["assigned_courses"], 2);
        assert_eq!(instructors[1]["assigned_courses"], 0);
    }

    #[tokio::test]
    async fn test_registrar_dashboard() {
        let h = Harness::new();
        h.create_student("2024-0001", "sam@test.com").await;
        let token = h.registrar();

        let (status, body) = h
            .send(Method::GET, "/dashboard/registrar", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_students"], 1);
        assert_eq!(body["data"]["total_enrollments"], 0);
    }

    #[tokio::test]
    async fn test_instructor_sees_own_courses() {
        let h = Harness::new();
        h.create_course("CS101", Some(INSTRUCTOR_ID)).await;
        h.create_course("CS102", Some(OTHER_INSTRUCTOR_ID)).await;
        let token = h.instructor();

        let (status, body) = h
            .send(Method::GET, "/dashboard/instructor", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["assigned_courses"], 1);
        assert_eq!(body["data"]["courses"][0]["course_code"], "CS101");
    }

    #[tokio::test]
    async fn test_student_dashboard_matches_by_email() {
        let h = Harness::new();
        let token = h.student();

        let (status, body) = h
            .send(Method::GET, "/dashboard/student", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "STUDENT_NOT_FOUND");

        let student = h.create_student("2024-0001", "sam@test.com").await;
        let course = h.create_course("CS101", None).await;
        let (_, body) = h.enroll(student, course).await;
        let enrollment = body["data"]["id"].as_i64().unwrap();
        h.assign_grade(enrollment, "A").await;

        let (status, body) = h
            .send(Method::GET, "/dashboard/student", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["student_id"], student);
        assert_eq!(body["data"]["student_number"], "2024-0001");
        assert_eq!(body["data"]["enrolled_courses"], 1);
        assert_eq!(body["data"]["grades_received"], 1);
    }
}

mod services {
    use super::*;
    use crate::application::{EnrollmentInput, EnrollmentService};
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_enrollment_service_over_memory_store() {
        let h = Harness::new();
        let student = h.create_student("2024-0001", "sam@test.com").await;
        let course = h.create_course("CS101", None).await;
        let repo = Arc::new(h.repo.clone());
        let service = EnrollmentService::new(
            repo.clone(),
            repo.clone(),
            repo,
            ReEnrollmentPolicy::OncePerCourse,
        );
        let input = EnrollmentInput {
            student_id: Some(student),
            course_id: Some(course),
        };

        let id = assert_ok!(service.enroll(input.clone()).await);
        assert_ok!(service.drop_enrollment(id).await);
        assert_err!(service.enroll(input).await);
    }
}
