//! In-memory repository for tests

use auth::domain::value_object::Role;
use chrono::{DateTime, Duration, Utc};
use kernel::id::{CourseId, EnrollmentId, GradeId, StudentId, UserId};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::entities::{
    Course, CourseChanges, CourseSummary, Enrollment, EnrollmentDetails, Grade, GradeDetails,
    InstructorLoad, NewCourse, NewGrade, NewStudent, Student, StudentChanges,
};
use crate::domain::repository::{
    CourseRepository, DashboardRepository, EnrollmentRepository, GradeRepository,
    InstructorDirectory, StudentRepository, Totals,
};
use crate::domain::services::current_grade;
use crate::domain::value_objects::GradeCode;
use crate::error::{AcademicsError, AcademicsResult};

#[derive(Clone)]
struct Account {
    id: UserId,
    full_name: String,
    role: Role,
    is_active: bool,
}

#[derive(Default)]
struct Store {
    accounts: Vec<Account>,
    students: Vec<Student>,
    courses: Vec<Course>,
    enrollments: Vec<Enrollment>,
    grades: Vec<Grade>,
    /// Monotonic clock so ordering by timestamp is deterministic
    ticks: i64,
}

impl Store {
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(1_700_000_000 + self.ticks)
    }

    fn account_name(&self, id: Option<UserId>) -> Option<String> {
        id.and_then(|id| self.accounts.iter().find(|a| a.id == id))
            .map(|a| a.full_name.clone())
    }

    fn with_instructor_name(&self, course: &Course) -> Course {
        Course {
            instructor_name: self.account_name(course.instructor_id),
            ..course.clone()
        }
    }

    fn details(&self, e: &Enrollment) -> AcademicsResult<EnrollmentDetails> {
        let student = self
            .students
            .iter()
            .find(|s| s.id == e.student_id)
            .ok_or_else(|| AcademicsError::Internal("dangling student".into()))?;
        let course = self
            .courses
            .iter()
            .find(|c| c.id == e.course_id)
            .ok_or_else(|| AcademicsError::Internal("dangling course".into()))?;
        let current = current_grade(self.grades.iter().filter(|g| g.enrollment_id == e.id));

        Ok(EnrollmentDetails {
            id: e.id,
            student_id: e.student_id,
            course_id: e.course_id,
            enrolled_at: e.enrolled_at,
            dropped_at: e.dropped_at,
            student_number: student.student_id.clone(),
            student_name: student.full_name.clone(),
            course_code: course.course_code.clone(),
            course_title: course.title.clone(),
            current_grade: current.map(|g| g.grade.clone()),
        })
    }

    fn grade_details(&self, g: &Grade) -> AcademicsResult<GradeDetails> {
        let e = self
            .enrollments
            .iter()
            .find(|e| e.id == g.enrollment_id)
            .ok_or_else(|| AcademicsError::Internal("dangling enrollment".into()))?;
        let course = self
            .courses
            .iter()
            .find(|c| c.id == e.course_id)
            .ok_or_else(|| AcademicsError::Internal("dangling course".into()))?;

        Ok(GradeDetails {
            id: g.id,
            enrollment_id: g.enrollment_id,
            grade: g.grade.clone(),
            assigned_by: g.assigned_by,
            assigned_at: g.assigned_at,
            updated_at: g.updated_at,
            student_id: e.student_id,
            course_id: e.course_id,
            course_code: course.course_code.clone(),
            course_title: course.title.clone(),
            enrollment_dropped: !e.is_active(),
        })
    }

    fn sorted_grades(
        &self,
        keep: impl Fn(&Grade, &Enrollment) -> bool,
    ) -> AcademicsResult<Vec<GradeDetails>> {
        let mut grades: Vec<&Grade> = self
            .grades
            .iter()
            .filter(|g| {
                self.enrollments
                    .iter()
                    .any(|e| e.id == g.enrollment_id && keep(g, e))
            })
            .collect();
        grades.sort_by(|a, b| b.assigned_at.cmp(&a.assigned_at).then(b.id.cmp(&a.id)));
        grades.into_iter().map(|g| self.grade_details(g)).collect()
    }
}

/// Academics repository backed by `Vec`s, with a small user directory
#[derive(Clone, Default)]
pub struct MemoryAcademicsRepository {
    store: Arc<Mutex<Store>>,
}

impl MemoryAcademicsRepository {
    /// Register a user account the directory can resolve
    pub fn add_account(&self, id: i64, full_name: &str, role: Role) {
        if let Ok(mut store) = self.store.lock() {
            store.accounts.push(Account {
                id: UserId::new(id),
                full_name: full_name.to_string(),
                role,
                is_active: true,
            });
        }
    }

    pub fn deactivate_account(&self, id: i64) {
        if let Ok(mut store) = self.store.lock() {
            for account in store.accounts.iter_mut().filter(|a| a.id.get() == id) {
                account.is_active = false;
            }
        }
    }

    fn lock(&self) -> AcademicsResult<MutexGuard<'_, Store>> {
        self.store
            .lock()
            .map_err(|_| AcademicsError::Internal("store lock poisoned".to_string()))
    }
}

impl StudentRepository for MemoryAcademicsRepository {
    async fn create(&self, student: &NewStudent) -> AcademicsResult<StudentId> {
        let mut store = self.lock()?;
        if store
            .students
            .iter()
            .any(|s| s.student_id == student.student_id || s.email == student.email)
        {
            return Err(AcademicsError::StudentExists);
        }
        let id = StudentId::new(store.students.len() as i64 + 1);
        let now = store.now();
        store.students.push(Student {
            id,
            student_id: student.student_id.clone(),
            full_name: student.full_name.clone(),
            email: student.email.clone(),
            year_level: student.year_level.get(),
            program: student.program.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn get_all(&self, active_only: bool) -> AcademicsResult<Vec<Student>> {
        let store = self.lock()?;
        let mut students: Vec<Student> = store
            .students
            .iter()
            .filter(|s| !active_only || s.is_active)
            .cloned()
            .collect();
        students.sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.id.cmp(&b.id)));
        Ok(students)
    }

    async fn get_by_id(&self, id: StudentId) -> AcademicsResult<Option<Student>> {
        let store = self.lock()?;
        Ok(store.students.iter().find(|s| s.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AcademicsResult<Option<Student>> {
        let store = self.lock()?;
        Ok(store
            .students
            .iter()
            .find(|s| s.is_active && s.email == email)
            .cloned())
    }

    async fn update(
        &self,
        id: StudentId,
        changes: &StudentChanges,
    ) -> AcademicsResult<Option<Student>> {
        let mut store = self.lock()?;
        if store
            .students
            .iter()
            .any(|s| s.id != id && s.email == changes.email)
        {
            return Err(AcademicsError::StudentExists);
        }
        let now = store.now();
        Ok(store.students.iter_mut().find(|s| s.id == id).map(|s| {
            s.full_name = changes.full_name.clone();
            s.email = changes.email.clone();
            s.year_level = changes.year_level.get();
            s.program = changes.program.clone();
            s.updated_at = now;
            s.clone()
        }))
    }

    async fn deactivate(&self, id: StudentId) -> AcademicsResult<Option<Student>> {
        let mut store = self.lock()?;
        let now = store.now();
        Ok(store.students.iter_mut().find(|s| s.id == id).map(|s| {
            s.is_active = false;
            s.updated_at = now;
            s.clone()
        }))
    }
}

impl CourseRepository for MemoryAcademicsRepository {
    async fn create(&self, course: &NewCourse) -> AcademicsResult<CourseId> {
        let mut store = self.lock()?;
        if store
            .courses
            .iter()
            .any(|c| c.course_code == course.course_code)
        {
            return Err(AcademicsError::CourseCodeExists);
        }
        let id = CourseId::new(store.courses.len() as i64 + 1);
        let now = store.now();
        store.courses.push(Course {
            id,
            course_code: course.course_code.clone(),
            title: course.title.clone(),
            units: course.units.get(),
            instructor_id: course.instructor_id,
            instructor_name: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn get_all(&self, active_only: bool) -> AcademicsResult<Vec<Course>> {
        let store = self.lock()?;
        let mut courses: Vec<Course> = store
            .courses
            .iter()
            .filter(|c| !active_only || c.is_active)
            .map(|c| store.with_instructor_name(c))
            .collect();
        courses.sort_by(|a, b| a.course_code.cmp(&b.course_code));
        Ok(courses)
    }

    async fn get_by_id(&self, id: CourseId) -> AcademicsResult<Option<Course>> {
        let store = self.lock()?;
        Ok(store
            .courses
            .iter()
            .find(|c| c.id == id)
            .map(|c| store.with_instructor_name(c)))
    }

    async fn update(
        &self,
        id: CourseId,
        changes: &CourseChanges,
    ) -> AcademicsResult<Option<Course>> {
        let mut store = self.lock()?;
        let now = store.now();
        let updated = store.courses.iter_mut().find(|c| c.id == id).map(|c| {
            c.title = changes.title.clone();
            c.units = changes.units.get();
            c.updated_at = now;
            c.clone()
        });
        Ok(updated.map(|c| store.with_instructor_name(&c)))
    }

    async fn assign_instructor(
        &self,
        id: CourseId,
        instructor_id: Option<UserId>,
    ) -> AcademicsResult<Option<Course>> {
        let mut store = self.lock()?;
        let now = store.now();
        let updated = store.courses.iter_mut().find(|c| c.id == id).map(|c| {
            c.instructor_id = instructor_id;
            c.updated_at = now;
            c.clone()
        });
        Ok(updated.map(|c| store.with_instructor_name(&c)))
    }

    async fn get_by_instructor(
        &self,
        instructor_id: UserId,
    ) -> AcademicsResult<Vec<CourseSummary>> {
        let store = self.lock()?;
        let mut courses: Vec<CourseSummary> = store
            .courses
            .iter()
            .filter(|c| c.is_active && c.instructor_id == Some(instructor_id))
            .map(|c| CourseSummary {
                id: c.id,
                course_code: c.course_code.clone(),
                title: c.title.clone(),
            })
            .collect();
        courses.sort_by(|a, b| a.course_code.cmp(&b.course_code));
        Ok(courses)
    }
}

impl EnrollmentRepository for MemoryAcademicsRepository {
    async fn enroll(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> AcademicsResult<EnrollmentId> {
        let mut store = self.lock()?;
        if store
            .enrollments
            .iter()
            .any(|e| e.student_id == student_id && e.course_id == course_id && e.is_active())
        {
            return Err(AcademicsError::EnrollmentExists);
        }
        let id = EnrollmentId::new(store.enrollments.len() as i64 + 1);
        let now = store.now();
        store.enrollments.push(Enrollment {
            id,
            student_id,
            course_id,
            enrolled_at: now,
            dropped_at: None,
        });
        Ok(id)
    }

    async fn drop_enrollment(&self, id: EnrollmentId) -> AcademicsResult<Option<Enrollment>> {
        let mut store = self.lock()?;
        let now = store.now();
        Ok(store.enrollments.iter_mut().find(|e| e.id == id).map(|e| {
            e.dropped_at = Some(now);
            e.clone()
        }))
    }

    async fn get_by_id(&self, id: EnrollmentId) -> AcademicsResult<Option<Enrollment>> {
        let store = self.lock()?;
        Ok(store.enrollments.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_pair(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> AcademicsResult<Vec<Enrollment>> {
        let store = self.lock()?;
        Ok(store
            .enrollments
            .iter()
            .filter(|e| e.student_id == student_id && e.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn get_all(&self, active_only: bool) -> AcademicsResult<Vec<EnrollmentDetails>> {
        let store = self.lock()?;
        store
            .enrollments
            .iter()
            .rev()
            .filter(|e| !active_only || e.is_active())
            .map(|e| store.details(e))
            .collect()
    }

    async fn get_by_student(
        &self,
        student_id: StudentId,
    ) -> AcademicsResult<Vec<EnrollmentDetails>> {
        let store = self.lock()?;
        store
            .enrollments
            .iter()
            .rev()
            .filter(|e| e.student_id == student_id && e.is_active())
            .map(|e| store.details(e))
            .collect()
    }
}

impl GradeRepository for MemoryAcademicsRepository {
    async fn assign(&self, grade: &NewGrade) -> AcademicsResult<Grade> {
        let mut store = self.lock()?;
        let now = store.now();
        let row = Grade {
            id: GradeId::new(store.grades.len() as i64 + 1),
            enrollment_id: grade.enrollment_id,
            grade: grade.grade.as_str().to_string(),
            assigned_by: Some(grade.assigned_by),
            assigned_at: now,
            updated_at: now,
        };
        store.grades.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: GradeId, grade: GradeCode) -> AcademicsResult<Option<Grade>> {
        let mut store = self.lock()?;
        let now = store.now();
        Ok(store.grades.iter_mut().find(|g| g.id == id).map(|g| {
            g.grade = grade.as_str().to_string();
            g.updated_at = now;
            g.clone()
        }))
    }

    async fn get_all(&self) -> AcademicsResult<Vec<GradeDetails>> {
        self.lock()?.sorted_grades(|_, _| true)
    }

    async fn get_by_student(&self, student_id: StudentId) -> AcademicsResult<Vec<GradeDetails>> {
        self.lock()?
            .sorted_grades(|_, e| e.student_id == student_id)
    }
}

impl InstructorDirectory for MemoryAcademicsRepository {
    async fn is_active_instructor(&self, user_id: UserId) -> AcademicsResult<bool> {
        let store = self.lock()?;
        Ok(store
            .accounts
            .iter()
            .any(|a| a.id == user_id && a.is_active && a.role == Role::Instructor))
    }

    async fn instructor_loads(&self) -> AcademicsResult<Vec<InstructorLoad>> {
        let store = self.lock()?;
        let mut loads: Vec<InstructorLoad> = store
            .accounts
            .iter()
            .filter(|a| a.is_active && a.role == Role::Instructor)
            .map(|a| InstructorLoad {
                instructor_id: a.id,
                full_name: a.full_name.clone(),
                assigned_courses: store
                    .courses
                    .iter()
                    .filter(|c| c.is_active && c.instructor_id == Some(a.id))
                    .count() as i64,
            })
            .collect();
        loads.sort_by(|a, b| {
            a.full_name
                .cmp(&b.full_name)
                .then(a.instructor_id.cmp(&b.instructor_id))
        });
        Ok(loads)
    }
}

impl DashboardRepository for MemoryAcademicsRepository {
    async fn totals(&self) -> AcademicsResult<Totals> {
        let store = self.lock()?;
        Ok(Totals {
            active_students: store.students.iter().filter(|s| s.is_active).count() as i64,
            active_courses: store.courses.iter().filter(|c| c.is_active).count() as i64,
            active_enrollments: store.enrollments.iter().filter(|e| e.is_active()).count() as i64,
        })
    }

    async fn student_totals(&self, student_id: StudentId) -> AcademicsResult<(i64, i64)> {
        let store = self.lock()?;
        let enrolled = store
            .enrollments
            .iter()
            .filter(|e| e.student_id == student_id && e.is_active())
            .count() as i64;
        let graded = store
            .grades
            .iter()
            .filter(|g| {
                store
                    .enrollments
                    .iter()
                    .any(|e| e.id == g.enrollment_id && e.student_id == student_id)
            })
            .count() as i64;
        Ok((enrolled, graded))
    }
}
