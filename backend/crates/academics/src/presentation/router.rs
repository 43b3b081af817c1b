//! Academics Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;

use auth::{AllowedRoles, Role, TokenService, authorize, require_auth};

use crate::application::AcademicsConfig;
use crate::infra::postgres::PgAcademicsRepository;
use crate::presentation::handlers::{self, AcademicsAppState, AcademicsRepository};

const STAFF: AllowedRoles = AllowedRoles::new(&[Role::Admin, Role::Registrar]);
const STAFF_AND_INSTRUCTORS: AllowedRoles =
    AllowedRoles::new(&[Role::Admin, Role::Registrar, Role::Instructor]);

const ADMIN: AllowedRoles = AllowedRoles::new(&[Role::Admin]);
const REGISTRAR: AllowedRoles = AllowedRoles::new(&[Role::Registrar]);
const INSTRUCTOR: AllowedRoles = AllowedRoles::new(&[Role::Instructor]);
const STUDENT: AllowedRoles = AllowedRoles::new(&[Role::Student]);

/// Create the academics router with PostgreSQL repository
pub fn academics_router(
    repo: PgAcademicsRepository,
    tokens: Arc<TokenService>,
    config: AcademicsConfig,
) -> Router {
    academics_router_generic(repo, tokens, config)
}

/// Create a generic academics router for any repository implementation
pub fn academics_router_generic<R: AcademicsRepository>(
    repo: R,
    tokens: Arc<TokenService>,
    config: AcademicsConfig,
) -> Router {
    let state = AcademicsAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    // Gate a group: role check inside, authentication outermost
    let gated = |router: Router<AcademicsAppState<R>>, roles: AllowedRoles| {
        router
            .route_layer(from_fn_with_state(roles, authorize))
            .route_layer(from_fn_with_state(tokens.clone(), require_auth))
    };

    let staff = Router::new()
        .route("/students", post(handlers::create_student::<R>))
        .route("/students/{id}", put(handlers::update_student::<R>))
        .route(
            "/students/{id}/deactivate",
            patch(handlers::deactivate_student::<R>),
        )
        .route("/courses", post(handlers::create_course::<R>))
        .route("/courses/{id}", put(handlers::update_course::<R>))
        .route(
            "/courses/{id}/assign-instructor",
            patch(handlers::assign_instructor::<R>),
        )
        .route("/enrollments", post(handlers::enroll::<R>))
        .route("/enrollments/{id}", delete(handlers::drop_enrollment::<R>));

    let readers = Router::new()
        .route("/students", get(handlers::list_students::<R>))
        .route("/students/{id}", get(handlers::get_student::<R>))
        .route("/enrollments", get(handlers::list_enrollments::<R>))
        .route(
            "/enrollments/student/{student_id}",
            get(handlers::student_enrollments::<R>),
        )
        .route(
            "/grades",
            post(handlers::assign_grade::<R>).get(handlers::list_grades::<R>),
        )
        .route("/grades/{id}", put(handlers::update_grade::<R>))
        .route(
            "/grades/student/{student_id}",
            get(handlers::student_grades::<R>),
        );

    let catalog = Router::new()
        .route("/courses", get(handlers::list_courses::<R>))
        .route("/courses/{id}", get(handlers::get_course::<R>))
        .route_layer(from_fn_with_state(tokens.clone(), require_auth));

    let dashboards = Router::new()
        .merge(gated(
            Router::new().route("/dashboard/admin", get(handlers::admin_dashboard::<R>)),
            ADMIN,
        ))
        .merge(gated(
            Router::new().route(
                "/dashboard/registrar",
                get(handlers::registrar_dashboard::<R>),
            ),
            REGISTRAR,
        ))
        .merge(gated(
            Router::new().route(
                "/dashboard/instructor",
                get(handlers::instructor_dashboard::<R>),
            ),
            INSTRUCTOR,
        ))
        .merge(gated(
            Router::new().route("/dashboard/student", get(handlers::student_dashboard::<R>)),
            STUDENT,
        ));

    gated(staff, STAFF)
        .merge(gated(readers, STAFF_AND_INSTRUCTORS))
        .merge(catalog)
        .merge(dashboards)
        .with_state(state)
}
