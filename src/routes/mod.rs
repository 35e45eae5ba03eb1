pub mod avatar;
pub mod faculty;
pub mod student;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

// Define the OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Student endpoints
        student::create_student,
        student::update_student,
        student::get_student,
        student::delete_student,
        student::list_students,
        student::get_student_faculty,
        // Student statistics endpoints
        student::count_students,
        student::average_age,
        student::average_age_parallel,
        student::last_five_students,
        student::names_starting_with_a,
        // Avatar endpoints
        avatar::upload_avatar,
        avatar::avatar_from_db,
        avatar::avatar_from_fs,
        avatar::list_avatars,
        // Faculty endpoints
        faculty::create_faculty,
        faculty::update_faculty,
        faculty::get_faculty,
        faculty::delete_faculty,
        faculty::list_faculties,
        faculty::list_faculty_students,
    ),
    components(
        schemas(
            student::StudentRequest,
            student::StudentResponse,
            faculty::FacultyRequest,
            faculty::FacultyResponse,
            avatar::AvatarResponse,
        )
    ),
    tags(
        (name = "Students", description = "Student CRUD and filtering"),
        (name = "Student Statistics", description = "Aggregate queries over all students"),
        (name = "Avatars", description = "Student avatar upload and retrieval"),
        (name = "Faculties", description = "Faculty CRUD and filtering")
    ),
    info(
        title = "Hogwarts School API",
        version = "0.1.0",
        description = "A Rust/Axum backend for tracking students, faculties and student avatars",
    )
)]
struct ApiDoc;

pub fn create_routes(state: AppState) -> Router {
    // Swagger UI (stateless)
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let student_routes = Router::new()
        .route(
            "/student",
            post(student::create_student).get(student::list_students),
        )
        .route("/student/count", get(student::count_students))
        .route("/student/age-avg", get(student::average_age))
        .route("/student/age-avg-parallel", get(student::average_age_parallel))
        .route("/student/desc-five", get(student::last_five_students))
        .route(
            "/student/names-starting-with-a",
            get(student::names_starting_with_a),
        )
        .route(
            "/student/{id}",
            get(student::get_student)
                .put(student::update_student)
                .delete(student::delete_student),
        )
        .route("/student/{id}/faculty", get(student::get_student_faculty));

    let avatar_routes = Router::new()
        .route(
            "/student/{id}/avatar",
            post(avatar::upload_avatar).layer(DefaultBodyLimit::max(avatar::MAX_AVATAR_BYTES)),
        )
        .route("/student/{id}/avatar-from-db", get(avatar::avatar_from_db))
        .route("/student/{id}/avatar-from-fs", get(avatar::avatar_from_fs))
        .route("/avatar", get(avatar::list_avatars));

    let faculty_routes = Router::new()
        .route(
            "/faculty",
            post(faculty::create_faculty).get(faculty::list_faculties),
        )
        .route(
            "/faculty/{id}",
            get(faculty::get_faculty)
                .put(faculty::update_faculty)
                .delete(faculty::delete_faculty),
        )
        .route("/faculty/{id}/students", get(faculty::list_faculty_students));

    let app_routes = Router::new()
        .merge(student_routes)
        .merge(avatar_routes)
        .merge(faculty_routes)
        .with_state(state);

    // Merge Swagger UI (which has no state) with the rest
    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
