use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::entities::student;
use crate::error::AppError;
use crate::routes::faculty::FacultyResponse;
use crate::services::student::StudentParams;
use crate::state::AppState;

/// Any `id` in the body is ignored; ids are always assigned by the store.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct StudentRequest {
    name: String,
    age: i32,
    faculty_id: Option<i32>,
}

impl From<StudentRequest> for StudentParams {
    fn from(request: StudentRequest) -> Self {
        StudentParams {
            name: request.name,
            age: request.age,
            faculty_id: request.faculty_id,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, utoipa::ToSchema)]
pub struct StudentResponse {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub faculty_id: Option<i32>,
}

impl From<student::Model> for StudentResponse {
    fn from(student: student::Model) -> Self {
        StudentResponse {
            id: student.id,
            name: student.name,
            age: student.age,
            faculty_id: student.faculty_id,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StudentFilter {
    /// Exact age match.
    pub age: Option<i32>,
    /// Inclusive lower bound; requires `maxAge`.
    pub min_age: Option<i32>,
    /// Inclusive upper bound; requires `minAge`.
    pub max_age: Option<i32>,
}

#[utoipa::path(
    post,
    path = "/student",
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Student created successfully", body = StudentResponse),
        (status = 404, description = "Referenced faculty not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    Json(payload): Json<StudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), AppError> {
    let created = state.students.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(StudentResponse::from(created))))
}

#[utoipa::path(
    put,
    path = "/student/{id}",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student updated successfully", body = StudentResponse),
        (status = 404, description = "Student or referenced faculty not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<StudentRequest>,
) -> Result<Json<StudentResponse>, AppError> {
    let updated = state.students.update(id, payload.into()).await?;
    Ok(Json(StudentResponse::from(updated)))
}

#[utoipa::path(
    get,
    path = "/student/{id}",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details", body = StudentResponse),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StudentResponse>, AppError> {
    let student = state.students.get(id).await?;
    Ok(Json(StudentResponse::from(student)))
}

#[utoipa::path(
    delete,
    path = "/student/{id}",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student deleted successfully"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.students.remove(id).await?;

    Ok(Json(serde_json::json!({
        "message": "Student deleted successfully"
    })))
}

#[utoipa::path(
    get,
    path = "/student",
    params(
        StudentFilter
    ),
    responses(
        (status = 200, description = "Matching students", body = [StudentResponse]),
        (status = 400, description = "Only one bound of the age range given"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    Query(filter): Query<StudentFilter>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let students = match (filter.age, filter.min_age, filter.max_age) {
        (Some(age), _, _) => state.students.filter_by_age(age).await?,
        (None, Some(min_age), Some(max_age)) => {
            state.students.filter_by_age_range(min_age, max_age).await?
        }
        (None, None, None) => state.students.list_all().await?,
        (None, _, _) => {
            return Err(AppError::InvalidArgument(
                "Both minAge and maxAge are required".to_string(),
            ))
        }
    };

    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/student/{id}/faculty",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Faculty of the student, or null", body = FacultyResponse),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Students"
)]
pub async fn get_student_faculty(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Option<FacultyResponse>>, AppError> {
    let faculty = state.students.faculty_of(id).await?;
    Ok(Json(faculty.map(FacultyResponse::from)))
}

#[utoipa::path(
    get,
    path = "/student/count",
    responses(
        (status = 200, description = "Number of students", body = u64)
    ),
    tag = "Student Statistics"
)]
pub async fn count_students(State(state): State<AppState>) -> Result<Json<u64>, AppError> {
    Ok(Json(state.aggregation.count().await?))
}

#[utoipa::path(
    get,
    path = "/student/age-avg",
    responses(
        (status = 200, description = "Average student age", body = f64),
        (status = 404, description = "There are no students")
    ),
    tag = "Student Statistics"
)]
pub async fn average_age(State(state): State<AppState>) -> Result<Json<f64>, AppError> {
    Ok(Json(state.aggregation.average_age().await?))
}

#[utoipa::path(
    get,
    path = "/student/age-avg-parallel",
    responses(
        (status = 200, description = "Average student age, computed in parallel", body = f64),
        (status = 404, description = "There are no students")
    ),
    tag = "Student Statistics"
)]
pub async fn average_age_parallel(State(state): State<AppState>) -> Result<Json<f64>, AppError> {
    Ok(Json(state.aggregation.average_age_parallel().await?))
}

#[utoipa::path(
    get,
    path = "/student/desc-five",
    responses(
        (status = 200, description = "Five students with the highest ids", body = [StudentResponse])
    ),
    tag = "Student Statistics"
)]
pub async fn last_five_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let students = state.aggregation.last_five().await?;
    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/student/names-starting-with-a",
    responses(
        (status = 200, description = "Upper-cased names starting with 'A', sorted", body = [String])
    ),
    tag = "Student Statistics"
)]
pub async fn names_starting_with_a(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.aggregation.names_starting_with_a().await?))
}
