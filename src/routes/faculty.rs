use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::entities::faculty;
use crate::error::AppError;
use crate::routes::student::StudentResponse;
use crate::services::faculty::FacultyParams;
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct FacultyRequest {
    name: String,
    color: String,
}

impl From<FacultyRequest> for FacultyParams {
    fn from(request: FacultyRequest) -> Self {
        FacultyParams {
            name: request.name,
            color: request.color,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, utoipa::ToSchema)]
pub struct FacultyResponse {
    pub id: i32,
    pub name: String,
    pub color: String,
}

impl From<faculty::Model> for FacultyResponse {
    fn from(faculty: faculty::Model) -> Self {
        FacultyResponse {
            id: faculty.id,
            name: faculty.name,
            color: faculty.color,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FacultyFilter {
    /// Exact color match.
    pub color: Option<String>,
    /// Case-insensitive match against color or name.
    pub color_or_name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/faculty",
    request_body = FacultyRequest,
    responses(
        (status = 201, description = "Faculty created successfully", body = FacultyResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Faculties"
)]
pub async fn create_faculty(
    State(state): State<AppState>,
    Json(payload): Json<FacultyRequest>,
) -> Result<(StatusCode, Json<FacultyResponse>), AppError> {
    let created = state.faculties.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(FacultyResponse::from(created))))
}

#[utoipa::path(
    put,
    path = "/faculty/{id}",
    params(
        ("id" = i32, Path, description = "Faculty ID")
    ),
    request_body = FacultyRequest,
    responses(
        (status = 200, description = "Faculty updated successfully", body = FacultyResponse),
        (status = 404, description = "Faculty not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Faculties"
)]
pub async fn update_faculty(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<FacultyRequest>,
) -> Result<Json<FacultyResponse>, AppError> {
    let updated = state.faculties.update(id, payload.into()).await?;
    Ok(Json(FacultyResponse::from(updated)))
}

#[utoipa::path(
    get,
    path = "/faculty/{id}",
    params(
        ("id" = i32, Path, description = "Faculty ID")
    ),
    responses(
        (status = 200, description = "Faculty details", body = FacultyResponse),
        (status = 404, description = "Faculty not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Faculties"
)]
pub async fn get_faculty(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FacultyResponse>, AppError> {
    let faculty = state.faculties.get(id).await?;
    Ok(Json(FacultyResponse::from(faculty)))
}

#[utoipa::path(
    delete,
    path = "/faculty/{id}",
    params(
        ("id" = i32, Path, description = "Faculty ID")
    ),
    responses(
        (status = 200, description = "Faculty deleted successfully"),
        (status = 404, description = "Faculty not found"),
        (status = 409, description = "Faculty still has students"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Faculties"
)]
pub async fn delete_faculty(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.faculties.remove(id).await?;

    Ok(Json(serde_json::json!({
        "message": "Faculty deleted successfully"
    })))
}

#[utoipa::path(
    get,
    path = "/faculty",
    params(
        FacultyFilter
    ),
    responses(
        (status = 200, description = "Matching faculties", body = [FacultyResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Faculties"
)]
pub async fn list_faculties(
    State(state): State<AppState>,
    Query(filter): Query<FacultyFilter>,
) -> Result<Json<Vec<FacultyResponse>>, AppError> {
    let faculties = match (filter.color, filter.color_or_name) {
        (Some(color), _) => state.faculties.filter_by_color(&color).await?,
        (None, Some(term)) => state.faculties.filter_by_color_or_name(&term).await?,
        (None, None) => state.faculties.list_all().await?,
    };

    Ok(Json(faculties.into_iter().map(FacultyResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/faculty/{id}/students",
    params(
        ("id" = i32, Path, description = "Faculty ID")
    ),
    responses(
        (status = 200, description = "Students of the faculty", body = [StudentResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Faculties"
)]
pub async fn list_faculty_students(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let students = state.faculties.students_of(id).await?;
    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}
