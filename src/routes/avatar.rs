use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::entities::avatar;
use crate::error::AppError;
use crate::pagination::Pagination;
use crate::services::avatar::{AvatarContent, AvatarUpload};
use crate::state::AppState;

/// Uploads larger than this are rejected before reaching the handler.
pub const MAX_AVATAR_BYTES: usize = 10 * 1024 * 1024;

/// Multipart field carrying the image.
pub const AVATAR_FIELD: &str = "avatar";

#[derive(Serialize, Deserialize, Debug, PartialEq, utoipa::ToSchema)]
pub struct AvatarResponse {
    pub id: i32,
    pub student_id: i32,
    pub file_path: String,
    pub file_size: i64,
    pub media_type: String,
}

impl From<avatar::Model> for AvatarResponse {
    fn from(avatar: avatar::Model) -> Self {
        AvatarResponse {
            id: avatar.id,
            student_id: avatar.student_id,
            file_path: avatar.file_path,
            file_size: avatar.file_size,
            media_type: avatar.media_type,
        }
    }
}

impl IntoResponse for AvatarContent {
    fn into_response(self) -> Response {
        let media_type = match HeaderValue::from_str(&self.media_type) {
            Ok(value) => value,
            Err(_) => {
                return AppError::InternalServerError(format!(
                    "Stored media type '{}' is not a valid header value",
                    self.media_type
                ))
                .into_response()
            }
        };

        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, media_type),
                (header::CONTENT_LENGTH, HeaderValue::from(self.data.len())),
            ],
            self.data,
        )
            .into_response()
    }
}

#[utoipa::path(
    post,
    path = "/student/{id}/avatar",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar uploaded successfully", body = AvatarResponse),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Avatars"
)]
pub async fn upload_avatar(
    State(state): State<AppState>,
    Path(student_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::InvalidArgument("Invalid multipart data".to_string()))?
    {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let original_filename = field.file_name().map(str::to_string);
        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|_| AppError::InvalidArgument("Failed to read avatar bytes".to_string()))?;

        let saved = state
            .avatars
            .upload(
                student_id,
                AvatarUpload {
                    data: data.to_vec(),
                    original_filename,
                    media_type,
                },
            )
            .await?;

        return Ok(Json(AvatarResponse::from(saved)));
    }

    tracing::warn!("Avatar | upload | student={} | no '{}' field", student_id, AVATAR_FIELD);
    Err(AppError::InvalidArgument(format!(
        "No '{}' field found",
        AVATAR_FIELD
    )))
}

#[utoipa::path(
    get,
    path = "/student/{id}/avatar-from-db",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Avatar bytes from the database", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 404, description = "Avatar not found")
    ),
    tag = "Avatars"
)]
pub async fn avatar_from_db(
    State(state): State<AppState>,
    Path(student_id): Path<i32>,
) -> Result<AvatarContent, AppError> {
    state.avatars.get_from_store(student_id).await
}

#[utoipa::path(
    get,
    path = "/student/{id}/avatar-from-fs",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Avatar bytes from the filesystem", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 404, description = "Avatar not found"),
        (status = 500, description = "Avatar file could not be read")
    ),
    tag = "Avatars"
)]
pub async fn avatar_from_fs(
    State(state): State<AppState>,
    Path(student_id): Path<i32>,
) -> Result<AvatarContent, AppError> {
    state.avatars.get_from_filesystem(student_id).await
}

#[utoipa::path(
    get,
    path = "/avatar",
    params(
        Pagination
    ),
    responses(
        (status = 200, description = "Page of avatars", body = [AvatarResponse]),
        (status = 400, description = "Page number or size is zero")
    ),
    tag = "Avatars"
)]
pub async fn list_avatars(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<AvatarResponse>>, AppError> {
    let avatars = state
        .avatars
        .list_page(pagination.page(), pagination.limit())
        .await?;

    Ok(Json(avatars.into_iter().map(AvatarResponse::from).collect()))
}
