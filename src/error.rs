use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Student,
    Faculty,
    Avatar,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Student => f.write_str("Student"),
            EntityKind::Faculty => f.write_str("Faculty"),
            EntityKind::Avatar => f.write_str("Avatar"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Avatars are keyed by the owning student's id.
    #[error("{}", not_found_message(.kind, .id))]
    NotFound { kind: EntityKind, id: i32 },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("There are no students to aggregate")]
    EmptyAggregate,

    #[error("Failed to process avatar")]
    AvatarProcessing(#[source] std::io::Error),

    #[error(transparent)]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("{0}")]
    InternalServerError(String),
}

fn not_found_message(kind: &EntityKind, id: &i32) -> String {
    match kind {
        EntityKind::Avatar => format!("Avatar for student with id = {} not found", id),
        _ => format!("{} with id = {} not found", kind, id),
    }
}

impl AppError {
    pub fn student_not_found(id: i32) -> Self {
        AppError::NotFound {
            kind: EntityKind::Student,
            id,
        }
    }

    pub fn faculty_not_found(id: i32) -> Self {
        AppError::NotFound {
            kind: EntityKind::Faculty,
            id,
        }
    }

    pub fn avatar_not_found(student_id: i32) -> Self {
        AppError::NotFound {
            kind: EntityKind::Avatar,
            id: student_id,
        }
    }

    /// Maps a foreign-key violation to `on_violation`; any other error stays a
    /// `DatabaseError`.
    pub fn from_fk_violation(err: sea_orm::DbErr, on_violation: impl FnOnce() -> AppError) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(detail)) => {
                tracing::warn!("Foreign key violation: {}", detail);
                on_violation()
            }
            _ => AppError::DatabaseError(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } | AppError::EmptyAggregate => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::AvatarProcessing(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::AvatarProcessing(e) => {
                tracing::error!("Avatar processing error: {}", e);
                self.to_string()
            }
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
