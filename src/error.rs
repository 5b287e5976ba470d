//! HTTP error surface.
//!
//! Every failure is returned directly to the caller as a JSON body with an
//! appropriate status code; nothing is retried. Server-side failures are
//! logged here so handlers can simply propagate with `?`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthorized,

    #[error("invalid username or password")]
    InvalidCredentials,

    /// Part had a MIME type outside the audio allow-list.
    #[error("only audio files may be uploaded (mp3, wav, webm, amr, m4a), got {0}")]
    InvalidFileType(String),

    #[error("file {0} exceeds the 50 MiB limit")]
    FileTooLarge(String),

    #[error("no files were uploaded")]
    NoFilesProvided,

    #[error("at most 10 files may be uploaded per request")]
    TooManyFiles,

    #[error("unexpected multipart field {0}")]
    UnexpectedField(String),

    /// Filename failed the containment check (path separators, `..`, NUL).
    #[error("invalid filename")]
    InvalidFilename,

    #[error("file not found")]
    NotFound,

    #[error("failed to delete recording")]
    DeleteFailed,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::InvalidFileType(_)
            | ApiError::FileTooLarge(_)
            | ApiError::NoFilesProvided
            | ApiError::TooManyFiles
            | ApiError::UnexpectedField(_)
            | ApiError::InvalidFilename => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::DeleteFailed | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!("{}", message);
        } else {
            warn!("{}", message);
        }

        // Login and delete failures carry an explicit success flag, matching
        // the shape of their success responses.
        let body = match self {
            ApiError::InvalidCredentials | ApiError::DeleteFailed => {
                json!({ "success": false, "message": message })
            }
            _ => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NoFilesProvided.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::DeleteFailed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
