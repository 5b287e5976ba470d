use super::state::AppState;
use crate::catalog::{self, RecordingEntry};
use crate::error::ApiError;
use crate::session::SESSION_COOKIE;
use crate::upload::{self, derive_filename};
use axum::{
    extract::{Multipart, Path, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CheckAuthResponse {
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadedFileResponse {
    pub message: String,
    pub filename: String,
    #[serde(rename = "originalname")]
    pub original_name: String,
    pub size: usize,
    pub mimetype: String,
    pub path: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub files: Vec<UploadedFileResponse>,
    pub total: usize,
}

// ============================================================================
// Auth gate
// ============================================================================

/// Middleware guarding the protected routes: short-circuits with
/// `Unauthorized` unless the request carries a session cookie pointing at an
/// authenticated session. Runs before any body extraction.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match jar.get(SESSION_COOKIE) {
        Some(cookie) if state.sessions.is_authenticated(cookie.value()).await => {
            Ok(next.run(request).await)
        }
        _ => Err(ApiError::Unauthorized),
    }
}

fn session_cookie(id: String) -> Cookie<'static> {
    // Secure is off in this configuration; flip it behind TLS.
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .secure(false)
        .build()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/login
/// Authenticate against the configured credential pair.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<StatusResponse>), ApiError> {
    let auth = &state.config.auth;
    if req.username != auth.username || req.password != auth.password {
        return Err(ApiError::InvalidCredentials);
    }

    let id = state.sessions.create_authenticated().await;
    info!("login successful for {}", req.username);

    Ok((
        jar.add(session_cookie(id)),
        Json(StatusResponse {
            success: true,
            message: "login successful".to_string(),
        }),
    ))
}

/// POST /api/logout
/// Destroy the current session, if any.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<StatusResponse>), ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state
            .sessions
            .destroy(cookie.value())
            .await
            .map_err(|e| ApiError::Internal(format!("logout failed: {}", e)))?;
    }

    Ok((
        jar.remove(Cookie::build(SESSION_COOKIE).path("/").build()),
        Json(StatusResponse {
            success: true,
            message: "logout successful".to_string(),
        }),
    ))
}

/// GET /api/check-auth
/// Report whether the current session is authenticated. Never fails.
pub async fn check_auth(State(state): State<AppState>, jar: CookieJar) -> Json<CheckAuthResponse> {
    let is_authenticated = match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.sessions.is_authenticated(cookie.value()).await,
        None => false,
    };

    Json(CheckAuthResponse { is_authenticated })
}

/// POST /api/upload
/// Accept up to 10 audio files under the `recordings` multipart field.
/// Validation is all-or-nothing: one bad part rejects the whole request and
/// nothing is written.
pub async fn upload_recordings(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let parts = upload::collect_parts(multipart).await?;
    if parts.is_empty() {
        return Err(ApiError::NoFilesProvided);
    }

    let now = Utc::now();
    let mut files = Vec::with_capacity(parts.len());

    for part in parts {
        let filename = derive_filename(&part.original_name, now);
        if state.store.resolve(&filename).is_none() {
            return Err(ApiError::InvalidFilename);
        }

        let path = state.store.save(&filename, &part.data).await.map_err(|e| {
            error!("failed to store upload {}: {}", filename, e);
            ApiError::Internal("failed to store upload".to_string())
        })?;

        files.push(UploadedFileResponse {
            message: "file uploaded successfully".to_string(),
            filename,
            original_name: part.original_name,
            size: part.data.len(),
            mimetype: part.mimetype,
            path: path.display().to_string(),
            uploaded_at: now,
        });
    }

    info!("uploaded {} recording(s)", files.len());

    Ok(Json(UploadResponse {
        success: true,
        total: files.len(),
        files,
    }))
}

/// GET /api/recordings
/// List all recordings, newest first.
pub async fn list_recordings(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecordingEntry>>, ApiError> {
    let entries = catalog::list(&state.store).await.map_err(|e| {
        error!("failed to list recordings: {}", e);
        ApiError::Internal("failed to list recordings".to_string())
    })?;

    Ok(Json(entries))
}

/// GET /uploads/:filename
/// Stream a stored recording's raw bytes.
pub async fn fetch_recording(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let path = state.store.resolve(&filename).ok_or(ApiError::InvalidFilename)?;
    let bytes = state.store.read(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::NotFound
        } else {
            error!("failed to read {}: {}", filename, e);
            ApiError::Internal("failed to read recording".to_string())
        }
    })?;

    let content_type = catalog::content_type_for(&filename);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

/// DELETE /api/recordings/:filename
/// Remove a recording from the store.
pub async fn delete_recording(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let path = state.store.resolve(&filename).ok_or(ApiError::InvalidFilename)?;
    state.store.delete(&path).await.map_err(|e| {
        error!("failed to delete {}: {}", filename, e);
        ApiError::DeleteFailed
    })?;

    info!("deleted recording {}", filename);
    Ok(Json(StatusResponse {
        success: true,
        message: "recording deleted".to_string(),
    }))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
