//! HTTP surface of the recording vault
//!
//! This module exposes the session-gated REST API:
//! - POST /api/login, /api/logout, GET /api/check-auth - session management
//! - POST /api/upload - multipart audio upload (field `recordings`, max 10)
//! - GET /api/recordings - listing, newest first
//! - GET /uploads/:filename - raw file bytes
//! - DELETE /api/recordings/:filename - delete a recording
//! - GET /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
