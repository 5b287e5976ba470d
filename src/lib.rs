pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod store;
pub mod upload;

pub use catalog::RecordingEntry;
pub use config::Config;
pub use error::ApiError;
pub use http::{create_router, AppState};
pub use session::{SessionStore, SESSION_COOKIE};
pub use store::FileStore;
