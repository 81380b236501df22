// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod contact_log;
pub mod error;
pub mod lockmenu;
pub mod moderation;
pub mod router;
pub mod services;
pub mod session;

// ---- Re-exports for stable public API ----
pub use crate::api::AppState;
pub use crate::error::{MenuError, TurnError};
pub use crate::services::Services;
pub use crate::session::SessionState;
