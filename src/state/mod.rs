//! State management module
//!
//! This module contains the draft model, the session engine, and the
//! shared application state wrapping it.

pub mod app_state;
pub mod draft;
pub mod session;

// Re-export main types
pub use app_state::AppState;
pub use draft::{
    Category, Draft, ExerciseEntry, ExerciseTemplate, SetField, SetRecord, SubmissionPayload,
};
pub use session::SessionManager;
