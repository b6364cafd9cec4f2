//! Gym Session - A crash-resilient workout session timer and draft manager
//!
//! This library maintains an in-progress workout draft with wall-clock
//! accurate elapsed time that survives process restarts, backed by a
//! durable key-value store and exposed over an HTTP surface.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::SessionError;
pub use state::{AppState, Draft, SessionManager};
pub use utils::signals::shutdown_signal;
