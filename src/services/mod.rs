//! External collaborator module
//!
//! The session engine treats the workout/exercise backend as a remote
//! collaborator: it reads the exercise library and submits finished
//! workouts, nothing more.

pub mod remote;

// Re-export main types
pub use remote::{LibraryExercise, RemoteApi};
