//! Shared application state around the session manager

use std::{
    sync::{Mutex, PoisonError},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::warn;

use crate::{
    error::SessionError,
    services::RemoteApi,
    state::draft::{Draft, ExerciseTemplate, SetField, SubmissionPayload},
    state::session::SessionManager,
};

/// Single owning handle for the session engine
///
/// The manager sits behind one mutex, so every mutation takes exclusive
/// access for its duration and the persisted keys only ever see whole
/// writes. A watch channel mirrors the running flag for the ticker task.
pub struct AppState {
    session: Mutex<SessionManager>,
    /// Remote workout/exercise API collaborator
    pub remote: RemoteApi,
    /// User the session belongs to, stamped into submissions
    pub user_id: String,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Running-flag channel driving the ticker task
    pub running_tx: watch::Sender<bool>,
    /// Keep one receiver alive to prevent channel closure
    _running_rx: watch::Receiver<bool>,
}

impl AppState {
    pub fn new(
        session: SessionManager,
        remote: RemoteApi,
        user_id: String,
        port: u16,
        host: String,
    ) -> Self {
        let (running_tx, running_rx) = watch::channel(session.draft().is_running);

        Self {
            session: Mutex::new(session),
            remote,
            user_id,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            running_tx,
            _running_rx: running_rx,
        }
    }

    /// Run one operation against the session manager
    ///
    /// Tracks the action, then mirrors the (possibly changed) running flag
    /// into the watch channel so the ticker arms or disarms.
    fn with_session<T>(&self, action: &str, op: impl FnOnce(&mut SessionManager) -> T) -> T {
        let mut session = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let result = op(&mut session);
        let running = session.draft().is_running;
        drop(session);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        if let Err(e) = self.running_tx.send(running) {
            warn!("Failed to publish running flag: {}", e);
        }

        result
    }

    /// Current draft snapshot
    pub fn draft(&self) -> Draft {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .draft()
            .clone()
    }

    /// Advance the session by one tick (ticker task only)
    pub fn tick(&self) -> Draft {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick()
    }

    pub fn toggle_timer(&self) -> Draft {
        self.with_session("toggle-timer", |s| s.toggle_global_timer())
    }

    pub fn add_exercise(&self, template: ExerciseTemplate) -> Draft {
        self.with_session("add-exercise", |s| s.add_exercise(template))
    }

    pub fn remove_exercise(&self, instance_id: u64) -> Draft {
        self.with_session("remove-exercise", |s| s.remove_exercise(instance_id))
    }

    pub fn add_set(&self, instance_id: u64) -> Result<Draft, SessionError> {
        self.with_session("add-set", |s| s.add_set(instance_id))
    }

    pub fn update_set_field(
        &self,
        instance_id: u64,
        set_index: usize,
        field: SetField,
        value: &str,
    ) -> Result<Draft, SessionError> {
        self.with_session("update-set", |s| {
            s.update_set_field(instance_id, set_index, field, value)
        })
    }

    pub fn toggle_set_timer(
        &self,
        instance_id: u64,
        set_index: usize,
    ) -> Result<Draft, SessionError> {
        self.with_session("toggle-set-timer", |s| {
            s.toggle_set_timer(instance_id, set_index)
        })
    }

    pub fn discard(&self) -> Draft {
        self.with_session("discard", |s| {
            s.discard();
            s.draft().clone()
        })
    }

    pub fn build_submission(&self, workout_name: &str) -> SubmissionPayload {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .build_submission(workout_name, &self.user_id)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, state::draft::Category, storage::MemoryStore};

    fn test_state() -> AppState {
        let clock = ManualClock::new(1_700_000_000_000);
        let session = SessionManager::load(Box::new(MemoryStore::new()), Box::new(clock));
        let remote = RemoteApi::new("http://localhost:5000".to_string(), None);
        AppState::new(
            session,
            remote,
            "user-1".to_string(),
            0,
            "127.0.0.1".to_string(),
        )
    }

    #[test]
    fn test_running_flag_mirrors_toggles() {
        let state = test_state();
        let rx = state.running_tx.subscribe();
        assert!(*rx.borrow());

        state.toggle_timer();
        assert!(!*rx.borrow());

        state.toggle_timer();
        assert!(*rx.borrow());
    }

    #[test]
    fn test_actions_are_tracked() {
        let state = test_state();
        state.add_exercise(ExerciseTemplate {
            name: "Squat".to_string(),
            muscle: "Legs".to_string(),
            category: Category::Strength,
        });

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("add-exercise"));
        assert!(time.is_some());
        assert_eq!(state.draft().exercises.len(), 1);
    }
}
