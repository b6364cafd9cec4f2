//! Session Timer & Draft State Manager
//!
//! Owns the in-progress workout draft and keeps it crash-resilient: the
//! durable key-value store is the single source of truth, and elapsed time
//! is always recomputed from the last-resume anchor so seconds spent
//! suspended, backgrounded, or restarted are never lost.

use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    error::SessionError,
    state::draft::{Draft, ExerciseEntry, ExerciseTemplate, SetField, SetRecord, SubmissionPayload},
    storage::KvStore,
};

/// Persisted keys belonging to the draft
pub const KEY_EXERCISES: &str = "session.exercises";
pub const KEY_ELAPSED_SECONDS: &str = "session.elapsed_seconds";
pub const KEY_IS_RUNNING: &str = "session.is_running";
pub const KEY_LAST_RESUMED_AT: &str = "session.last_resumed_at_millis";
pub const KEY_BASE_SECONDS: &str = "session.base_seconds";

const DRAFT_KEYS: [&str; 5] = [
    KEY_EXERCISES,
    KEY_ELAPSED_SECONDS,
    KEY_IS_RUNNING,
    KEY_LAST_RESUMED_AT,
    KEY_BASE_SECONDS,
];

/// Whole seconds between the anchor and `now`, clamped at zero
fn seconds_since(anchor_millis: i64, now_millis: i64) -> u64 {
    ((now_millis - anchor_millis).max(0) / 1000) as u64
}

/// The active-session engine
///
/// All mutation goes through `&mut self`; the surrounding `AppState` holds
/// exactly one manager behind a mutex, which gives the single-writer
/// discipline the persisted keys rely on.
pub struct SessionManager {
    store: Box<dyn KvStore>,
    clock: Box<dyn Clock>,
    draft: Draft,
    next_instance_id: u64,
}

impl SessionManager {
    /// Reconstruct the draft from persisted keys
    ///
    /// A missing or unreadable store means a fresh session, which starts
    /// running immediately. If the persisted draft was running, elapsed
    /// seconds are re-derived from the anchor right away so time spent
    /// while the process was down is counted.
    pub fn load(store: Box<dyn KvStore>, clock: Box<dyn Clock>) -> Self {
        let now = clock.now_millis();

        let exercises: Vec<ExerciseEntry> = read_key(store.as_ref(), KEY_EXERCISES)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(entries) => Some(entries),
                Err(e) => {
                    warn!("Discarding unparseable persisted exercises: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        let persisted_elapsed: u64 = read_parsed(store.as_ref(), KEY_ELAPSED_SECONDS).unwrap_or(0);
        let is_running: bool = read_parsed(store.as_ref(), KEY_IS_RUNNING).unwrap_or(true);
        let persisted_base: u64 =
            read_parsed(store.as_ref(), KEY_BASE_SECONDS).unwrap_or(persisted_elapsed);
        let persisted_anchor: Option<i64> = read_parsed(store.as_ref(), KEY_LAST_RESUMED_AT);

        let draft = if is_running {
            match persisted_anchor {
                Some(anchor) => {
                    // The central contract: never trust the stale elapsed
                    // value while running, recompute from the anchor.
                    let elapsed = persisted_base + seconds_since(anchor, now);
                    Draft {
                        exercises,
                        elapsed_seconds: elapsed,
                        is_running: true,
                        last_resumed_at_millis: Some(anchor),
                        base_seconds: persisted_base,
                    }
                }
                None => {
                    // Anchor lost (fresh session, or partial persistence):
                    // re-anchor at now, continuing from the last elapsed.
                    Draft {
                        exercises,
                        elapsed_seconds: persisted_elapsed,
                        is_running: true,
                        last_resumed_at_millis: Some(now),
                        base_seconds: persisted_elapsed,
                    }
                }
            }
        } else {
            Draft {
                exercises,
                elapsed_seconds: persisted_elapsed,
                is_running: false,
                last_resumed_at_millis: None,
                base_seconds: persisted_elapsed,
            }
        };

        let mut next_instance_id = now.max(1) as u64;
        for entry in &draft.exercises {
            next_instance_id = next_instance_id.max(entry.instance_id + 1);
        }

        info!(
            "Session draft loaded: {} exercises, {}s elapsed, running={}",
            draft.exercises.len(),
            draft.elapsed_seconds,
            draft.is_running
        );

        Self {
            store,
            clock,
            draft,
            next_instance_id,
        }
    }

    /// Current draft snapshot
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Advance the session by one scheduler tick
    ///
    /// Recomputes global elapsed seconds from the anchor and adds exactly
    /// one second to every actively timed set, then persists the draft.
    /// A tick while paused changes nothing.
    pub fn tick(&mut self) -> Draft {
        if !self.draft.is_running {
            return self.draft.clone();
        }
        let now = self.clock.now_millis();

        if let Some(anchor) = self.draft.last_resumed_at_millis {
            self.draft.elapsed_seconds = self.draft.base_seconds + seconds_since(anchor, now);
        }

        for entry in &mut self.draft.exercises {
            if entry.is_running && entry.category.is_timed() {
                if let Some(SetRecord::Timed { seconds }) =
                    entry.sets.get_mut(entry.active_set_index)
                {
                    *seconds += 1;
                }
            }
        }

        self.persist();
        self.draft.clone()
    }

    /// Flip the global timer between running and paused
    ///
    /// Pausing freezes the base snapshot and drops the anchor; resuming
    /// re-anchors at now. Elapsed seconds are never written here, they are
    /// derived by `tick` and `load`.
    pub fn toggle_global_timer(&mut self) -> Draft {
        if self.draft.is_running {
            self.draft.base_seconds = self.draft.elapsed_seconds;
            self.draft.last_resumed_at_millis = None;
            self.draft.is_running = false;
            info!(
                "Global timer paused at {}s",
                self.draft.elapsed_seconds
            );
        } else {
            let now = self.clock.now_millis();
            self.draft.last_resumed_at_millis = Some(now);
            self.draft.is_running = true;
            info!(
                "Global timer resumed from {}s",
                self.draft.base_seconds
            );
        }
        self.persist();
        self.draft.clone()
    }

    /// Append a new entry instantiated from a library template
    pub fn add_exercise(&mut self, template: ExerciseTemplate) -> Draft {
        let instance_id = self.next_instance_id;
        self.next_instance_id += 1;

        info!(
            "Adding exercise '{}' ({:?}) as instance {}",
            template.name, template.category, instance_id
        );
        self.draft
            .exercises
            .push(ExerciseEntry::from_template(template, instance_id));
        self.persist();
        self.draft.clone()
    }

    /// Delete the matching entry; absent ids are a no-op, not an error
    pub fn remove_exercise(&mut self, instance_id: u64) -> Draft {
        let before = self.draft.exercises.len();
        self.draft
            .exercises
            .retain(|e| e.instance_id != instance_id);
        if self.draft.exercises.len() == before {
            debug!("Remove for unknown instance {} ignored", instance_id);
        }
        self.persist();
        self.draft.clone()
    }

    /// Append a category-appropriate default set to an entry
    pub fn add_set(&mut self, instance_id: u64) -> Result<Draft, SessionError> {
        let entry = self
            .draft
            .find_entry_mut(instance_id)
            .ok_or(SessionError::NotFound(instance_id))?;
        entry.sets.push(SetRecord::default_for(entry.category));
        self.persist();
        Ok(self.draft.clone())
    }

    /// Update a single field of one set, parsing the raw value
    pub fn update_set_field(
        &mut self,
        instance_id: u64,
        set_index: usize,
        field: SetField,
        value: &str,
    ) -> Result<Draft, SessionError> {
        let entry = self
            .draft
            .find_entry_mut(instance_id)
            .ok_or(SessionError::NotFound(instance_id))?;
        let set = entry
            .sets
            .get_mut(set_index)
            .ok_or(SessionError::IndexOutOfRange {
                instance_id,
                index: set_index,
            })?;
        set.apply(field, value)?;
        self.persist();
        Ok(self.draft.clone())
    }

    /// Toggle the per-set timer of an entry
    ///
    /// Accepted but ignored while the global timer is paused, since no
    /// ticking would advance the set anyway. Toggling off keeps the time
    /// the set already accumulated.
    pub fn toggle_set_timer(
        &mut self,
        instance_id: u64,
        set_index: usize,
    ) -> Result<Draft, SessionError> {
        if !self.draft.is_running {
            debug!(
                "Set timer toggle for instance {} ignored while paused",
                instance_id
            );
            return Ok(self.draft.clone());
        }

        let entry = self
            .draft
            .find_entry_mut(instance_id)
            .ok_or(SessionError::NotFound(instance_id))?;
        if set_index >= entry.sets.len() {
            return Err(SessionError::IndexOutOfRange {
                instance_id,
                index: set_index,
            });
        }

        entry.is_running = !entry.is_running;
        entry.active_set_index = set_index;
        self.persist();
        Ok(self.draft.clone())
    }

    /// Clear every persisted draft key and start over
    ///
    /// Irreversible. The fresh session starts running immediately, same as
    /// a cold start with no persisted keys.
    pub fn discard(&mut self) {
        info!("Discarding session draft");
        for key in DRAFT_KEYS {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to clear persisted key {}: {}", key, e);
            }
        }
        let now = self.clock.now_millis();
        self.draft = Draft::fresh(now);
        self.next_instance_id = self.next_instance_id.max(now.max(1) as u64);
    }

    /// Shape the current draft into the remote workout document
    ///
    /// Does not call the remote API and does not clear the draft; the
    /// caller saves first and discards only after confirmed success.
    pub fn build_submission(&self, workout_name: &str, user_id: &str) -> SubmissionPayload {
        self.draft.build_submission(workout_name, user_id)
    }

    /// Write the full draft back to the store
    ///
    /// Best-effort durability: a failed write is logged and the in-memory
    /// draft stays authoritative for this process.
    fn persist(&mut self) {
        match serde_json::to_string(&self.draft.exercises) {
            Ok(json) => self.put_key(KEY_EXERCISES, &json),
            Err(e) => warn!("Failed to serialize draft exercises: {}", e),
        }
        let elapsed = self.draft.elapsed_seconds.to_string();
        self.put_key(KEY_ELAPSED_SECONDS, &elapsed);
        let running = self.draft.is_running.to_string();
        self.put_key(KEY_IS_RUNNING, &running);
        let base = self.draft.base_seconds.to_string();
        self.put_key(KEY_BASE_SECONDS, &base);
        match self.draft.last_resumed_at_millis {
            Some(anchor) => self.put_key(KEY_LAST_RESUMED_AT, &anchor.to_string()),
            None => {
                if let Err(e) = self.store.remove(KEY_LAST_RESUMED_AT) {
                    warn!("Failed to clear {}: {}", KEY_LAST_RESUMED_AT, e);
                }
            }
        }
    }

    fn put_key(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.put(key, value) {
            warn!("Persist failed for {}: {}", key, e);
        }
    }
}

/// Read one key, degrading a store failure to "absent"
fn read_key(store: &dyn KvStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to read {}, starting fresh: {}", key, e);
            None
        }
    }
}

/// Read and parse one key, degrading parse failures to "absent"
fn read_parsed<T: std::str::FromStr>(store: &dyn KvStore, key: &str) -> Option<T> {
    read_key(store, key).and_then(|raw| raw.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        clock::ManualClock,
        error::StoreError,
        state::draft::Category,
        storage::MemoryStore,
    };

    /// Store handle the test keeps after the manager takes ownership
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<MemoryStore>>);

    impl SharedStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key).unwrap()
        }

        fn put(&self, key: &str, value: &str) {
            self.0.lock().unwrap().put(key, value).unwrap();
        }
    }

    impl KvStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.lock().unwrap().get(key)
        }

        fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.lock().unwrap().put(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.0.lock().unwrap().remove(key)
        }
    }

    /// Store that errors on every access, for degraded-persistence tests
    struct BrokenStore;

    impl KvStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::other("disk on fire"),
            })
        }

        fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            let _ = value;
            Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::other("disk on fire"),
            })
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            Err(StoreError::Io {
                key: key.to_string(),
                source: std::io::Error::other("disk on fire"),
            })
        }
    }

    const T0: i64 = 1_700_000_000_000;

    fn manager_at(clock: &ManualClock, store: &SharedStore) -> SessionManager {
        SessionManager::load(Box::new(store.clone()), Box::new(clock.clone()))
    }

    fn stretching() -> ExerciseTemplate {
        ExerciseTemplate {
            name: "Hamstring Stretch".to_string(),
            muscle: "Legs".to_string(),
            category: Category::Stretching,
        }
    }

    fn bench() -> ExerciseTemplate {
        ExerciseTemplate {
            name: "Bench Press".to_string(),
            muscle: "Chest".to_string(),
            category: Category::Strength,
        }
    }

    #[test]
    fn test_cold_start_is_fresh_and_running() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let manager = manager_at(&clock, &store);

        let draft = manager.draft();
        assert!(draft.exercises.is_empty());
        assert_eq!(draft.elapsed_seconds, 0);
        assert!(draft.is_running);
        assert_eq!(draft.last_resumed_at_millis, Some(T0));
    }

    #[test]
    fn test_resume_then_tick_counts_from_anchor() {
        // Paused at 120s, resumed, ticked 5s later: exactly 125.
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        store.put(KEY_IS_RUNNING, "false");
        store.put(KEY_ELAPSED_SECONDS, "120");

        let mut manager = manager_at(&clock, &store);
        assert_eq!(manager.draft().elapsed_seconds, 120);
        assert!(!manager.draft().is_running);

        let draft = manager.toggle_global_timer();
        assert!(draft.is_running);
        assert_eq!(draft.last_resumed_at_millis, Some(T0));

        clock.advance(5_000);
        let draft = manager.tick();
        assert_eq!(draft.elapsed_seconds, 125);
    }

    #[test]
    fn test_reload_while_running_rederives_elapsed() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        store.put(KEY_IS_RUNNING, "true");
        store.put(KEY_BASE_SECONDS, "50");
        store.put(KEY_ELAPSED_SECONDS, "52");
        store.put(KEY_LAST_RESUMED_AT, &(T0 - 10_000).to_string());

        let manager = manager_at(&clock, &store);
        // 50 base + 10 suspended seconds, not the stale 52.
        assert_eq!(manager.draft().elapsed_seconds, 60);
        assert!(manager.draft().is_running);
        assert_eq!(manager.draft().last_resumed_at_millis, Some(T0 - 10_000));
    }

    #[test]
    fn test_reload_while_running_without_anchor_reanchors_at_now() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        store.put(KEY_IS_RUNNING, "true");
        store.put(KEY_ELAPSED_SECONDS, "80");

        let mut manager = manager_at(&clock, &store);
        assert_eq!(manager.draft().elapsed_seconds, 80);
        assert_eq!(manager.draft().last_resumed_at_millis, Some(T0));

        clock.advance(3_000);
        assert_eq!(manager.tick().elapsed_seconds, 83);
    }

    #[test]
    fn test_pause_resume_with_no_time_passing_is_lossless() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        clock.advance(30_000);
        assert_eq!(manager.tick().elapsed_seconds, 30);

        let paused = manager.toggle_global_timer();
        assert!(!paused.is_running);
        assert_eq!(paused.last_resumed_at_millis, None);
        assert_eq!(paused.base_seconds, 30);

        let resumed = manager.toggle_global_timer();
        assert!(resumed.is_running);
        assert_eq!(resumed.elapsed_seconds, 30);

        let ticked = manager.tick();
        assert_eq!(ticked.elapsed_seconds, 30);
    }

    #[test]
    fn test_paused_gap_does_not_count() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        clock.advance(10_000);
        manager.tick();
        manager.toggle_global_timer();

        // A long break while paused.
        clock.advance(600_000);
        assert_eq!(manager.tick().elapsed_seconds, 10);

        manager.toggle_global_timer();
        clock.advance(5_000);
        assert_eq!(manager.tick().elapsed_seconds, 15);
    }

    #[test]
    fn test_only_the_active_set_accumulates() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        let draft = manager.add_exercise(stretching());
        let id = draft.exercises[0].instance_id;
        manager.add_set(id).unwrap();
        manager.toggle_set_timer(id, 1).unwrap();

        for _ in 0..3 {
            clock.advance(1_000);
            manager.tick();
        }

        let entry = &manager.draft().exercises[0];
        assert_eq!(entry.sets[0], SetRecord::Timed { seconds: 0 });
        assert_eq!(entry.sets[1], SetRecord::Timed { seconds: 3 });
        assert_eq!(entry.active_set_index, 1);
    }

    #[test]
    fn test_entries_time_independently() {
        // Two timed entries may both run at once; neither excludes the other.
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        let first = manager.add_exercise(stretching()).exercises[0].instance_id;
        let second = manager
            .add_exercise(ExerciseTemplate {
                name: "Jumping Jacks".to_string(),
                muscle: "Full Body".to_string(),
                category: Category::Warmup,
            })
            .exercises[1]
            .instance_id;

        manager.toggle_set_timer(first, 0).unwrap();
        manager.toggle_set_timer(second, 0).unwrap();

        clock.advance(2_000);
        manager.tick();
        clock.advance(1_000);
        let draft = manager.tick();

        assert_eq!(draft.exercises[0].sets[0], SetRecord::Timed { seconds: 2 });
        assert_eq!(draft.exercises[1].sets[0], SetRecord::Timed { seconds: 2 });
    }

    #[test]
    fn test_strength_entries_never_accumulate_time() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        let id = manager.add_exercise(bench()).exercises[0].instance_id;
        manager.toggle_set_timer(id, 0).unwrap();

        clock.advance(2_000);
        let draft = manager.tick();
        assert_eq!(
            draft.exercises[0].sets[0],
            SetRecord::Strength {
                weight: None,
                reps: None
            }
        );
    }

    #[test]
    fn test_set_timer_toggle_is_ignored_while_paused() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        let id = manager.add_exercise(stretching()).exercises[0].instance_id;
        manager.toggle_global_timer();

        let draft = manager.toggle_set_timer(id, 0).unwrap();
        assert!(!draft.exercises[0].is_running);
    }

    #[test]
    fn test_set_timer_toggle_off_keeps_accumulated_time() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        let id = manager.add_exercise(stretching()).exercises[0].instance_id;
        manager.toggle_set_timer(id, 0).unwrap();
        clock.advance(4_000);
        manager.tick();
        clock.advance(1_000);
        manager.tick();

        let draft = manager.toggle_set_timer(id, 0).unwrap();
        assert!(!draft.exercises[0].is_running);
        assert_eq!(draft.exercises[0].sets[0], SetRecord::Timed { seconds: 2 });

        clock.advance(3_000);
        let draft = manager.tick();
        assert_eq!(draft.exercises[0].sets[0], SetRecord::Timed { seconds: 2 });
    }

    #[test]
    fn test_discard_clears_every_persisted_key() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        manager.add_exercise(bench());
        clock.advance(5_000);
        manager.tick();
        assert!(store.get(KEY_EXERCISES).is_some());

        manager.discard();
        for key in DRAFT_KEYS {
            assert_eq!(store.get(key), None, "key {} survived discard", key);
        }

        clock.advance(1_000);
        let reloaded = manager_at(&clock, &store);
        assert!(reloaded.draft().exercises.is_empty());
        assert_eq!(reloaded.draft().elapsed_seconds, 0);
        assert!(reloaded.draft().is_running);
    }

    #[test]
    fn test_mutations_persist_and_survive_reload() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        let id = manager.add_exercise(bench()).exercises[0].instance_id;
        manager.add_set(id).unwrap();
        manager
            .update_set_field(id, 1, SetField::Weight, "72.5")
            .unwrap();
        let timed_id = manager.add_exercise(stretching()).exercises[1].instance_id;
        manager.toggle_set_timer(timed_id, 0).unwrap();
        for _ in 0..7 {
            clock.advance(1_000);
            manager.tick();
        }

        assert_eq!(store.get(KEY_ELAPSED_SECONDS).as_deref(), Some("7"));
        assert_eq!(store.get(KEY_IS_RUNNING).as_deref(), Some("true"));

        clock.advance(3_000);
        let reloaded = manager_at(&clock, &store);
        let entry = &reloaded.draft().exercises[0];
        assert_eq!(entry.instance_id, id);
        assert_eq!(
            entry.sets[1],
            SetRecord::Strength {
                weight: Some(72.5),
                reps: None
            }
        );
        // The timed set keeps its accumulated seconds across the reload,
        // it does not come back as a blank strength set.
        let timed_entry = &reloaded.draft().exercises[1];
        assert_eq!(timed_entry.instance_id, timed_id);
        assert_eq!(timed_entry.sets[0], SetRecord::Timed { seconds: 7 });
        assert!(timed_entry.is_running);
        // 7s ticked + 3s while "down", re-derived on load.
        assert_eq!(reloaded.draft().elapsed_seconds, 10);
    }

    #[test]
    fn test_pause_clears_anchor_key_in_store() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        manager.tick();
        assert!(store.get(KEY_LAST_RESUMED_AT).is_some());

        manager.toggle_global_timer();
        assert_eq!(store.get(KEY_LAST_RESUMED_AT), None);
        assert_eq!(store.get(KEY_IS_RUNNING).as_deref(), Some("false"));
    }

    #[test]
    fn test_instance_ids_are_unique_and_increasing() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        let a = manager.add_exercise(bench()).exercises[0].instance_id;
        let b = manager.add_exercise(stretching()).exercises[1].instance_id;
        assert!(b > a);

        // Reload must not re-issue an existing id.
        let mut reloaded = manager_at(&clock, &store);
        let draft = reloaded.add_exercise(bench());
        let c = draft.exercises[2].instance_id;
        assert!(c > b);
    }

    #[test]
    fn test_remove_is_noop_for_unknown_instance() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        manager.add_exercise(bench());
        let draft = manager.remove_exercise(424242);
        assert_eq!(draft.exercises.len(), 1);
    }

    #[test]
    fn test_missing_entry_and_bad_index_are_reported() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        assert!(matches!(
            manager.add_set(5),
            Err(SessionError::NotFound(5))
        ));

        let id = manager.add_exercise(bench()).exercises[0].instance_id;
        assert!(matches!(
            manager.update_set_field(id, 3, SetField::Reps, "5"),
            Err(SessionError::IndexOutOfRange { index: 3, .. })
        ));
        assert!(matches!(
            manager.toggle_set_timer(id, 1),
            Err(SessionError::IndexOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_broken_store_reads_mean_fresh_draft() {
        let clock = ManualClock::new(T0);
        let manager = SessionManager::load(Box::new(BrokenStore), Box::new(clock));

        assert!(manager.draft().exercises.is_empty());
        assert!(manager.draft().is_running);
        assert_eq!(manager.draft().elapsed_seconds, 0);
    }

    #[test]
    fn test_broken_store_writes_keep_session_alive() {
        let clock = ManualClock::new(T0);
        let mut manager =
            SessionManager::load(Box::new(BrokenStore), Box::new(clock.clone()));

        let draft = manager.add_exercise(stretching());
        assert_eq!(draft.exercises.len(), 1);

        clock.advance(2_000);
        assert_eq!(manager.tick().elapsed_seconds, 2);
        manager.discard();
        assert!(manager.draft().exercises.is_empty());
    }

    #[test]
    fn test_build_submission_reflects_current_draft() {
        let clock = ManualClock::new(T0);
        let store = SharedStore::default();
        let mut manager = manager_at(&clock, &store);

        manager.add_exercise(bench());
        clock.advance(185_000);
        manager.tick();

        let payload = manager.build_submission("", "user-1");
        assert_eq!(payload.name, "Daily Session");
        assert_eq!(payload.duration, 3);
        assert_eq!(payload.muscles, vec!["Chest".to_string()]);
    }
}
