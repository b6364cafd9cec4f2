//! Draft model - the in-progress workout session and its entries

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Exercise category, fixed by the library template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Strength,
    Warmup,
    Stretching,
}

impl Category {
    /// Warmup and stretching sets are timed; strength sets log weight/reps
    pub fn is_timed(self) -> bool {
        matches!(self, Category::Warmup | Category::Stretching)
    }
}

/// Library template an entry is instantiated from
///
/// The session engine only ever copies these fields; it never writes back
/// to the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    pub name: String,
    pub muscle: String,
    #[serde(rename = "type")]
    pub category: Category,
}

/// Field of a set addressed by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetField {
    Weight,
    Reps,
    Seconds,
}

/// One logged unit of work within an entry
///
/// Weight and reps are parsed into numbers at the update boundary rather
/// than carried as free-form text; an empty input clears the field.
///
/// Untagged, so the wire shape matches the backend (`{"time": N}` or
/// `{"weight": W, "reps": R}`). `Timed` must stay first: its `time` key is
/// required, while `Strength`'s optional fields would swallow any object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SetRecord {
    Timed {
        #[serde(rename = "time")]
        seconds: u64,
    },
    Strength {
        weight: Option<f64>,
        reps: Option<u32>,
    },
}

impl SetRecord {
    /// Default set for a freshly added entry or an appended set
    pub fn default_for(category: Category) -> Self {
        if category.is_timed() {
            SetRecord::Timed { seconds: 0 }
        } else {
            SetRecord::Strength {
                weight: None,
                reps: None,
            }
        }
    }

    /// Apply a single field update, parsing the raw value
    pub fn apply(&mut self, field: SetField, value: &str) -> Result<(), SessionError> {
        let invalid = || SessionError::InvalidValue {
            field,
            value: value.to_string(),
        };
        let trimmed = value.trim();

        match (self, field) {
            (SetRecord::Strength { weight, .. }, SetField::Weight) => {
                *weight = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse::<f64>().map_err(|_| invalid())?)
                };
                Ok(())
            }
            (SetRecord::Strength { reps, .. }, SetField::Reps) => {
                *reps = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse::<u32>().map_err(|_| invalid())?)
                };
                Ok(())
            }
            (SetRecord::Timed { seconds }, SetField::Seconds) => {
                *seconds = trimmed.parse::<u64>().map_err(|_| invalid())?;
                Ok(())
            }
            // Field does not exist on this kind of set
            _ => Err(invalid()),
        }
    }
}

/// One exercise instance added to the draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseEntry {
    /// Unique within the draft's lifetime, distinct from the library id
    pub instance_id: u64,
    pub name: String,
    pub muscle: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub sets: Vec<SetRecord>,
    /// True only for timed entries with an actively counting set
    pub is_running: bool,
    /// Which set accumulates time while `is_running`
    pub active_set_index: usize,
}

impl ExerciseEntry {
    pub fn from_template(template: ExerciseTemplate, instance_id: u64) -> Self {
        let default_set = SetRecord::default_for(template.category);
        Self {
            instance_id,
            name: template.name,
            muscle: template.muscle,
            category: template.category,
            sets: vec![default_set],
            is_running: false,
            active_set_index: 0,
        }
    }
}

/// The in-progress, not-yet-saved workout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub exercises: Vec<ExerciseEntry>,
    /// Cumulative active (non-paused) duration, always recomputed from the
    /// anchor timestamp, never incremented
    pub elapsed_seconds: u64,
    pub is_running: bool,
    /// Anchor timestamp; present iff `is_running`
    pub last_resumed_at_millis: Option<i64>,
    /// Snapshot of elapsed seconds at the most recent resume
    pub base_seconds: u64,
}

impl Draft {
    /// Fresh session, running immediately and anchored at `now`
    pub fn fresh(now_millis: i64) -> Self {
        Self {
            exercises: Vec::new(),
            elapsed_seconds: 0,
            is_running: true,
            last_resumed_at_millis: Some(now_millis),
            base_seconds: 0,
        }
    }

    pub fn find_entry_mut(&mut self, instance_id: u64) -> Option<&mut ExerciseEntry> {
        self.exercises
            .iter_mut()
            .find(|e| e.instance_id == instance_id)
    }

    /// Elapsed time as mm:ss for display surfaces
    pub fn formatted_elapsed(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.elapsed_seconds / 60,
            self.elapsed_seconds % 60
        )
    }

    /// Shape the draft into the remote workout document
    ///
    /// A blank name falls back to "Daily Session"; muscles are
    /// de-duplicated; per-entry bookkeeping fields are dropped.
    pub fn build_submission(&self, workout_name: &str, user_id: &str) -> SubmissionPayload {
        let name = workout_name.trim();
        let name = if name.is_empty() {
            "Daily Session".to_string()
        } else {
            name.to_string()
        };

        let mut muscles: Vec<String> = Vec::new();
        for entry in &self.exercises {
            if !muscles.contains(&entry.muscle) {
                muscles.push(entry.muscle.clone());
            }
        }

        SubmissionPayload {
            user_id: user_id.to_string(),
            name,
            duration: self.elapsed_seconds / 60,
            muscles,
            details: self
                .exercises
                .iter()
                .map(|entry| SubmissionDetail {
                    name: entry.name.clone(),
                    category: entry.category,
                    muscle: entry.muscle.clone(),
                    sets: entry.sets.clone(),
                })
                .collect(),
        }
    }
}

/// Finalized workout document accepted by the remote API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub name: String,
    /// Whole minutes
    pub duration: u64,
    pub muscles: Vec<String>,
    pub details: Vec<SubmissionDetail>,
}

/// Projection of an entry without its draft bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionDetail {
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub muscle: String,
    pub sets: Vec<SetRecord>,
}
