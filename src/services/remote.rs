//! Remote workout/exercise API client

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::SessionError,
    state::draft::{Category, SubmissionPayload},
};

/// One library item, as served by the backend
///
/// The engine only copies these fields into new draft entries; it never
/// writes back to the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryExercise {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub muscle: String,
    #[serde(rename = "type")]
    pub category: Category,
}

/// HTTP client for the workout backend
#[derive(Debug, Clone)]
pub struct RemoteApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteApi {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// List the user's exercise library for the add-exercise picker
    pub async fn list_exercises(
        &self,
        user_id: &str,
    ) -> Result<Vec<LibraryExercise>, SessionError> {
        let url = format!("{}/api/exercises/{}", self.base_url, user_id);
        debug!("Fetching exercise library from {}", url);

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| SessionError::LibraryUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SessionError::LibraryUnavailable(format!(
                "library request returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SessionError::LibraryUnavailable(e.to_string()))
    }

    /// Submit a finished workout document
    ///
    /// The caller keeps the draft intact until this returns Ok; the draft
    /// is only discarded after a confirmed save.
    pub async fn submit_workout(&self, payload: &SubmissionPayload) -> Result<(), SessionError> {
        let url = format!("{}/api/workouts", self.base_url);
        info!(
            "Submitting workout '{}' ({} exercises, {} min)",
            payload.name,
            payload.details.len(),
            payload.duration
        );

        let response = self
            .authorized(self.client.post(&url))
            .json(payload)
            .send()
            .await
            .map_err(|e| SessionError::SubmissionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SessionError::SubmissionFailed(format!(
                "workout submission returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
