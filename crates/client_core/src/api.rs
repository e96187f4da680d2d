//! HTTP seam to the scoreboard backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{ApiMessage, NewParticipant, Participant, ParticipantId, ScoreEntry},
    error::ScoreboardError,
};
use serde::Deserialize;
use tracing::debug;

const SCOREBOARD_PATH: &str = "/api/scoreboard";
const UPDATE_RANKS_PATH: &str = "/api/update-ranks";
const PARTICIPANT_PATH: &str = "/api/participant";

/// The remote score source, rank trigger and participant registry.
#[async_trait]
pub trait ScoreboardApi: Send + Sync {
    async fn fetch_scoreboard(&self) -> Result<Vec<ScoreEntry>, ScoreboardError>;
    async fn trigger_recompute(&self) -> Result<(), ScoreboardError>;
    async fn list_participants(&self) -> Result<Vec<Participant>, ScoreboardError>;
    async fn register_participant(
        &self,
        request: &NewParticipant,
    ) -> Result<Participant, ScoreboardError>;
    async fn delete_participant(&self, id: ParticipantId) -> Result<(), ScoreboardError>;
}

pub struct HttpScoreboardApi {
    http: Client,
    base_url: String,
}

impl HttpScoreboardApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ScoreboardError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn transport(err: reqwest::Error) -> ScoreboardError {
    ScoreboardError::Network(err.to_string())
}

fn status_error(res: &Response) -> ScoreboardError {
    ScoreboardError::Network(format!("HTTP error! status: {}", res.status()))
}

/// Reads are all-or-nothing: any non-2xx is a network failure.
async fn read_json<T: serde::de::DeserializeOwned>(res: Response) -> Result<T, ScoreboardError> {
    if !res.status().is_success() {
        return Err(status_error(&res));
    }
    res.json().await.map_err(transport)
}

/// Create acknowledgement; only the id is guaranteed, the rest falls back to
/// what was submitted.
#[derive(Debug, Deserialize)]
struct RegistrationAck {
    id: ParticipantId,
    #[serde(default)]
    participant: Option<String>,
    #[serde(default)]
    project: Option<String>,
}

impl RegistrationAck {
    fn into_participant(self, request: &NewParticipant) -> Participant {
        Participant {
            id: self.id,
            participant: self
                .participant
                .unwrap_or_else(|| request.participant.clone()),
            project: self.project.unwrap_or_else(|| request.project.clone()),
        }
    }
}

/// Mutations carry the server's `{message}` back to the user when there is one.
async fn rejection(res: Response) -> ScoreboardError {
    let status = res.status();
    match res.json::<ApiMessage>().await {
        Ok(body) => ScoreboardError::Conflict {
            status: status.as_u16(),
            message: body.message,
        },
        Err(_) => ScoreboardError::Network(format!("HTTP error! status: {status}")),
    }
}

#[async_trait]
impl ScoreboardApi for HttpScoreboardApi {
    async fn fetch_scoreboard(&self) -> Result<Vec<ScoreEntry>, ScoreboardError> {
        debug!("GET {SCOREBOARD_PATH}");
        let res = self
            .http
            .get(self.url(SCOREBOARD_PATH))
            .send()
            .await
            .map_err(transport)?;
        read_json(res).await
    }

    async fn trigger_recompute(&self) -> Result<(), ScoreboardError> {
        debug!("POST {UPDATE_RANKS_PATH}");
        let res = self
            .http
            .post(self.url(UPDATE_RANKS_PATH))
            .send()
            .await
            .map_err(transport)?;
        if !res.status().is_success() {
            return Err(status_error(&res));
        }
        Ok(())
    }

    async fn list_participants(&self) -> Result<Vec<Participant>, ScoreboardError> {
        debug!("GET {PARTICIPANT_PATH}");
        let res = self
            .http
            .get(self.url(PARTICIPANT_PATH))
            .send()
            .await
            .map_err(transport)?;
        read_json(res).await
    }

    async fn register_participant(
        &self,
        request: &NewParticipant,
    ) -> Result<Participant, ScoreboardError> {
        debug!(project = %request.project, "POST {PARTICIPANT_PATH}");
        let res = self
            .http
            .post(self.url(PARTICIPANT_PATH))
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        if !res.status().is_success() {
            return Err(rejection(res).await);
        }
        let ack: RegistrationAck = res.json().await.map_err(transport)?;
        Ok(ack.into_participant(request))
    }

    async fn delete_participant(&self, id: ParticipantId) -> Result<(), ScoreboardError> {
        debug!("DELETE {PARTICIPANT_PATH}/{id}");
        let res = self
            .http
            .delete(format!("{}/{id}", self.url(PARTICIPANT_PATH)))
            .send()
            .await
            .map_err(transport)?;
        if !res.status().is_success() {
            return Err(rejection(res).await);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
