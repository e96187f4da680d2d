use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use shared::{
    domain::{NewParticipant, Participant, ParticipantId, ScoreEntry},
    error::ScoreboardError,
};

use crate::api::ScoreboardApi;

pub fn entry(id: i64, score: f64) -> ScoreEntry {
    ScoreEntry {
        id: ParticipantId(id),
        participant: format!("participant-{id}"),
        project: format!("project-{id}"),
        score,
        last_updated: "2025-06-01 09:00:00".into(),
        rank: None,
    }
}

pub fn entries(scores: &[f64]) -> Vec<ScoreEntry> {
    scores
        .iter()
        .enumerate()
        .map(|(i, score)| entry(i as i64 + 1, *score))
        .collect()
}

#[derive(Default)]
struct FakeRegistry {
    board: Vec<ScoreEntry>,
    fail_fetch: bool,
    fail_recompute: bool,
    reject_register: Option<ScoreboardError>,
    fail_list: bool,
    next_id: i64,
}

/// In-memory backend that counts every call.
#[derive(Default)]
pub struct FakeApi {
    registry: Mutex<FakeRegistry>,
    pub fetch_calls: AtomicUsize,
    pub recompute_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_board(board: Vec<ScoreEntry>) -> Arc<Self> {
        let api = Self::default();
        {
            let mut registry = api.registry.lock().expect("registry");
            registry.next_id = board.iter().map(|e| e.id.0).max().unwrap_or(0) + 1;
            registry.board = board;
        }
        Arc::new(api)
    }

    pub fn set_board(&self, board: Vec<ScoreEntry>) {
        self.registry.lock().expect("registry").board = board;
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.registry.lock().expect("registry").fail_fetch = fail;
    }

    pub fn fail_recompute(&self, fail: bool) {
        self.registry.lock().expect("registry").fail_recompute = fail;
    }

    pub fn fail_list(&self, fail: bool) {
        self.registry.lock().expect("registry").fail_list = fail;
    }

    pub fn reject_register(&self, err: ScoreboardError) {
        self.registry.lock().expect("registry").reject_register = Some(err);
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn recomputes(&self) -> usize {
        self.recompute_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoreboardApi for FakeApi {
    async fn fetch_scoreboard(&self) -> Result<Vec<ScoreEntry>, ScoreboardError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let registry = self.registry.lock().expect("registry");
        if registry.fail_fetch {
            return Err(ScoreboardError::network("HTTP error! status: 503"));
        }
        Ok(registry.board.clone())
    }

    async fn trigger_recompute(&self) -> Result<(), ScoreboardError> {
        self.recompute_calls.fetch_add(1, Ordering::SeqCst);
        if self.registry.lock().expect("registry").fail_recompute {
            return Err(ScoreboardError::network("HTTP error! status: 500"));
        }
        Ok(())
    }

    async fn list_participants(&self) -> Result<Vec<Participant>, ScoreboardError> {
        let registry = self.registry.lock().expect("registry");
        if registry.fail_list {
            return Err(ScoreboardError::network("connection refused"));
        }
        Ok(registry
            .board
            .iter()
            .map(|e| Participant {
                id: e.id,
                participant: e.participant.clone(),
                project: e.project.clone(),
            })
            .collect())
    }

    async fn register_participant(
        &self,
        request: &NewParticipant,
    ) -> Result<Participant, ScoreboardError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        let mut registry = self.registry.lock().expect("registry");
        if let Some(err) = registry.reject_register.clone() {
            return Err(err);
        }
        let id = ParticipantId(registry.next_id);
        registry.next_id += 1;
        registry.board.push(ScoreEntry {
            id,
            participant: request.participant.clone(),
            project: request.project.clone(),
            score: 0.0,
            last_updated: "2025-06-01 09:00:00".into(),
            rank: None,
        });
        Ok(Participant {
            id,
            participant: request.participant.clone(),
            project: request.project.clone(),
        })
    }

    async fn delete_participant(&self, id: ParticipantId) -> Result<(), ScoreboardError> {
        let mut registry = self.registry.lock().expect("registry");
        let before = registry.board.len();
        registry.board.retain(|e| e.id != id);
        if registry.board.len() == before {
            return Err(ScoreboardError::Conflict {
                status: 404,
                message: "Participant not found.".into(),
            });
        }
        Ok(())
    }
}
