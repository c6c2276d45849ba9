//! Test doubles for the external collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arena::ai::{MoveAcquirer, MoveProvider, MoveRequest, PlayerId, ProviderError, ProviderRegistry};
use arena::repos::games::{GameRecord, GameStore, NewGameRecord};
use arena::AppError;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Plays back a fixed list of answers; `None` entries are provider errors.
/// Once the script is exhausted every call fails.
pub struct ScriptedProvider {
    id: PlayerId,
    script: Mutex<VecDeque<Option<String>>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<MoveRequest>>,
}

impl ScriptedProvider {
    pub fn new(id: PlayerId, script: &[Option<&str>]) -> Arc<Self> {
        Arc::new(Self {
            id,
            script: Mutex::new(script.iter().map(|s| s.map(str::to_string)).collect()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always answers `answer`.
    pub fn repeating(id: PlayerId, answer: &str, times: usize) -> Arc<Self> {
        Self::new(id, &vec![Some(answer); times])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<MoveRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl MoveProvider for ScriptedProvider {
    fn id(&self) -> PlayerId {
        self.id
    }

    async fn suggest_move(&self, request: &MoveRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        match self.script.lock().pop_front() {
            Some(Some(answer)) => Ok(answer),
            _ => Err(ProviderError::EmptyResponse { provider: self.id }),
        }
    }
}

pub fn acquirer(chatgpt: Arc<dyn MoveProvider>, claude: Arc<dyn MoveProvider>) -> Arc<MoveAcquirer> {
    Arc::new(MoveAcquirer::with_seed(
        ProviderRegistry::new(chatgpt, claude),
        Duration::from_secs(2),
        42,
    ))
}

/// Providers that never produce a legal move, so every ply is random.
pub fn random_only_acquirer() -> Arc<MoveAcquirer> {
    acquirer(
        ScriptedProvider::new(PlayerId::ChatGpt, &[]),
        ScriptedProvider::new(PlayerId::Claude, &[]),
    )
}

/// A store whose writes always fail.
#[derive(Default)]
pub struct FailingStore {
    attempts: AtomicUsize,
}

impl FailingStore {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GameStore for FailingStore {
    async fn append(&self, _game: NewGameRecord) -> Result<GameRecord, AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::db("disk full"))
    }

    async fn list(&self) -> Result<Vec<GameRecord>, AppError> {
        Err(AppError::db("disk full"))
    }

    async fn find(&self, _id: i64) -> Result<Option<GameRecord>, AppError> {
        Err(AppError::db("disk full"))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}
