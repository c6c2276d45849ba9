//! Turning a provider's free-text answer into exactly one legal move.
//!
//! Each acquisition round makes up to [`MAX_ATTEMPTS`] provider calls, each
//! bounded by a hard timeout. The first answer that names a legal move wins.
//! When every attempt fails the move is drawn uniformly at random from the
//! legal set, so acquisition itself never fails.

use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::registry::ProviderRegistry;
use super::trait_def::{MoveRequest, PlayerId, ProviderError};
use crate::rules::{LegalMove, LegalMoves};

pub const MAX_ATTEMPTS: usize = 3;

/// What happened to one provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Accepted,
    /// The provider answered, but not with a legal move.
    Rejected,
    ProviderFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveAttempt {
    /// 1-based.
    pub ordinal: usize,
    pub raw: Option<String>,
    pub outcome: AttemptOutcome,
}

/// How the chosen move was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Provider { attempt: usize },
    RandomFallback,
}

#[derive(Debug, Clone)]
pub struct Acquisition {
    pub chosen: LegalMove,
    pub resolution: Resolution,
    pub attempts: Vec<MoveAttempt>,
}

impl Acquisition {
    pub fn attempts_used(&self) -> usize {
        self.attempts.len()
    }
}

/// Match a raw answer against the legal set.
///
/// Surrounding whitespace and quotes are stripped, then the answer must equal
/// the SAN or UCI spelling of a legal move exactly.
pub fn match_suggestion<'a>(raw: &str, legal: &'a LegalMoves) -> Option<&'a LegalMove> {
    let answer = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    if answer.is_empty() {
        return None;
    }
    legal
        .as_slice()
        .iter()
        .find(|m| m.san == answer || m.uci == answer)
}

pub struct MoveAcquirer {
    providers: ProviderRegistry,
    timeout: Duration,
    rng: Mutex<StdRng>,
}

impl MoveAcquirer {
    pub fn new(providers: ProviderRegistry, timeout: Duration) -> Self {
        Self::with_rng(providers, timeout, StdRng::from_os_rng())
    }

    /// Deterministic fallback choices, for tests.
    pub fn with_seed(providers: ProviderRegistry, timeout: Duration, seed: u64) -> Self {
        Self::with_rng(providers, timeout, StdRng::seed_from_u64(seed))
    }

    fn with_rng(providers: ProviderRegistry, timeout: Duration, rng: StdRng) -> Self {
        Self {
            providers,
            timeout,
            rng: Mutex::new(rng),
        }
    }

    pub async fn acquire(&self, mover: PlayerId, fen: &str, legal: &LegalMoves) -> Acquisition {
        let provider = self.providers.get(mover);
        let request = MoveRequest {
            fen: fen.to_string(),
            legal_moves: legal.san_list(),
        };
        let mut attempts = Vec::with_capacity(MAX_ATTEMPTS);

        for ordinal in 1..=MAX_ATTEMPTS {
            let answer = tokio::time::timeout(self.timeout, provider.suggest_move(&request))
                .await
                .unwrap_or(Err(ProviderError::Timeout(self.timeout)));

            match answer {
                Ok(raw) => {
                    if let Some(found) = match_suggestion(&raw, legal) {
                        tracing::debug!(
                            provider = %mover,
                            attempt = ordinal,
                            san = %found.san,
                            "[ACQUIRE] provider move accepted"
                        );
                        attempts.push(MoveAttempt {
                            ordinal,
                            raw: Some(raw),
                            outcome: AttemptOutcome::Accepted,
                        });
                        return Acquisition {
                            chosen: found.clone(),
                            resolution: Resolution::Provider { attempt: ordinal },
                            attempts,
                        };
                    }
                    tracing::warn!(
                        provider = %mover,
                        attempt = ordinal,
                        answer = %raw,
                        "[ACQUIRE] provider answered with an illegal move"
                    );
                    attempts.push(MoveAttempt {
                        ordinal,
                        raw: Some(raw),
                        outcome: AttemptOutcome::Rejected,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        provider = %mover,
                        attempt = ordinal,
                        error = %e,
                        "[ACQUIRE] provider call failed"
                    );
                    attempts.push(MoveAttempt {
                        ordinal,
                        raw: None,
                        outcome: AttemptOutcome::ProviderFailed(e.to_string()),
                    });
                }
            }
        }

        let chosen = self.random_move(legal);
        tracing::warn!(
            provider = %mover,
            san = %chosen.san,
            "[ACQUIRE] all attempts failed, playing a random move"
        );
        Acquisition {
            chosen,
            resolution: Resolution::RandomFallback,
            attempts,
        }
    }

    fn random_move(&self, legal: &LegalMoves) -> LegalMove {
        let moves = legal.as_slice();
        let idx = self.rng.lock().random_range(0..moves.len());
        moves[idx].clone()
    }
}
