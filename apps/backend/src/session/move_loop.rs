//! Fixed-interval driver for the live session.
//!
//! Each tick either plays one ply or, if the game is over, stores it and
//! replaces the session. The session lock is never held while a provider is
//! being asked for a move.

use std::sync::Arc;
use std::time::Duration;

use actix::Addr;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::snapshot::PlayedMove;
use super::state::SharedSession;
use crate::ai::{MoveAcquirer, Resolution};
use crate::render::ColorScheme;
use crate::repos::games::{GameStore, NewGameRecord};
use crate::rules::{LegalMoves, Outcome};
use crate::ws::hub::{BroadcastHub, Publish};

/// What one tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Played {
        san: String,
        resolution: Resolution,
    },
    /// The finished game was replaced by a new one. No move was played.
    RolledOver { outcome: Outcome, persisted: bool },
    /// Nothing to play and no outcome; the tick is a no-op.
    NoLegalMoves,
    /// The chosen move could not be applied; nothing was broadcast.
    ApplyFailed,
}

pub struct MoveLoop {
    session: SharedSession,
    acquirer: Arc<MoveAcquirer>,
    hub: Addr<BroadcastHub>,
    store: Arc<dyn GameStore>,
    scheme: ColorScheme,
    period: Duration,
}

impl MoveLoop {
    pub fn new(
        session: SharedSession,
        acquirer: Arc<MoveAcquirer>,
        hub: Addr<BroadcastHub>,
        store: Arc<dyn GameStore>,
        period: Duration,
    ) -> Self {
        Self {
            session,
            acquirer,
            hub,
            store,
            scheme: ColorScheme::default(),
            period,
        }
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Tick until `shutdown` fires. A tick in progress is always finished.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = interval(self.period);
        // a slow tick pushes the schedule back instead of bunching up
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        info!(period_ms = self.period.as_millis() as u64, "[MOVE LOOP] started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
        info!("[MOVE LOOP] stopped");
    }

    pub async fn tick(&self) -> TickOutcome {
        // Resolving
        let finished = {
            let session = self.session.lock();
            session
                .outcome()
                .map(|outcome| (outcome, session.finished_record(outcome, OffsetDateTime::now_utc())))
        };
        if let Some((outcome, record)) = finished {
            return self.roll_over(outcome, record).await;
        }

        let (mover, fen, legal) = {
            let session = self.session.lock();
            (
                session.mover(),
                session.current_position().fen(),
                LegalMoves::new(session.valid_moves()),
            )
        };
        let Some(legal) = legal else {
            warn!(fen = %fen, "[MOVE LOOP] no legal moves but no outcome");
            return TickOutcome::NoLegalMoves;
        };

        // AwaitingMove: no lock held
        let acquisition = self.acquirer.acquire(mover, &fen, &legal).await;
        let chosen = acquisition.chosen;

        // Applying
        let applied = {
            let mut session = self.session.lock();
            session
                .apply_move(chosen.chess_move)
                .map(|san| (san, session.snapshot(&self.scheme)))
        };
        match applied {
            Ok((san, snapshot)) => {
                info!(
                    provider = %mover,
                    san = %san,
                    ply = snapshot.ply,
                    resolution = ?acquisition.resolution,
                    "[MOVE LOOP] move played"
                );
                self.hub.do_send(Publish {
                    snapshot,
                    played: Some(PlayedMove {
                        san: san.clone(),
                        uci: chosen.uci,
                    }),
                });
                TickOutcome::Played {
                    san,
                    resolution: acquisition.resolution,
                }
            }
            Err(e) => {
                error!(provider = %mover, error = %e, "[MOVE LOOP] failed to apply move");
                TickOutcome::ApplyFailed
            }
        }
    }

    async fn roll_over(&self, outcome: Outcome, record: NewGameRecord) -> TickOutcome {
        info!(
            outcome = %outcome,
            white = %record.white_player,
            black = %record.black_player,
            plies = record.total_moves,
            "[MOVE LOOP] game over"
        );

        let persisted = match self.store.append(record).await {
            Ok(stored) => {
                info!(game_id = stored.id, "[MOVE LOOP] game saved");
                true
            }
            Err(e) => {
                error!(error = %e, "[MOVE LOOP] failed to save finished game");
                false
            }
        };

        let snapshot = {
            let mut session = self.session.lock();
            let next = session.start_new();
            *session = next;
            session.snapshot(&self.scheme)
        };
        info!(
            session_id = %snapshot.session_id,
            white = %snapshot.white,
            black = %snapshot.black,
            "[MOVE LOOP] new game started"
        );
        self.hub.do_send(Publish {
            snapshot,
            played: None,
        });

        TickOutcome::RolledOver { outcome, persisted }
    }
}
