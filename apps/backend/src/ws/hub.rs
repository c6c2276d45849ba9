//! Viewer registry and fan-out.
//!
//! The hub is the only owner of the viewer set. Registration, deregistration
//! and broadcast all arrive as messages, so the set needs no lock. Delivery to
//! a viewer never waits: a viewer whose queue is full is dropped on the spot.

use std::sync::Arc;

use actix::prelude::*;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::render::ColorScheme;
use crate::session::{PlayedMove, SessionSnapshot, SharedSession};
use crate::ws::protocol::StateEvent;

pub type ViewerQueue = mpsc::Sender<Arc<StateEvent>>;

/// Add a viewer. It is sent a full-state snapshot of the live session before
/// anything else.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Register {
    pub viewer_id: Uuid,
    pub queue: ViewerQueue,
    /// Cancelled when the hub drops the viewer for falling behind.
    pub evicted: CancellationToken,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Deregister {
    pub viewer_id: Uuid,
}

/// A session change to fan out. `played` is set for a move, unset for a
/// full-state announcement.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Publish {
    pub snapshot: SessionSnapshot,
    pub played: Option<PlayedMove>,
}

#[derive(Message)]
#[rtype(result = "usize")]
pub struct ViewerCount;

struct Viewer {
    id: Uuid,
    queue: ViewerQueue,
    evicted: CancellationToken,
    /// Version of the newest state this viewer has been sent.
    synced_version: u64,
}

pub struct BroadcastHub {
    session: SharedSession,
    scheme: ColorScheme,
    /// Registration order.
    viewers: Vec<Viewer>,
}

impl BroadcastHub {
    pub fn new(session: SharedSession, scheme: ColorScheme) -> Self {
        Self {
            session,
            scheme,
            viewers: Vec::new(),
        }
    }

    /// Whether a `try_send` would succeed. The hub is the only sender, so
    /// room seen here cannot disappear before the send.
    fn has_room(viewer: &Viewer) -> bool {
        if viewer.queue.is_closed() {
            debug!(viewer_id = %viewer.id, "[HUB] viewer queue closed, removing");
            return false;
        }
        if viewer.queue.capacity() == 0 {
            warn!(viewer_id = %viewer.id, "[HUB] viewer queue full, evicting");
            viewer.evicted.cancel();
            return false;
        }
        true
    }

    /// Non-blocking hand-off. Returns `false` if the viewer must be dropped.
    fn deliver(viewer: &mut Viewer, event: &Arc<StateEvent>) -> bool {
        match viewer.queue.try_send(Arc::clone(event)) {
            Ok(()) => {
                viewer.synced_version = event.version;
                true
            }
            Err(TrySendError::Full(_)) => {
                warn!(
                    viewer_id = %viewer.id,
                    version = event.version,
                    "[HUB] viewer queue full, evicting"
                );
                viewer.evicted.cancel();
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(viewer_id = %viewer.id, "[HUB] viewer queue closed, removing");
                false
            }
        }
    }
}

impl Actor for BroadcastHub {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("[HUB] started");
    }
}

impl Handler<Register> for BroadcastHub {
    type Result = ();

    fn handle(&mut self, msg: Register, _ctx: &mut Self::Context) {
        let snapshot = self.session.lock().snapshot(&self.scheme);

        let mut viewer = Viewer {
            id: msg.viewer_id,
            queue: msg.queue,
            evicted: msg.evicted,
            synced_version: 0,
        };
        let event = Arc::new(StateEvent::full_state(&snapshot, self.viewers.len() + 1));

        if Self::deliver(&mut viewer, &event) {
            info!(
                viewer_id = %viewer.id,
                version = snapshot.version,
                viewers = self.viewers.len() + 1,
                "[HUB] viewer registered"
            );
            self.viewers.push(viewer);
        }
    }
}

impl Handler<Deregister> for BroadcastHub {
    type Result = ();

    fn handle(&mut self, msg: Deregister, _ctx: &mut Self::Context) {
        let before = self.viewers.len();
        self.viewers.retain(|v| v.id != msg.viewer_id);
        if self.viewers.len() != before {
            info!(
                viewer_id = %msg.viewer_id,
                viewers = self.viewers.len(),
                "[HUB] viewer deregistered"
            );
        }
    }
}

impl Handler<Publish> for BroadcastHub {
    type Result = ();

    fn handle(&mut self, msg: Publish, _ctx: &mut Self::Context) {
        let version = msg.snapshot.version;
        // The event counts only viewers that will receive it.
        self.viewers
            .retain(|viewer| viewer.synced_version >= version || Self::has_room(viewer));

        let viewer_count = self.viewers.len();
        let event = Arc::new(match &msg.played {
            Some(played) => StateEvent::move_applied(&msg.snapshot, played, viewer_count),
            None => StateEvent::full_state(&msg.snapshot, viewer_count),
        });

        // A viewer that registered after this snapshot was taken already has it.
        self.viewers
            .retain_mut(|viewer| viewer.synced_version >= event.version || Self::deliver(viewer, &event));

        debug!(
            version = event.version,
            kind = ?event.kind,
            viewers = self.viewers.len(),
            "[HUB] broadcast"
        );
    }
}

impl Handler<ViewerCount> for BroadcastHub {
    type Result = usize;

    fn handle(&mut self, _msg: ViewerCount, _ctx: &mut Self::Context) -> usize {
        self.viewers.len()
    }
}
