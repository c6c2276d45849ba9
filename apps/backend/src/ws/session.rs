//! One spectator connection.
//!
//! Inbound frames are drained and discarded; outbound state events arrive on
//! a bounded queue owned by the hub and are written in order. Either side
//! ending stops the actor, which deregisters from the hub.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::app_state::AppState;
use crate::ws::hub::{BroadcastHub, Deregister, Register};
use crate::ws::protocol::StateEvent;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = ViewerSession::new(app_state.hub().clone(), app_state.config().viewer_queue);
    ws::start(session, &req, stream)
}

pub struct ViewerSession {
    viewer_id: Uuid,
    hub: Addr<BroadcastHub>,
    queue_capacity: usize,
    evicted: CancellationToken,
    last_heartbeat: Instant,
}

impl ViewerSession {
    pub fn new(hub: Addr<BroadcastHub>, queue_capacity: usize) -> Self {
        Self {
            viewer_id: Uuid::new_v4(),
            hub,
            queue_capacity,
            evicted: CancellationToken::new(),
            last_heartbeat: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(viewer_id = %actor.viewer_id, "[VIEWER] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    /// Close as soon as the hub gives up on us, without flushing the backlog.
    fn watch_eviction(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let evicted = self.evicted.clone();
        ctx.spawn(
            async move { evicted.cancelled().await }
                .into_actor(self)
                .map(|_, actor, ctx| {
                    info!(viewer_id = %actor.viewer_id, "[VIEWER] evicted by hub, closing");
                    ctx.close(Some(ws::CloseReason {
                        code: ws::CloseCode::Again,
                        description: Some("viewer fell behind".to_string()),
                    }));
                    ctx.stop();
                }),
        );
    }
}

impl Actor for ViewerSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(viewer_id = %self.viewer_id, "[VIEWER] connected");

        let (tx, rx) = mpsc::channel(self.queue_capacity);
        ctx.add_stream(ReceiverStream::new(rx));
        self.hub.do_send(Register {
            viewer_id: self.viewer_id,
            queue: tx,
            evicted: self.evicted.clone(),
        });

        self.watch_eviction(ctx);
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.hub.do_send(Deregister {
            viewer_id: self.viewer_id,
        });
        info!(viewer_id = %self.viewer_id, "[VIEWER] disconnected");
    }
}

/// Inbound: keep the connection alive, ignore everything else.
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ViewerSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(_)) | Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                debug!(viewer_id = %self.viewer_id, "[VIEWER] discarding client payload");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {}
            Err(err) => {
                debug!(viewer_id = %self.viewer_id, error = %err, "[VIEWER] protocol error");
                ctx.stop();
            }
        }
    }
}

/// Outbound: state events from the hub, in queue order.
impl StreamHandler<Arc<StateEvent>> for ViewerSession {
    fn handle(&mut self, event: Arc<StateEvent>, ctx: &mut Self::Context) {
        match serde_json::to_string(event.as_ref()) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[VIEWER] failed to serialize state event"),
        }
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        debug!(viewer_id = %self.viewer_id, "[VIEWER] hub closed the queue");
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Away)));
        ctx.stop();
    }
}
