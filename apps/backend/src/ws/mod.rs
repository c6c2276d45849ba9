//! Live spectator channel: hub, wire protocol, per-viewer connection.

pub mod hub;
pub mod protocol;
pub mod session;

pub use hub::BroadcastHub;
pub use protocol::{EventKind, StateEvent};
