//! The live game: session state and the loop that advances it.

mod move_loop;
mod snapshot;
mod state;

pub use move_loop::{MoveLoop, TickOutcome};
pub use snapshot::{PlayedMove, SessionSnapshot};
pub use state::{Session, SharedSession, SideAssignment};
