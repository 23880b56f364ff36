//! The three-stage order pipeline and the shared cafe state.
//!
//! Items move waiting -> brewing -> tray. The stages are process-wide and
//! live for the server's lifetime; every container here is safe for
//! concurrent access from the acceptor, session handlers, the scheduler,
//! and the brew workers.

mod capacity;
mod stages;
mod state;

pub use capacity::Capacity;
pub use stages::{Brewing, Tray, Waiting};
pub use state::{CafeSnapshot, CafeState};
