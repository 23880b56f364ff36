//! Core concurrency engine for the barista cafe server.
//!
//! Customer sessions arrive over a stream socket, their items flow through
//! the waiting -> brewing -> tray pipeline under per-category capacity
//! limits, and ready notifications fan out to the owning sessions.

pub mod acceptor;
pub mod brewer;
pub mod config;
pub mod order;
pub mod pipeline;
pub mod protocol;
pub mod reclaim;
pub mod scheduler;
pub mod session;
pub mod testing;

pub use acceptor::Acceptor;
pub use brewer::{BrewError, BrewPool, Brewer, KettleBrewer};
pub use config::{
    load_config, load_config_from_str, validate_config, CafeConfig, Config, ConfigError,
    ServerConfig,
};
pub use order::{Category, Item, OrderError, OrderTicket};
pub use pipeline::{CafeSnapshot, CafeState};
pub use protocol::{Frame, ProtocolError, Request};
pub use scheduler::Scheduler;
pub use session::{SessionError, SessionHandler, SessionRegistry};
