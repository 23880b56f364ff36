//! Customer sessions: the per-connection protocol handler, the session
//! registry, and the single-writer outbound task.

mod handler;
mod registry;

pub use handler::SessionHandler;
pub use registry::{spawn_outbound, SessionRegistry};

use thiserror::Error;

use crate::protocol::ProtocolError;

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Transport or codec failure on the session socket.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The stream ended in the middle of an exchange (handshake or a
    /// request that expects a follow-up payload).
    #[error("connection closed mid-exchange")]
    UnexpectedDisconnect,

    /// The first frame was not a customer descriptor, or a request was
    /// followed by a payload of the wrong shape.
    #[error("unexpected frame: expected {expected}")]
    UnexpectedFrame { expected: &'static str },

    /// Another connected session already holds this customer id.
    #[error("customer id {0} is already connected")]
    DuplicateCustomerId(u64),

    /// The outbound writer task is gone; nothing more can be sent.
    #[error("session outbound channel closed")]
    OutboundClosed,
}
