//! Wire protocol: self-describing framed objects over a byte stream.
//!
//! Every message is a length-prefixed JSON payload. The tag on [`Frame`]
//! lets a reader discover whether it received a plain text token, a
//! customer descriptor, or a list of items before committing to a shape.

mod codec;
mod frame;

pub use codec::{read_frame, write_frame, MAX_FRAME_LEN};
pub use frame::{Frame, Request, NOTIFICATION_PREFIX};

use thiserror::Error;

/// Errors raised by the framed codec.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    #[error("undecodable frame: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("frame of {0} bytes exceeds the {MAX_FRAME_LEN} byte limit")]
    FrameTooLarge(usize),
}

/// Response tokens the server writes back to customers.
pub mod response {
    pub const CONNECTED: &str = "CONNECTED";
    pub const ORDER_STATUS_CONFIRMED: &str = "ORDER_STATUS_CONFIRMED";
    pub const COLLECT_ORDER_READY: &str = "COLLECT_ORDER_READY";
    pub const COLLECT_ORDER_NOT_READY: &str = "COLLECT_ORDER_NOT_READY";
    pub const NO_ORDER_FOUND: &str = "NO_ORDER_FOUND";
    pub const NEW_ORDER_READY: &str = "NEW_ORDER_READY";
    pub const NEW_ORDER_CONFIRMED: &str = "NEW_ORDER_CONFIRMED";
    pub const TERMINATE_CONFIRMED: &str = "TERMINATE_CONFIRMED";
}
