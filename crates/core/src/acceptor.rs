//! Connection intake: accepts customer sockets and hands each one to a
//! session handler on its own task, bounded by the session pool size.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::info;

use crate::config::CafeConfig;
use crate::pipeline::CafeState;
use crate::session::{SessionHandler, SessionRegistry};

pub struct Acceptor {
    state: Arc<CafeState>,
    registry: Arc<SessionRegistry>,
    sessions: Arc<Semaphore>,
}

impl Acceptor {
    pub fn new(state: Arc<CafeState>, registry: Arc<SessionRegistry>, config: &CafeConfig) -> Self {
        Self {
            state,
            registry,
            sessions: Arc::new(Semaphore::new(config.max_sessions)),
        }
    }

    /// Accept connections on `listener` until it fails or the process ends.
    ///
    /// When all session slots are taken, accepted customers queue at the
    /// acceptor until a session ends, like a full cafe with a line at the
    /// door. The handler performs the protocol handshake itself; a
    /// handshake failure only tears down that one session.
    pub async fn run(&self, listener: TcpListener) -> std::io::Result<()> {
        info!("Cafe is open on {}", listener.local_addr()?);

        loop {
            let (stream, peer) = listener.accept().await?;
            info!(%peer, "new customer connected");

            let Ok(permit) = Arc::clone(&self.sessions).acquire_owned().await else {
                // Semaphore closed: the cafe is shutting down.
                return Ok(());
            };

            let state = Arc::clone(&self.state);
            let registry = Arc::clone(&self.registry);
            tokio::spawn(async move {
                let _permit = permit;
                SessionHandler::run(stream, state, registry).await;
            });
        }
    }
}
