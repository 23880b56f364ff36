use std::collections::HashMap;

use tokio::io::AsyncWrite;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::protocol::{write_frame, Frame};

/// Map from customer id to the session's outbound sender.
///
/// Brew workers resolve ticket owners here at notification time instead of
/// holding a reference to the handler; a session that has since closed
/// simply is not found and the notification is dropped (the ticket is
/// orphaned until reclaimed).
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<u64, mpsc::Sender<Frame>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: u64, sender: mpsc::Sender<Frame>) {
        self.sessions.write().await.insert(id, sender);
    }

    pub async fn remove(&self, id: u64) {
        self.sessions.write().await.remove(&id);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Queue a `SERVER: ` notification for the owner's session. Returns
    /// false when the owner is not connected or its outbound side is gone;
    /// the notification is dropped in that case.
    pub async fn notify(&self, owner: u64, text: &str) -> bool {
        let sender = {
            let sessions = self.sessions.read().await;
            sessions.get(&owner).cloned()
        };

        let Some(sender) = sender else {
            debug!(owner, "notification dropped, owner not connected");
            return false;
        };

        if sender.send(Frame::notification(text)).await.is_err() {
            debug!(owner, "notification dropped, session outbound closed");
            return false;
        }
        true
    }
}

/// Spawn the single-writer task that owns a session's socket write half.
///
/// Responses from the handler and notifications from brew workers all go
/// through the one channel, which serializes every write on the session.
/// A write failure ends the task; remaining messages are dropped silently,
/// matching the transport-fault policy.
pub fn spawn_outbound<W>(mut writer: W, mut rx: mpsc::Receiver<Frame>) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = write_frame(&mut writer, &frame).await {
                error!("session write failed, dropping outbound: {}", e);
                break;
            }
        }
    })
}
