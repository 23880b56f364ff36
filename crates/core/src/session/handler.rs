use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::order::{Item, OrderTicket};
use crate::pipeline::CafeState;
use crate::protocol::{read_frame, response, Frame, Request};
use crate::reclaim::reclaim_one;

use super::registry::{spawn_outbound, SessionRegistry};
use super::SessionError;

/// Settle time before the connect-path reclamation notification, so the
/// client sees CONNECTED before the side-band message.
const RECLAIM_NOTIFY_DELAY: Duration = Duration::from_millis(100);

const RECLAIM_NOTIFICATION: &str = "That was fast! We have your order complete :)";

/// Outbound channel depth per session; responses and notifications share it.
const OUTBOUND_BUFFER: usize = 64;

/// Drives one customer connection: handshake, request loop, cleanup.
///
/// The handler owns the session's view of the customer (outstanding items,
/// idle flag) and is its only mutator. Everything it writes goes through
/// the session's single outbound channel, where it interleaves with brew
/// worker notifications.
pub struct SessionHandler {
    state: Arc<CafeState>,
    registry: Arc<SessionRegistry>,
    outbound: mpsc::Sender<Frame>,
    customer_id: u64,
    customer_name: String,
    /// Items this customer has ordered and not yet collected. Pruned on a
    /// successful collection.
    outstanding: Vec<Item>,
    idle: bool,
}

impl SessionHandler {
    /// Serve one connection to completion. Consumes the socket; returns
    /// once the customer terminates, disconnects, or faults.
    pub async fn run<S>(stream: S, state: Arc<CafeState>, registry: Arc<SessionRegistry>)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (mut reader, writer) = tokio::io::split(stream);
        let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);
        let writer_task = spawn_outbound(writer, rx);

        let (mut session, reclaimed) =
            match Self::connect(&mut reader, tx, &state, &registry).await {
                Ok(connected) => connected,
                Err(e) => {
                    warn!("error connecting customer: {}", e);
                    writer_task.abort();
                    return;
                }
            };

        if session.greet(reclaimed).await.is_ok() {
            session.request_loop(&mut reader).await;
        }
        session.cleanup().await;

        // Dropping the handler's sender lets the writer drain whatever the
        // workers already queued, then exit on its own.
        drop(session);
        let _ = writer_task.await;
    }

    /// Handshake: read the customer descriptor, register the session, and
    /// run connect-time reclamation over the initial items. Returns the
    /// session plus whether anything was reclaimed; after this point every
    /// exit path goes through `cleanup`.
    async fn connect<R>(
        reader: &mut R,
        outbound: mpsc::Sender<Frame>,
        state: &Arc<CafeState>,
        registry: &Arc<SessionRegistry>,
    ) -> Result<(Self, bool), SessionError>
    where
        R: AsyncRead + Unpin,
    {
        let frame = read_frame(reader)
            .await?
            .ok_or(SessionError::UnexpectedDisconnect)?;

        let Frame::Customer { name, id, items } = frame else {
            return Err(SessionError::UnexpectedFrame {
                expected: "customer descriptor",
            });
        };

        if !state.register_active(id, &name).await {
            return Err(SessionError::DuplicateCustomerId(id));
        }
        state.client_connected();
        registry.insert(id, outbound.clone()).await;

        info!(customer = %name, id, "customer connected");

        let mut session = Self {
            state: Arc::clone(state),
            registry: Arc::clone(registry),
            outbound,
            customer_id: id,
            customer_name: name,
            outstanding: Vec::new(),
            idle: false,
        };

        let reclaimed = session.ingest_items(items).await;

        Ok((session, reclaimed))
    }

    /// Confirm the handshake, then surface the connect-time reclamation
    /// notification once the client has seen CONNECTED.
    async fn greet(&mut self, reclaimed: bool) -> Result<(), SessionError> {
        self.send(Frame::text(response::CONNECTED)).await?;

        if reclaimed {
            tokio::time::sleep(RECLAIM_NOTIFY_DELAY).await;
            self.send(Frame::notification(RECLAIM_NOTIFICATION)).await?;
        }
        Ok(())
    }

    /// Add items to the outstanding set, reclaiming orphaned tray tickets
    /// where possible and enqueueing the rest into waiting. Returns true
    /// when at least one item was reclaimed.
    async fn ingest_items(&mut self, items: Vec<Item>) -> bool {
        let mut reclaimed = false;
        for item in items {
            self.outstanding.push(item);
            if reclaim_one(&self.state, self.customer_id, &item).await {
                reclaimed = true;
                continue;
            }
            let ticket = self.state.mint_ticket(self.customer_id, item);
            debug!(customer = %self.customer_name, key = %ticket.key(), "order added to waiting area");
            self.state.waiting.enqueue(ticket).await;
        }
        reclaimed
    }

    /// Read and dispatch requests until the session ends.
    async fn request_loop<R>(&mut self, reader: &mut R)
    where
        R: AsyncRead + Unpin,
    {
        loop {
            let frame = match read_frame(reader).await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    debug!(customer = %self.customer_name, "customer hung up");
                    return;
                }
                Err(e) => {
                    warn!(customer = %self.customer_name, "error handling request: {}", e);
                    return;
                }
            };

            let Frame::Text { body } = frame else {
                warn!(customer = %self.customer_name, "unexpected payload frame, closing session");
                return;
            };

            let Some(request) = Request::from_token(&body) else {
                // Unknown tokens are logged and ignored, no reply.
                warn!(customer = %self.customer_name, token = %body.trim(), "unknown request");
                continue;
            };
            debug!(customer = %self.customer_name, request = ?request, "request received");

            let result = match request {
                Request::OrderStatus => self.order_status().await,
                Request::CollectOrder => self.collect_order().await,
                Request::NewOrder => self.new_order(reader).await,
                Request::Terminate => {
                    let _ = self.send(Frame::text(response::TERMINATE_CONFIRMED)).await;
                    return;
                }
            };

            if let Err(e) = result {
                warn!(customer = %self.customer_name, "error handling request: {}", e);
                return;
            }
        }
    }

    /// ORDER_STATUS: confirm, then one status blob covering every
    /// outstanding item, or a single line when the customer is idle.
    async fn order_status(&mut self) -> Result<(), SessionError> {
        self.send(Frame::text(response::ORDER_STATUS_CONFIRMED))
            .await?;

        if self.idle {
            let line = format!(
                "No order found for {} - customer is idle",
                self.customer_name
            );
            return self.send(Frame::text(line)).await;
        }

        let mut blob = String::new();
        for item in &self.outstanding {
            let key = OrderTicket::key_for(self.customer_id, item);
            let now = Utc::now();

            // The tray enqueue lands before the brewing remove, so an item
            // mid-handoff shows as BREWED rather than vanishing.
            let line = if self.state.waiting.contains_key(&key).await {
                format!(
                    "{}'s order \"{}\" is currently in the WAITING area. Last checked: {}\n",
                    self.customer_name, item, now
                )
            } else if self.state.brewing.contains(&key).await {
                format!(
                    "{}'s order \"{}\" is being BREWED. Last checked: {}\n",
                    self.customer_name, item, now
                )
            } else if self.state.tray.contains_key(&key).await {
                format!(
                    "{}'s order \"{}\" is READY for collection. Last checked: {}\n",
                    self.customer_name, item, now
                )
            } else {
                format!(
                    "Order \"{}\" not found in any area : possible tracking error.\n",
                    item
                )
            };
            blob.push_str(&line);
        }

        self.send(Frame::text(blob)).await
    }

    /// COLLECT_ORDER: all-or-nothing pickup of every outstanding item.
    async fn collect_order(&mut self) -> Result<(), SessionError> {
        if self.idle {
            return self.send(Frame::text(response::NO_ORDER_FOUND)).await;
        }

        let mut wanted: HashMap<String, usize> = HashMap::new();
        for item in &self.outstanding {
            *wanted
                .entry(OrderTicket::key_for(self.customer_id, item))
                .or_insert(0) += 1;
        }

        if self.state.tray.take_exact(&wanted).await {
            self.idle = true;
            self.outstanding.clear();
            self.state
                .mark_idle(self.customer_id, &self.customer_name)
                .await;
            info!(customer = %self.customer_name, "customer collected their order and is now idle");
            self.send(Frame::text(response::COLLECT_ORDER_READY)).await
        } else {
            self.send(Frame::text(response::COLLECT_ORDER_NOT_READY))
                .await
        }
    }

    /// NEW_ORDER: confirm readiness, read the item list, ingest it, and
    /// leave the idle state. An empty list is a no-op that still confirms.
    async fn new_order<R>(&mut self, reader: &mut R) -> Result<(), SessionError>
    where
        R: AsyncRead + Unpin,
    {
        self.send(Frame::text(response::NEW_ORDER_READY)).await?;

        let frame = read_frame(reader)
            .await?
            .ok_or(SessionError::UnexpectedDisconnect)?;
        let Frame::Items { items } = frame else {
            return Err(SessionError::UnexpectedFrame {
                expected: "item list",
            });
        };

        let reclaimed = self.ingest_items(items).await;

        self.idle = false;
        self.state.clear_idle(self.customer_id).await;

        if reclaimed {
            self.send(Frame::notification(RECLAIM_NOTIFICATION)).await?;
        }
        self.send(Frame::text(response::NEW_ORDER_CONFIRMED)).await
    }

    async fn send(&self, frame: Frame) -> Result<(), SessionError> {
        self.outbound
            .send(frame)
            .await
            .map_err(|_| SessionError::OutboundClosed)
    }

    /// Release everything this session registered. Outstanding items stay
    /// in the pipeline as orphans, eligible for reclamation.
    async fn cleanup(&mut self) {
        self.registry.remove(self.customer_id).await;
        self.state.deregister(self.customer_id).await;
        self.state.client_disconnected();
        info!(
            customer = %self.customer_name,
            id = self.customer_id,
            "customer disconnected and removed from active/idle lists"
        );
    }
}
