//! Per-connection WebSocket handler.
//!
//! Keeps framing, heartbeats, and room membership at the edge; committed
//! transitions arrive from the broadcast bus and are forwarded verbatim.
//! The public contract pings every 5s and considers a connection idle after
//! 10s without client traffic. Tests shorten these intervals; adjust the
//! constants below if SLAs change so clients and intermediaries stay
//! aligned.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::broadcast;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::ChangeEvent;
use crate::inbound::ws::messages::{ClientMessage, ServerMessage};
use crate::outbound::broadcast::{EQUIPMENT_UPDATES_ROOM, EquipmentBroadcast};

/// Time between heartbeats to the client.
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client.
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    bus: EquipmentBroadcast,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(bus).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

/// Room subscription held by one session. `None` until the client sends an
/// explicit `joinRoom`; dropped with the session, so membership never
/// survives a reconnect.
type Subscription = Option<broadcast::Receiver<ChangeEvent>>;

struct WsSession {
    bus: EquipmentBroadcast,
}

impl WsSession {
    fn new(bus: EquipmentBroadcast) -> Self {
        Self { bus }
    }

    async fn run(&self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);
        let mut subscription: Subscription = None;

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(
                        &mut session,
                        &mut last_heartbeat,
                        &mut subscription,
                        message,
                    )
                    .await
                }
                event = next_event(&mut subscription) => {
                    self.handle_bus_event(&mut session, &mut subscription, event).await
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                let close_action = self.close_action_for(&error);
                self.close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        subscription: &mut Subscription,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => {
                self.handle_message(session, last_heartbeat, subscription, message)
                    .await
            }
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        subscription: &mut Subscription,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(subscription, text.as_ref())
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    fn handle_text_message(
        &self,
        subscription: &mut Subscription,
        text: &str,
    ) -> Result<(), SessionError> {
        let message = match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => message,
            Err(error) => {
                warn!(error = %error, "Rejected malformed WebSocket payload");
                return Err(SessionError::InvalidPayload);
            }
        };

        match message {
            ClientMessage::JoinRoom { room } if room == EQUIPMENT_UPDATES_ROOM => {
                // Joining is idempotent; a repeated join keeps the live
                // receiver and any events queued on it.
                if subscription.is_none() {
                    *subscription = Some(self.bus.subscribe());
                    debug!(room = %room, "session joined broadcast group");
                }
                Ok(())
            }
            ClientMessage::JoinRoom { room } => {
                warn!(room = %room, "join request for unknown room ignored");
                Ok(())
            }
        }
    }

    async fn handle_bus_event(
        &self,
        session: &mut Session,
        subscription: &mut Subscription,
        event: Result<ChangeEvent, broadcast::error::RecvError>,
    ) -> Result<(), SessionError> {
        match event {
            Ok(event) => self
                .send_json(session, &ServerMessage::from(event))
                .await
                .map_err(SessionError::Network),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                // The client heals by reloading the list; dropping events
                // here is the documented contract.
                warn!(missed, "session lagged behind the broadcast bus");
                Ok(())
            }
            Err(broadcast::error::RecvError::Closed) => {
                *subscription = None;
                Ok(())
            }
        }
    }

    async fn send_json<T: serde::Serialize>(
        &self,
        session: &mut Session,
        payload: &T,
    ) -> Result<(), Closed> {
        match serde_json::to_string(payload) {
            Ok(body) => session.text(body).await,
            Err(error) => {
                // In debug builds fail fast so schema drift is fixed; in
                // release we log and keep the connection alive.
                if cfg!(debug_assertions) {
                    panic!("broadcast payloads must serialize: {error}");
                } else {
                    warn!(error = %error, "Failed to serialize WebSocket payload");
                }
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("invalid payload".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "Failed to close WebSocket session");
            }
        }
    }
}

/// Resolve the next bus event, or park forever while no room is joined so
/// the select arm never fires for unsubscribed sessions.
async fn next_event(
    subscription: &mut Subscription,
) -> Result<ChangeEvent, broadcast::error::RecvError> {
    match subscription {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
