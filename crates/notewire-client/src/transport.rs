//! Transport glue: one event loop owns the hub and multiplexes the
//! shared WebSocket connection, outbound queries, and host control
//! messages on a single task. Reconnect/backoff is the hosting
//! application's concern, not this loop's.

use futures::{SinkExt, StreamExt};
use notewire_core::{PanelContext, PanelId, ProtocolError, Request};
use notewire_panel::{codec, PanelHub, PanelKind, Renderer};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::config::ClientConfig;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("client event loop is gone")]
    LoopGone,
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Host-side control messages for the event loop.
pub enum Control {
    Open {
        kind: PanelKind,
        context: PanelContext,
        renderer: Box<dyn Renderer>,
        reply: oneshot::Sender<Result<PanelId, ProtocolError>>,
    },
    Close(PanelId),
    SetFilter(PanelId, String),
    Shutdown,
}

/// Handle to a running client. Dropping it (or calling `shutdown`)
/// ends the event loop; the in-flight socket traffic is simply
/// abandoned.
pub struct Client {
    control: mpsc::UnboundedSender<Control>,
    task: tokio::task::JoinHandle<()>,
}

impl Client {
    /// Connect to the kernel and start the event loop.
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let (ws, _) = connect_async(&config.server_url).await?;
        tracing::info!(url = %config.server_url, "Connected to kernel");

        let (hub, outbox) = PanelHub::new();
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(ws, hub, outbox, control_rx));

        Ok(Self {
            control: control_tx,
            task,
        })
    }

    /// Open a panel; resolves once the session is registered and its
    /// initial query is on the wire.
    pub async fn open_panel(
        &self,
        kind: PanelKind,
        context: PanelContext,
        renderer: Box<dyn Renderer>,
    ) -> Result<PanelId, ClientError> {
        let (reply, rx) = oneshot::channel();
        self.control
            .send(Control::Open {
                kind,
                context,
                renderer,
                reply,
            })
            .map_err(|_| ClientError::LoopGone)?;
        rx.await.map_err(|_| ClientError::LoopGone)?.map_err(Into::into)
    }

    pub fn close_panel(&self, id: PanelId) -> Result<(), ClientError> {
        self.control
            .send(Control::Close(id))
            .map_err(|_| ClientError::LoopGone)
    }

    pub fn set_filter(&self, id: PanelId, k: impl Into<String>) -> Result<(), ClientError> {
        self.control
            .send(Control::SetFilter(id, k.into()))
            .map_err(|_| ClientError::LoopGone)
    }

    /// Stop the event loop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.control.send(Control::Shutdown);
        let _ = self.task.await;
    }
}

/// The event loop. Single owner of the hub: every protocol decision
/// happens here, one event at a time, in arrival order.
async fn run(
    ws: WsStream,
    mut hub: PanelHub,
    mut outbox: mpsc::UnboundedReceiver<Request>,
    mut control: mpsc::UnboundedReceiver<Control>,
) {
    let (mut ws_tx, mut ws_rx) = ws.split();

    loop {
        tokio::select! {
            Some(request) = outbox.recv() => {
                let wire = match codec::encode(&request) {
                    Ok(wire) => wire,
                    Err(e) => {
                        tracing::warn!(kind = e.error_kind(), "Encode failed, request dropped");
                        continue;
                    }
                };
                if ws_tx.send(WsMessage::Text(wire)).await.is_err() {
                    tracing::warn!("Socket send failed, stopping");
                    break;
                }
            }

            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => hub.handle_frame(&text),
                    Some(Ok(WsMessage::Binary(data))) => {
                        match String::from_utf8(data) {
                            Ok(text) => hub.handle_frame(&text),
                            Err(_) => tracing::warn!("Non-UTF8 binary frame dropped"),
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        tracing::info!("Kernel closed the connection");
                        break;
                    }
                    // Ping/pong handled by the library.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Socket receive error, stopping");
                        break;
                    }
                }
            }

            ctrl = control.recv() => {
                match ctrl {
                    Some(Control::Open { kind, context, renderer, reply }) => {
                        let _ = reply.send(hub.open(kind, context, renderer));
                    }
                    Some(Control::Close(id)) => hub.close(&id),
                    Some(Control::SetFilter(id, k)) => hub.set_filter(&id, k),
                    Some(Control::Shutdown) | None => {
                        tracing::info!("Client shutting down");
                        break;
                    }
                }
            }
        }
    }
}
