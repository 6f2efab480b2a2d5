//! WebSocket transport binding
//!
//! Accepts TCP connections, performs the WebSocket handshake, and pumps each
//! connection: inbound frames go to the dispatcher, the session's outbound
//! queue drains to the socket. The dispatcher close path always runs when a
//! pump ends, whatever the reason.

use crate::config::WsConfig;
use crate::dispatch::DispatcherService;
use crate::session::Session;
use crate::types::{WsMessage, WsResult};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time;
use tokio_tungstenite::{accept_async_with_config, tungstenite, WebSocketStream};
use tracing::{debug, info, warn};

/// The WebSocket server loop
pub struct WsServer {
    config: WsConfig,
    dispatcher: Arc<DispatcherService>,
}

impl WsServer {
    pub fn new(config: WsConfig, dispatcher: Arc<DispatcherService>) -> Self {
        Self { config, dispatcher }
    }

    /// Bind and accept connections until the task is cancelled
    pub async fn run(&self) -> WsResult<()> {
        let listener =
            TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        info!(
            host = %self.config.host,
            port = self.config.port,
            "listening for connections"
        );

        loop {
            let (stream, peer) = listener.accept().await?;
            debug!(%peer, "accepted tcp connection");

            let dispatcher = self.dispatcher.clone();
            let config = self.config.clone();
            tokio::spawn(async move {
                if let Err(error) = handle_socket(stream, dispatcher, config).await {
                    warn!(%error, %peer, "connection ended with error");
                }
            });
        }
    }
}

async fn handle_socket(
    stream: TcpStream,
    dispatcher: Arc<DispatcherService>,
    config: WsConfig,
) -> WsResult<()> {
    let ws_config = tungstenite::protocol::WebSocketConfig {
        max_message_size: config.max_message_size,
        ..Default::default()
    };
    let mut ws_stream = accept_async_with_config(stream, Some(ws_config)).await?;

    let (sender, mut receiver) = mpsc::unbounded_channel();
    let session = Arc::new(Session::new(sender));
    dispatcher.client_connected(session.clone()).await;

    let result = pump(&mut ws_stream, &dispatcher, &session, &config, &mut receiver).await;

    // teardown always runs, even when the pump errored out
    dispatcher.client_closed(&session).await;
    result
}

async fn pump(
    ws_stream: &mut WebSocketStream<TcpStream>,
    dispatcher: &Arc<DispatcherService>,
    session: &Arc<Session>,
    config: &WsConfig,
    receiver: &mut mpsc::UnboundedReceiver<WsMessage>,
) -> WsResult<()> {
    let mut ping_interval = config
        .ping_interval
        .map(|secs| time::interval(Duration::from_secs(secs)));

    loop {
        tokio::select! {
            inbound = ws_stream.next() => {
                match inbound {
                    Some(Ok(message)) => match WsMessage::from(message) {
                        WsMessage::Text(text) => {
                            dispatcher.client_message(session, text.into_bytes()).await;
                        }
                        WsMessage::Binary(payload) => {
                            dispatcher.client_message(session, payload).await;
                        }
                        WsMessage::Ping(payload) => {
                            if config.auto_pong {
                                ws_stream.send(tungstenite::Message::Pong(payload)).await?;
                            }
                        }
                        WsMessage::Pong(_) => {}
                        WsMessage::Close(_) => {
                            debug!(session = %session.id(), "received close frame");
                            break;
                        }
                    },
                    Some(Err(error)) => {
                        warn!(session = %session.id(), %error, "websocket error");
                        break;
                    }
                    None => break,
                }
            }

            outbound = receiver.recv() => {
                match outbound {
                    Some(message) => ws_stream.send(message.into()).await?,
                    None => break,
                }
            }

            _ = tick(ping_interval.as_mut()) => {
                ws_stream.send(tungstenite::Message::Ping(Vec::new())).await?;
                debug!(session = %session.id(), "sent keepalive ping");
            }
        }
    }

    Ok(())
}

async fn tick(interval: Option<&mut time::Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
