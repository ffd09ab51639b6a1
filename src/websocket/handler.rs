use std::sync::{Arc, Mutex};

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    chat::chat_dto::ChatMessageResponse,
    chat::chat_error::ChatError,
    error::{AppError, Result},
    state::AppState,
    websocket::{
        connection::WsSender,
        gate::{SendTarget, ROOM_LIST_QUEUE},
        identity::{resolve_handshake, resolve_token, Principal, WsConnectQuery},
        types::{ClientFrame, ServerFrame},
    },
};

/// Chat WebSocket endpoint.
///
/// The handshake may carry the bearer token (`access_token` query
/// parameter or `Authorization` header); if it does not, the connection
/// comes up unauthenticated and must bind an identity with a `connect`
/// frame before any subscribe/send passes the gate.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsConnectQuery>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Response {
    let principal = resolve_handshake(&state, &query, &headers).await;
    ws.on_upgrade(move |socket| handle_socket(socket, principal, state))
}

/// Per-connection state. The principal is bound at most once.
struct ConnContext {
    principal: Option<Principal>,
    connection_id: Option<u64>,
}

type Registration = Arc<Mutex<Option<(i64, u64)>>>;

async fn handle_socket(socket: WebSocket, principal: Option<Principal>, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerFrame>();

    let mut ctx = ConnContext {
        principal: None,
        connection_id: None,
    };
    // Shared with the receive task so cleanup after task teardown sees a
    // registration made mid-connection by a `connect` frame.
    let registration: Registration = Arc::new(Mutex::new(None));

    if let Some(principal) = principal {
        bind_identity(&mut ctx, principal, &state, &tx, &registration);
    } else {
        tracing::debug!("websocket connected without identity");
    }

    // Task: drain the channel into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&frame) {
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Task: process inbound frames
    let state_clone = state.clone();
    let tx_clone = tx.clone();
    let registration_clone = registration.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Err(err) = process_frame(
                        &text,
                        &mut ctx,
                        &state_clone,
                        &tx_clone,
                        &registration_clone,
                    )
                    .await
                    {
                        tracing::debug!("frame rejected: {err}");
                        let _ = tx_clone.send(error_frame(&err));
                    }
                }
                Message::Close(_) => break,
                // Binary and pong frames carry nothing for this protocol
                _ => {}
            }
        }
    });

    // Heartbeat task
    let tx_heartbeat = tx.clone();
    let mut heartbeat_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));
        loop {
            interval.tick().await;
            if tx_heartbeat.send(ServerFrame::Ping).is_err() {
                break;
            }
        }
    });

    // Stop all tasks when any one finishes
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
            heartbeat_task.abort();
        },
        _ = &mut recv_task => {
            send_task.abort();
            heartbeat_task.abort();
        },
        _ = &mut heartbeat_task => {
            send_task.abort();
            recv_task.abort();
        }
    }

    // Release per-connection state immediately on disconnect
    let registered = *registration.lock().unwrap_or_else(|e| e.into_inner());
    if let Some((user_id, connection_id)) = registered {
        state.ws_connections.unregister(user_id, connection_id);
        tracing::info!(user_id, "websocket closed");
    }
}

fn bind_identity(
    ctx: &mut ConnContext,
    principal: Principal,
    state: &AppState,
    tx: &WsSender,
    registration: &Registration,
) {
    let connection_id = state.ws_connections.register(principal.user_id, tx.clone());
    ctx.principal = Some(principal);
    ctx.connection_id = Some(connection_id);
    if let Ok(mut slot) = registration.lock() {
        *slot = Some((principal.user_id, connection_id));
    }
    let _ = tx.send(ServerFrame::Connected {
        user_id: principal.user_id,
    });
    tracing::info!(user_id = principal.user_id, "websocket identity bound");
}

async fn process_frame(
    text: &str,
    ctx: &mut ConnContext,
    state: &AppState,
    tx: &WsSender,
    registration: &Registration,
) -> Result<()> {
    let frame: ClientFrame = serde_json::from_str(text)
        .map_err(|e| AppError::BadRequest(format!("Invalid frame format: {e}")))?;

    match frame {
        ClientFrame::Connect { token } => {
            if ctx.principal.is_some() {
                return Err(AppError::BadRequest(
                    "Connection already has an identity".to_string(),
                ));
            }
            let principal = resolve_token(state, &token).await?;
            bind_identity(ctx, principal, state, tx, registration);
        }

        ClientFrame::Subscribe { destination } => {
            state
                .frame_gate
                .authorize_subscribe(ctx.principal, &destination)
                .await?;

            if let (Some(principal), Some(connection_id)) = (ctx.principal, ctx.connection_id) {
                state
                    .ws_connections
                    .subscribe(principal.user_id, connection_id, &destination);
                let _ = tx.send(ServerFrame::Subscribed { destination });
            }
        }

        ClientFrame::Unsubscribe { destination } => {
            if let (Some(principal), Some(connection_id)) = (ctx.principal, ctx.connection_id) {
                state
                    .ws_connections
                    .unsubscribe(principal.user_id, connection_id, &destination);
            }
        }

        ClientFrame::Send {
            destination,
            content,
        } => {
            let target = state
                .frame_gate
                .authorize_send(ctx.principal, &destination)
                .await?;
            let principal = ctx.principal.ok_or(ChatError::WebSocketUnauthorized)?;

            match target {
                SendTarget::Message(room_id) => {
                    let content = content.ok_or(ChatError::MessageEmpty)?;
                    let message = state
                        .chat_service
                        .send_message(room_id, principal.user_id, &content)
                        .await?;
                    fanout_message(state, room_id, principal.user_id, message).await?;
                }
                SendTarget::Read(room_id) => {
                    state
                        .chat_service
                        .mark_as_read(room_id, principal.user_id)
                        .await?;
                    push_room_row(state, room_id, principal.user_id).await?;
                }
            }
        }

        ClientFrame::Ping => {
            let _ = tx.send(ServerFrame::Pong);
        }
    }

    Ok(())
}

/// Push a committed message to both participants' private room queues,
/// then refresh each side's list row from its own viewpoint. Runs only
/// after the domain call fully committed.
async fn fanout_message(
    state: &AppState,
    room_id: i64,
    sender_id: i64,
    message: ChatMessageResponse,
) -> Result<()> {
    let other_id = state
        .chat_service
        .get_other_participant_id(room_id, sender_id)
        .await?;

    let destination = format!("/user/queue/rooms.{room_id}");
    let frame = ServerFrame::Message {
        destination: destination.clone(),
        payload: message,
    };

    state.ws_connections.send_to_user(sender_id, &destination, &frame);
    state.ws_connections.send_to_user(other_id, &destination, &frame);

    push_room_row(state, room_id, sender_id).await?;
    push_room_row(state, room_id, other_id).await?;

    Ok(())
}

async fn push_room_row(state: &AppState, room_id: i64, user_id: i64) -> Result<()> {
    let row = state.chat_service.get_room_row_for(room_id, user_id).await?;
    let frame = ServerFrame::Room {
        destination: ROOM_LIST_QUEUE.to_string(),
        payload: row,
    };
    state.ws_connections.send_to_user(user_id, ROOM_LIST_QUEUE, &frame);
    Ok(())
}

fn error_frame(err: &AppError) -> ServerFrame {
    let message = match err {
        AppError::Database(_) | AppError::InternalError => "Internal server error".to_string(),
        other => other.to_string(),
    };
    ServerFrame::Error {
        code: err.error_code().to_string(),
        message,
    }
}
