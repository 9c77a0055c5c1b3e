use axum::{
    Router,
    extract::{
        Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
    routing::get,
};
use serde::Deserialize;
use tokio::sync::broadcast;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    error::AppResult,
    events::DomainEvent,
    identity,
    middleware::auth::{AuthUser, STAFF, ensure_any_role},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(events_ws))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EventsQuery {
    pub restaurant_id: Uuid,
}

/// Subscribes the caller to a restaurant's change signals. The requested
/// restaurant must be the caller's own. Each signal arrives as one JSON
/// text frame, `{"event": "<name>"}`.
pub async fn events_ws(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<EventsQuery>,
    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    ensure_any_role(&user, STAFF)?;
    let scope = identity::resolve_scope(&state.orm, &user).await?;
    scope.authorize(query.restaurant_id)?;
    let rx = state.hub.subscribe(query.restaurant_id);

    Ok(ws.on_upgrade(move |socket| run_socket(socket, rx)))
}

async fn run_socket(mut socket: WebSocket, mut rx: broadcast::Receiver<DomainEvent>) {
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let frame = serde_json::json!({ "event": event.as_str() }).to_string();
                    if socket.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                // slow consumers skip what they missed, they are never replayed to
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "websocket subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            msg = socket.recv() => match msg {
                Some(Ok(_)) => {}
                _ => break,
            },
        }
    }
}
