//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};

use crate::{infrastructure::transport::split_websocket, ui::state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (reader, writer) = split_websocket(socket);
    let report = state.session.run(reader, writer).await;
    match report.participant_id {
        Some(id) => tracing::info!(
            "Connection of '{}' closed: {:?} (leave announced: {})",
            id,
            report.reason,
            report.announced_leave
        ),
        None => tracing::debug!("Connection closed before joining: {:?}", report.reason),
    }
}
