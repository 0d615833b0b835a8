//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{HubStatsDto, ParticipantDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Currently registered participants, sorted by id
pub async fn get_participants(State(state): State<Arc<AppState>>) -> Json<Vec<ParticipantDto>> {
    let participants = state
        .registry
        .participants()
        .await
        .into_iter()
        .map(ParticipantDto::from)
        .collect();
    Json(participants)
}

/// Hub counters
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<HubStatsDto> {
    let stats = state.hub.stats();
    Json(HubStatsDto {
        published: stats.published,
        delivered: stats.delivered,
        dropped: stats.dropped,
        participants: state.registry.len().await,
    })
}
