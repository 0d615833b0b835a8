//! Server state shared by all handlers.

use std::sync::Arc;

use crate::{
    domain::ConnectionRegistry,
    usecase::{BroadcastHub, ParticipantSession},
};

/// Shared application state
pub struct AppState {
    /// 接続ごとのセッションを実行する
    pub session: ParticipantSession,
    /// 統計情報の取得用
    pub hub: BroadcastHub,
    /// 参加者一覧の取得用
    pub registry: Arc<dyn ConnectionRegistry>,
}
