//! Connection Registry trait 定義
//!
//! ライブな接続の唯一の参照表。ドメイン層がインターフェースを定義し、
//! Infrastructure 層が具体的な実装を提供します（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    connection::ParticipantHandle, entity::Participant, error::RegistryError,
    value_object::ParticipantId,
};

/// Connection Registry trait
///
/// ## 不変条件
///
/// - 参加者 ID は join 登録が完了してから teardown が完了するまでの間だけ存在する
/// - 挿入・削除は常に排他的に行われる
/// - snapshot 同士は並行に取得できるが、変更と同時には行われない
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続を登録。同じ ID が既に存在する場合は `AlreadyExists`
    async fn register(&self, handle: Arc<ParticipantHandle>) -> Result<(), RegistryError>;

    /// 接続を削除。存在しない場合は `NotFound`（何もしない）
    async fn unregister(&self, id: &ParticipantId)
    -> Result<Arc<ParticipantHandle>, RegistryError>;

    /// 呼び出し時点の接続一覧（ファンアウト対象の決定に使う）
    async fn snapshot(&self) -> Vec<Arc<ParticipantHandle>>;

    /// 登録中の接続数
    async fn len(&self) -> usize;

    /// 登録中の参加者一覧（ID でソート済み）
    async fn participants(&self) -> Vec<Participant>;
}
