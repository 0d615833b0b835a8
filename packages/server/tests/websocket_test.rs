//! End-to-end tests: the axum server on an ephemeral port, driven by
//! `tokio-tungstenite` clients and `reqwest`.

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    config::ServerConfig,
    infrastructure::dto::{
        http::{HubStatsDto, ParticipantDto},
        websocket::{ChatMessage, MessageType},
    },
    ui::Server,
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const WAIT: Duration = Duration::from_secs(3);

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let config = ServerConfig {
            shutdown_grace: Duration::from_millis(500),
            ..ServerConfig::default()
        };
        let task = tokio::spawn(Server::new(config).serve(listener, async move {
            let _ = shutdown_rx.await;
        }));
        Self {
            addr,
            shutdown: Some(shutdown),
            task,
        }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        timeout(WAIT, self.task)
            .await
            .expect("server did not shut down")
            .unwrap()
            .unwrap();
    }
}

async fn send_frame(ws: &mut WsStream, frame: &ChatMessage) {
    let json = serde_json::to_string(frame).unwrap();
    ws.send(Message::Text(json.into())).await.unwrap();
}

/// Next chat frame, or `None` when the server closed the connection
async fn next_frame(ws: &mut WsStream) -> Option<ChatMessage> {
    timeout(WAIT, async {
        while let Some(message) = ws.next().await {
            match message {
                Ok(Message::Text(text)) => return Some(serde_json::from_str(text.as_str()).unwrap()),
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => continue,
            }
        }
        None
    })
    .await
    .expect("timed out waiting for a frame")
}

async fn join(server: &TestServer, id: &str, name: &str) -> WsStream {
    let (mut ws, _) = connect_async(server.ws_url()).await.unwrap();
    send_frame(&mut ws, &ChatMessage::from_client(MessageType::Join, id, name, "")).await;
    let joined = next_frame(&mut ws).await.unwrap();
    assert_eq!(joined.r#type, MessageType::Join);
    assert_eq!(joined.sender_id, id);
    ws
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: /api/health が ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: serde_json::Value = reqwest::get(server.http_url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, serde_json::json!({"status": "ok"}));
    server.stop().await;
}

#[tokio::test]
async fn test_chat_over_websocket() {
    // テスト項目: WebSocket 経由で参加・発言すると、サーバーが付与したフィールド付きで全員に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = join(&server, "alice", "Alice").await;
    let mut bob = join(&server, "bob", "Bob").await;
    let bob_joined = next_frame(&mut alice).await.unwrap();

    // when (操作):
    let mut frame = ChatMessage::from_client(MessageType::Text, "alice", "Alice", "hello");
    frame.timestamp = 1;
    frame.room_id = "elsewhere".to_string();
    send_frame(&mut alice, &frame).await;

    // then (期待する結果):
    assert_eq!(bob_joined.content, "Bob joined");
    let received = next_frame(&mut bob).await.unwrap();
    assert_eq!(received.r#type, MessageType::Text);
    assert_eq!(received.sender_id, "alice");
    assert_eq!(received.sender_name, "Alice");
    assert_eq!(received.content, "hello");
    assert_eq!(received.room_id, "general");
    assert!(!received.id.is_empty());
    assert!(received.timestamp > 1, "timestamp is assigned by the server");
    let echoed = next_frame(&mut alice).await.unwrap();
    assert_eq!(echoed.id, received.id);

    let participants: Vec<ParticipantDto> = reqwest::get(server.http_url("/api/participants"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = participants.iter().map(|p| p.participant_id.as_str()).collect();
    assert_eq!(ids, vec!["alice", "bob"]);

    let stats: HubStatsDto = reqwest::get(server.http_url("/api/stats"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.published, 3);
    assert_eq!(stats.participants, 2);

    server.stop().await;
}

#[tokio::test]
async fn test_leave_is_broadcast_when_socket_closes() {
    // テスト項目: クライアントがソケットを閉じると、残りの参加者に Leave が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = join(&server, "alice", "Alice").await;
    let mut bob = join(&server, "bob", "Bob").await;
    next_frame(&mut alice).await.unwrap();

    // when (操作):
    bob.close(None).await.unwrap();

    // then (期待する結果):
    let left = next_frame(&mut alice).await.unwrap();
    assert_eq!(left.r#type, MessageType::Leave);
    assert_eq!(left.sender_id, "bob");
    assert_eq!(left.content, "Bob left");
    server.stop().await;
}

#[tokio::test]
async fn test_first_frame_without_identity_is_rejected() {
    // テスト項目: 身元のない最初のフレームには System 通知が返り、接続が閉じられる
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut ws, _) = connect_async(server.ws_url()).await.unwrap();

    // when (操作):
    send_frame(
        &mut ws,
        &ChatMessage::from_client(MessageType::Text, "", "", "hello?"),
    )
    .await;

    // then (期待する結果):
    let notice = next_frame(&mut ws).await.unwrap();
    assert_eq!(notice.r#type, MessageType::System);
    assert_eq!(notice.sender_id, "system");
    assert!(next_frame(&mut ws).await.is_none());
    server.stop().await;
}

#[tokio::test]
async fn test_duplicate_id_is_rejected_and_first_connection_survives() {
    // テスト項目: 接続中の ID で参加しようとすると拒否され、先の接続は影響を受けない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut first = join(&server, "alice", "Alice").await;

    // when (操作):
    let (mut second, _) = connect_async(server.ws_url()).await.unwrap();
    send_frame(
        &mut second,
        &ChatMessage::from_client(MessageType::Join, "alice", "Impostor", ""),
    )
    .await;

    // then (期待する結果):
    let notice = next_frame(&mut second).await.unwrap();
    assert_eq!(notice.r#type, MessageType::System);
    assert!(notice.content.contains("already connected"));
    assert!(next_frame(&mut second).await.is_none());

    send_frame(
        &mut first,
        &ChatMessage::from_client(MessageType::Text, "alice", "Alice", "still here"),
    )
    .await;
    assert_eq!(next_frame(&mut first).await.unwrap().content, "still here");
    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_closes_active_sessions() {
    // テスト項目: サーバー停止時に参加中のセッションも閉じられる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = join(&server, "alice", "Alice").await;

    // when (操作):
    server.stop().await;

    // then (期待する結果):
    assert!(next_frame(&mut alice).await.is_none());
}
