//! Participant session
//!
//! Drives one connection from its first frame to the end:
//!
//! 1. wait for the first frame and join (or reject) the participant
//! 2. run the read loop and the write loop as separate tasks
//! 3. when either loop ends, tear down exactly once: unregister, close the
//!    outbound queue, announce Leave, then wait for both loops
//!
//! The read loop also listens to the process-wide shutdown signal. Loops
//! still running after the grace period are aborted.

use std::{num::NonZeroUsize, sync::Arc, time::Duration};

use hiroba_shared::time::Clock;
use tokio::{
    sync::watch,
    task::{JoinError as TaskJoinError, JoinHandle},
    time::timeout,
};

use crate::domain::{
    ChatMessage, ConnectionRegistry, FrameReader, FrameWriter, MessageContent, MessageKind,
    OutboundReceiver, ParticipantHandle, ParticipantId, RoomId, SessionError, SessionLifecycle,
    Timestamp, TransportError,
};

use super::{
    broadcast_hub::BroadcastHub,
    connect_participant::{ConnectParticipantUseCase, JoinedParticipant},
    disconnect_participant::DisconnectParticipantUseCase,
    error::{JoinError, SendMessageError},
    send_message::SendMessageUseCase,
};

const DEFAULT_OUTBOUND_CAPACITY: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Per-session tuning shared by every connection
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub room_id: RoomId,
    pub outbound_capacity: NonZeroUsize,
    /// How long teardown waits for the loops before aborting them
    pub shutdown_grace: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            room_id: RoomId::general(),
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer ended the stream
    EndOfStream,
    /// The peer sent a Leave frame
    LeaveRequested,
    /// Reading or writing failed
    Transport(TransportError),
    /// The first frame could not open a session
    Rejected(JoinError),
    /// The server is shutting down
    Shutdown,
    /// The hub stopped accepting messages
    HubClosed,
    /// A loop task panicked
    Aborted,
}

/// Outcome of `ParticipantSession::run`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Set once the participant was registered
    pub participant_id: Option<ParticipantId>,
    pub reason: CloseReason,
    /// Whether a Leave announcement was published
    pub announced_leave: bool,
}

/// Runs connections against one hub. Cheap to clone.
#[derive(Clone)]
pub struct ParticipantSession {
    connect: Arc<ConnectParticipantUseCase>,
    send: Arc<SendMessageUseCase>,
    disconnect: Arc<DisconnectParticipantUseCase>,
    clock: Arc<dyn Clock>,
    settings: SessionSettings,
    shutdown: watch::Receiver<bool>,
}

impl ParticipantSession {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        hub: BroadcastHub,
        clock: Arc<dyn Clock>,
        settings: SessionSettings,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let connect = ConnectParticipantUseCase::new(
            registry.clone(),
            hub.clone(),
            clock.clone(),
            settings.room_id.clone(),
            settings.outbound_capacity,
        );
        let send = SendMessageUseCase::new(hub.clone(), clock.clone(), settings.room_id.clone());
        let disconnect =
            DisconnectParticipantUseCase::new(registry, hub, clock.clone(), settings.room_id.clone());
        Self {
            connect: Arc::new(connect),
            send: Arc::new(send),
            disconnect: Arc::new(disconnect),
            clock,
            settings,
            shutdown,
        }
    }

    /// Serve one connection until it is fully closed
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> SessionReport
    where
        R: FrameReader + 'static,
        W: FrameWriter + 'static,
    {
        let mut lifecycle = SessionLifecycle::new();
        let mut shutdown = self.shutdown.clone();

        let first = tokio::select! {
            frame = reader.next_frame() => frame,
            _ = wait_for_shutdown(&mut shutdown) => {
                return self.close_unjoined(&mut lifecycle, &mut writer, CloseReason::Shutdown).await;
            }
        };
        let frame = match first {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::debug!("Stream ended before the first frame");
                return self
                    .close_unjoined(&mut lifecycle, &mut writer, CloseReason::EndOfStream)
                    .await;
            }
            Err(e) => {
                tracing::debug!("Stream failed before the first frame: {}", e);
                return self
                    .close_unjoined(&mut lifecycle, &mut writer, CloseReason::Transport(e))
                    .await;
            }
        };

        let JoinedParticipant {
            handle,
            outbound,
            first_text,
        } = match self.connect.execute(frame).await {
            Ok(joined) => joined,
            Err(e) => {
                tracing::warn!("Rejecting connection: {}", e);
                self.notify_rejection(&mut writer, &e).await;
                return self
                    .close_unjoined(&mut lifecycle, &mut writer, CloseReason::Rejected(e))
                    .await;
            }
        };
        log_transition(lifecycle.activate());

        let (closing_tx, closing_rx) = watch::channel(false);
        let mut write_task = tokio::spawn(write_loop(writer, outbound, closing_rx.clone()));

        let first_reason = match first_text {
            Some(content) => publish_text(&self.send, &handle, content).await.err(),
            None => None,
        };
        let mut read_task = match first_reason {
            Some(reason) => tokio::spawn(async move { reason }),
            None => tokio::spawn(read_loop(
                reader,
                handle.clone(),
                self.send.clone(),
                closing_rx,
                shutdown,
            )),
        };

        // Whichever loop ends first decides the reason; teardown happens once.
        let (reason, read_done, write_done) = tokio::select! {
            result = &mut read_task => (exit_reason(result), true, false),
            result = &mut write_task => (exit_reason(result), false, true),
        };
        tracing::info!("Session of '{}' ending: {:?}", handle.id(), reason);
        log_transition(lifecycle.terminate());

        self.disconnect.unregister(handle.id()).await;
        let _ = closing_tx.send(true);
        let announced_leave = lifecycle.was_active()
            && match self.disconnect.announce_leave(&handle).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Could not announce leave of '{}': {}", handle.id(), e);
                    false
                }
            };

        if !read_done {
            self.finish_loop(read_task, "read", handle.id()).await;
        }
        if !write_done {
            self.finish_loop(write_task, "write", handle.id()).await;
        }
        log_transition(lifecycle.close());

        SessionReport {
            participant_id: Some(handle.id().clone()),
            reason,
            announced_leave,
        }
    }

    async fn close_unjoined<W: FrameWriter>(
        &self,
        lifecycle: &mut SessionLifecycle,
        writer: &mut W,
        reason: CloseReason,
    ) -> SessionReport {
        log_transition(lifecycle.terminate());
        if let Err(e) = writer.close().await {
            tracing::debug!("Closing writer failed: {}", e);
        }
        log_transition(lifecycle.close());
        SessionReport {
            participant_id: None,
            reason,
            announced_leave: false,
        }
    }

    async fn notify_rejection<W: FrameWriter>(&self, writer: &mut W, error: &JoinError) {
        let notice = ChatMessage::system(
            MessageContent::server_generated(error.to_string()),
            self.settings.room_id.clone(),
            Timestamp::new(self.clock.now_millis()),
        );
        if let Err(e) = writer.write_frame(&notice).await {
            tracing::debug!("Could not deliver rejection notice: {}", e);
        }
    }

    async fn finish_loop(
        &self,
        mut task: JoinHandle<CloseReason>,
        name: &str,
        id: &ParticipantId,
    ) {
        if timeout(self.settings.shutdown_grace, &mut task).await.is_err() {
            tracing::warn!(
                "The {} loop of '{}' did not stop within {:?}, aborting it",
                name,
                id,
                self.settings.shutdown_grace
            );
            task.abort();
        }
    }
}

async fn read_loop<R: FrameReader>(
    mut reader: R,
    handle: Arc<ParticipantHandle>,
    send: Arc<SendMessageUseCase>,
    mut closing: watch::Receiver<bool>,
    mut shutdown: watch::Receiver<bool>,
) -> CloseReason {
    loop {
        let frame = tokio::select! {
            frame = reader.next_frame() => frame,
            _ = wait_for_closing(&mut closing) => return CloseReason::EndOfStream,
            _ = wait_for_shutdown(&mut shutdown) => return CloseReason::Shutdown,
        };

        match frame {
            Ok(Some(frame)) => match frame.kind {
                MessageKind::Text => {
                    if let Err(reason) = publish_text(&send, &handle, frame.content).await {
                        return reason;
                    }
                }
                MessageKind::Leave => return CloseReason::LeaveRequested,
                kind => {
                    tracing::warn!(
                        "Ignoring {:?} frame from already joined participant '{}'",
                        kind,
                        handle.id()
                    );
                }
            },
            Ok(None) => return CloseReason::EndOfStream,
            Err(e) => return CloseReason::Transport(e),
        }
    }
}

async fn write_loop<W: FrameWriter>(
    mut writer: W,
    mut outbound: OutboundReceiver,
    mut closing: watch::Receiver<bool>,
) -> CloseReason {
    let mut queue_closed = false;
    let reason = loop {
        tokio::select! {
            message = outbound.recv() => match message {
                Some(message) => {
                    if let Err(e) = writer.write_frame(&message).await {
                        break CloseReason::Transport(e);
                    }
                }
                None => break CloseReason::EndOfStream,
            },
            // Stop accepting new messages but keep draining what is queued.
            _ = wait_for_closing(&mut closing), if !queue_closed => {
                queue_closed = true;
                outbound.close();
            }
        }
    };
    if let Err(e) = writer.close().await {
        tracing::debug!("Closing writer failed: {}", e);
    }
    reason
}

/// Publish a Text frame; `Err` carries the reason the read side must stop
async fn publish_text(
    send: &SendMessageUseCase,
    handle: &ParticipantHandle,
    content: String,
) -> Result<(), CloseReason> {
    match send.execute(handle, content).await {
        Ok(_) => Ok(()),
        Err(SendMessageError::InvalidContent(e)) => {
            tracing::warn!("Discarding message from '{}': {}", handle.id(), e);
            Ok(())
        }
        Err(SendMessageError::Publish(e)) => {
            tracing::warn!("Message from '{}' not published: {}", handle.id(), e);
            Err(CloseReason::HubClosed)
        }
    }
}

/// Resolves once shutdown is requested; never resolves if the signal is gone
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    let requested = shutdown.wait_for(|stop| *stop).await.is_ok();
    if !requested {
        std::future::pending::<()>().await;
    }
}

/// Resolves once teardown has started or the session itself is gone
async fn wait_for_closing(closing: &mut watch::Receiver<bool>) {
    let _ = closing.wait_for(|closing| *closing).await;
}

fn exit_reason(result: Result<CloseReason, TaskJoinError>) -> CloseReason {
    result.unwrap_or_else(|e| {
        tracing::error!("Session loop failed: {}", e);
        CloseReason::Aborted
    })
}

fn log_transition(result: Result<(), SessionError>) {
    if let Err(e) = result {
        tracing::error!("{}", e);
    }
}
