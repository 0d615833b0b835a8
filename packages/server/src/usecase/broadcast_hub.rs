//! Broadcast Hub
//!
//! All chat traffic enters one bounded inbound queue. A single dispatch task
//! removes messages in order and offers each one to every participant of the
//! registry snapshot taken at that instant.
//!
//! ## Backpressure
//!
//! - inbound queue full: `publish` waits, throttling the publishing read loop
//! - outbound queue full: the message is dropped for that participant only
//!
//! The dispatch task never waits on a participant.

use std::{
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::domain::{ChatMessage, ConnectionRegistry, MessageKind, OfferOutcome};

use super::error::PublishError;

const DEFAULT_INBOUND_CAPACITY: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// Hub tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    /// Capacity of the shared inbound queue
    pub inbound_capacity: NonZeroUsize,
    /// Whether Text messages are delivered back to their sender
    pub echo_to_sender: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            inbound_capacity: DEFAULT_INBOUND_CAPACITY,
            echo_to_sender: true,
        }
    }
}

#[derive(Debug, Default)]
struct HubStats {
    published: AtomicU64,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of the hub counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HubStatsSnapshot {
    /// Messages accepted into the inbound queue
    pub published: u64,
    /// Successful pushes into outbound queues
    pub delivered: u64,
    /// Pushes dropped because an outbound queue was full
    pub dropped: u64,
}

/// Handle for publishing into the hub. Cheap to clone.
#[derive(Clone)]
pub struct BroadcastHub {
    inbound: mpsc::Sender<Arc<ChatMessage>>,
    stats: Arc<HubStats>,
}

impl BroadcastHub {
    /// Spawn the dispatch task and return the publishing handle.
    ///
    /// The task stops once every `BroadcastHub` clone has been dropped and the
    /// inbound queue is drained.
    pub fn start(
        registry: Arc<dyn ConnectionRegistry>,
        config: HubConfig,
    ) -> (Self, JoinHandle<()>) {
        let (hub, dispatcher) = Self::new(registry, config);
        let task = tokio::spawn(dispatcher.run());
        (hub, task)
    }

    fn new(registry: Arc<dyn ConnectionRegistry>, config: HubConfig) -> (Self, Dispatcher) {
        let (inbound, inbound_rx) = mpsc::channel(config.inbound_capacity.get());
        let stats = Arc::new(HubStats::default());
        let hub = Self {
            inbound,
            stats: stats.clone(),
        };
        let dispatcher = Dispatcher {
            inbound: inbound_rx,
            registry,
            stats,
            echo_to_sender: config.echo_to_sender,
        };
        (hub, dispatcher)
    }

    /// Enqueue a message for fan-out, waiting while the inbound queue is full
    pub async fn publish(&self, message: ChatMessage) -> Result<(), PublishError> {
        self.inbound
            .send(Arc::new(message))
            .await
            .map_err(|_| PublishError::HubClosed)?;
        self.stats.published.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn stats(&self) -> HubStatsSnapshot {
        HubStatsSnapshot {
            published: self.stats.published.load(Ordering::Relaxed),
            delivered: self.stats.delivered.load(Ordering::Relaxed),
            dropped: self.stats.dropped.load(Ordering::Relaxed),
        }
    }
}

struct Dispatcher {
    inbound: mpsc::Receiver<Arc<ChatMessage>>,
    registry: Arc<dyn ConnectionRegistry>,
    stats: Arc<HubStats>,
    echo_to_sender: bool,
}

impl Dispatcher {
    async fn run(mut self) {
        tracing::info!("Broadcast hub dispatch task started");
        while let Some(message) = self.inbound.recv().await {
            self.dispatch(message).await;
        }
        tracing::info!("Broadcast hub dispatch task stopped");
    }

    async fn dispatch(&self, message: Arc<ChatMessage>) {
        let targets = self.registry.snapshot().await;
        let mut delivered = 0u64;
        let mut dropped = 0u64;

        for target in targets {
            if !self.echo_to_sender
                && message.kind == MessageKind::Text
                && target.id() == &message.sender_id
            {
                continue;
            }

            match target.offer(message.clone()) {
                OfferOutcome::Delivered => delivered += 1,
                OfferOutcome::Dropped => {
                    dropped += 1;
                    tracing::warn!(
                        "Outbound queue of '{}' is full, dropping message {} (total dropped: {})",
                        target.id(),
                        message.id,
                        target.dropped_count()
                    );
                }
                OfferOutcome::Closed => {
                    tracing::debug!(
                        "Outbound queue of '{}' is closed, skipping message {}",
                        target.id(),
                        message.id
                    );
                }
            }
        }

        self.stats.delivered.fetch_add(delivered, Ordering::Relaxed);
        self.stats.dropped.fetch_add(dropped, Ordering::Relaxed);
        tracing::debug!(
            "Dispatched {:?} message {} from '{}' (delivered: {}, dropped: {})",
            message.kind,
            message.id,
            message.sender_id,
            delivered,
            dropped
        );
    }
}
