//! Participant handle and its bounded outbound queue.

use std::{
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::mpsc::{self, error::TrySendError};

use super::{
    entity::{ChatMessage, Participant},
    value_object::{DisplayName, ParticipantId, Timestamp},
};

/// Consumer side of a participant's outbound queue, owned by its write loop
pub type OutboundReceiver = mpsc::Receiver<Arc<ChatMessage>>;

/// Result of a non-blocking push into an outbound queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferOutcome {
    Delivered,
    /// Queue full, the message is dropped for this participant only
    Dropped,
    /// Queue closed, the participant is tearing down
    Closed,
}

/// Registry entry for a live participant.
///
/// Holds the producer side of the outbound queue. The only producer is the
/// hub dispatch task.
#[derive(Debug)]
pub struct ParticipantHandle {
    id: ParticipantId,
    name: DisplayName,
    joined_at: Timestamp,
    outbound: mpsc::Sender<Arc<ChatMessage>>,
    dropped: AtomicU64,
}

impl ParticipantHandle {
    /// Create a handle with an outbound queue of `capacity` messages
    pub fn new(
        id: ParticipantId,
        name: DisplayName,
        joined_at: Timestamp,
        capacity: NonZeroUsize,
    ) -> (Arc<Self>, OutboundReceiver) {
        let (outbound, rx) = mpsc::channel(capacity.get());
        let handle = Arc::new(Self {
            id,
            name,
            joined_at,
            outbound,
            dropped: AtomicU64::new(0),
        });
        (handle, rx)
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn joined_at(&self) -> Timestamp {
        self.joined_at
    }

    /// Push without waiting
    pub fn offer(&self, message: Arc<ChatMessage>) -> OfferOutcome {
        match self.outbound.try_send(message) {
            Ok(()) => OfferOutcome::Delivered,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                OfferOutcome::Dropped
            }
            Err(TrySendError::Closed(_)) => OfferOutcome::Closed,
        }
    }

    /// Total messages dropped for this participant because its queue was full
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn participant(&self) -> Participant {
        Participant {
            id: self.id.clone(),
            name: self.name.clone(),
            joined_at: self.joined_at,
        }
    }
}
