use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_channel::{unbounded, Receiver, Sender};
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::subscription::model::{InboundMessage, MessageSource};
use crate::worker::RemediationHandler;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Settlement {
    Acked,
    Nacked,
}

type Settlements = Arc<DashMap<String, Settlement>>;

pub struct StubMessage {
    id: String,
    payload: Vec<u8>,
    delivery_attempt: Option<usize>,
    settlements: Settlements,
}

impl StubMessage {
    pub fn new(id: &str, payload: &[u8], delivery_attempt: Option<usize>) -> StubMessage {
        StubMessage {
            id: id.to_string(),
            payload: payload.to_vec(),
            delivery_attempt,
            settlements: Arc::new(DashMap::new()),
        }
    }

    pub fn settlement(&self) -> Option<Settlement> {
        self.settlements.get(&self.id).map(|s| *s)
    }
}

#[async_trait]
impl InboundMessage for StubMessage {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn payload(&self) -> &[u8] {
        self.payload.as_slice()
    }

    fn delivery_attempt(&self) -> Option<usize> {
        self.delivery_attempt
    }

    async fn ack(&self) -> anyhow::Result<()> {
        self.settlements.insert(self.id.clone(), Settlement::Acked);
        Ok(())
    }

    async fn nack(&self) -> anyhow::Result<()> {
        self.settlements.insert(self.id.clone(), Settlement::Nacked);
        Ok(())
    }
}

/// Publishing half of an in-memory subscription.
pub struct Publisher {
    sender: Sender<StubMessage>,
    settlements: Settlements,
    next_id: AtomicUsize,
}

impl Publisher {
    pub async fn publish(&self, payload: &[u8]) -> String {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let message = StubMessage {
            id: id.clone(),
            payload: payload.to_vec(),
            delivery_attempt: None,
            settlements: self.settlements.clone(),
        };
        self.sender
            .send(message)
            .await
            .expect("subscription closed");
        id
    }

    pub fn settlement(&self, id: &str) -> Option<Settlement> {
        self.settlements.get(id).map(|s| *s)
    }

    /// No more deliveries; the source drains what it already has and stops.
    pub fn close(&self) {
        self.sender.close();
    }
}

/// Delivers every published message on its own task, like a pull subscriber with
/// an unbounded worker pool.
pub struct ChannelSource {
    receiver: Receiver<StubMessage>,
}

pub fn subscription() -> (Publisher, ChannelSource) {
    let (sender, receiver) = unbounded();
    let publisher = Publisher {
        sender,
        settlements: Arc::new(DashMap::new()),
        next_id: AtomicUsize::new(0),
    };
    (publisher, ChannelSource { receiver })
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn receive(
        &self,
        handler: Arc<RemediationHandler>,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        let mut in_flight = JoinSet::new();
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                delivery = self.receiver.recv() => match delivery {
                    Ok(message) => {
                        let handler = handler.clone();
                        in_flight.spawn(async move { handler.process(&message).await });
                    }
                    Err(_) => break,
                },
            }
        }
        while in_flight.join_next().await.is_some() {}
        Ok(())
    }
}

/// Subscription that fails as soon as it is polled.
pub struct BrokenSource;

#[async_trait]
impl MessageSource for BrokenSource {
    async fn receive(
        &self,
        _handler: Arc<RemediationHandler>,
        _cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("subscription deleted"))
    }
}
