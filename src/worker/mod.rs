pub mod stats;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::configuration::RemediationConfig;
use crate::kubernetes::cordon::{CordonOutcome, Cordoner};
use crate::notification::decode_node_name;
use crate::subscription::model::{InboundMessage, MessageSource};
use crate::worker::stats::Stats;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AckDecision {
    Ack,
    LeavePending,
}

/// Decode, filter, cordon and acknowledge for one message. Shared across workers.
pub struct RemediationHandler {
    cordoner: Arc<Cordoner>,
    config: Arc<RemediationConfig>,
    stats: Stats,
}

impl RemediationHandler {
    pub fn new(cordoner: Arc<Cordoner>, config: Arc<RemediationConfig>) -> RemediationHandler {
        RemediationHandler {
            cordoner,
            config,
            stats: Stats::default(),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub async fn decide(&self, payload: &[u8], delivery_attempt: Option<usize>) -> AckDecision {
        let node = match decode_node_name(payload) {
            Ok(node) => node,
            Err(error) => {
                tracing::warn!(%error, "Couldn't decode notification, leaving it unacknowledged");
                self.stats.record_undecodable();
                return self.leave_pending(delivery_attempt);
            }
        };

        if !self.config.cluster.manages(&node) {
            tracing::info!(%node, cluster = %self.config.cluster, "Ack & ignoring");
            self.stats.record_ignored();
            return AckDecision::Ack;
        }

        tracing::info!(%node, "Going to cordon");
        match self.cordoner.cordon(&node).await {
            CordonOutcome::Cordoned => {
                self.stats.record_cordoned();
                AckDecision::Ack
            }
            CordonOutcome::Failed => {
                tracing::warn!(%node, "Error, skipping");
                self.stats.record_skipped();
                self.leave_pending(delivery_attempt)
            }
        }
    }

    pub async fn process<M>(&self, message: &M)
    where
        M: InboundMessage + Sync + ?Sized,
    {
        let span = tracing::info_span!("message", message_id = message.id());
        async {
            let decision = self
                .decide(message.payload(), message.delivery_attempt())
                .await;
            let settled = match decision {
                AckDecision::Ack => message.ack().await,
                AckDecision::LeavePending => message.nack().await,
            };
            if let Err(error) = settled {
                tracing::warn!(?decision, error = %format!("{error:#}"), "Couldn't settle message");
            }
        }
        .instrument(span)
        .await
    }

    fn leave_pending(&self, delivery_attempt: Option<usize>) -> AckDecision {
        // Failures stay unacked even past the ceiling.
        match (self.config.max_delivery_attempts, delivery_attempt) {
            (Some(max), Some(attempt)) if attempt >= max => {
                tracing::error!(
                    attempt,
                    max,
                    "Message keeps failing, leaving it to the dead-letter policy"
                );
                self.stats.record_exhausted();
            }
            _ => {}
        }
        AckDecision::LeavePending
    }
}

pub async fn run<S>(
    source: &S,
    handler: Arc<RemediationHandler>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    S: MessageSource + Sync + ?Sized,
{
    tracing::info!("Pulling messages");
    let result = source.receive(handler.clone(), cancel).await;
    handler.stats().log_summary();
    result
}
