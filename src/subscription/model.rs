use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::worker::RemediationHandler;

#[async_trait]
pub trait InboundMessage {
    fn id(&self) -> &str;

    fn payload(&self) -> &[u8];

    fn delivery_attempt(&self) -> Option<usize>;

    async fn ack(&self) -> anyhow::Result<()>;

    /// Hands the message back for redelivery according to the subscription's retry policy.
    async fn nack(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait MessageSource {
    /// Returns once `cancel` fired and in-flight messages are done.
    async fn receive(
        &self,
        handler: Arc<RemediationHandler>,
        cancel: CancellationToken,
    ) -> anyhow::Result<()>;
}
