use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use google_cloud_pubsub::client::{Client, ClientConfig};
use google_cloud_pubsub::subscriber::ReceivedMessage;
use google_cloud_pubsub::subscription::ReceiveConfig;
use tokio_util::sync::CancellationToken;

use crate::subscription::model::{InboundMessage, MessageSource};
use crate::worker::RemediationHandler;

struct PubSubDelivery(ReceivedMessage);

#[async_trait]
impl InboundMessage for PubSubDelivery {
    fn id(&self) -> &str {
        self.0.message.message_id.as_str()
    }

    fn payload(&self) -> &[u8] {
        self.0.message.data.as_slice()
    }

    fn delivery_attempt(&self) -> Option<usize> {
        self.0.delivery_attempt()
    }

    async fn ack(&self) -> anyhow::Result<()> {
        Ok(self.0.ack().await?)
    }

    async fn nack(&self) -> anyhow::Result<()> {
        Ok(self.0.nack().await?)
    }
}

pub struct PubSubSource {
    client: Client,
    subscription_id: String,
    worker_count: Option<usize>,
}

impl PubSubSource {
    /// Authenticates with ambient Google credentials and makes sure the subscription exists.
    pub async fn connect(
        project_id: &str,
        subscription_id: &str,
        worker_count: Option<usize>,
    ) -> anyhow::Result<PubSubSource> {
        let config = ClientConfig {
            project_id: Some(project_id.to_string()),
            ..ClientConfig::default()
        }
        .with_auth()
        .await
        .context("Couldn't obtain Pub/Sub credentials.")?;
        let client = Client::new(config)
            .await
            .context("Couldn't create Pub/Sub client.")?;

        let exists = client
            .subscription(subscription_id)
            .exists(None)
            .await
            .with_context(|| format!("Couldn't look up subscription {subscription_id}."))?;
        if !exists {
            anyhow::bail!("Subscription {subscription_id} doesn't exist in project {project_id}.");
        }

        Ok(PubSubSource {
            client,
            subscription_id: subscription_id.to_string(),
            worker_count,
        })
    }
}

#[async_trait]
impl MessageSource for PubSubSource {
    async fn receive(
        &self,
        handler: Arc<RemediationHandler>,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        let mut config = ReceiveConfig::default();
        if let Some(worker_count) = self.worker_count {
            config.worker_count = worker_count;
        }

        self.client
            .subscription(&self.subscription_id)
            .receive(
                move |message, _cancel| {
                    let handler = handler.clone();
                    async move {
                        handler.process(&PubSubDelivery(message)).await;
                    }
                },
                cancel,
                Some(config),
            )
            .await
            .with_context(|| format!("Receiving from {} failed.", self.subscription_id))
    }
}
