use std::sync::Arc;

use crate::kubernetes::model::{NodeClient, NodeName, Schedulability};

pub type SharedNodeClient = Arc<dyn NodeClient + Send + Sync + 'static>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CordonOutcome {
    Cordoned,
    Failed,
}

/// Cordoner marks a node unschedulable and reports a plain outcome.
/// It holds no per-call state, so one instance serves every in-flight message.
pub struct Cordoner {
    node_client: SharedNodeClient,
}

impl Cordoner {
    pub fn new(node_client: SharedNodeClient) -> Cordoner {
        Cordoner { node_client }
    }

    /// Single attempt. A response that doesn't show the node as unschedulable counts as a failure.
    pub async fn cordon(&self, node: &NodeName) -> CordonOutcome {
        match self.node_client.mark_unschedulable(node).await {
            Ok(Schedulability::Unschedulable) => {
                tracing::info!(%node, "Node cordoned");
                CordonOutcome::Cordoned
            }
            Ok(Schedulability::Schedulable) => {
                tracing::warn!(%node, "Patch accepted but node is still schedulable");
                CordonOutcome::Failed
            }
            Err(error) => {
                tracing::warn!(%node, error = %format!("{error:#}"), "Cordon request failed");
                CordonOutcome::Failed
            }
        }
    }
}
