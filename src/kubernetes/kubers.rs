use std::path::PathBuf;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use kube::api::{Patch, PatchParams};
use kube_client::config::{InClusterError, KubeConfigOptions, Kubeconfig, KubeconfigError};
use kube_client::{Api, Client, Config};

use crate::kubernetes::model::{NodeClient, NodeName, Schedulability};

/// How the process authenticates against the API server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClusterLogin {
    /// Out-of-cluster credentials. Without an explicit path the usual
    /// `KUBECONFIG` / `~/.kube/config` lookup applies.
    Local { kubeconfig: Option<PathBuf> },
    /// Service account token mounted into the pod.
    InCluster,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Couldn't load kubeconfig.")]
    Kubeconfig(#[from] KubeconfigError),
    #[error("Couldn't load in-cluster configuration.")]
    InCluster(#[from] InClusterError),
    #[error("Couldn't build Kubernetes client.")]
    Client(#[from] kube_client::Error),
}

pub struct KubeRsBased {
    client: Client,
}

impl KubeRsBased {
    pub async fn login(login: &ClusterLogin) -> Result<KubeRsBased, LoginError> {
        let config = match login {
            ClusterLogin::Local {
                kubeconfig: Some(path),
            } => {
                let kubeconfig = Kubeconfig::read_from(path)?;
                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?
            }
            ClusterLogin::Local { kubeconfig: None } => {
                Config::from_kubeconfig(&KubeConfigOptions::default()).await?
            }
            ClusterLogin::InCluster => Config::incluster()?,
        };
        let client = Client::try_from(config)?;
        Ok(KubeRsBased { client })
    }
}

#[async_trait]
impl NodeClient for KubeRsBased {
    async fn mark_unschedulable(&self, node: &NodeName) -> anyhow::Result<Schedulability> {
        // Client clones share the underlying connection pool.
        let nodes: Api<Node> = Api::all(self.client.clone());
        let patch = serde_json::json!({ "spec": { "unschedulable": true } });
        let patched = nodes
            .patch(node.as_str(), &PatchParams::default(), &Patch::Merge(&patch))
            .await?;

        let unschedulable = patched
            .spec
            .and_then(|spec| spec.unschedulable)
            .unwrap_or(false);
        if unschedulable {
            Ok(Schedulability::Unschedulable)
        } else {
            Ok(Schedulability::Schedulable)
        }
    }
}
