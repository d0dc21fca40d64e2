use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;

use crate::kubernetes::kubers::ClusterLogin;
use crate::kubernetes::model::ClusterName;

/// Cordons Kubernetes nodes reported unhealthy on a Pub/Sub subscription.
#[derive(Debug, Parser)]
#[command(name = "node-cordoner", version)]
pub struct Settings {
    /// Google Cloud project owning the subscription
    #[arg(long, env = "PROJECT_ID", value_parser = NonEmptyStringValueParser::new())]
    pub project_id: String,

    /// Pub/Sub subscription carrying incident notifications
    #[arg(long, env = "SUB_ID", value_parser = NonEmptyStringValueParser::new())]
    pub subscription_id: String,

    /// Nodes whose name contains this value are cordoned, others are ignored
    #[arg(long, env = "CLUSTER", value_parser = NonEmptyStringValueParser::new())]
    pub cluster: String,

    /// Log in with a kubeconfig instead of the pod service account
    #[arg(long, env = "IS_LOCAL", value_parser = parse_bool, action = clap::ArgAction::Set)]
    pub is_local: bool,

    /// Path to the kubeconfig file, only used with IS_LOCAL
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Number of concurrent subscriber workers
    #[arg(long, env = "WORKER_COUNT", value_parser = clap::value_parser!(u16).range(1..))]
    pub worker_count: Option<u16>,

    /// Log failures at error level once a message has been delivered this many times
    #[arg(long, env = "MAX_DELIVERY_ATTEMPTS", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_delivery_attempts: Option<u16>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

/// What the per-message pipeline needs. Built once at startup, never mutated.
#[derive(Clone, Debug)]
pub struct RemediationConfig {
    pub cluster: ClusterName,
    pub max_delivery_attempts: Option<usize>,
}

impl Settings {
    pub fn cluster_login(&self) -> ClusterLogin {
        if self.is_local {
            ClusterLogin::Local {
                kubeconfig: self.kubeconfig.clone(),
            }
        } else {
            ClusterLogin::InCluster
        }
    }

    pub fn remediation_config(&self) -> RemediationConfig {
        RemediationConfig {
            cluster: ClusterName::new(self.cluster.as_str()),
            max_delivery_attempts: self.max_delivery_attempts.map(usize::from),
        }
    }

    pub fn worker_count(&self) -> Option<usize> {
        self.worker_count.map(usize::from)
    }
}

/// Accepts the usual boolean spellings: 1, t, true, 0, f, false in lower, upper or title case.
pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(format!("expected a boolean, got `{other}`")),
    }
}
