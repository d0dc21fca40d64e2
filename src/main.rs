mod configuration;
mod kubernetes;
mod notification;
mod subscription;
mod worker;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::configuration::Settings;
use crate::kubernetes::cordon::{Cordoner, SharedNodeClient};
use crate::kubernetes::kubers::KubeRsBased;
use crate::subscription::pubsub::PubSubSource;
use crate::worker::RemediationHandler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    init_tracing(&settings);

    tracing::info!("Application booting");
    let config = Arc::new(settings.remediation_config());

    let login = settings.cluster_login();
    tracing::info!(?login, "Logging into cluster");
    let node_client: SharedNodeClient = Arc::new(
        KubeRsBased::login(&login)
            .await
            .context("Cluster login failed.")?,
    );
    let source = PubSubSource::connect(
        &settings.project_id,
        &settings.subscription_id,
        settings.worker_count(),
    )
    .await?;

    let handler = Arc::new(RemediationHandler::new(
        Arc::new(Cordoner::new(node_client)),
        config,
    ));

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_shutdown_signal(cancel.clone()));

    worker::run(&source, handler, cancel).await
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| settings.log_level.clone().into());

    if settings.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

// In-flight messages still finish their cordon and acknowledgement after this fires.
async fn cancel_on_shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(error) => {
                tracing::warn!(%error, "Couldn't listen for SIGTERM");
                let _ = ctrl_c.await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }

    tracing::info!("Shutdown requested, draining in-flight messages");
    cancel.cancel();
}
