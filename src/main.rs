//! service-catalog-webhook - admission validation for ServiceInstance resources.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Loads configuration from the environment
//! - Starts the health server and, when certificates exist, the webhook server
//!
//! `service-catalog-webhook crd` prints the CustomResourceDefinition instead.

use std::sync::Arc;
use std::time::Duration;

use kube::CustomResourceExt;
use tokio::signal;
use tracing::{error, info, warn};

use service_catalog_webhook::crd::ServiceInstance;
use service_catalog_webhook::health::{HealthState, run_health_server};
use service_catalog_webhook::webhooks::WebhookState;
use service_catalog_webhook::{ServiceInstanceValidator, WebhookConfig, run_webhook_server};

/// Grace period for in-flight admission requests during shutdown
const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::args().nth(1).as_deref() == Some("crd") {
        println!("{}", serde_json::to_string_pretty(&ServiceInstance::crd())?);
        return Ok(());
    }

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("service_catalog_webhook=info".parse()?),
        )
        .json()
        .init();

    let config = WebhookConfig::from_env()?;
    let pod_name = std::env::var("POD_NAME").unwrap_or_else(|_| {
        warn!("POD_NAME not set, using hostname");
        hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    });
    info!(
        instance = %pod_name,
        webhook_port = config.webhook_port,
        health_port = config.health_port,
        "Starting service-catalog-webhook"
    );

    let health_state = Arc::new(HealthState::new());

    // Start health server immediately so probes answer during startup
    let health_handle = {
        let health_state = health_state.clone();
        let port = config.health_port;
        tokio::spawn(async move {
            if let Err(e) = run_health_server(health_state, port).await {
                error!("Health server error: {}", e);
            }
        })
    };

    let webhook_handle = if config.tls_available() {
        info!("TLS certificates found, starting webhook server");
        let state = Arc::new(WebhookState::new(
            ServiceInstanceValidator::new(),
            Some(health_state.clone()),
        ));
        let webhook_config = config.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = run_webhook_server(&webhook_config, state).await {
                error!("Webhook server error: {}", e);
            }
        }))
    } else {
        warn!(
            cert_path = %config.cert_path.display(),
            key_path = %config.key_path.display(),
            "Webhook certificates not found, webhook server disabled"
        );
        None
    };

    tokio::select! {
        result = health_handle => {
            if let Err(e) = result {
                error!("Health server task panicked: {}", e);
            }
        }
        result = async {
            match webhook_handle {
                Some(handle) => handle.await,
                None => std::future::pending().await,
            }
        } => {
            if let Err(e) = result {
                error!("Webhook server task panicked: {}", e);
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, initiating graceful shutdown...");

            // Mark as not ready so the API server stops routing requests here
            health_state.set_ready(false).await;
            info!(
                "Waiting {}s for in-flight admission requests to complete...",
                SHUTDOWN_GRACE_PERIOD_SECS
            );
            tokio::time::sleep(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)).await;
        }
    }

    info!("Webhook stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the process cannot shut
/// down gracefully without them.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
