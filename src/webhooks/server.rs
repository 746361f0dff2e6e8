//! Admission webhook server.
//!
//! Provides the HTTP endpoint for the ServiceInstance validating webhook.
//!
//! To enable the webhook:
//! 1. Deploy cert-manager for TLS certificates
//! 2. Create a ValidatingWebhookConfiguration covering `serviceinstances`
//!    and `serviceinstances/status`
//! 3. Mount the TLS certificate secret to the pod at /etc/webhook/certs/
//!
//! The webhook server starts automatically when certificates are present.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use axum_server::tls_rustls::RustlsConfig;
use kube::Resource;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview};
use tracing::{debug, error, info, warn};

use super::admission::{ValidationContext, validate_all};
use crate::config::WebhookConfig;
use crate::crd::ServiceInstance;
use crate::error::{Error, Result};
use crate::health::HealthState;
use crate::validation::ServiceInstanceValidator;

/// Path of the ServiceInstance validation endpoint
pub const VALIDATE_PATH: &str = "/validate-serviceinstance";

/// Shared state for webhook handlers
pub struct WebhookState {
    /// Validator applied to every request
    pub validator: ServiceInstanceValidator,
    /// Optional health state for metrics
    pub health_state: Option<Arc<HealthState>>,
}

impl WebhookState {
    pub fn new(validator: ServiceInstanceValidator, health_state: Option<Arc<HealthState>>) -> Self {
        Self {
            validator,
            health_state,
        }
    }
}

/// Create a denial response with reason embedded in message.
/// kube-rs deny() only sets status.message, so we format as "[reason] message"
fn deny_with_reason<T: Resource<DynamicType = ()>>(
    request: &AdmissionRequest<T>,
    message: &str,
    reason: &str,
) -> AdmissionReview<kube::core::DynamicObject> {
    let full_message = format!("[{}] {}", reason, message);
    AdmissionResponse::from(request)
        .deny(full_message)
        .into_review()
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(VALIDATE_PATH, post(validate_service_instance))
        .with_state(state)
}

/// ServiceInstance admission webhook handler
async fn validate_service_instance(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<ServiceInstance>>,
) -> impl IntoResponse {
    let started = Instant::now();
    let request: AdmissionRequest<ServiceInstance> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            );
        }
    };

    let uid = &request.uid;
    debug!(
        uid = %uid,
        operation = ?request.operation,
        sub_resource = ?request.sub_resource,
        namespace = ?request.namespace,
        name = %request.name,
        dry_run = request.dry_run,
        "Processing admission request"
    );

    let ctx = ValidationContext {
        operation: &request.operation,
        sub_resource: request.sub_resource.as_deref(),
        resource: request.object.as_ref(),
        old_resource: request.old_object.as_ref(),
    };
    let result = validate_all(&state.validator, &ctx);

    if let Some(health) = &state.health_state {
        let operation = format!("{:?}", request.operation);
        health.metrics.record_admission(
            &operation,
            result.allowed,
            started.elapsed().as_secs_f64(),
        );
        health.metrics.record_violations(&result.errors);
    }

    if !result.allowed {
        let reason = result
            .reason
            .unwrap_or_else(|| "ValidationFailed".to_string());
        let message = result
            .message
            .unwrap_or_else(|| "Validation failed".to_string());
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        warn!(
            uid = %uid,
            reason = %reason,
            violations = result.errors.len(),
            fields = ?fields,
            "Admission request denied"
        );
        return (
            StatusCode::OK,
            Json(deny_with_reason(&request, &message, &reason)),
        );
    }

    info!(uid = %uid, operation = ?request.operation, "Admission request allowed");
    (
        StatusCode::OK,
        Json(AdmissionResponse::from(&request).into_review()),
    )
}

/// Run the webhook server with TLS
///
/// Binds to 0.0.0.0 on the configured port and serves the
/// /validate-serviceinstance endpoint. TLS certificates are loaded from the
/// configured PEM files; the health state is marked ready only once they load.
pub async fn run_webhook_server(config: &WebhookConfig, state: Arc<WebhookState>) -> Result<()> {
    let health_state = state.health_state.clone();
    let app = create_webhook_router(state);

    let tls = RustlsConfig::from_pem_file(config.cert_path.clone(), config.key_path.clone())
        .await
        .map_err(|e| Error::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));
    info!(port = config.webhook_port, "Webhook server listening with TLS");

    if let Some(health) = &health_state {
        health.set_ready(true).await;
    }

    let served = axum_server::bind_rustls(addr, tls)
        .serve(app.into_make_service())
        .await;
    if let Err(e) = served {
        if let Some(health) = &health_state {
            health.set_ready(false).await;
        }
        return Err(Error::Server(e.to_string()));
    }

    Ok(())
}
