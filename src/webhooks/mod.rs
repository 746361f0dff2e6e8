//! Webhook module for validating admission requests.
//!
//! A single ValidatingAdmissionWebhook covers ServiceInstance creates, spec
//! updates and status updates.

pub mod admission;
mod server;

pub use admission::{ValidationContext, ValidationResult, validate_all};
pub use server::{VALIDATE_PATH, WebhookState, create_webhook_router, run_webhook_server};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
