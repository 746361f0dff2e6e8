//! service-catalog-webhook library crate
//!
//! This module exports the ServiceInstance CRD, the validation engine, and
//! the admission webhook and health servers built on top of it.

pub mod config;
pub mod crd;
pub mod error;
pub mod health;
pub mod validation;
pub mod webhooks;

pub use config::WebhookConfig;
pub use error::{Error, Result};
pub use health::HealthState;
pub use validation::ServiceInstanceValidator;
pub use webhooks::run_webhook_server;
