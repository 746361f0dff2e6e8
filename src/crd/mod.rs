//! Custom Resource Definitions for the service catalog webhook.
//!
//! - `ServiceInstance`: a provisioned instance of an external service

mod service_instance;

pub use service_instance::*;
