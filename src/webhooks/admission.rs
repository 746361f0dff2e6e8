//! Mapping of admission requests onto validator entry points.
//!
//! - CREATE: full validation of the new object
//! - UPDATE of the `status` subresource: status-update validation
//! - any other UPDATE: spec-update validation, including the conflict guard
//! - DELETE and CONNECT: always allowed

use kube::core::admission::Operation;

use crate::crd::ServiceInstance;
use crate::validation::{ErrorList, ServiceInstanceValidator, summarize};

/// Subresource name used by the controller for status writes.
pub const STATUS_SUBRESOURCE: &str = "status";

/// Result of a validation check
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub allowed: bool,
    /// Reason for denial (if not allowed)
    pub reason: Option<String>,
    /// Detailed message (if not allowed)
    pub message: Option<String>,
    /// Field violations behind a denial
    pub errors: ErrorList,
}

impl ValidationResult {
    /// Create an allowed result
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            message: None,
            errors: ErrorList::new(),
        }
    }

    /// Create a denied result
    pub fn denied(reason: &str, message: &str) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.to_string()),
            message: Some(message.to_string()),
            errors: ErrorList::new(),
        }
    }

    /// Allow when `errors` is empty, deny with every violation otherwise
    pub fn from_errors(errors: ErrorList) -> Self {
        if errors.is_empty() {
            return Self::allowed();
        }
        Self {
            allowed: false,
            reason: Some("FieldValidationFailed".to_string()),
            message: Some(summarize(&errors)),
            errors,
        }
    }
}

/// Context for validation
pub struct ValidationContext<'a> {
    /// The admission operation
    pub operation: &'a Operation,
    /// Subresource being written, if any
    pub sub_resource: Option<&'a str>,
    /// The resource being validated
    pub resource: Option<&'a ServiceInstance>,
    /// The stored resource (for UPDATE operations)
    pub old_resource: Option<&'a ServiceInstance>,
}

impl ValidationContext<'_> {
    /// Check if this is a write to the status subresource
    pub fn is_status_update(&self) -> bool {
        *self.operation == Operation::Update && self.sub_resource == Some(STATUS_SUBRESOURCE)
    }
}

/// Decide an admission request
pub fn validate_all(validator: &ServiceInstanceValidator, ctx: &ValidationContext<'_>) -> ValidationResult {
    match ctx.operation {
        Operation::Delete | Operation::Connect => ValidationResult::allowed(),
        Operation::Create => match ctx.resource {
            Some(resource) => ValidationResult::from_errors(validator.validate_create(resource)),
            None => ValidationResult::denied("InvalidRequest", "Missing object in request"),
        },
        Operation::Update => {
            let (Some(resource), Some(old)) = (ctx.resource, ctx.old_resource) else {
                return ValidationResult::denied(
                    "InvalidRequest",
                    "UPDATE requests must carry both object and oldObject",
                );
            };
            if ctx.is_status_update() {
                ValidationResult::from_errors(validator.validate_status_update(resource, old))
            } else {
                ValidationResult::from_errors(validator.validate_update(resource, old))
            }
        }
    }
}
