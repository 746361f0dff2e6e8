//! Guards that compare the stored and proposed versions of an instance.
//!
//! The stored generation only advances when the spec changes. If the
//! controller has not reconciled the previous bump yet, a further spec edit
//! would race the reconciliation loop and is refused.

use crate::crd::ServiceInstance;

use super::field::{ErrorList, FieldError, FieldPath};

/// Generation of an instance; an unset generation counts as 0.
fn generation(instance: &ServiceInstance) -> i64 {
    instance.metadata.generation.unwrap_or_default()
}

/// Generation last reconciled by the controller; no status counts as 0.
fn reconciled_generation(instance: &ServiceInstance) -> i64 {
    instance
        .status
        .as_ref()
        .map(|s| s.reconciled_generation)
        .unwrap_or_default()
}

/// Whether the stored instance still has an unreconciled spec change.
pub fn update_in_progress(old: &ServiceInstance) -> bool {
    reconciled_generation(old) != generation(old)
}

/// Reject a spec edit while a previous edit is still being reconciled.
pub fn validate_update_allowed(new: &ServiceInstance, old: &ServiceInstance) -> ErrorList {
    let mut errors = ErrorList::new();
    if generation(old) != generation(new) && update_in_progress(old) {
        errors.push(FieldError::forbidden(
            &FieldPath::new("spec"),
            "Another update for this service instance is in progress",
        ));
    }
    errors
}

/// Hook for status-write conflicts. No status write is refused today.
pub fn validate_status_update_allowed(_new: &ServiceInstance, _old: &ServiceInstance) -> ErrorList {
    ErrorList::new()
}
