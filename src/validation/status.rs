//! Validation of the observed state of a ServiceInstance.

use crate::crd::{ConditionStatus, ConditionType, ServiceInstanceStatus};

use super::field::{ErrorList, FieldError, FieldPath};

/// Validate `status`, attributing violations below `path`.
///
/// Only the async-operation/Ready invariant is enforced. The remaining
/// status fields are written by the controller and are not checked yet.
pub fn validate_status(status: &ServiceInstanceStatus, path: &FieldPath, _create: bool) -> ErrorList {
    let mut errors = ErrorList::new();

    // Ready and an outstanding async operation are mutually exclusive
    if status.async_op_in_progress {
        for condition in &status.conditions {
            if condition.r#type == ConditionType::Ready && condition.status == ConditionStatus::True {
                errors.push(FieldError::forbidden(
                    &path.child("Conditions"),
                    "Can not set ServiceInstanceConditionReady to true when an async operation is in progress",
                ));
            }
        }
    }

    errors
}
