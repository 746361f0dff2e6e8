//! Validation of ServiceInstance resources.
//!
//! [`ServiceInstanceValidator`] exposes one entry point per kind of write:
//! - create: metadata, spec and status of the new object
//! - spec update: the update-conflict guard, then full validation of the new object
//! - status update: the status-update guard, then full validation of the new object
//!
//! Every entry point returns the complete list of violations; an empty list
//! means the write may proceed.

pub mod field;
pub mod metadata;
pub mod names;
pub mod parameters;
pub mod spec;
pub mod status;
pub mod update;

use std::sync::Arc;

pub use field::{ErrorKind, ErrorList, FieldError, FieldPath, summarize};
pub use metadata::{MetadataValidator, ObjectMetaValidator};
pub use names::NameValidator;
pub use parameters::{JsonParameterParser, ParameterError, ParameterParser};
pub use spec::SpecValidator;

use crate::crd::{ServiceInstance, ServiceInstanceStatus};

/// Composes the metadata, spec, status and update checks for ServiceInstance.
#[derive(Clone)]
pub struct ServiceInstanceValidator {
    instance_name: NameValidator,
    class_name: NameValidator,
    plan_name: NameValidator,
    metadata: Arc<dyn MetadataValidator>,
    parameters: Arc<dyn ParameterParser>,
}

impl Default for ServiceInstanceValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceInstanceValidator {
    /// Create a validator with the standard rules: DNS-subdomain names,
    /// built-in metadata checks and JSON inline parameters.
    pub fn new() -> Self {
        Self {
            instance_name: names::name_is_dns_subdomain,
            class_name: names::validate_service_class_name,
            plan_name: names::validate_service_plan_name,
            metadata: Arc::new(ObjectMetaValidator),
            parameters: Arc::new(JsonParameterParser),
        }
    }

    /// Replace the rule applied to `metadata.name`.
    pub fn with_name_validator(mut self, name_fn: NameValidator) -> Self {
        self.instance_name = name_fn;
        self
    }

    /// Replace the rule applied to `spec.externalServiceClassName`.
    pub fn with_class_name_validator(mut self, name_fn: NameValidator) -> Self {
        self.class_name = name_fn;
        self
    }

    /// Replace the rule applied to `spec.externalServicePlanName`.
    pub fn with_plan_name_validator(mut self, name_fn: NameValidator) -> Self {
        self.plan_name = name_fn;
        self
    }

    /// Replace the metadata validator.
    pub fn with_metadata_validator(mut self, metadata: impl MetadataValidator + 'static) -> Self {
        self.metadata = Arc::new(metadata);
        self
    }

    /// Replace the inline parameter deserializer.
    pub fn with_parameter_parser(mut self, parser: impl ParameterParser + 'static) -> Self {
        self.parameters = Arc::new(parser);
        self
    }

    /// Validate a newly created instance.
    pub fn validate_create(&self, instance: &ServiceInstance) -> ErrorList {
        self.validate_instance(instance, true)
    }

    /// Validate a change to an instance's spec.
    pub fn validate_update(&self, new: &ServiceInstance, old: &ServiceInstance) -> ErrorList {
        let mut errors = update::validate_update_allowed(new, old);
        errors.extend(self.validate_instance(new, false));
        errors
    }

    /// Validate a write to an instance's status subresource.
    pub fn validate_status_update(&self, new: &ServiceInstance, old: &ServiceInstance) -> ErrorList {
        let mut errors = update::validate_status_update_allowed(new, old);
        errors.extend(self.validate_instance(new, false));
        errors
    }

    fn spec_validator(&self) -> SpecValidator<'_> {
        SpecValidator {
            class_name: self.class_name,
            plan_name: self.plan_name,
            parameters: self.parameters.as_ref(),
        }
    }

    fn validate_instance(&self, instance: &ServiceInstance, create: bool) -> ErrorList {
        let mut errors = self.metadata.validate(
            &instance.metadata,
            true,
            self.instance_name,
            &FieldPath::new("metadata"),
        );
        errors.extend(
            self.spec_validator()
                .validate(&instance.spec, &FieldPath::new("Spec"), create),
        );

        let default_status = ServiceInstanceStatus::default();
        let instance_status = instance.status.as_ref().unwrap_or(&default_status);
        errors.extend(status::validate_status(
            instance_status,
            &FieldPath::new("Status"),
            create,
        ));
        errors
    }
}
