//! Object metadata validation.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use super::field::{ErrorList, FieldError, FieldPath};
use super::names::{NameValidator, is_dns1123_label};

/// Validates the generic metadata every resource carries.
pub trait MetadataValidator: Send + Sync {
    /// Validate `meta`, checking the object name with `name_fn`.
    fn validate(
        &self,
        meta: &ObjectMeta,
        namespaced: bool,
        name_fn: NameValidator,
        path: &FieldPath,
    ) -> ErrorList;
}

/// Built-in metadata validator covering name, namespace and generation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectMetaValidator;

impl MetadataValidator for ObjectMetaValidator {
    fn validate(
        &self,
        meta: &ObjectMeta,
        namespaced: bool,
        name_fn: NameValidator,
        path: &FieldPath,
    ) -> ErrorList {
        let mut errors = ErrorList::new();

        let name = meta.name.as_deref().unwrap_or_default();
        let generate_name = meta.generate_name.as_deref().unwrap_or_default();

        if !generate_name.is_empty() {
            for msg in name_fn(generate_name, true) {
                errors.push(FieldError::invalid(
                    &path.child("generateName"),
                    generate_name,
                    &msg,
                ));
            }
        }

        if name.is_empty() {
            if generate_name.is_empty() {
                errors.push(FieldError::required(
                    &path.child("name"),
                    "name or generateName is required",
                ));
            }
        } else {
            for msg in name_fn(name, false) {
                errors.push(FieldError::invalid(&path.child("name"), name, &msg));
            }
        }

        let namespace = meta.namespace.as_deref().unwrap_or_default();
        if namespaced {
            if namespace.is_empty() {
                errors.push(FieldError::required(
                    &path.child("namespace"),
                    "namespace is required",
                ));
            } else {
                for msg in is_dns1123_label(namespace) {
                    errors.push(FieldError::invalid(
                        &path.child("namespace"),
                        namespace,
                        &msg,
                    ));
                }
            }
        } else if !namespace.is_empty() {
            errors.push(FieldError::forbidden(
                &path.child("namespace"),
                "not allowed on this type",
            ));
        }

        if let Some(generation) = meta.generation
            && generation < 0
        {
            errors.push(FieldError::invalid(
                &path.child("generation"),
                &generation.to_string(),
                "must be greater than or equal to 0",
            ));
        }

        errors
    }
}
