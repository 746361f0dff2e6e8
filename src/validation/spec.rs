//! Validation of the desired state of a ServiceInstance.
//!
//! Every check runs independently so a single request reports all of its
//! problems at once.

use crate::crd::{ParametersFromSource, RawParameters, ServiceInstanceSpec};

use super::field::{ErrorList, FieldError, FieldPath};
use super::names::NameValidator;
use super::parameters::ParameterParser;

/// Longest prefix of an inline payload echoed back in a violation.
pub const MAX_REPORTED_PARAMETERS_LEN: usize = 64;

/// Validates `ServiceInstanceSpec` values.
#[derive(Clone, Copy)]
pub struct SpecValidator<'a> {
    /// Rule applied to `externalServiceClassName`
    pub class_name: NameValidator,
    /// Rule applied to `externalServicePlanName`
    pub plan_name: NameValidator,
    /// Deserializer used to check inline parameters
    pub parameters: &'a dyn ParameterParser,
}

impl SpecValidator<'_> {
    /// Validate `spec`, attributing violations below `path`.
    ///
    /// `create` is carried for create-only rules; none exist today.
    pub fn validate(&self, spec: &ServiceInstanceSpec, path: &FieldPath, _create: bool) -> ErrorList {
        let mut errors = ErrorList::new();

        errors.extend(validate_name_field(
            &spec.external_service_class_name,
            "externalServiceClassName",
            self.class_name,
            path,
        ));
        errors.extend(validate_name_field(
            &spec.external_service_plan_name,
            "externalServicePlanName",
            self.plan_name,
            path,
        ));

        for (i, source) in spec.parameters_from.iter().enumerate() {
            errors.extend(validate_parameters_from(
                source,
                &path.child("parametersFrom").index(i),
            ));
        }

        if let Some(parameters) = &spec.parameters {
            errors.extend(self.validate_inline_parameters(parameters, &path.child("parameters")));
        }

        errors
    }

    fn validate_inline_parameters(&self, parameters: &RawParameters, path: &FieldPath) -> ErrorList {
        let mut errors = ErrorList::new();
        if parameters.is_empty() {
            errors.push(FieldError::required(
                path,
                "inline parameters must not be empty if present",
            ));
        }
        // Parser detail is not surfaced.
        if self.parameters.parse(&parameters.raw).is_err() {
            errors.push(FieldError::invalid(
                path,
                &reported_payload(&parameters.raw),
                "invalid inline parameters",
            ));
        }
        errors
    }
}

/// Render a payload for error reporting, cut to `MAX_REPORTED_PARAMETERS_LEN` characters.
fn reported_payload(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    if text.chars().count() <= MAX_REPORTED_PARAMETERS_LEN {
        return text.into_owned();
    }
    let mut cut: String = text.chars().take(MAX_REPORTED_PARAMETERS_LEN).collect();
    cut.push_str("...(truncated)");
    cut
}

fn validate_name_field(
    value: &str,
    field: &str,
    name_fn: NameValidator,
    path: &FieldPath,
) -> ErrorList {
    let path = path.child(field);
    if value.is_empty() {
        return vec![FieldError::required(&path, &format!("{} is required", field))];
    }
    name_fn(value, false)
        .iter()
        .map(|msg| FieldError::invalid(&path, value, msg))
        .collect()
}

fn validate_parameters_from(source: &ParametersFromSource, path: &FieldPath) -> ErrorList {
    let mut errors = ErrorList::new();
    match &source.secret_key_ref {
        Some(secret) => {
            let secret_path = path.child("secretKeyRef");
            if secret.name.is_empty() {
                errors.push(FieldError::required(
                    &secret_path.child("name"),
                    "name is required",
                ));
            }
            if secret.key.is_empty() {
                errors.push(FieldError::required(
                    &secret_path.child("key"),
                    "key is required",
                ));
            }
        }
        None => errors.push(FieldError::required(
            path,
            "source must not be empty if present",
        )),
    }
    errors
}
