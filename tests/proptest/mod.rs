// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for service-catalog-webhook.
//!
//! Uses proptest to generate random inputs and verify invariants.

use proptest::prelude::*;

use service_catalog_webhook::ServiceInstanceValidator;
use service_catalog_webhook::crd::{
    ConditionStatus, ConditionType, ParametersFromSource, RawParameters, SecretKeyReference,
    ServiceInstance, ServiceInstanceCondition, ServiceInstanceSpec, ServiceInstanceStatus,
};
use service_catalog_webhook::validation::names::is_dns1123_subdomain;
use service_catalog_webhook::validation::ErrorKind;

/// Strategy for generating valid DNS-1123 subdomains.
fn valid_name() -> impl Strategy<Value = String> {
    "[a-z0-9]([-a-z0-9]{0,20}[a-z0-9])?(\\.[a-z0-9]([-a-z0-9]{0,10}[a-z0-9])?){0,3}"
}

/// Strategy for generating arbitrary, possibly invalid names.
fn any_name() -> impl Strategy<Value = String> {
    prop_oneof![valid_name(), "[ -~]{0,40}"]
}

/// Strategy for generating parametersFrom entries, including empty sources.
fn any_parameters_from() -> impl Strategy<Value = ParametersFromSource> {
    prop_oneof![
        Just(ParametersFromSource::default()),
        ("[a-z]{0,3}", "[a-z]{0,3}").prop_map(|(name, key)| ParametersFromSource {
            secret_key_ref: Some(SecretKeyReference { name, key }),
        }),
    ]
}

/// Strategy for generating inline parameter payloads.
fn any_parameters() -> impl Strategy<Value = Option<RawParameters>> {
    prop_oneof![
        Just(None),
        Just(Some(RawParameters::default())),
        Just(Some(RawParameters::new(br#"{"a":1}"#.to_vec()))),
        proptest::collection::vec(any::<u8>(), 1..16).prop_map(|b| Some(RawParameters::new(b))),
    ]
}

fn any_condition_status() -> impl Strategy<Value = ConditionStatus> {
    prop_oneof![
        Just(ConditionStatus::True),
        Just(ConditionStatus::False),
        Just(ConditionStatus::Unknown),
    ]
}

fn any_condition() -> impl Strategy<Value = ServiceInstanceCondition> {
    (
        prop_oneof![Just(ConditionType::Ready), Just(ConditionType::Failed)],
        any_condition_status(),
    )
        .prop_map(|(t, s)| ServiceInstanceCondition::new(t, s, "", ""))
}

fn any_instance() -> impl Strategy<Value = ServiceInstance> {
    (
        any_name(),
        any_name(),
        proptest::collection::vec(any_parameters_from(), 0..4),
        any_parameters(),
        any::<bool>(),
        proptest::collection::vec(any_condition(), 0..4),
    )
        .prop_map(|(class, plan, parameters_from, parameters, async_op, conditions)| {
            let mut instance = ServiceInstance::new(
                "instance",
                ServiceInstanceSpec {
                    external_service_class_name: class,
                    external_service_plan_name: plan,
                    parameters_from,
                    parameters,
                    ..Default::default()
                },
            );
            instance.metadata.namespace = Some("default".to_string());
            instance.status = Some(ServiceInstanceStatus {
                async_op_in_progress: async_op,
                conditions,
                ..Default::default()
            });
            instance
        })
}

fn with_generation(mut instance: ServiceInstance, generation: i64, reconciled: i64) -> ServiceInstance {
    instance.metadata.generation = Some(generation);
    if let Some(status) = instance.status.as_mut() {
        status.reconciled_generation = reconciled;
    }
    instance
}

proptest! {
    /// Property: every generated valid name passes the subdomain check.
    #[test]
    fn valid_names_accepted(name in valid_name()) {
        prop_assert!(is_dns1123_subdomain(&name).is_empty());
    }

    /// Property: validating the same object twice yields the same list.
    #[test]
    fn validation_is_deterministic(instance in any_instance()) {
        let validator = ServiceInstanceValidator::new();
        prop_assert_eq!(validator.validate_create(&instance), validator.validate_create(&instance));
    }

    /// Property: an empty name yields exactly one violation on that field, and it is Required.
    #[test]
    fn empty_names_only_required(instance in any_instance()) {
        let errors = ServiceInstanceValidator::new().validate_create(&instance);
        for (value, field) in [
            (&instance.spec.external_service_class_name, "Spec.externalServiceClassName"),
            (&instance.spec.external_service_plan_name, "Spec.externalServicePlanName"),
        ] {
            let on_field: Vec<_> = errors.iter().filter(|e| e.field == field).collect();
            if value.is_empty() {
                prop_assert_eq!(on_field.len(), 1);
                prop_assert_eq!(on_field[0].kind, ErrorKind::Required);
            } else {
                prop_assert!(on_field.iter().all(|e| e.kind == ErrorKind::Invalid));
            }
        }
    }

    /// Property: one violation per missing secret field, one per sourceless entry.
    #[test]
    fn parameters_from_violation_count(instance in any_instance()) {
        let expected: usize = instance
            .spec
            .parameters_from
            .iter()
            .map(|p| match &p.secret_key_ref {
                Some(s) => usize::from(s.name.is_empty()) + usize::from(s.key.is_empty()),
                None => 1,
            })
            .sum();
        let errors = ServiceInstanceValidator::new().validate_create(&instance);
        let actual = errors
            .iter()
            .filter(|e| e.field.starts_with("Spec.parametersFrom"))
            .count();
        prop_assert_eq!(actual, expected);
        prop_assert!(errors
            .iter()
            .filter(|e| e.field.starts_with("Spec.parametersFrom"))
            .all(|e| e.kind == ErrorKind::Required));
    }

    /// Property: empty inline parameters always yield a Required violation.
    #[test]
    fn empty_parameters_required(instance in any_instance()) {
        let errors = ServiceInstanceValidator::new().validate_create(&instance);
        let required = errors
            .iter()
            .filter(|e| e.field == "Spec.parameters" && e.kind == ErrorKind::Required)
            .count();
        let empty = instance.spec.parameters.as_ref().is_some_and(|p| p.is_empty());
        prop_assert_eq!(required, usize::from(empty));
        let invalid = errors
            .iter()
            .filter(|e| e.field == "Spec.parameters" && e.kind == ErrorKind::Invalid)
            .count();
        prop_assert!(invalid <= 1);
    }

    /// Property: Forbidden status violations appear only with an async op and a Ready=True condition.
    #[test]
    fn ready_async_exclusion(instance in any_instance()) {
        let status = instance.status.clone().unwrap_or_default();
        let ready_true = status
            .conditions
            .iter()
            .filter(|c| c.r#type == ConditionType::Ready && c.status == ConditionStatus::True)
            .count();
        let expected = if status.async_op_in_progress { ready_true } else { 0 };
        let errors = ServiceInstanceValidator::new().validate_create(&instance);
        let forbidden = errors
            .iter()
            .filter(|e| e.field == "Status.Conditions" && e.kind == ErrorKind::Forbidden)
            .count();
        prop_assert_eq!(forbidden, expected);
    }

    /// Property: the conflict guard fires exactly when the generation moves
    /// while the stored object is unreconciled.
    #[test]
    fn update_guard_matches_rule(
        instance in any_instance(),
        old_gen in 0..5i64,
        new_gen in 0..5i64,
        reconciled in 0..5i64,
    ) {
        let old = with_generation(instance.clone(), old_gen, reconciled);
        let new = with_generation(instance, new_gen, reconciled);
        let validator = ServiceInstanceValidator::new();

        let guarded = validator
            .validate_update(&new, &old)
            .iter()
            .filter(|e| e.field == "spec" && e.kind == ErrorKind::Forbidden)
            .count();
        let expected = usize::from(old_gen != new_gen && reconciled != old_gen);
        prop_assert_eq!(guarded, expected);

        // Status writes never trip the guard
        let status_guarded = validator
            .validate_status_update(&new, &old)
            .iter()
            .filter(|e| e.field == "spec")
            .count();
        prop_assert_eq!(status_guarded, 0);
    }
}
