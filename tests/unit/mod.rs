// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Unit tests for service-catalog-webhook.
//!
//! These tests run without a Kubernetes cluster and exercise the public
//! validation API the admission webhook is built on.

mod scenario_tests {
    use service_catalog_webhook::ServiceInstanceValidator;
    use service_catalog_webhook::crd::{
        ParametersFromSource, RawParameters, SecretKeyReference, ServiceInstance,
        ServiceInstanceCondition, ServiceInstanceSpec, ServiceInstanceStatus,
    };
    use service_catalog_webhook::validation::ErrorKind;

    fn instance(class: &str, plan: &str) -> ServiceInstance {
        let mut instance = ServiceInstance::new(
            "my-instance",
            ServiceInstanceSpec {
                external_service_class_name: class.to_string(),
                external_service_plan_name: plan.to_string(),
                ..Default::default()
            },
        );
        instance.metadata.namespace = Some("default".to_string());
        instance.metadata.generation = Some(1);
        instance
    }

    fn at_generation(mut instance: ServiceInstance, generation: i64, reconciled: i64) -> ServiceInstance {
        instance.metadata.generation = Some(generation);
        instance
            .status
            .get_or_insert_with(ServiceInstanceStatus::default)
            .reconciled_generation = reconciled;
        instance
    }

    #[test]
    fn test_empty_class_name_yields_single_required() {
        let errors = ServiceInstanceValidator::new().validate_create(&instance("", "plan-1"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Required);
        assert!(errors[0].field.ends_with("externalServiceClassName"));
    }

    #[test]
    fn test_ready_while_async_yields_single_forbidden() {
        let mut si = instance("class-1", "plan-1");
        si.status = Some(ServiceInstanceStatus {
            async_op_in_progress: true,
            conditions: vec![ServiceInstanceCondition::ready(true, "Provisioned", "")],
            ..Default::default()
        });
        let errors = ServiceInstanceValidator::new().validate_create(&si);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Forbidden);
        assert_eq!(errors[0].field, "Status.Conditions");
    }

    #[test]
    fn test_concurrent_edit_rejected_until_reconciled() {
        let validator = ServiceInstanceValidator::new();

        let old = at_generation(instance("class-1", "plan-1"), 2, 1);
        let new = at_generation(instance("class-1", "plan-2"), 3, 1);
        let errors = validator.validate_update(&new, &old);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Forbidden);
        assert!(errors[0].detail.contains("Another update"));
        assert!(errors[0].detail.contains("in progress"));

        let old = at_generation(instance("class-1", "plan-1"), 2, 2);
        let new = at_generation(instance("class-1", "plan-2"), 3, 2);
        assert!(validator.validate_update(&new, &old).is_empty());
    }

    #[test]
    fn test_secret_key_ref_missing_key() {
        let mut si = instance("class-1", "plan-1");
        si.spec.parameters_from = vec![ParametersFromSource {
            secret_key_ref: Some(SecretKeyReference {
                name: "s1".to_string(),
                key: String::new(),
            }),
        }];
        let errors = ServiceInstanceValidator::new().validate_create(&si);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Required);
        assert!(errors[0].field.ends_with("secretKeyRef.key"));
    }

    #[test]
    fn test_bad_inline_parameters() {
        let mut si = instance("class-1", "plan-1");
        si.spec.parameters = Some(RawParameters::new(b"not-json".to_vec()));
        let errors = ServiceInstanceValidator::new().validate_create(&si);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Invalid);
        assert_eq!(errors[0].detail, "invalid inline parameters");
    }

    #[test]
    fn test_status_update_after_provisioning() {
        let validator = ServiceInstanceValidator::new();
        let old = at_generation(instance("class-1", "plan-1"), 1, 0);
        let mut new = at_generation(instance("class-1", "plan-1"), 1, 1);
        if let Some(status) = new.status.as_mut() {
            status.conditions = vec![ServiceInstanceCondition::ready(true, "Provisioned", "")];
        }
        assert!(validator.validate_status_update(&new, &old).is_empty());
    }
}

mod admission_tests {
    use service_catalog_webhook::ServiceInstanceValidator;
    use service_catalog_webhook::crd::{ServiceInstance, ServiceInstanceSpec};
    use service_catalog_webhook::webhooks::{Operation, ValidationContext, validate_all};

    fn instance_from_json(json: &str) -> ServiceInstance {
        serde_json::from_str(json).expect("valid ServiceInstance JSON")
    }

    #[test]
    fn test_create_from_wire_format() {
        let si = instance_from_json(
            r#"{
                "apiVersion": "servicecatalog.k8s.io/v1beta1",
                "kind": "ServiceInstance",
                "metadata": {"name": "db", "namespace": "apps", "generation": 1},
                "spec": {
                    "externalServiceClassName": "postgresql",
                    "externalServicePlanName": "small",
                    "parametersFrom": [{"secretKeyRef": {"name": "db-params", "key": "params"}}],
                    "parameters": {"storageGB": 20}
                }
            }"#,
        );
        let ctx = ValidationContext {
            operation: &Operation::Create,
            sub_resource: None,
            resource: Some(&si),
            old_resource: None,
        };
        assert!(validate_all(&ServiceInstanceValidator::new(), &ctx).allowed);
    }

    #[test]
    fn test_denial_lists_every_violation() {
        let si = instance_from_json(
            r#"{
                "apiVersion": "servicecatalog.k8s.io/v1beta1",
                "kind": "ServiceInstance",
                "metadata": {"name": "db", "namespace": "apps"},
                "spec": {"parametersFrom": [{}], "parameters": [1, 2]}
            }"#,
        );
        let ctx = ValidationContext {
            operation: &Operation::Create,
            sub_resource: None,
            resource: Some(&si),
            old_resource: None,
        };
        let result = validate_all(&ServiceInstanceValidator::new(), &ctx);
        assert!(!result.allowed);
        assert_eq!(result.errors.len(), 4);
        let message = result.message.unwrap();
        assert!(message.contains("externalServiceClassName is required"));
        assert!(message.contains("externalServicePlanName is required"));
        assert!(message.contains("source must not be empty if present"));
        assert!(message.contains("invalid inline parameters"));
    }

    #[test]
    fn test_connect_is_allowed() {
        let si = ServiceInstance::new("db", ServiceInstanceSpec::default());
        let ctx = ValidationContext {
            operation: &Operation::Connect,
            sub_resource: None,
            resource: Some(&si),
            old_resource: None,
        };
        assert!(validate_all(&ServiceInstanceValidator::new(), &ctx).allowed);
    }
}

mod config_tests {
    use service_catalog_webhook::WebhookConfig;
    use service_catalog_webhook::config::{HEALTH_PORT, WEBHOOK_PORT};

    #[test]
    fn test_lookup_defaults() {
        let config = WebhookConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.webhook_port, WEBHOOK_PORT);
        assert_eq!(config.health_port, HEALTH_PORT);
    }
}
