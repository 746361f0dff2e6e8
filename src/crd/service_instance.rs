//! ServiceInstance Custom Resource Definition.
//!
//! A ServiceInstance records a request to provision an instance of an
//! external service, identified by a service class and plan name. The
//! catalog controller reconciles the instance and reports progress through
//! the status conditions.

use std::borrow::Cow;
use std::fmt;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// ServiceInstance is a custom resource describing a provisioned service.
///
/// Example:
/// ```yaml
/// apiVersion: servicecatalog.k8s.io/v1beta1
/// kind: ServiceInstance
/// metadata:
///   name: my-database
///   namespace: default
/// spec:
///   externalServiceClassName: postgresql
///   externalServicePlanName: small
///   parametersFrom:
///     - secretKeyRef:
///         name: db-params
///         key: parameters
///   parameters:
///     storageGB: 20
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "servicecatalog.k8s.io",
    version = "v1beta1",
    kind = "ServiceInstance",
    plural = "serviceinstances",
    shortname = "si",
    status = "ServiceInstanceStatus",
    namespaced,
    printcolumn = r#"{"name":"Class", "type":"string", "jsonPath":".spec.externalServiceClassName"}"#,
    printcolumn = r#"{"name":"Plan", "type":"string", "jsonPath":".spec.externalServicePlanName"}"#,
    printcolumn = r#"{"name":"Reconciled", "type":"integer", "jsonPath":".status.reconciledGeneration"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstanceSpec {
    /// Name of the service class offering to instantiate.
    #[serde(default)]
    pub external_service_class_name: String,

    /// Name of the plan (tier) within the service class.
    #[serde(default)]
    pub external_service_plan_name: String,

    /// Sources that supply provisioning parameters, merged in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters_from: Vec<ParametersFromSource>,

    /// Inline provisioning parameters. Opaque to the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<RawParameters>,

    /// Identifier assigned to the instance by the service catalog.
    #[serde(rename = "externalID", default, skip_serializing_if = "String::is_empty")]
    pub external_id: String,
}

/// A single source of provisioning parameters.
///
/// Exactly one source field must be set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParametersFromSource {
    /// Parameters read from a key of a Secret in the instance namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key_ref: Option<SecretKeyReference>,
}

/// Reference to a key within a Secret.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeyReference {
    /// Name of the Secret.
    #[serde(default)]
    pub name: String,

    /// Key within the Secret holding the serialized parameters.
    #[serde(default)]
    pub key: String,
}

/// Raw serialized parameter payload.
///
/// On the wire this is an arbitrary JSON value; in memory it is kept as the
/// serialized bytes so the payload can be checked without interpreting it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawParameters {
    /// Serialized payload
    pub raw: Vec<u8>,
}

impl RawParameters {
    /// Wrap already-serialized bytes.
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self { raw: raw.into() }
    }

    /// Whether the payload carries no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl Serialize for RawParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match serde_json::from_slice::<serde_json::Value>(&self.raw) {
            Ok(value) => value.serialize(serializer),
            Err(_) => serializer.serialize_str(&String::from_utf8_lossy(&self.raw)),
        }
    }
}

impl<'de> Deserialize<'de> for RawParameters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let raw = serde_json::to_vec(&value).map_err(serde::de::Error::custom)?;
        Ok(Self { raw })
    }
}

impl JsonSchema for RawParameters {
    fn schema_name() -> Cow<'static, str> {
        "RawParameters".into()
    }

    fn json_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "object",
            "x-kubernetes-preserve-unknown-fields": true
        })
    }
}

/// Status of a ServiceInstance.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstanceStatus {
    /// Conditions describing the current state.
    #[serde(default)]
    pub conditions: Vec<ServiceInstanceCondition>,

    /// Whether an asynchronous provision, update or deprovision call to the
    /// broker is still outstanding.
    #[serde(default)]
    pub async_op_in_progress: bool,

    /// Broker-supplied operation key for the outstanding asynchronous call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_operation: Option<String>,

    /// Dashboard URL reported by the broker.
    #[serde(rename = "dashboardURL", default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,

    /// The generation whose spec was last reconciled successfully.
    #[serde(default)]
    pub reconciled_generation: i64,
}

/// Condition describes the state of an instance at a certain point.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstanceCondition {
    /// Type of condition.
    pub r#type: ConditionType,
    /// Status of the condition.
    pub status: ConditionStatus,
    /// Machine-readable reason for the condition's last transition.
    #[serde(default)]
    pub reason: String,
    /// Human-readable message indicating details about last transition.
    #[serde(default)]
    pub message: String,
    /// Last time the condition transitioned from one status to another.
    #[serde(default)]
    pub last_transition_time: String,
}

impl ServiceInstanceCondition {
    /// Create a new condition stamped with the current time.
    pub fn new(
        condition_type: ConditionType,
        status: ConditionStatus,
        reason: &str,
        message: &str,
    ) -> Self {
        Self {
            r#type: condition_type,
            status,
            reason: reason.to_string(),
            message: message.to_string(),
            last_transition_time: jiff::Timestamp::now().to_string(),
        }
    }

    /// Create a "Ready" condition.
    pub fn ready(ready: bool, reason: &str, message: &str) -> Self {
        Self::new(ConditionType::Ready, ready.into(), reason, message)
    }

    /// Create a "Failed" condition.
    pub fn failed(failed: bool, reason: &str, message: &str) -> Self {
        Self::new(ConditionType::Failed, failed.into(), reason, message)
    }
}

/// Types of conditions for ServiceInstance.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum ConditionType {
    /// The instance has been provisioned and is usable.
    Ready,
    /// Provisioning failed permanently.
    Failed,
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionType::Ready => write!(f, "Ready"),
            ConditionType::Failed => write!(f, "Failed"),
        }
    }
}

/// Tri-state status of a condition.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl From<bool> for ConditionStatus {
    fn from(value: bool) -> Self {
        if value {
            ConditionStatus::True
        } else {
            ConditionStatus::False
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionStatus::True => write!(f, "True"),
            ConditionStatus::False => write!(f, "False"),
            ConditionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}
