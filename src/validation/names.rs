//! DNS name syntax checks.
//!
//! These mirror the RFC 1123 rules Kubernetes applies to object names. Each
//! check returns the list of reasons the input is invalid; an empty list
//! means the name is acceptable.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a DNS-1123 subdomain.
pub const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;

/// Maximum length of a DNS-1123 label.
pub const DNS1123_LABEL_MAX_LENGTH: usize = 63;

const DNS1123_LABEL_FMT: &str = "[a-z0-9]([-a-z0-9]*[a-z0-9])?";

/// Signature shared by all name validators.
///
/// `prefix` indicates the name is a generate-name prefix, in which case a
/// trailing `-` is tolerated because a random suffix will be appended.
pub type NameValidator = fn(name: &str, prefix: bool) -> Vec<String>;

static DNS1123_SUBDOMAIN_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(&format!(r"^{fmt}(\.{fmt})*$", fmt = DNS1123_LABEL_FMT)).ok()
});

static DNS1123_LABEL_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(&format!(r"^{}$", DNS1123_LABEL_FMT)).ok());

/// Check `value` against the DNS-1123 subdomain rules.
pub fn is_dns1123_subdomain(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if value.len() > DNS1123_SUBDOMAIN_MAX_LENGTH {
        errors.push(format!(
            "must be no more than {} characters",
            DNS1123_SUBDOMAIN_MAX_LENGTH
        ));
    }
    if !DNS1123_SUBDOMAIN_REGEX
        .as_ref()
        .is_some_and(|re| re.is_match(value))
    {
        errors.push(format!(
            "a lowercase RFC 1123 subdomain must consist of lower case alphanumeric characters, \
             '-' or '.', and must start and end with an alphanumeric character \
             (e.g. 'example.com', regex used for validation is '{fmt}(\\.{fmt})*')",
            fmt = DNS1123_LABEL_FMT
        ));
    }
    errors
}

/// Check `value` against the DNS-1123 label rules.
pub fn is_dns1123_label(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if value.len() > DNS1123_LABEL_MAX_LENGTH {
        errors.push(format!(
            "must be no more than {} characters",
            DNS1123_LABEL_MAX_LENGTH
        ));
    }
    if !DNS1123_LABEL_REGEX
        .as_ref()
        .is_some_and(|re| re.is_match(value))
    {
        errors.push(format!(
            "a lowercase RFC 1123 label must consist of lower case alphanumeric characters or '-', \
             and must start and end with an alphanumeric character \
             (e.g. 'my-name', or '123-abc', regex used for validation is '{}')",
            DNS1123_LABEL_FMT
        ));
    }
    errors
}

/// Replace a single trailing `-` with `a` so generate-name prefixes validate.
fn mask_trailing_dash(name: &str) -> String {
    match name.strip_suffix('-') {
        Some(stem) if !stem.is_empty() => format!("{}a", stem),
        _ => name.to_string(),
    }
}

/// Name validator for resources whose names must be DNS subdomains.
pub fn name_is_dns_subdomain(name: &str, prefix: bool) -> Vec<String> {
    if prefix {
        is_dns1123_subdomain(&mask_trailing_dash(name))
    } else {
        is_dns1123_subdomain(name)
    }
}

/// Validator applied to `spec.externalServiceClassName`.
pub fn validate_service_class_name(name: &str, prefix: bool) -> Vec<String> {
    name_is_dns_subdomain(name, prefix)
}

/// Validator applied to `spec.externalServicePlanName`.
pub fn validate_service_plan_name(name: &str, prefix: bool) -> Vec<String> {
    name_is_dns_subdomain(name, prefix)
}
