//! Field-addressed validation errors.
//!
//! A validation pass never fails outright; it returns an [`ErrorList`] where
//! each entry names the offending field, the kind of violation, and a
//! human-readable detail. An empty list means the object is valid.

use std::fmt;

/// Dotted path to a field inside a resource, e.g. `Spec.parametersFrom`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Create a root path.
    pub fn new(root: &str) -> Self {
        Self {
            segments: vec![root.to_string()],
        }
    }

    /// Return a new path with `name` appended.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// Return a new path addressing element `index` of this path.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            last.push_str(&format!("[{}]", index));
        }
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Kind of violation carried by a [`FieldError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A mandatory field is missing or empty.
    Required,
    /// A field is present but fails a syntax or semantic check.
    Invalid,
    /// A structurally valid value that a state-machine rule disallows.
    Forbidden,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Required => write!(f, "Required value"),
            ErrorKind::Invalid => write!(f, "Invalid value"),
            ErrorKind::Forbidden => write!(f, "Forbidden"),
        }
    }
}

/// A single violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// Path of the offending field
    pub field: String,
    /// Violation kind
    pub kind: ErrorKind,
    /// The offending value (only set for `Invalid`)
    pub bad_value: Option<String>,
    /// Human-readable detail
    pub detail: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.bad_value {
            Some(value) => write!(
                f,
                "{}: {}: {:?}: {}",
                self.field, self.kind, value, self.detail
            ),
            None => write!(f, "{}: {}: {}", self.field, self.kind, self.detail),
        }
    }
}

impl std::error::Error for FieldError {}

impl FieldError {
    /// A required field is missing.
    pub fn required(path: &FieldPath, detail: &str) -> Self {
        Self {
            field: path.to_string(),
            kind: ErrorKind::Required,
            bad_value: None,
            detail: detail.to_string(),
        }
    }

    /// A field carries an invalid value.
    pub fn invalid(path: &FieldPath, value: &str, detail: &str) -> Self {
        Self {
            field: path.to_string(),
            kind: ErrorKind::Invalid,
            bad_value: Some(value.to_string()),
            detail: detail.to_string(),
        }
    }

    /// A field value is forbidden in the current state.
    pub fn forbidden(path: &FieldPath, detail: &str) -> Self {
        Self {
            field: path.to_string(),
            kind: ErrorKind::Forbidden,
            bad_value: None,
            detail: detail.to_string(),
        }
    }
}

/// Ordered list of violations produced by one validation pass.
pub type ErrorList = Vec<FieldError>;

/// Join an error list into a single message, one violation per clause.
pub fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
