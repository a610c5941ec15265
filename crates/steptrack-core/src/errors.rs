//! Structured error types shared across steptrack crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`SteptrackError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for the steptrack engine.
///
/// Every fallible operation in the workspace returns this enum rather than
/// improvising a crate-local error type, matching the usage/data/numeric
/// taxonomy of the tracking specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SteptrackError {
    /// Misuse of an API contract (e.g. `forward` before `initialize`).
    #[error("usage error: {0}")]
    Usage(ErrorInfo),
    /// Structural errors in a [`crate::Step`]/graph definition.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Malformed or missing input data (traces, taxonomy tables).
    #[error("data error: {0}")]
    Data(ErrorInfo),
    /// Errors raised by the classifier adapter.
    #[error("classifier error: {0}")]
    Classifier(ErrorInfo),
    /// Filesystem / serialization errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl SteptrackError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SteptrackError::Usage(info)
            | SteptrackError::Graph(info)
            | SteptrackError::Data(info)
            | SteptrackError::Classifier(info)
            | SteptrackError::Io(info) => info,
        }
    }
}
