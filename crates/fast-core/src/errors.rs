//! Structured error types shared across the FAST crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`FastError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (sizes, indices, thresholds).
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
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for ranking and state selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum FastError {
    /// Power iteration did not reach its error threshold.
    #[error("convergence error: {0}")]
    Convergence(ErrorInfo),
    /// Invalid parameters supplied at construction or call time.
    #[error("validation error: {0}")]
    Validation(ErrorInfo),
    /// Mismatched matrix, vector or index dimensions.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// Failures reported by an external flux/pathway decomposition.
    #[error("pathway error: {0}")]
    Pathway(ErrorInfo),
    /// Serialization and configuration parsing errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
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

impl FastError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            FastError::Convergence(info)
            | FastError::Validation(info)
            | FastError::Shape(info)
            | FastError::Pathway(info)
            | FastError::Serde(info) => info,
        }
    }

    /// Shorthand for a [`FastError::Validation`] without context.
    pub fn validation(code: &str, message: impl Into<String>) -> Self {
        FastError::Validation(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`FastError::Shape`] without context.
    pub fn shape(code: &str, message: impl Into<String>) -> Self {
        FastError::Shape(ErrorInfo::new(code, message))
    }
}
