use std::fmt::{Display, Formatter};

use crate::analytics::constants::{UNKNOWN_ERROR_CODE, UNKNOWN_ERROR_MESSAGE};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalyticsErrorCode {
    /// Malformed, missing or forbidden call arguments.
    InvalidArgument,
    /// An argument value has no native primitive counterpart.
    UnsupportedValueType,
    /// The operation name is not part of the supported set.
    UnsupportedOperation,
    /// The native SDK task failed. Carries the native code, `unknown` when absent.
    Native(String),
}

impl AnalyticsErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            AnalyticsErrorCode::InvalidArgument => "analytics/invalid-argument",
            AnalyticsErrorCode::UnsupportedValueType => "analytics/unsupported-value-type",
            AnalyticsErrorCode::UnsupportedOperation => "analytics/unsupported-operation",
            AnalyticsErrorCode::Native(code) => code,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyticsError {
    pub code: AnalyticsErrorCode,
    message: String,
}

impl AnalyticsError {
    pub fn new(code: AnalyticsErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true for errors raised before any native call was attempted.
    pub fn is_local(&self) -> bool {
        !matches!(self.code, AnalyticsErrorCode::Native(_))
    }
}

impl Display for AnalyticsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for AnalyticsError {}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

pub fn invalid_argument(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::InvalidArgument, message)
}

pub fn unsupported_value_type(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::UnsupportedValueType, message)
}

pub fn unsupported_operation(operation: &str) -> AnalyticsError {
    AnalyticsError::new(
        AnalyticsErrorCode::UnsupportedOperation,
        format!("firebase.analytics().{operation}(): operation is not supported"),
    )
}

/// Normalizes a failed native call. Missing codes become `unknown` and missing or blank
/// messages become the generic unknown error message.
pub fn native_call_failed(code: Option<&str>, message: Option<&str>) -> AnalyticsError {
    let code = code
        .filter(|code| !code.trim().is_empty())
        .unwrap_or(UNKNOWN_ERROR_CODE);
    let message = message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(UNKNOWN_ERROR_MESSAGE);
    AnalyticsError::new(AnalyticsErrorCode::Native(code.to_string()), message)
}
