//! Error types for spendview-core
//!
//! Fetch failures never escape the source components: they are reported
//! through an [`ErrorLogger`] and degrade to "no data". Only selection errors
//! reach callers of the view.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use spendview_data::ProviderError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A provider call failed
    FetchFailure,
    /// Unknown or malformed employee selection
    InvalidSelection,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::FetchFailure => write!(f, "FETCH_FAILURE"),
            ErrorCode::InvalidSelection => write!(f, "INVALID_SELECTION"),
        }
    }
}

/// Which source a failed fetch belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchSource {
    /// Employee directory
    Directory,
    /// Paginated transaction feed
    Feed,
    /// Employee-scoped transaction query
    ScopedQuery,
}

impl std::fmt::Display for FetchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchSource::Directory => write!(f, "employee directory"),
            FetchSource::Feed => write!(f, "transaction feed"),
            FetchSource::ScopedQuery => write!(f, "employee transactions"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Operation degraded, view keeps working
    Warning,
    /// Operation rejected
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for spendview-core
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Failed to fetch {origin}: {message}")]
    FetchFailure { origin: FetchSource, message: String },

    #[error("Invalid employee selection: '{employee_id}'")]
    InvalidSelection { employee_id: String },
}

impl ViewError {
    /// Wrap a provider error raised while fetching from `source`
    pub fn fetch_failure(source: FetchSource, error: &ProviderError) -> Self {
        ViewError::FetchFailure { origin: source, message: error.to_string() }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            ViewError::FetchFailure { .. } => ErrorCode::FetchFailure,
            ViewError::InvalidSelection { .. } => ErrorCode::InvalidSelection,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ViewError::FetchFailure { .. } => ErrorSeverity::Warning,
            ViewError::InvalidSelection { .. } => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            ViewError::FetchFailure { origin, message } => details
                .with_detail(serde_json::json!({ "source": origin, "provider_message": message }))
                .with_suggestion("The view keeps its previous data; retry the action.".to_string()),
            ViewError::InvalidSelection { employee_id } => details
                .with_detail(serde_json::json!({ "employee_id": employee_id }))
                .with_suggestion("Pick an employee offered by the filter control.".to_string())
                .with_suggestion("Use \"all\" to clear the filter.".to_string()),
        }
    }
}

/// Result type with ViewError
pub type ViewResult<T> = Result<T, ViewError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &ViewError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &ViewError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Warning => log::warn!(
                target: "spendview::error",
                "[{}] {} - Operation: {} - Context: {}",
                error.code(),
                error,
                context.operation,
                context.data
            ),
            ErrorSeverity::Error => log::error!(
                target: "spendview::error",
                "[{}] {} - Operation: {} - Context: {}",
                error.code(),
                error,
                context.operation,
                context.data
            ),
        }
    }
}

/// Absorb a provider failure at a component boundary
pub(crate) fn report_fetch_failure(source: FetchSource, operation: &str, error: &ProviderError) {
    let error = ViewError::fetch_failure(source, error);
    DefaultErrorLogger.log_error(&error, &ErrorContext::new(operation));
}

// ==================== Tests ====================
