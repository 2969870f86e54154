//! Error types for spendy-core
//!
//! Every failure of the record store or the query state maps to a stable
//! error code and severity so the presentation layer can show it next to
//! the offending form field.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Validation error
    ValidationError,
    /// Duplicate entry
    DuplicateEntry,
    /// Page size outside the offered set
    InvalidPageSize,
    /// Unknown sort field
    InvalidSortField,
    /// Unknown sort order
    InvalidSortOrder,
    /// Date range with from after to
    InvalidDateRange,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::DuplicateEntry => write!(f, "DUPLICATE_ENTRY"),
            ErrorCode::InvalidPageSize => write!(f, "INVALID_PAGE_SIZE"),
            ErrorCode::InvalidSortField => write!(f, "INVALID_SORT_FIELD"),
            ErrorCode::InvalidSortOrder => write!(f, "INVALID_SORT_ORDER"),
            ErrorCode::InvalidDateRange => write!(f, "INVALID_DATE_RANGE"),
        }
    }
}

/// Detailed error information for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Form field the error belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            field: None,
            details: None,
            suggestions: vec![],
        }
    }

    /// Attach the form field
    pub fn with_field(mut self, field: String) -> Self {
        self.field = Some(field);
        self
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref field) = self.field {
            write!(f, "\nField: {}", field)?;
        }
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
    /// Informational - a query parameter was ignored
    Info,
    /// Warning - a record mutation was rejected, state unchanged
    Warning,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
        }
    }
}

/// Main error type for spendy-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Duplicate entry: {id}")]
    DuplicateEntry { id: String },

    #[error("Invalid page size: {size}")]
    InvalidPageSize { size: usize },

    #[error("Invalid sort field: {field}")]
    InvalidSortField { field: String },

    #[error("Invalid sort order: {order}")]
    InvalidSortOrder { order: String },

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: String, to: String },
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::DuplicateEntry { .. } => ErrorCode::DuplicateEntry,
            CoreError::InvalidPageSize { .. } => ErrorCode::InvalidPageSize,
            CoreError::InvalidSortField { .. } => ErrorCode::InvalidSortField,
            CoreError::InvalidSortOrder { .. } => ErrorCode::InvalidSortOrder,
            CoreError::InvalidDateRange { .. } => ErrorCode::InvalidDateRange,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::ValidationError { .. } | CoreError::DuplicateEntry { .. } => {
                ErrorSeverity::Warning
            }
            _ => ErrorSeverity::Info,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ValidationError { field, .. } => {
                details = details.with_field(field.clone());
            }
            CoreError::DuplicateEntry { id } => {
                details = details
                    .with_detail(serde_json::json!({ "id": id }))
                    .with_suggestion("Generate a fresh id for every new transaction.".to_string());
            }
            CoreError::InvalidPageSize { .. } => {
                details = details
                    .with_suggestion("Use one of 25, 50 or 100 rows per page.".to_string());
            }
            CoreError::InvalidSortField { .. } => {
                details = details.with_suggestion(
                    "Sort by one of name, transactionDate, type, category, amount.".to_string(),
                );
            }
            CoreError::InvalidSortOrder { .. } => {
                details = details.with_suggestion("Use 'asc' or 'desc'.".to_string());
            }
            CoreError::InvalidDateRange { .. } => {
                details = details
                    .with_suggestion("Pick a start date on or before the end date.".to_string());
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;
