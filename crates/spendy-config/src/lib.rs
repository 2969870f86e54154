//! Configuration management for spendy
//!
//! This module handles loading, validation, and management of
//! spendy configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{
    ConfigError, ConfigErrorCode, ConfigErrorDetails, ConfigErrorSeverity, ConfigResult,
};

/// Page sizes the transaction table can be switched between
pub const ALLOWED_PAGE_SIZES: [usize; 3] = [25, 50, 100];

/// Field names accepted as a sort key (empty means collection order)
pub const SORT_FIELDS: [&str; 5] = ["name", "transactionDate", "type", "category", "amount"];

/// Accepted sort orders
pub const SORT_ORDERS: [&str; 2] = ["asc", "desc"];

// ==================== Configuration Types ====================

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Rows per page when a query starts
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    25
}

/// Initial sort of a fresh query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    /// Sort field, empty for collection order
    #[serde(default)]
    pub field: String,
    /// "asc" or "desc"
    #[serde(default = "default_sort_order")]
    pub order: String,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            field: String::new(),
            order: default_sort_order(),
        }
    }
}

fn default_sort_order() -> String {
    "desc".to_string()
}

/// Known category names offered by the transaction form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesConfig {
    #[serde(default = "default_categories")]
    pub defaults: Vec<String>,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            defaults: default_categories(),
        }
    }
}

fn default_categories() -> Vec<String> {
    [
        "Food & Dining",
        "Transportation",
        "Shopping",
        "Entertainment",
        "Bills & Utilities",
        "Healthcare",
        "Education",
        "Travel",
        "Personal Care",
        "Gifts & Donations",
        "Investments",
        "Business",
        "Other",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol printed before amounts
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
        }
    }
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Data source configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// JSON file with transactions to load at start-up
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Initial sort
    #[serde(default)]
    pub sort: SortConfig,
    /// Category registry seed
    #[serde(default)]
    pub categories: CategoriesConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Data source
    #[serde(default)]
    pub data: DataConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ALLOWED_PAGE_SIZES.contains(&self.pagination.default_page_size) {
            return Err(ConfigError::InvalidValue {
                field: "pagination.default_page_size".to_string(),
                reason: format!(
                    "Page size must be one of 25, 50, 100 (got {})",
                    self.pagination.default_page_size
                ),
            });
        }

        if !self.sort.field.is_empty() && !SORT_FIELDS.contains(&self.sort.field.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "sort.field".to_string(),
                reason: format!("Unknown sort field '{}'", self.sort.field),
            });
        }

        if !SORT_ORDERS.contains(&self.sort.order.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "sort.order".to_string(),
                reason: "Sort order must be 'asc' or 'desc'".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if self.categories.defaults.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                message: "categories.defaults must not contain empty names".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}
