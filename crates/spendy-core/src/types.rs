//! Enumerations shared by the record store and the query engine

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Direction of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in (salary, refunds)
    Income,
    /// Money going out (food, transport)
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, TransactionType::Income)
    }
}

impl Default for TransactionType {
    fn default() -> Self {
        TransactionType::Expense
    }
}

impl std::str::FromStr for TransactionType {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(CoreError::ValidationError {
                field: "type".to_string(),
                message: format!("Invalid transaction type: {}", s),
            }),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields the transaction table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "transactionDate")]
    TransactionDate,
    #[serde(rename = "type")]
    Type,
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "amount")]
    Amount,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Name,
        SortField::TransactionDate,
        SortField::Type,
        SortField::Category,
        SortField::Amount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::TransactionDate => "transactionDate",
            SortField::Type => "type",
            SortField::Category => "category",
            SortField::Amount => "amount",
        }
    }

    /// Label used by sort indicators
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::TransactionDate => "Date",
            SortField::Type => "Type",
            SortField::Category => "Category",
            SortField::Amount => "Amount",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| CoreError::InvalidSortField {
                field: s.to_string(),
            })
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

impl std::str::FromStr for SortOrder {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(CoreError::InvalidSortOrder {
                order: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Rows per page, restricted to the sizes the table offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    TwentyFive,
    Fifty,
    OneHundred,
}

impl PageSize {
    pub fn get(&self) -> usize {
        match self {
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::OneHundred => 100,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::TwentyFive
    }
}

impl TryFrom<usize> for PageSize {
    type Error = CoreError;
    fn try_from(size: usize) -> Result<Self, Self::Error> {
        match size {
            25 => Ok(PageSize::TwentyFive),
            50 => Ok(PageSize::Fifty),
            100 => Ok(PageSize::OneHundred),
            _ => Err(CoreError::InvalidPageSize { size }),
        }
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl std::str::FromStr for PageSize {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size: usize = s.trim().parse().map_err(|_| CoreError::InvalidPageSize { size: 0 })?;
        PageSize::try_from(size)
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}
