//! Core transaction store, query engine and mutation coordinator

pub mod book;
pub mod categories;
pub mod engine;
pub mod error;
pub mod models;
pub mod observer;
pub mod query;
pub mod reports;
pub mod store;
pub mod time;
pub mod types;

pub use book::TransactionBook;
pub use categories::CategoryRegistry;
pub use engine::{available_categories, available_tags, visible_rows, VisibleRows};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use models::{Transaction, TransactionFormData, TransactionPatch};
pub use observer::SubscriptionId;
pub use query::{QueryController, QueryState, SortSpec};
pub use reports::{summarize, ViewSummary};
pub use store::{RecordStore, StoreEvent};
pub use time::DateRange;
pub use types::{PageSize, SortField, SortOrder, TransactionType};
