//! Transaction data model and data providers
//!
//! The view core talks to its data source through the [`DataProvider`] trait.
//! Two implementations live here: a fixture-backed in-memory provider and a
//! response-caching decorator over any other provider.

use async_trait::async_trait;
use std::sync::Arc;

pub mod error;
pub mod types;
pub mod memory;
pub mod cache;

pub use error::ProviderError;
pub use memory::{Fixture, InMemoryProvider};
pub use cache::{CachedProvider, Endpoint};

// Re-export commonly used types
pub use types::{Cursor, Employee, Page, Transaction, ALL_EMPLOYEES_ID};

// ==================== Provider Trait ====================

/// Provider reference type
pub type ProviderRef = Arc<dyn DataProvider>;

/// Remote source of employees and transactions
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// List every known employee, in provider order
    async fn list_employees(&self) -> Result<Vec<Employee>, ProviderError>;

    /// Fetch one page of the global feed; `None` requests the first page
    async fn list_transactions(&self, cursor: Option<&Cursor>) -> Result<Page, ProviderError>;

    /// Fetch every transaction owned by one employee
    async fn list_transactions_by_employee(&self, employee_id: &str) -> Result<Vec<Transaction>, ProviderError>;

    /// Discard anything held for `endpoint` so the next call reaches the
    /// source. Uncached providers have nothing to discard.
    async fn invalidate(&self, _endpoint: Endpoint) {}
}
