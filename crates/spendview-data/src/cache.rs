//! Response-caching provider decorator
//!
//! Reads check the cache first and fall through to the wrapped provider on a
//! miss. Only successful responses are stored.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::ProviderError;
use crate::types::{Cursor, Employee, Page, Transaction};
use crate::{DataProvider, ProviderRef};

/// Provider endpoint, used to scope cache clearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Employees,
    Transactions,
    TransactionsByEmployee,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Employees => write!(f, "employees"),
            Endpoint::Transactions => write!(f, "paginatedTransactions"),
            Endpoint::TransactionsByEmployee => write!(f, "transactionsByEmployee"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    endpoint: Endpoint,
    param: String,
}

#[derive(Debug, Clone)]
enum CachedResponse {
    Employees(Vec<Employee>),
    Page(Page),
    Transactions(Vec<Transaction>),
}

/// Caching decorator over another provider
pub struct CachedProvider {
    inner: ProviderRef,
    entries: RwLock<HashMap<CacheKey, CachedResponse>>,
}

impl CachedProvider {
    pub fn new(inner: ProviderRef) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Drop every cached response
    pub async fn clear_cache(&self) {
        self.entries.write().await.clear();
    }

    /// Drop cached responses of one endpoint
    pub async fn clear_cache_for(&self, endpoint: Endpoint) {
        self.entries.write().await.retain(|key, _| key.endpoint != endpoint);
    }

    /// Number of cached responses
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn lookup(&self, key: &CacheKey) -> Option<CachedResponse> {
        let hit = self.entries.read().await.get(key).cloned();
        if hit.is_some() {
            log::debug!("cache hit: {}({})", key.endpoint, key.param);
        }
        hit
    }

    async fn store(&self, key: CacheKey, response: CachedResponse) {
        self.entries.write().await.insert(key, response);
    }
}

#[async_trait]
impl DataProvider for CachedProvider {
    async fn list_employees(&self) -> Result<Vec<Employee>, ProviderError> {
        let key = CacheKey { endpoint: Endpoint::Employees, param: String::new() };
        if let Some(CachedResponse::Employees(employees)) = self.lookup(&key).await {
            return Ok(employees);
        }
        let employees = self.inner.list_employees().await?;
        self.store(key, CachedResponse::Employees(employees.clone())).await;
        Ok(employees)
    }

    async fn list_transactions(&self, cursor: Option<&Cursor>) -> Result<Page, ProviderError> {
        let key = CacheKey {
            endpoint: Endpoint::Transactions,
            param: cursor.map(|c| c.to_string()).unwrap_or_default(),
        };
        if let Some(CachedResponse::Page(page)) = self.lookup(&key).await {
            return Ok(page);
        }
        let page = self.inner.list_transactions(cursor).await?;
        self.store(key, CachedResponse::Page(page.clone())).await;
        Ok(page)
    }

    async fn list_transactions_by_employee(&self, employee_id: &str) -> Result<Vec<Transaction>, ProviderError> {
        let key = CacheKey {
            endpoint: Endpoint::TransactionsByEmployee,
            param: employee_id.to_string(),
        };
        if let Some(CachedResponse::Transactions(transactions)) = self.lookup(&key).await {
            return Ok(transactions);
        }
        let transactions = self.inner.list_transactions_by_employee(employee_id).await?;
        self.store(key, CachedResponse::Transactions(transactions.clone())).await;
        Ok(transactions)
    }

    async fn invalidate(&self, endpoint: Endpoint) {
        log::debug!("cache cleared: {}", endpoint);
        self.clear_cache_for(endpoint).await;
        self.inner.invalidate(endpoint).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl DataProvider for CountingProvider {
        async fn list_employees(&self) -> Result<Vec<Employee>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::unavailable("down"));
            }
            Ok(vec![Employee::new("e1", "Ada", "Lovelace")])
        }

        async fn list_transactions(&self, cursor: Option<&Cursor>) -> Result<Page, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = match cursor {
                None => Some(Cursor::from("1")),
                Some(_) => None,
            };
            Ok(Page::new(vec![], next))
        }

        async fn list_transactions_by_employee(&self, _employee_id: &str) -> Result<Vec<Transaction>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_repeated_reads_hit_cache() {
        let inner = Arc::new(CountingProvider::default());
        let cached = CachedProvider::new(inner.clone());

        cached.list_employees().await.unwrap();
        cached.list_employees().await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        // distinct cursors are distinct entries
        cached.list_transactions(None).await.unwrap();
        cached.list_transactions(Some(&Cursor::from("1"))).await.unwrap();
        cached.list_transactions(None).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
        assert_eq!(cached.len().await, 3);
    }

    #[tokio::test]
    async fn test_clear_cache_for_endpoint() {
        let inner = Arc::new(CountingProvider::default());
        let cached = CachedProvider::new(inner.clone());

        cached.list_employees().await.unwrap();
        cached.list_transactions_by_employee("e1").await.unwrap();
        cached.clear_cache_for(Endpoint::TransactionsByEmployee).await;
        assert_eq!(cached.len().await, 1);

        cached.list_transactions_by_employee("e1").await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);

        cached.clear_cache().await;
        assert_eq!(cached.len().await, 0);
    }

    #[tokio::test]
    async fn test_invalidate_through_trait_object() {
        let inner = Arc::new(CountingProvider::default());
        let provider: ProviderRef = Arc::new(CachedProvider::new(inner.clone()));

        provider.list_transactions(None).await.unwrap();
        provider.list_employees().await.unwrap();
        provider.invalidate(Endpoint::Transactions).await;

        // employees stay cached, the first page goes back to the source
        provider.list_employees().await.unwrap();
        provider.list_transactions(None).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failures_not_cached() {
        let inner = Arc::new(CountingProvider { calls: AtomicUsize::new(0), fail: true });
        let cached = CachedProvider::new(inner.clone());

        assert!(cached.list_employees().await.is_err());
        assert!(cached.list_employees().await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cached.len().await, 0);
    }
}
