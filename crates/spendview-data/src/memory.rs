//! Fixture-backed in-memory provider
//!
//! Serves a JSON fixture of employees and transactions. The feed is cut into
//! pages of `page_size` transactions; the cursor is the decimal index of the
//! next page, starting from page 0.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ProviderError;
use crate::types::{Cursor, Employee, Page, Transaction};
use crate::DataProvider;

/// Default number of transactions per feed page
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Fixture file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Fixture {
    /// Parse a fixture from JSON text
    pub fn from_json(content: &str) -> Result<Self, ProviderError> {
        let fixture: Fixture = serde_json::from_str(content)
            .map_err(|e| ProviderError::InvalidData { message: e.to_string() })?;
        fixture.validate()?;
        Ok(fixture)
    }

    /// Check id uniqueness and transaction ownership
    pub fn validate(&self) -> Result<(), ProviderError> {
        let mut employee_ids = HashSet::new();
        for employee in &self.employees {
            if employee.id.is_empty() || employee.id == crate::ALL_EMPLOYEES_ID {
                return Err(ProviderError::InvalidData {
                    message: format!("reserved or empty employee id '{}'", employee.id),
                });
            }
            if !employee_ids.insert(employee.id.as_str()) {
                return Err(ProviderError::InvalidData {
                    message: format!("duplicate employee id '{}'", employee.id),
                });
            }
        }

        let mut transaction_ids = HashSet::new();
        for transaction in &self.transactions {
            if !transaction_ids.insert(transaction.id.as_str()) {
                return Err(ProviderError::InvalidData {
                    message: format!("duplicate transaction id '{}'", transaction.id),
                });
            }
            if !employee_ids.contains(transaction.employee_id.as_str()) {
                return Err(ProviderError::InvalidData {
                    message: format!(
                        "transaction '{}' references unknown employee '{}'",
                        transaction.id, transaction.employee_id
                    ),
                });
            }
        }

        Ok(())
    }
}

/// In-memory data provider
#[derive(Debug)]
pub struct InMemoryProvider {
    fixture: Fixture,
    page_size: usize,
    latency: Duration,
}

impl InMemoryProvider {
    /// Create a provider over a validated fixture
    pub fn new(fixture: Fixture, page_size: usize) -> Result<Self, ProviderError> {
        if page_size == 0 {
            return Err(ProviderError::InvalidData {
                message: "page size must be greater than 0".to_string(),
            });
        }
        fixture.validate()?;
        Ok(Self {
            fixture,
            page_size,
            latency: Duration::ZERO,
        })
    }

    /// Load the fixture from a JSON file
    pub async fn from_file(path: PathBuf, page_size: usize) -> Result<Self, ProviderError> {
        let content = tokio::fs::read_to_string(&path).await?;
        let fixture = Fixture::from_json(&content)?;
        log::info!(
            "Loaded fixture {}: {} employees, {} transactions",
            path.display(),
            fixture.employees.len(),
            fixture.transactions.len()
        );
        Self::new(fixture, page_size)
    }

    /// Delay every response by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages in the feed (an empty feed still has one empty page)
    pub fn page_count(&self) -> usize {
        let total = self.fixture.transactions.len();
        if total == 0 {
            1
        } else {
            (total + self.page_size - 1) / self.page_size
        }
    }

    fn decode_cursor(&self, cursor: Option<&Cursor>) -> Result<usize, ProviderError> {
        let Some(cursor) = cursor else {
            return Ok(0);
        };
        let index: usize = cursor.as_str().parse()
            .map_err(|_| ProviderError::InvalidCursor { cursor: cursor.to_string() })?;
        if index >= self.page_count() {
            return Err(ProviderError::InvalidCursor { cursor: cursor.to_string() });
        }
        Ok(index)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl DataProvider for InMemoryProvider {
    async fn list_employees(&self) -> Result<Vec<Employee>, ProviderError> {
        self.simulate_latency().await;
        Ok(self.fixture.employees.clone())
    }

    async fn list_transactions(&self, cursor: Option<&Cursor>) -> Result<Page, ProviderError> {
        self.simulate_latency().await;
        let index = self.decode_cursor(cursor)?;
        let total = self.fixture.transactions.len();
        let start = (index * self.page_size).min(total);
        let end = (start + self.page_size).min(total);

        let next_page = if index + 1 < self.page_count() {
            Some(Cursor::new((index + 1).to_string()))
        } else {
            None
        };

        Ok(Page::new(self.fixture.transactions[start..end].to_vec(), next_page))
    }

    async fn list_transactions_by_employee(&self, employee_id: &str) -> Result<Vec<Transaction>, ProviderError> {
        self.simulate_latency().await;
        if employee_id.is_empty() {
            return Err(ProviderError::EmptyEmployeeId);
        }
        Ok(self.fixture.transactions
            .iter()
            .filter(|t| t.is_owned_by(employee_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "employees": [
            {"id": "e1", "firstName": "Ada", "lastName": "Lovelace"},
            {"id": "e2", "firstName": "Alan", "lastName": "Turing"}
        ],
        "transactions": [
            {"id": "t1", "employeeId": "e1", "amount": 10.5, "merchant": "Books", "date": "2022-01-03", "approved": false},
            {"id": "t2", "employeeId": "e2", "amount": 20, "merchant": "Coffee", "date": "2022-01-04", "approved": true},
            {"id": "t3", "employeeId": "e1", "amount": 30, "merchant": "Taxi", "date": "2022-01-05", "approved": false}
        ]
    }"#;

    fn provider(page_size: usize) -> InMemoryProvider {
        InMemoryProvider::new(Fixture::from_json(FIXTURE).unwrap(), page_size).unwrap()
    }

    fn ids(transactions: &[Transaction]) -> Vec<&str> {
        transactions.iter().map(|t| t.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_pages_follow_cursor() {
        let provider = provider(2);

        let first = provider.list_transactions(None).await.unwrap();
        assert_eq!(ids(&first.data), vec!["t1", "t2"]);
        assert_eq!(first.next_page, Some(Cursor::from("1")));

        let second = provider.list_transactions(first.next_page.as_ref()).await.unwrap();
        assert_eq!(ids(&second.data), vec!["t3"]);
        assert!(second.next_page.is_none());
    }

    #[tokio::test]
    async fn test_invalid_cursor_rejected() {
        let provider = provider(2);
        assert!(matches!(
            provider.list_transactions(Some(&Cursor::from("7"))).await,
            Err(ProviderError::InvalidCursor { .. })
        ));
        assert!(matches!(
            provider.list_transactions(Some(&Cursor::from("p2"))).await,
            Err(ProviderError::InvalidCursor { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_feed_has_single_page() {
        let provider = InMemoryProvider::new(Fixture::default(), 5).unwrap();
        let page = provider.list_transactions(None).await.unwrap();
        assert!(page.data.is_empty());
        assert!(page.next_page.is_none());
    }

    #[tokio::test]
    async fn test_transactions_by_employee() {
        let provider = provider(5);
        let owned = provider.list_transactions_by_employee("e1").await.unwrap();
        assert_eq!(ids(&owned), vec!["t1", "t3"]);

        let none = provider.list_transactions_by_employee("e9").await.unwrap();
        assert!(none.is_empty());

        assert!(matches!(
            provider.list_transactions_by_employee("").await,
            Err(ProviderError::EmptyEmployeeId)
        ));
    }

    #[test]
    fn test_fixture_rejects_unknown_owner() {
        let result = Fixture::from_json(r#"{
            "employees": [{"id": "e1", "firstName": "Ada", "lastName": "Lovelace"}],
            "transactions": [
                {"id": "t1", "employeeId": "e2", "amount": 1, "merchant": "X", "date": "2022-01-01", "approved": false}
            ]
        }"#);
        assert!(matches!(result, Err(ProviderError::InvalidData { .. })));
    }

    #[test]
    fn test_fixture_rejects_sentinel_employee() {
        let result = Fixture::from_json(
            r#"{"employees": [{"id": "all", "firstName": "All", "lastName": "Employees"}]}"#
        );
        assert!(matches!(result, Err(ProviderError::InvalidData { .. })));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(InMemoryProvider::new(Fixture::default(), 0).is_err());
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let provider = InMemoryProvider::from_file(file.path().to_path_buf(), 2).await.unwrap();
        assert_eq!(provider.page_count(), 2);
        assert_eq!(provider.list_employees().await.unwrap().len(), 2);
    }
}
