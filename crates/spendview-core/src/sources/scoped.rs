//! Employee-scoped transaction query

use spendview_data::{DataProvider, ProviderError, Transaction, ALL_EMPLOYEES_ID};

use crate::error::{report_fetch_failure, FetchSource, ViewError};

/// Ticket for one scoped fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedRequest {
    generation: u64,
    employee_id: String,
}

impl ScopedRequest {
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }
}

/// Full transaction list of a single employee
#[derive(Debug, Default)]
pub struct ScopedQuery {
    employee_id: Option<String>,
    result: Option<Vec<Transaction>>,
    loading: bool,
    generation: u64,
}

impl ScopedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start fetching one employee's transactions. Any held result is
    /// invalidated first.
    pub fn begin_fetch(&mut self, employee_id: &str) -> Result<ScopedRequest, ViewError> {
        if employee_id.is_empty() || employee_id == ALL_EMPLOYEES_ID {
            return Err(ViewError::InvalidSelection { employee_id: employee_id.to_string() });
        }

        self.invalidate_data();
        self.employee_id = Some(employee_id.to_string());
        self.loading = true;
        Ok(ScopedRequest {
            generation: self.generation,
            employee_id: employee_id.to_string(),
        })
    }

    /// Merge a fetch result, returning the fetched transactions.
    /// A failed fetch leaves the result empty.
    pub fn complete_fetch(&mut self, request: ScopedRequest, result: Result<Vec<Transaction>, ProviderError>) -> Option<Vec<Transaction>> {
        if request.generation != self.generation {
            log::debug!("dropping stale transactions for employee {}", request.employee_id);
            return None;
        }

        self.loading = false;
        match result {
            Ok(transactions) => {
                self.result = Some(transactions.clone());
                Some(transactions)
            }
            Err(e) => {
                self.result = None;
                report_fetch_failure(FetchSource::ScopedQuery, "fetch_by_id", &e);
                None
            }
        }
    }

    /// Fetch every transaction of `employee_id`, replacing the held result
    pub async fn fetch_by_id(&mut self, provider: &dyn DataProvider, employee_id: &str) -> Result<Option<Vec<Transaction>>, ViewError> {
        let request = self.begin_fetch(employee_id)?;
        let result = provider.list_transactions_by_employee(request.employee_id()).await;
        Ok(self.complete_fetch(request, result))
    }

    /// Clear the held result
    pub fn invalidate_data(&mut self) {
        self.employee_id = None;
        self.result = None;
        self.loading = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Held result, `None` when invalidated, failed, or still loading
    pub fn data(&self) -> Option<&[Transaction]> {
        self.result.as_deref()
    }

    /// Employee the held or pending result belongs to
    pub fn employee_id(&self) -> Option<&str> {
        self.employee_id.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
