//! Employee directory

use serde::{Deserialize, Serialize};
use spendview_data::{DataProvider, Employee, ProviderError};

use crate::error::{report_fetch_failure, FetchSource};

/// Ticket for one directory fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryRequest {
    _private: (),
}

/// Entry of the employee filter control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Employee id, or "all"
    pub value: String,
    /// "First Last"
    pub label: String,
}

impl From<&Employee> for FilterOption {
    fn from(employee: &Employee) -> Self {
        Self {
            value: employee.id.clone(),
            label: employee.full_name(),
        }
    }
}

/// Known employees, fetched at startup and never invalidated
#[derive(Debug, Default)]
pub struct EmployeeDirectory {
    data: Option<Vec<Employee>>,
    in_flight: usize,
}

impl EmployeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a fetch as started. Refreshes may overlap; loading stays set
    /// until the last one completes.
    pub fn begin_fetch(&mut self) -> DirectoryRequest {
        self.in_flight += 1;
        DirectoryRequest { _private: () }
    }

    /// Merge a fetch result. Failures keep the previous data.
    pub fn complete_fetch(&mut self, _request: DirectoryRequest, result: Result<Vec<Employee>, ProviderError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(employees) => {
                log::debug!("employee directory loaded: {} employees", employees.len());
                self.data = Some(employees);
            }
            Err(e) => report_fetch_failure(FetchSource::Directory, "fetch_all", &e),
        }
    }

    /// Fetch every employee from the provider
    pub async fn fetch_all(&mut self, provider: &dyn DataProvider) {
        let request = self.begin_fetch();
        let result = provider.list_employees().await;
        self.complete_fetch(request, result);
    }

    /// Fetched employees, `None` until a fetch succeeds
    pub fn data(&self) -> Option<&[Employee]> {
        self.data.as_deref()
    }

    /// Fetched employees, empty when none are available
    pub fn employees(&self) -> &[Employee] {
        self.data().unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    pub fn contains(&self, employee_id: &str) -> bool {
        self.employees().iter().any(|e| e.id == employee_id)
    }

    /// Filter control entries: "All Employees" followed by every employee.
    /// Empty while no employees are available.
    pub fn options(&self) -> Vec<FilterOption> {
        let Some(employees) = self.data() else {
            return Vec::new();
        };
        let all = Employee::all_employees();
        std::iter::once(&all)
            .chain(employees.iter())
            .map(FilterOption::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Employee {
        Employee::new("e1", "Ada", "Lovelace")
    }

    #[test]
    fn test_loading_flag_spans_fetch() {
        let mut directory = EmployeeDirectory::new();
        assert!(!directory.is_loading());

        let request = directory.begin_fetch();
        assert!(directory.is_loading());

        directory.complete_fetch(request, Ok(vec![ada()]));
        assert!(!directory.is_loading());
        assert!(directory.is_loaded());
        assert!(directory.contains("e1"));
        assert!(!directory.contains("all"));
    }

    #[test]
    fn test_overlapping_refresh_keeps_loading() {
        let mut directory = EmployeeDirectory::new();
        let first = directory.begin_fetch();
        let second = directory.begin_fetch();

        directory.complete_fetch(first, Ok(vec![ada()]));
        assert!(directory.is_loading());
        directory.complete_fetch(second, Ok(vec![ada()]));
        assert!(!directory.is_loading());
    }

    #[test]
    fn test_failure_leaves_no_employees() {
        let mut directory = EmployeeDirectory::new();
        let request = directory.begin_fetch();
        directory.complete_fetch(request, Err(ProviderError::unavailable("down")));

        assert!(!directory.is_loading());
        assert!(directory.data().is_none());
        assert!(directory.employees().is_empty());
        assert!(directory.options().is_empty());
    }

    #[test]
    fn test_failed_refresh_keeps_previous_data() {
        let mut directory = EmployeeDirectory::new();
        let request = directory.begin_fetch();
        directory.complete_fetch(request, Ok(vec![ada()]));

        let request = directory.begin_fetch();
        directory.complete_fetch(request, Err(ProviderError::unavailable("down")));
        assert_eq!(directory.employees(), &[ada()]);
    }

    #[test]
    fn test_options_prepend_all_employees() {
        let mut directory = EmployeeDirectory::new();
        let request = directory.begin_fetch();
        directory.complete_fetch(request, Ok(vec![ada()]));

        let options = directory.options();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, "all");
        assert_eq!(options[0].label, "All Employees");
        assert_eq!(options[1].label, "Ada Lovelace");
        // the sentinel is never stored
        assert_eq!(directory.employees().len(), 1);
    }

    #[test]
    fn test_empty_directory_still_offers_all() {
        let mut directory = EmployeeDirectory::new();
        let request = directory.begin_fetch();
        directory.complete_fetch(request, Ok(vec![]));

        assert!(directory.is_loaded());
        assert_eq!(directory.options().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_against_provider() {
        let provider = crate::testing::ScriptedProvider::scenario();
        let mut directory = EmployeeDirectory::new();

        directory.fetch_all(&provider).await;
        assert!(!directory.is_loading());
        assert_eq!(directory.employees().len(), 2);
        assert_eq!(directory.options()[0].value, "all");
        assert_eq!(directory.options()[1].label, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_fetch_all_failure_leaves_no_employees() {
        let provider = crate::testing::ScriptedProvider {
            fail_employees: true,
            ..crate::testing::ScriptedProvider::scenario()
        };
        let mut directory = EmployeeDirectory::new();

        directory.fetch_all(&provider).await;
        assert!(!directory.is_loading());
        assert!(directory.data().is_none());
        assert!(directory.options().is_empty());
    }
}
