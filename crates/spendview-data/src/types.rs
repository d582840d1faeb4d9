//! Data model shared by providers and the view core

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of the "All Employees" entry offered by the filter control
pub const ALL_EMPLOYEES_ID: &str = "all";

/// Employee as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Employee identifier
    pub id: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
}

impl Employee {
    pub fn new(id: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// The "All Employees" filter entry. Never part of a provider response.
    pub fn all_employees() -> Self {
        Self::new(ALL_EMPLOYEES_ID, "All", "Employees")
    }

    /// Display name ("First Last")
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Transaction information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: String,
    /// Identifier of the owning employee
    pub employee_id: String,
    /// Transaction amount
    pub amount: Decimal,
    /// Merchant name
    pub merchant: String,
    /// Transaction date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Approval flag
    pub approved: bool,
}

impl Transaction {
    /// Check if the transaction belongs to an employee
    pub fn is_owned_by(&self, employee_id: &str) -> bool {
        self.employee_id == employee_id
    }
}

/// Opaque token identifying the next page of the feed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Cursor(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Cursor(token.to_string())
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of the transaction feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Transactions on this page
    pub data: Vec<Transaction>,
    /// Cursor of the following page, `None` on the last page
    pub next_page: Option<Cursor>,
}

impl Page {
    pub fn new(data: Vec<Transaction>, next_page: Option<Cursor>) -> Self {
        Self { data, next_page }
    }

    /// Whether another page follows this one
    pub fn has_next(&self) -> bool {
        self.next_page.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_full_name() {
        let employee = Employee::new("e1", "Ada", "Lovelace");
        assert_eq!(employee.full_name(), "Ada Lovelace");
        assert_eq!(Employee::all_employees().full_name(), "All Employees");
        assert_eq!(Employee::all_employees().id, ALL_EMPLOYEES_ID);
    }

    #[test]
    fn test_employee_wire_format() {
        let employee: Employee = serde_json::from_str(
            r#"{"id":"e1","firstName":"Ada","lastName":"Lovelace"}"#
        ).unwrap();
        assert_eq!(employee, Employee::new("e1", "Ada", "Lovelace"));
    }

    #[test]
    fn test_page_wire_format() {
        let page: Page = serde_json::from_str(
            r#"{
                "data": [{
                    "id": "t1",
                    "employeeId": "e1",
                    "amount": 431.95,
                    "merchant": "Social Media Ads Inc",
                    "date": "2021-09-13",
                    "approved": true
                }],
                "nextPage": "1"
            }"#
        ).unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].amount.to_string(), "431.95");
        assert!(page.data[0].is_owned_by("e1"));
        assert_eq!(page.next_page, Some(Cursor::from("1")));
        assert!(page.has_next());
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let page: Page = serde_json::from_str(r#"{"data": [], "nextPage": null}"#).unwrap();
        assert!(!page.has_next());
    }
}
