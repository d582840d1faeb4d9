//! Scripted provider shared by the unit tests

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendview_data::{Cursor, DataProvider, Employee, Page, ProviderError, Transaction};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub fn tx(id: &str, employee_id: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        amount: Decimal::new(1999, 2),
        merchant: "Merchant".to_string(),
        date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        approved: false,
    }
}

/// Provider with canned responses, injected delays and one-shot failures
#[derive(Default)]
pub struct ScriptedProvider {
    pub employees: Vec<Employee>,
    pub pages: HashMap<Option<String>, Page>,
    pub by_employee: HashMap<String, Vec<Transaction>>,
    pub failing_cursors: Mutex<Vec<String>>,
    pub fail_employees: bool,
    pub page_delay: Option<Duration>,
    pub employee_delay: Option<Duration>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    /// Two employees; feed pages [t1, t2] -> p2 [t3, t4] -> p3 [t5]
    pub fn scenario() -> Self {
        let mut pages = HashMap::new();
        pages.insert(None, Page::new(vec![tx("t1", "e1"), tx("t2", "e2")], Some(Cursor::from("p2"))));
        pages.insert(Some("p2".to_string()), Page::new(vec![tx("t3", "e1"), tx("t4", "e2")], Some(Cursor::from("p3"))));
        pages.insert(Some("p3".to_string()), Page::new(vec![tx("t5", "e1")], None));

        let mut by_employee = HashMap::new();
        by_employee.insert("e1".to_string(), vec![tx("t1", "e1"), tx("t3", "e1"), tx("t5", "e1")]);
        by_employee.insert("e2".to_string(), vec![tx("t2", "e2"), tx("t4", "e2")]);

        Self {
            employees: vec![
                Employee::new("e1", "Ada", "Lovelace"),
                Employee::new("e2", "Alan", "Turing"),
            ],
            pages,
            by_employee,
            ..Self::default()
        }
    }

    pub fn fail_once(&self, cursor: &str) {
        self.failing_cursors.lock().unwrap().push(cursor.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }
}

#[async_trait]
impl DataProvider for ScriptedProvider {
    async fn list_employees(&self) -> Result<Vec<Employee>, ProviderError> {
        self.calls.lock().unwrap().push("employees".to_string());
        if self.fail_employees {
            return Err(ProviderError::unavailable("directory down"));
        }
        Ok(self.employees.clone())
    }

    async fn list_transactions(&self, cursor: Option<&Cursor>) -> Result<Page, ProviderError> {
        let key = cursor.map(|c| c.to_string());
        self.calls.lock().unwrap().push(format!("page:{}", key.as_deref().unwrap_or("first")));
        if let Some(delay) = self.page_delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(ref c) = key {
            let mut failing = self.failing_cursors.lock().unwrap();
            if let Some(pos) = failing.iter().position(|f| f == c) {
                failing.remove(pos);
                return Err(ProviderError::unavailable("page timeout"));
            }
        }

        self.pages.get(&key).cloned()
            .ok_or_else(|| ProviderError::InvalidCursor { cursor: key.unwrap_or_default() })
    }

    async fn list_transactions_by_employee(&self, employee_id: &str) -> Result<Vec<Transaction>, ProviderError> {
        self.calls.lock().unwrap().push(format!("employee:{}", employee_id));
        if let Some(delay) = self.employee_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.by_employee.get(employee_id).cloned().unwrap_or_default())
    }
}
