//! Presentation-facing view state

use serde::{Deserialize, Serialize};
use spendview_data::Transaction;

use crate::sources::FilterOption;
use crate::view::Mode;

/// "View more" control state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadMoreState {
    /// A list has been loaded at least once
    pub visible: bool,
    /// Feed mode, a next page exists, and no page is loading
    pub enabled: bool,
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub mode: Mode,
    /// Current filter control value ("all" or an employee id)
    pub selection: String,
    pub transactions: Vec<Transaction>,
    /// Filter control entries, "All Employees" first; empty when no
    /// employees are available
    pub employees: Vec<FilterOption>,
    /// Disables the filter control
    pub employees_loading: bool,
    pub load_more: LoadMoreState,
    /// Any fetch in flight
    pub loading: bool,
}

impl ViewSnapshot {
    /// A fetch is in flight, or no list has been shown yet
    pub fn is_pending(&self) -> bool {
        self.loading || !self.load_more.visible
    }

    /// Label of the selected filter entry
    pub fn selection_label(&self) -> Option<&str> {
        self.employees
            .iter()
            .find(|o| o.value == self.selection)
            .map(|o| o.label.as_str())
    }
}
