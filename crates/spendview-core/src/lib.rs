//! Transaction view core
//!
//! Reconciles the paginated transaction feed and the employee-scoped query
//! into one displayable list:
//! - sources: employee directory, paginated feed, scoped query
//! - view: the synchronous state machine choosing which source is shown
//! - controller: async driver performing the provider calls
//! - snapshot: what the presentation layer renders

pub mod error;
pub mod sources;
pub mod view;
pub mod controller;
pub mod snapshot;

#[cfg(test)]
mod testing;

pub use error::{ErrorCode, ErrorDetails, ErrorSeverity, FetchSource, ViewError, ViewResult};
pub use sources::{EmployeeDirectory, FilterOption, PaginatedFeed, ScopedQuery};
pub use view::{Command, Completion, Event, Mode, Ticket, TransactionView};
pub use controller::ViewController;
pub use snapshot::{LoadMoreState, ViewSnapshot};

// Re-export the data model for downstream crates
pub use spendview_data::{Cursor, DataProvider, Employee, Page, ProviderRef, Transaction};
