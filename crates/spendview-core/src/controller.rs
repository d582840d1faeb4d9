//! Async driver for the transaction view
//!
//! The controller feeds events into the [`TransactionView`], performs the
//! returned provider calls, and feeds their completions back. The view lock
//! is never held across a provider call, so a filter change can land while an
//! older fetch is still in flight; the view's epoch check discards the older
//! result when it arrives.
//!
//! Provider calls run on a spawned task. A caller that stops waiting (a
//! dropped request future, a timeout) does not strand a source in its
//! loading state: the task still delivers every completion.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use spendview_data::{DataProvider, Endpoint, ProviderRef};

use crate::error::ViewResult;
use crate::snapshot::ViewSnapshot;
use crate::view::{Command, Completion, Event, TransactionView};

/// Owns the view and the provider it is fed from
pub struct ViewController {
    view: Arc<Mutex<TransactionView>>,
    provider: ProviderRef,
}

impl ViewController {
    pub fn new(provider: ProviderRef) -> Self {
        Self::with_view(provider, TransactionView::default())
    }

    /// Drive an existing view
    pub fn with_view(provider: ProviderRef, view: TransactionView) -> Self {
        Self {
            view: Arc::new(Mutex::new(view)),
            provider,
        }
    }

    /// Load the employee directory, then the first page
    pub async fn start(&self) -> ViewSnapshot {
        log::info!("starting transaction view");
        let commands = self.view.lock().await.start();
        self.run(commands).await
    }

    /// Apply a filter selection; `None` or "all" shows every transaction
    pub async fn select(&self, selection: Option<String>) -> ViewResult<ViewSnapshot> {
        self.dispatch(Event::FilterChanged(selection)).await
    }

    /// Append the next feed page, if any
    pub async fn load_more(&self) -> ViewSnapshot {
        let commands = self.view.lock().await.load_more();
        self.run(commands).await
    }

    /// Current view state
    pub async fn snapshot(&self) -> ViewSnapshot {
        self.view.lock().await.snapshot()
    }

    /// Handle an event and every fetch it leads to
    pub async fn dispatch(&self, event: Event) -> ViewResult<ViewSnapshot> {
        let commands = self.view.lock().await.handle(event)?;
        Ok(self.run(commands).await)
    }

    async fn run(&self, commands: Vec<Command>) -> ViewSnapshot {
        if !commands.is_empty() {
            let task = tokio::spawn(drive(self.view.clone(), self.provider.clone(), commands));
            if let Err(e) = task.await {
                if e.is_panic() {
                    std::panic::resume_unwind(e.into_panic());
                }
                log::warn!("view fetch task ended early: {}", e);
            }
        }
        self.snapshot().await
    }
}

/// Perform `commands` and their follow-ups until none remain
async fn drive(view: Arc<Mutex<TransactionView>>, provider: ProviderRef, commands: Vec<Command>) {
    let mut pending: VecDeque<Command> = commands.into();
    while let Some(command) = pending.pop_front() {
        let completion = execute(provider.as_ref(), command).await;
        let follow_up = view.lock().await.complete(completion);
        pending.extend(follow_up);
    }
}

/// Directory loads and first-page loads are refreshes and always reach the
/// source; later pages and scoped queries may be served from a cache.
async fn execute(provider: &dyn DataProvider, command: Command) -> Completion {
    match command {
        Command::FetchEmployees(ticket) => {
            provider.invalidate(Endpoint::Employees).await;
            let result = provider.list_employees().await;
            Completion::Employees(ticket, result)
        }
        Command::FetchPage(ticket) => {
            if ticket.request.cursor().is_none() {
                provider.invalidate(Endpoint::Transactions).await;
            }
            let result = provider.list_transactions(ticket.request.cursor()).await;
            Completion::Page(ticket, result)
        }
        Command::FetchEmployeeTransactions(ticket) => {
            let result = provider
                .list_transactions_by_employee(ticket.request.employee_id())
                .await;
            Completion::EmployeeTransactions(ticket, result)
        }
    }
}
