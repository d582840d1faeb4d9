//! Transaction view state machine
//!
//! [`TransactionView`] decides which source drives the displayed list. It is
//! purely synchronous: [`TransactionView::handle`] consumes an [`Event`] and
//! returns the provider calls to issue as [`Command`]s. Their results come
//! back as [`Event::FetchCompleted`].
//!
//! Every command carries the view epoch it was issued in. The epoch advances
//! on each mode change, and completions from an older epoch are discarded.

use serde::{Deserialize, Serialize};
use spendview_data::{Employee, Page, ProviderError, Transaction, ALL_EMPLOYEES_ID};
use std::collections::HashSet;

use crate::error::{ViewError, ViewResult};
use crate::snapshot::{LoadMoreState, ViewSnapshot};
use crate::sources::{DirectoryRequest, EmployeeDirectory, PageRequest, PaginatedFeed, ScopedQuery, ScopedRequest};

/// Which source drives the displayed list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "employeeId", rename_all = "camelCase")]
pub enum Mode {
    /// Paginated feed of every transaction
    #[default]
    All,
    /// Every transaction of one employee
    ByEmployee(String),
}

impl Mode {
    /// Map a filter control value to a mode. No value, an empty value and
    /// "all" clear the filter.
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection.map(str::trim) {
            None | Some("") | Some(ALL_EMPLOYEES_ID) => Mode::All,
            Some(id) => Mode::ByEmployee(id.to_string()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Mode::All)
    }

    pub fn employee_id(&self) -> Option<&str> {
        match self {
            Mode::All => None,
            Mode::ByEmployee(id) => Some(id.as_str()),
        }
    }

    /// Value of the filter control for this mode
    pub fn selection(&self) -> &str {
        self.employee_id().unwrap_or(ALL_EMPLOYEES_ID)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::All => write!(f, "all"),
            Mode::ByEmployee(id) => write!(f, "employee:{}", id),
        }
    }
}

/// Request stamped with the view epoch it was issued in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<R> {
    pub epoch: u64,
    pub request: R,
}

/// Provider call the driver must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchEmployees(Ticket<DirectoryRequest>),
    FetchPage(Ticket<PageRequest>),
    FetchEmployeeTransactions(Ticket<ScopedRequest>),
}

/// Outcome of a [`Command`]
#[derive(Debug)]
pub enum Completion {
    Employees(Ticket<DirectoryRequest>, Result<Vec<Employee>, ProviderError>),
    Page(Ticket<PageRequest>, Result<Page, ProviderError>),
    EmployeeTransactions(Ticket<ScopedRequest>, Result<Vec<Transaction>, ProviderError>),
}

/// Input to the state machine
#[derive(Debug)]
pub enum Event {
    /// Application start
    Startup,
    /// Filter control changed; `None` or "all" clears the filter
    FilterChanged(Option<String>),
    /// "View more" activated
    LoadMore,
    /// A provider call finished
    FetchCompleted(Completion),
}

/// Aggregated, displayable transaction list
#[derive(Debug, Default)]
pub struct TransactionView {
    directory: EmployeeDirectory,
    feed: PaginatedFeed,
    scoped: ScopedQuery,
    mode: Mode,
    filter_chosen: bool,
    seeded: bool,
    display_ready: bool,
    display: Vec<Transaction>,
    seen: HashSet<String>,
    epoch: u64,
}

impl TransactionView {
    /// Build a view over its three sources
    pub fn new(directory: EmployeeDirectory, feed: PaginatedFeed, scoped: ScopedQuery) -> Self {
        Self {
            directory,
            feed,
            scoped,
            ..Self::default()
        }
    }

    /// Apply one event and return the provider calls it requires
    pub fn handle(&mut self, event: Event) -> ViewResult<Vec<Command>> {
        match event {
            Event::Startup => Ok(self.start()),
            Event::FilterChanged(selection) => self.select(Mode::from_selection(selection.as_deref())),
            Event::LoadMore => Ok(self.load_more()),
            Event::FetchCompleted(completion) => Ok(self.complete(completion)),
        }
    }

    /// Request the employee directory; the first page follows once it lands
    pub fn start(&mut self) -> Vec<Command> {
        vec![self.fetch_employees()]
    }

    fn select(&mut self, mode: Mode) -> ViewResult<Vec<Command>> {
        if let Mode::ByEmployee(ref id) = mode {
            if !self.directory.contains(id) {
                return Err(ViewError::InvalidSelection { employee_id: id.clone() });
            }
        }

        self.filter_chosen = true;
        match mode {
            Mode::All => Ok(self.enter_all()),
            Mode::ByEmployee(id) => self.enter_by_employee(id),
        }
    }

    fn enter_all(&mut self) -> Vec<Command> {
        self.advance_epoch(Mode::All);
        self.scoped.invalidate_data();
        self.feed.invalidate_data();
        self.clear_display();

        self.feed.begin_fetch()
            .map(|request| Command::FetchPage(self.ticket(request)))
            .into_iter()
            .collect()
    }

    fn enter_by_employee(&mut self, employee_id: String) -> ViewResult<Vec<Command>> {
        self.advance_epoch(Mode::ByEmployee(employee_id.clone()));
        self.feed.invalidate_data();
        self.clear_display();

        let request = self.scoped.begin_fetch(&employee_id)?;
        Ok(vec![Command::FetchEmployeeTransactions(self.ticket(request))])
    }

    /// Request the next feed page. Nothing is issued outside feed mode, while
    /// a page is loading, or once the feed is exhausted.
    pub fn load_more(&mut self) -> Vec<Command> {
        if !self.mode.is_all() || !self.feed.has_next_page() {
            log::debug!("load more ignored in mode {}: no next page", self.mode);
            return Vec::new();
        }

        self.feed.begin_fetch()
            .map(|request| Command::FetchPage(self.ticket(request)))
            .into_iter()
            .collect()
    }

    /// Merge a provider result and return any follow-up calls
    pub fn complete(&mut self, completion: Completion) -> Vec<Command> {
        match completion {
            Completion::Employees(ticket, result) => {
                self.directory.complete_fetch(ticket.request, result);
                if self.filter_chosen || self.seeded {
                    return Vec::new();
                }

                // first directory load decides the initial list
                self.seeded = true;
                log::debug!("seeding transaction feed after directory load");
                let mut commands = self.enter_all();
                commands.insert(0, self.fetch_employees());
                commands
            }
            Completion::Page(ticket, result) => {
                if self.is_stale(ticket.epoch) || !self.mode.is_all() {
                    log::debug!("discarding page from epoch {} (now {})", ticket.epoch, self.epoch);
                    return Vec::new();
                }
                if let Some(data) = self.feed.complete_fetch(ticket.request, result) {
                    self.append(data);
                }
                self.display_ready = true;
                Vec::new()
            }
            Completion::EmployeeTransactions(ticket, result) => {
                if self.is_stale(ticket.epoch) || self.mode.employee_id() != Some(ticket.request.employee_id()) {
                    log::debug!(
                        "discarding transactions of {} from epoch {} (now {})",
                        ticket.request.employee_id(),
                        ticket.epoch,
                        self.epoch
                    );
                    return Vec::new();
                }
                if let Some(data) = self.scoped.complete_fetch(ticket.request, result) {
                    self.append(data);
                }
                self.display_ready = true;
                Vec::new()
            }
        }
    }

    fn fetch_employees(&mut self) -> Command {
        let request = self.directory.begin_fetch();
        Command::FetchEmployees(self.ticket(request))
    }

    fn ticket<R>(&self, request: R) -> Ticket<R> {
        Ticket { epoch: self.epoch, request }
    }

    fn advance_epoch(&mut self, mode: Mode) {
        self.epoch = self.epoch.wrapping_add(1);
        log::debug!("mode {} -> {} (epoch {})", self.mode, mode, self.epoch);
        self.mode = mode;
    }

    fn is_stale(&self, epoch: u64) -> bool {
        epoch != self.epoch
    }

    fn clear_display(&mut self) {
        self.display.clear();
        self.seen.clear();
    }

    fn append(&mut self, transactions: Vec<Transaction>) {
        for transaction in transactions {
            if self.seen.insert(transaction.id.clone()) {
                self.display.push(transaction);
            } else {
                log::debug!("skipping duplicate transaction {}", transaction.id);
            }
        }
    }

    // ==================== Read Access ====================

    /// Displayed transactions: the scoped result when it holds any,
    /// otherwise the accumulated feed pages
    pub fn transactions(&self) -> &[Transaction] {
        match self.scoped.data() {
            Some(scoped) if !scoped.is_empty() => scoped,
            _ => &self.display,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    pub fn feed(&self) -> &PaginatedFeed {
        &self.feed
    }

    pub fn scoped(&self) -> &ScopedQuery {
        &self.scoped
    }

    /// "View more" control state
    pub fn load_more_state(&self) -> LoadMoreState {
        LoadMoreState {
            visible: self.display_ready,
            enabled: self.display_ready
                && self.mode.is_all()
                && self.feed.has_next_page()
                && !self.feed.is_loading(),
        }
    }

    /// Any source has a fetch in flight
    pub fn is_loading(&self) -> bool {
        self.directory.is_loading() || self.feed.is_loading() || self.scoped.is_loading()
    }

    /// Everything the presentation layer renders
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            mode: self.mode.clone(),
            selection: self.mode.selection().to_string(),
            transactions: self.transactions().to_vec(),
            employees: self.directory.options(),
            employees_loading: self.directory.is_loading(),
            load_more: self.load_more_state(),
            loading: self.is_loading(),
        }
    }
}
