//! Paginated transaction feed

use spendview_data::{Cursor, DataProvider, Page, ProviderError, Transaction};

use crate::error::{report_fetch_failure, FetchSource};

/// Ticket for one page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    generation: u64,
    cursor: Option<Cursor>,
}

impl PageRequest {
    /// Cursor to pass to the provider, `None` for the first page
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }
}

/// Most recently fetched page plus the cursor to the next one
#[derive(Debug, Default)]
pub struct PaginatedFeed {
    page: Option<Page>,
    loading: bool,
    generation: u64,
}

impl PaginatedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start fetching the page after the current one.
    ///
    /// Returns `None` without touching any state when a fetch is already in
    /// flight or the last page has been reached.
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if self.loading {
            log::debug!("feed fetch skipped: a page is already loading");
            return None;
        }
        if self.is_exhausted() {
            log::debug!("feed fetch skipped: no next page");
            return None;
        }

        self.loading = true;
        Some(PageRequest {
            generation: self.generation,
            cursor: self.next_cursor().cloned(),
        })
    }

    /// Merge a page result, returning the newly fetched transactions.
    ///
    /// Results for an invalidated generation are dropped. A failed fetch
    /// keeps the previous page and cursor.
    pub fn complete_fetch(&mut self, request: PageRequest, result: Result<Page, ProviderError>) -> Option<Vec<Transaction>> {
        if request.generation != self.generation {
            log::debug!("dropping stale feed page (generation {} != {})", request.generation, self.generation);
            return None;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                let data = page.data.clone();
                self.page = Some(page);
                Some(data)
            }
            Err(e) => {
                report_fetch_failure(FetchSource::Feed, "fetch_all", &e);
                None
            }
        }
    }

    /// Fetch the next page from the provider. A no-op once the feed is exhausted.
    pub async fn fetch_all(&mut self, provider: &dyn DataProvider) -> Option<Vec<Transaction>> {
        let request = self.begin_fetch()?;
        let result = provider.list_transactions(request.cursor()).await;
        self.complete_fetch(request, result)
    }

    /// Reset to the initial state; the next fetch starts from the first page
    pub fn invalidate_data(&mut self) {
        self.page = None;
        self.loading = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Most recently fetched page
    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.page.as_ref().and_then(|p| p.next_page.as_ref())
    }

    pub fn has_next_page(&self) -> bool {
        self.next_cursor().is_some()
    }

    /// A page was fetched and it had no successor
    pub fn is_exhausted(&self) -> bool {
        self.page.as_ref().map_or(false, |p| !p.has_next())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
