//! Data source components driven by the transaction view
//!
//! Every component fetches in two steps: `begin_fetch` hands out a request
//! ticket and `complete_fetch` merges the provider result. The feed and the
//! scoped query stamp tickets with a generation; `invalidate_data` bumps it,
//! so a result that arrives after invalidation is dropped.

pub mod directory;
pub mod feed;
pub mod scoped;

pub use directory::{DirectoryRequest, EmployeeDirectory, FilterOption};
pub use feed::{PageRequest, PaginatedFeed};
pub use scoped::{ScopedQuery, ScopedRequest};
