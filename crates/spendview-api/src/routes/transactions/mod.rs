//! Transaction routes - filterable, paginated transaction view
//!
//! Structure:
//! - api.rs: HTMX fragment endpoints and renderers
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{htmx_filter, htmx_load_more, htmx_view, render_view};
pub use page::page_index;
