//! Route modules for the API server
//!
//! - view: JSON endpoints over the view controller
//! - transactions: HTMX page and partial fragments
//!
//! transactions follows the page/fragment split:
//! - page.rs: full page rendering
//! - api.rs: HTMX fragment endpoints and the shared renderers

pub mod view;
pub mod transactions;
