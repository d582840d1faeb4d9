//! Transaction HTMX endpoints - partial responses
//!
//! Endpoints:
//! - htmx_view: current view (HTML fragment)
//! - htmx_filter: apply the employee filter (HTML fragment)
//! - htmx_load_more: append the next page (HTML fragment)
//!
//! Every endpoint answers with the whole `#transaction-view` panel so the
//! filter control, the list and the "View More" button stay consistent.
//! While a fetch is in flight the panel re-requests itself until it settles.

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use spendview_core::{Transaction, ViewError, ViewSnapshot};
use spendview_utils::{escape_html, format_amount};

use crate::AppState;

pub const VIEW_TARGET: &str = "#transaction-view";

/// Poll interval of an unsettled panel
pub const REFRESH_TRIGGER: &str = "load delay:500ms";

/// Form posted by the filter control
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// HTMX: Current view
pub async fn htmx_view(state: State<AppState>) -> Html<String> {
    Html(render_view(&state.controller.snapshot().await, None))
}

/// HTMX: Filter changed
pub async fn htmx_filter(state: State<AppState>, Form(form): Form<FilterForm>) -> Html<String> {
    match state.controller.select(form.employee_id).await {
        Ok(snapshot) => Html(render_view(&snapshot, None)),
        Err(e) => {
            log::warn!("rejected filter selection: {}", e);
            Html(render_view(&state.controller.snapshot().await, Some(&e)))
        }
    }
}

/// HTMX: "View More" clicked
pub async fn htmx_load_more(state: State<AppState>) -> Html<String> {
    Html(render_view(&state.controller.load_more().await, None))
}

// ==================== Renderers ====================

/// Filter control, list and "View More" button
pub fn render_view(snapshot: &ViewSnapshot, error: Option<&ViewError>) -> String {
    let notice = error
        .map(|e| format!(
            "<div class='mb-4 p-3 rounded-lg bg-red-50 border border-red-200 text-red-700 text-sm'>{}</div>",
            escape_html(&e.to_string())
        ))
        .unwrap_or_default();

    let list = if snapshot.transactions.is_empty() && snapshot.is_pending() {
        render_loading("Loading transactions...")
    } else if snapshot.loading {
        format!("{}{}", render_transactions(&snapshot.transactions), render_loading("Loading..."))
    } else {
        render_transactions(&snapshot.transactions)
    };

    format!(
        "{}{}<div class='h-6'></div><div class='space-y-2'>{}{}</div>{}",
        notice,
        render_filter(snapshot),
        list,
        render_load_more(snapshot),
        render_refresh(snapshot)
    )
}

/// Loading row shown in place of, or below, the list
pub fn render_loading(label: &str) -> String {
    format!(
        "<div class='text-center py-6 text-gray-500 animate-pulse' role='status'>{}</div>",
        escape_html(label)
    )
}

/// Self-refreshing element kept in the panel until the view settles
pub fn render_refresh(snapshot: &ViewSnapshot) -> String {
    if !snapshot.is_pending() {
        return String::new();
    }
    format!(
        "<div hx-get='/transactions/list' hx-trigger='{}' hx-target='{}' hx-swap='innerHTML'></div>",
        REFRESH_TRIGGER, VIEW_TARGET
    )
}

/// Employee `<select>`, disabled while the directory loads
pub fn render_filter(snapshot: &ViewSnapshot) -> String {
    let mut options = String::new();
    for option in &snapshot.employees {
        let selected = if option.value == snapshot.selection { " selected" } else { "" };
        options.push_str(&format!(
            "<option value='{}'{}>{}</option>",
            escape_html(&option.value),
            selected,
            escape_html(&option.label)
        ));
    }

    let (label, disabled) = if snapshot.employees_loading {
        ("Loading employees...", " disabled")
    } else {
        ("Filter by employee", "")
    };

    format!(
        r#"<label for='employee-filter' class='block text-sm font-medium text-gray-600 mb-1'>{}</label>
        <select id='employee-filter' name='employee_id'{}
            hx-post='/transactions/filter' hx-target='{}' hx-trigger='change'
            class='px-4 py-2 border rounded-lg w-64'>{}</select>"#,
        label, disabled, VIEW_TARGET, options
    )
}

/// Transaction rows
pub fn render_transactions(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "<div class='text-center py-12 text-gray-500'><p>No transactions</p></div>".to_string();
    }

    let mut html = String::from("<div id='tx-list' class='space-y-2'>");
    for tx in transactions {
        let checked = if tx.approved { " checked" } else { "" };
        html.push_str(&format!(
            r#"<div class='bg-white border rounded-lg p-3 flex items-center justify-between gap-2' data-id='{}'>
                <div class='flex-1 min-w-0'>
                    <div class='font-medium truncate'>{}</div>
                    <div class='text-sm text-gray-500'>{} - {}</div>
                </div>
                <input type='checkbox' disabled{} title='Approved'>
            </div>"#,
            escape_html(&tx.id),
            escape_html(&tx.merchant),
            format_amount(tx.amount),
            tx.date.format("%b %-d, %Y"),
            checked
        ));
    }
    html.push_str("</div>");
    html
}

/// "View More" button: hidden until a list has loaded, disabled unless
/// another feed page can be fetched
pub fn render_load_more(snapshot: &ViewSnapshot) -> String {
    if !snapshot.load_more.visible {
        return String::new();
    }
    let disabled = if snapshot.load_more.enabled { "" } else { " disabled" };
    format!(
        r#"<button hx-post='/transactions/more' hx-target='{}'{}
            class='mt-4 w-full px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700 disabled:opacity-50'>View More<span class='htmx-indicator ml-2'>...</span></button>"#,
        VIEW_TARGET, disabled
    )
}
