//! Transaction page rendering - Full page endpoint

use axum::extract::State;
use axum::response::Html;

use super::api::render_view;
use crate::AppState;

/// Index page - instructions plus the transaction view panel
pub async fn page_index(state: State<AppState>) -> Html<String> {
    let snapshot = state.controller.snapshot().await;

    let content = format!(
        r#"<div class='mb-6'>
            <h2 class='text-2xl font-bold'>Transactions</h2>
            <p class='text-gray-600 mt-2'>Pick an employee to see all of their transactions,
            or keep "All Employees" and use "View More" to page through every transaction.</p>
        </div>
        <hr class='mb-6'>
        <div id='transaction-view' class='bg-white rounded-xl shadow-sm p-6'>{}</div>"#,
        render_view(&snapshot, None)
    );

    Html(crate::base_html("Transactions", &content))
}
