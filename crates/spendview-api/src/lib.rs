//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::view: JSON view state, filter and pagination
//! - routes::transactions: HTMX page and fragments

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use spendview_config::Config;
use spendview_core::ViewController;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ViewController>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::transactions::{htmx_filter, htmx_load_more, htmx_view, page_index};
    use routes::view::{api_filter, api_load_more, api_view};

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/view", get(api_view))
        .route("/api/filter", post(api_filter))
        .route("/api/load-more", post(api_load_more))
        // HTMX page routes
        .route("/", get(page_index))
        .route("/transactions/list", get(htmx_view))
        .route("/transactions/filter", post(htmx_filter))
        .route("/transactions/more", post(htmx_load_more))
        .fallback(not_found)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound { resource: uri.path().to_string() }
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Spendview</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    <main class="max-w-4xl mx-auto p-6">{}</main>
</body>
</html>"#,
        spendview_utils::escape_html(title),
        content
    )
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until the listener fails.
pub async fn start_server(config: Config, controller: Arc<ViewController>) -> std::io::Result<()> {
    let addr = config.bind_addr();
    let state = AppState { controller, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Spendview server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Transaction view)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use spendview_data::{Fixture, InMemoryProvider};

    pub const FIXTURE: &str = r#"{
        "employees": [
            {"id": "e1", "firstName": "Ada", "lastName": "Lovelace"},
            {"id": "e2", "firstName": "Alan", "lastName": "Turing"}
        ],
        "transactions": [
            {"id": "t1", "employeeId": "e1", "amount": 10.5, "merchant": "Books & Co", "date": "2022-01-03", "approved": false},
            {"id": "t2", "employeeId": "e2", "amount": 1200, "merchant": "Coffee", "date": "2022-01-04", "approved": true},
            {"id": "t3", "employeeId": "e1", "amount": 30, "merchant": "Taxi", "date": "2022-01-05", "approved": false}
        ]
    }"#;

    /// Router over a started view with pages of two transactions
    pub async fn router() -> Router {
        let fixture = Fixture::from_json(FIXTURE).unwrap();
        let provider = Arc::new(InMemoryProvider::new(fixture, 2).unwrap());
        let controller = Arc::new(ViewController::new(provider));
        controller.start().await;
        create_router(AppState { controller, config: Config::default() })
    }

    pub async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
