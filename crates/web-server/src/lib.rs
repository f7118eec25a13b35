// In crates/web-server/src/lib.rs

use std::sync::Arc;

use analytics::TickerReport;
use api_client::HistorySource;
use app_config::{Settings, Watchlists};
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{Html, Json},
    routing::get,
};
use tokio::net::TcpListener;
use types::{AnalyzeForm, ScreenEntry, ScreenParams};

pub mod error;
pub mod render;
pub mod service;
pub mod types;

// Re-export our custom error type for convenience.
pub use error::{Error, Result};

/// The shared application state that is available to all handlers.
///
/// Everything in it is read-only and loaded once at startup.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub watchlists: Arc<Watchlists>,
    pub source: Arc<dyn HistorySource>,
}

impl AppState {
    pub fn new(settings: Settings, watchlists: Watchlists, source: Arc<dyn HistorySource>) -> Self {
        Self {
            settings: Arc::new(settings),
            watchlists: Arc::new(watchlists),
            source,
        }
    }
}

/// Creates the main application router with all routes and middleware.
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/analysis/{ticker}", get(get_analysis_handler))
        .route("/watchlists", get(list_watchlists_handler))
        .route("/watchlists/{name}", get(screen_watchlist_handler));

    Router::new()
        .route("/", get(index_handler).post(analyze_form_handler))
        .route("/health", get(health_check_handler))
        .nest("/api", api_router)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state)
}

/// A simple health check handler.
async fn health_check_handler() -> &'static str {
    "OK"
}

/// Handler for `GET /`: the ticker entry form.
async fn index_handler() -> Html<String> {
    Html(render::index_page(None))
}

/// Handler for `POST /`.
/// Failures are shown above the form instead of as an error status.
async fn analyze_form_handler(
    State(state): State<AppState>,
    Form(form): Form<AnalyzeForm>,
) -> Html<String> {
    let raw = form.ticker.trim();
    if raw.is_empty() {
        return Html(render::index_page(Some("Please enter a ticker symbol.")));
    }

    match service::analyze_ticker(state.source.as_ref(), &state.settings.analysis, raw).await {
        Ok(report) => Html(render::result_page(&report)),
        Err(e) => {
            tracing::warn!(ticker = raw, error = %e, "Analysis failed.");
            let message = format!("Error fetching data for '{}': {}", raw, e);
            Html(render::index_page(Some(&message)))
        }
    }
}

/// Handler for `GET /api/analysis/{ticker}`
async fn get_analysis_handler(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<TickerReport>> {
    let report =
        service::analyze_ticker(state.source.as_ref(), &state.settings.analysis, &ticker).await?;
    Ok(Json(report))
}

/// Handler for `GET /api/watchlists`
async fn list_watchlists_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.watchlists.names().into_iter().map(String::from).collect())
}

/// Handler for `GET /api/watchlists/{name}?q=<prefix>`
async fn screen_watchlist_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<ScreenParams>,
) -> Result<Json<Vec<ScreenEntry>>> {
    let watchlist = state
        .watchlists
        .find(&name)
        .ok_or_else(|| Error::NotFound(format!("Watchlist '{}' not found", name)))?;

    let entries = service::screen_watchlist(
        state.source.as_ref(),
        &state.settings.analysis,
        watchlist,
        &params.q,
    )
    .await;
    Ok(Json(entries))
}

/// The main entry point for running the web server.
///
/// Binds the configured address and serves until Ctrl-C.
pub async fn run(settings: Settings, watchlists: Watchlists, source: Arc<dyn HistorySource>) -> Result<()> {
    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let app = create_router(AppState::new(settings, watchlists, source));

    let listener = TcpListener::bind(&address).await.map_err(Error::ServerBindError)?;
    tracing::info!("Web server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::ServerError)?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubSource, settings, watchlists};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use core_types::Error as DomainError;
    use tower::ServiceExt;

    fn router(source: StubSource) -> Router {
        create_router(AppState::new(settings(), watchlists(), Arc::new(source)))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_check_is_ok() {
        let (status, body) = send(router(StubSource::flat(210, 100.0)), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn index_shows_the_form() {
        let (status, body) = send(router(StubSource::flat(210, 100.0)), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<form method=\"post\""));
        assert!(!body.contains("class=\"flash\""));
    }

    #[tokio::test]
    async fn blank_ticker_prompts_for_input() {
        let source = StubSource::flat(210, 100.0);
        let calls = source.calls();
        let (status, body) = send(router(source), post_form("ticker=+++")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Please enter a ticker symbol."));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_ticker_renders_result_page() {
        let source = StubSource::flat(210, 100.0);
        let calls = source.calls();
        let (status, body) = send(router(source), post_form("ticker=aapl")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>AAPL</h1>"));
        assert!(body.contains("AVOID"));
        assert!(body.contains("100.00"));
        assert!(body.contains("<svg"));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn upstream_failure_is_shown_as_a_message() {
        let (status, body) = send(router(StubSource::unavailable()), post_form("ticker=zzzz")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Error fetching data for &#39;zzzz&#39;"));
        assert!(body.contains("data unavailable for ZZZZ"));
    }

    #[tokio::test]
    async fn api_returns_report_json() {
        let (status, body) = send(router(StubSource::flat(210, 100.0)), get("/api/analysis/msft")).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["ticker"], "MSFT");
        assert_eq!(json["analysis"]["recommendation"], "AVOID");
        assert_eq!(json["analysis"]["window_average"], 100.0);
        assert_eq!(json["weeks_used"], 200);
    }

    #[tokio::test]
    async fn api_maps_domain_errors_to_status_codes() {
        let (status, body) = send(router(StubSource::flat(210, 100.0)), get("/api/analysis/bad%3Csym")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("invalid input"));

        let (status, body) = send(router(StubSource::flat(150, 100.0)), get("/api/analysis/NEW")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("found 150 weekly periods, 200 required"));

        let (status, _) = send(router(StubSource::unavailable()), get("/api/analysis/GONE")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn empty_history_is_insufficient_data() {
        let source = StubSource::with_result(Ok(core_types::PriceSeries::empty()));
        let (status, body) = send(router(source), get("/api/analysis/EMPTY")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("found 0 weekly periods"));
    }

    #[tokio::test]
    async fn lists_watchlist_names() {
        let (status, body) = send(router(StubSource::flat(210, 100.0)), get("/api/watchlists")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"["fno"]"#);
    }

    #[tokio::test]
    async fn screens_watchlist_with_prefix_filter() {
        let (status, body) = send(
            router(StubSource::flat(210, 100.0)),
            get("/api/watchlists/FNO?q=hdfc"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let rows: serde_json::Value = serde_json::from_str(&body).unwrap();
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["symbol"], "HDFCBANK");
        assert_eq!(rows[0]["price"], 100.0);
        assert_eq!(rows[0]["status"], "success");
    }

    #[tokio::test]
    async fn unknown_watchlist_is_not_found() {
        let (status, body) = send(router(StubSource::flat(210, 100.0)), get("/api/watchlists/dax")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Watchlist 'dax' not found"));
    }

    #[test]
    fn domain_errors_keep_their_message() {
        let err = Error::from(DomainError::InsufficientData { found: 3, required: 200 });
        assert_eq!(err.to_string(), "insufficient data: found 3 weekly periods, 200 required");
    }
}
