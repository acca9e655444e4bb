//! HTTP status surface using Axum

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::config::AppConfig;
use crate::core::runtime::AlertRuntime;
use crate::jobs::types::CycleOutcome;
use crate::metrics::Metrics;
use crate::models::alert::TrendDirection;

/// Static facts about the running configuration, shown on `/status`.
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub telegram_token_loaded: bool,
    pub telegram_chat_id_loaded: bool,
    pub coin_count: usize,
    pub check_interval_minutes: u64,
    pub direction: TrendDirection,
    pub exchange: String,
}

impl ServiceInfo {
    pub fn from_config(config: &AppConfig, exchange: impl Into<String>) -> Self {
        Self {
            telegram_token_loaded: config.telegram_token.is_some(),
            telegram_chat_id_loaded: config.telegram_chat_id.is_some(),
            coin_count: config.coins.len(),
            check_interval_minutes: config.check_interval_minutes,
            direction: config.direction,
            exchange: exchange.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub runtime: Arc<AlertRuntime>,
    pub info: Arc<ServiceInfo>,
}

async fn home() -> &'static str {
    "Trend alert bot is running!"
}

fn check_mark(loaded: bool) -> &'static str {
    if loaded {
        "✓"
    } else {
        "✗"
    }
}

async fn status_page(State(state): State<AppState>) -> Html<String> {
    let info = &state.info;
    let last_cycle = match state.runtime.last_status().await {
        Some(status) => format!(
            "{} ({})",
            status.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
            status.outcome.summary()
        ),
        None => "none yet".to_string(),
    };
    let running = if state.runtime.is_cycle_running() {
        "<p>A cycle is running now</p>"
    } else {
        ""
    };

    Html(format!(
        "<h2>Bot Status</h2>\n\
         <p>Token: {}</p>\n\
         <p>Chat ID: {}</p>\n\
         <p>Exchange: {}</p>\n\
         <p>Tracked coins: {}</p>\n\
         <p>Condition: {} trend</p>\n\
         <p>Check interval: {} minute(s)</p>\n\
         <p>Last cycle: {}</p>\n\
         {}\n\
         <a href=\"/test\">Run manual check</a>\n",
        check_mark(info.telegram_token_loaded),
        check_mark(info.telegram_chat_id_loaded),
        info.exchange,
        info.coin_count,
        info.direction,
        info.check_interval_minutes,
        last_cycle,
        running
    ))
}

/// Forces one cycle, waiting behind any cycle already in flight.
async fn manual_test(State(state): State<AppState>) -> String {
    info!("Manual check requested");
    match state.runtime.run_evaluation_cycle().await {
        outcome @ CycleOutcome::Completed(_) => {
            format!("Manual check completed: {}. See logs for details.", outcome.summary())
        }
        CycleOutcome::Failed { error } => format!("Manual check failed: {}", error),
    }
}

/// `degraded` while the most recent cycle ended in an error.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let last = state.runtime.last_status().await;
    let status = match &last {
        Some(s) if !s.outcome.is_completed() => "degraded",
        _ => "healthy",
    };
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": status,
        "last_cycle_at": last.map(|s| s.finished_at.to_rfc3339()),
        "uptime_seconds": uptime_seconds,
        "cycle_running": state.runtime.is_cycle_running(),
        "service": "trendwatch-alert-bot"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    state.metrics.http_requests_in_flight.dec();

    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis() as u64,
            "HTTP request error"
        );
    }

    response
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/status", get(status_page))
        .route("/test", get(manual_test))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> std::io::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await
}
