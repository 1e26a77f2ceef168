use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::pipeline::{AppContext, RunOutcome, run_blocking};
use crate::scheduler::spawn_schedule;

pub const AUTH_HEADER: &str = "authentication";
const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

#[derive(Serialize)]
struct TriggerResponse<'a> {
    result: &'a RunOutcome,
}

/// An empty configured key disables the trigger entirely.
pub fn authorize(configured: &str, provided: Option<&str>) -> bool {
    !configured.is_empty() && provided == Some(configured)
}

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new().route("/", any(trigger)).with_state(ctx)
}

async fn trigger(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Response {
    let provided = headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok());
    if !authorize(&ctx.config.api_key, provided) {
        warn!("rejected on-demand trigger");
        return StatusCode::FORBIDDEN.into_response();
    }

    info!("on-demand trigger accepted");
    let outcome = match run_blocking(ctx).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(error = %format!("{err:#}"), "on-demand run failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match serde_json::to_string(&TriggerResponse { result: &outcome }) {
        Ok(body) => ([(CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response(),
        Err(err) => {
            error!(error = %err, "failed to serialize run outcome");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serve the on-demand trigger and, when configured, the polling schedule.
pub async fn serve(ctx: Arc<AppContext>) -> Result<()> {
    let bind = ctx.config.bind.clone();
    let schedule = spawn_schedule(ctx.clone());

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    info!(%bind, "listening for on-demand triggers");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    if let Some(handle) = schedule {
        handle.abort();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
