//! Gateway HTTP server: health, webhook verification, and webhook event intake on one port.

use crate::config::{self, Config};
use crate::gateway::verify::{verify_subscription, VerifyParams};
use crate::messenger::WebhookBatch;
use crate::responder::Responder;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

/// Body of `GET /`.
pub const HEALTH_TEXT: &str = "SweetMix Messenger Bot is running 💖";

/// Shared state for the gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Expected `hub.verify_token`. When None every verification is refused.
    pub verify_token: Option<String>,
    pub responder: Responder,
}

impl GatewayState {
    pub fn new(config: &Config, responder: Responder) -> Self {
        Self {
            verify_token: config::resolve_verify_token(config),
            responder,
        }
    }
}

/// Routes for the gateway. Exposed so tests can serve it with their own responder.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .with_state(state)
}

/// Serve the gateway on an already bound listener until SIGINT/SIGTERM.
pub async fn serve(listener: tokio::net::TcpListener, state: GatewayState) -> Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Build the production responder from config, bind, and serve.
pub async fn run_gateway(config: Config) -> Result<()> {
    if config::resolve_verify_token(&config).is_none() {
        log::warn!("no verify token configured (VERIFY_TOKEN); webhook verification will be refused");
    }
    if config::resolve_page_token(&config).is_none() {
        log::warn!("no page token configured (PAGE_TOKEN); replies cannot be delivered");
    }
    if config::resolve_completion_key(&config).is_none() {
        log::warn!("no completion api key configured (OPENAI_KEY); chat replies will use the fallback text");
    }

    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let responder = Responder::from_config(&config);
    let state = GatewayState::new(&config, responder);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);
    serve(listener, state).await
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                log::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET / returns a static confirmation string (for probes).
async fn health_http() -> &'static str {
    HEALTH_TEXT
}

/// GET /webhook: subscription handshake. 200 with the challenge, 403 otherwise.
async fn verify_webhook(
    State(state): State<GatewayState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    match verify_subscription(&params, state.verify_token.as_deref()) {
        Some(challenge) => {
            log::info!("webhook verified");
            (StatusCode::OK, challenge).into_response()
        }
        None => {
            log::warn!("webhook verification refused (mode {:?})", params.mode);
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// POST /webhook: event batch. 200 once the batch is handled (delivery failures included),
/// 404 for non-page objects, 400 for unparseable bodies, 500 when dispatch fails.
async fn receive_webhook(State(state): State<GatewayState>, body: Bytes) -> StatusCode {
    let batch: WebhookBatch = match serde_json::from_slice(&body) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("webhook: unparseable body: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };
    if !batch.is_page() {
        return StatusCode::NOT_FOUND;
    }
    match state.responder.dispatch(batch).await {
        Ok(handled) => {
            log::debug!("webhook: handled {} event(s)", handled);
            StatusCode::OK
        }
        Err(e) => {
            log::error!("webhook: dispatch failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
