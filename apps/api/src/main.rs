mod analysis;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::evaluation::LlmEvaluator;
use crate::analysis::notification::{DisabledNotifier, Notifier, SmtpNotifier};
use crate::analysis::pipeline::CvAnalyzer;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(&config.llm).context("Failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize notifier (SMTP when configured, otherwise disabled)
    let notifier: Arc<dyn Notifier> = match &config.mail {
        Some(mail) => {
            let smtp = SmtpNotifier::new(mail).context("Failed to configure SMTP transport")?;
            info!("SMTP notifier initialized ({}:{})", mail.host, mail.port);
            Arc::new(smtp)
        }
        None => {
            warn!("MAILER_EMAIL not set; acceptance emails are disabled");
            Arc::new(DisabledNotifier)
        }
    };

    // Build app state
    let analyzer = CvAnalyzer::new(Arc::new(LlmEvaluator::new(llm)), notifier);
    let state = AppState {
        analyzer: Arc::new(analyzer),
    };

    // Build router
    let app = build_router(state, config.max_upload_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config.allowed_origins)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Permissive when `*` is listed, otherwise restricted to the configured origins.
fn build_cors(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}
