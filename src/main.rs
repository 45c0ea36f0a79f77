//! Scam Honeypot server entry point.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scam_honeypot::adapters::ai::{
    FailoverAIProvider, GeminiConfig, GeminiProvider, OpenAIConfig, OpenAIProvider,
};
use scam_honeypot::adapters::callback::{HttpReportDispatcher, LogOnlyReportDispatcher};
use scam_honeypot::adapters::http::{honeypot_router, HoneypotAppState, RouterOptions};
use scam_honeypot::application::{
    DispatchReportHandler, GetEngagementStatsHandler, ProcessTurnHandler, SessionRegistry,
    TurnSettings,
};
use scam_honeypot::config::{AiConfig, AiProvider, AppConfig, ConfigError, ValidationError};
use scam_honeypot::ports::{AIProvider, ReportDispatcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate().map_err(ConfigError::from)?;

    init_tracing(&config);

    let provider = build_provider(&config.ai)?;
    let dispatcher = build_dispatcher(&config);
    let registry = Arc::new(SessionRegistry::new(config.engagement.registry_config()));

    let dispatch = Arc::new(DispatchReportHandler::new(dispatcher, registry.clone()));
    let settings = TurnSettings {
        temperature: config.ai.temperature,
        max_tokens: config.ai.max_tokens,
        provider_timeout: config.ai.timeout(),
    };
    let process_turn = Arc::new(ProcessTurnHandler::new(
        registry.clone(),
        provider.clone(),
        dispatch,
        settings,
    ));
    let stats = Arc::new(GetEngagementStatsHandler::new(registry, provider.clone()));

    let options = RouterOptions::new(config.auth.resolved_api_key())
        .with_request_timeout(config.server.request_timeout())
        .with_cors_origins(config.server.cors_origins_list());
    let app = honeypot_router(HoneypotAppState::new(process_turn, stats), options);

    let addr = config.server.socket_addr().map_err(ConfigError::from)?;
    let listener = TcpListener::bind(addr).await?;

    let info = provider.provider_info();
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        provider = %info.name,
        model = %info.model,
        callback = config.callback.url().unwrap_or("not configured"),
        "honeypot listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("honeypot shut down");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_provider(ai: &AiConfig) -> Result<Arc<dyn AIProvider>, ConfigError> {
    let primary = provider_for(ai, ai.provider)?;
    let provider: Arc<dyn AIProvider> = match ai.fallback_provider {
        Some(kind) => Arc::new(
            FailoverAIProvider::new(primary).with_fallback(provider_for(ai, kind)?),
        ),
        None => primary,
    };
    Ok(provider)
}

fn provider_for(ai: &AiConfig, kind: AiProvider) -> Result<Arc<dyn AIProvider>, ConfigError> {
    let provider: Arc<dyn AIProvider> = match kind {
        AiProvider::Groq => {
            let key = ai
                .groq_api_key
                .clone()
                .ok_or(ValidationError::MissingRequired("AI__GROQ_API_KEY"))?;
            Arc::new(OpenAIProvider::new(
                OpenAIConfig::groq(key)
                    .with_model(&ai.groq_model)
                    .with_base_url(&ai.groq_base_url)
                    .with_timeout(ai.timeout())
                    .with_max_retries(ai.max_retries),
            ))
        }
        AiProvider::Gemini => {
            let key = ai
                .gemini_api_key
                .clone()
                .ok_or(ValidationError::MissingRequired("AI__GEMINI_API_KEY"))?;
            Arc::new(GeminiProvider::new(
                GeminiConfig::new(key)
                    .with_model(&ai.gemini_model)
                    .with_timeout(ai.timeout()),
            ))
        }
    };
    Ok(provider)
}

fn build_dispatcher(config: &AppConfig) -> Arc<dyn ReportDispatcher> {
    match config.callback.url() {
        Some(url) => Arc::new(HttpReportDispatcher::new(url, config.callback.timeout())),
        None => {
            tracing::warn!("no callback URL configured, reports will only be logged");
            Arc::new(LogOnlyReportDispatcher::new())
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
