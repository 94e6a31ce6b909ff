//! Shared wiring: config load, API-key check, service construction.

use std::sync::Arc;

use anyhow::Result;
use barrister_config::AppConfig;
use barrister_pipeline::{QaService, RetryPolicy};
use barrister_providers::OpenAiCompatEndpoint;
use barrister_retrieval::FileFragmentSource;

pub struct Session {
    pub config: AppConfig,
    pub service: QaService,
    pub source: FileFragmentSource,
}

/// Load config, fail fast without an API key, and wire up the service.
pub fn build_session() -> Result<Session> {
    let config = AppConfig::load()?;

    // Check for the API credential early — give a clear error
    let api_key = match config.require_api_key() {
        Ok(key) => key.to_string(),
        Err(err) => {
            eprintln!();
            eprintln!("  ERROR: No API key configured!");
            eprintln!();
            eprintln!("  Set one of these environment variables:");
            eprintln!("    BARRISTER_API_KEY=gsk_...");
            eprintln!("    GROQ_API_KEY=gsk_...");
            eprintln!();
            eprintln!("  Or add it to your config file:");
            eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
            eprintln!();
            return Err(err.into());
        }
    };

    let endpoint = OpenAiCompatEndpoint::new(
        "groq",
        config.api_url.clone(),
        api_key,
        config.model.clone(),
    )
    .with_temperature(config.temperature);

    let policy = RetryPolicy::from_secs(
        config.retry.max_retries,
        config.retry.base_delay_secs,
        config.retry.max_delay_secs,
    );

    let service = QaService::new(Arc::new(endpoint))
        .with_policy(policy)
        .with_budgets(
            config.context.answer_max_chars,
            config.context.summary_max_chars,
        );

    let source = FileFragmentSource::new(
        config.retrieval.document_root.clone(),
        config.retrieval.limit,
    );

    Ok(Session {
        config,
        service,
        source,
    })
}
