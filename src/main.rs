//! Wiring & DI. Entry point: bootstrap adapters, inject into services, serve HTTP.
//! No business logic here.

use dotenv::dotenv;
use lead_scout::adapters::ai::{GeminiAdapter, MockAiAdapter, OpenAiAdapter};
use lead_scout::adapters::clock::TokioSleeper;
use lead_scout::adapters::http::{AppState, build_app};
use lead_scout::adapters::integrations::{
    AccessTokenSource, GoogleSheetsAdapter, ServiceAccountTokenSource, StaticToken,
};
use lead_scout::adapters::maps::GoogleMapsAdapter;
use lead_scout::ports::{AiPort, SpreadsheetPort};
use lead_scout::shared::config::AppConfig;
use lead_scout::usecases::{ContentGenerator, ExportService, LeadService, SearchSettings};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config load failed, using defaults");
        AppConfig::default()
    });

    let client = reqwest::Client::builder()
        .timeout(cfg.http_timeout())
        .build()?;

    // --- Content tiers: Gemini, then OpenAI, then the static template ---
    let content = Arc::new(ContentGenerator::new(ai_tiers(&cfg, &client)));
    info!(chain = ?content.chain(), "content fallback chain");

    // --- Lead pipeline (needs a Maps key) ---
    let leads = match cfg.maps_api_key() {
        Some(key) => {
            let maps = Arc::new(GoogleMapsAdapter::new(
                client.clone(),
                cfg.maps_base_url_or_default(),
                key,
            ));
            let settings = SearchSettings {
                max_results: cfg.max_results_or_default(),
                batch_size: cfg.enrich_batch_size_or_default(),
                page_token_delay: cfg.page_token_delay(),
            };
            info!(
                max_results = settings.max_results,
                batch_size = settings.batch_size,
                page_token_delay_ms = settings.page_token_delay.as_millis() as u64,
                "lead search enabled"
            );
            Some(Arc::new(LeadService::new(
                maps.clone(),
                maps,
                Arc::clone(&content),
                Arc::new(TokioSleeper),
                settings,
            )))
        }
        None => {
            warn!("MAPS_API_KEY not set, lead search will answer 500");
            None
        }
    };

    // --- Export ---
    let export = Arc::new(ExportService::new(sheets_adapter(&cfg, &client)));

    let app = build_app(AppState {
        leads,
        content,
        export,
    });

    let bind_addr = cfg.bind_addr_or_default();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn ai_tiers(cfg: &AppConfig, client: &reqwest::Client) -> Vec<Arc<dyn AiPort>> {
    let mut tiers: Vec<Arc<dyn AiPort>> = Vec::new();

    if let Some(key) = cfg.gemini_api_key() {
        info!(model = %cfg.gemini_model_or_default(), "Gemini provider enabled");
        tiers.push(Arc::new(GeminiAdapter::new(
            client.clone(),
            cfg.gemini_base_url_or_default(),
            key,
            cfg.gemini_model_or_default(),
        )));
    }

    if let Some(key) = cfg.openai_api_key() {
        info!(
            model = %cfg.openai_model_or_default(),
            url = %cfg.openai_api_url_or_default(),
            "OpenAI provider enabled"
        );
        tiers.push(Arc::new(OpenAiAdapter::new(
            client.clone(),
            cfg.openai_api_url_or_default(),
            key,
            cfg.openai_model_or_default(),
        )));
    }

    if cfg.is_ai_mock_enabled() {
        warn!("LEAD_SCOUT_AI_MOCK is set, adding mock AI provider");
        tiers.push(Arc::new(MockAiAdapter::new()));
    }

    if tiers.is_empty() {
        warn!("no AI provider keys set, outreach will use the static template");
    }
    tiers
}

fn sheets_adapter(cfg: &AppConfig, client: &reqwest::Client) -> Option<Arc<dyn SpreadsheetPort>> {
    if !cfg.is_sheets_configured() {
        info!("Google Sheets export disabled (GOOGLE_SHEETS_ID and credentials not set)");
        return None;
    }
    let spreadsheet_id = cfg.google_sheets_id()?;

    let tokens: Arc<dyn AccessTokenSource> = match cfg.google_service_account_key() {
        Some(key_json) => match ServiceAccountTokenSource::from_json(client.clone(), &key_json) {
            Ok(source) => Arc::new(source),
            Err(e) => {
                warn!(error = %e, "GOOGLE_SERVICE_ACCOUNT_KEY unusable, export disabled");
                return None;
            }
        },
        None => Arc::new(StaticToken::new(cfg.google_sheets_access_token()?)),
    };

    info!(spreadsheet_id = %spreadsheet_id, range = %cfg.sheets_range_or_default(), "Google Sheets export enabled");
    Some(Arc::new(GoogleSheetsAdapter::new(
        client.clone(),
        cfg.sheets_base_url_or_default(),
        spreadsheet_id,
        cfg.sheets_range_or_default(),
        tokens,
    )))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("received shutdown signal, starting graceful shutdown");
}
