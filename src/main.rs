use tracing::info;

use timetravel_agency::agent::Resolver;
use timetravel_agency::app;
use timetravel_agency::config::Config;
use timetravel_agency::service::chat_service::ChatService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timetravel_agency=debug,tower_http=debug".into()),
        )
        .init();

    // ── Configuration ─────────────────────────────────────────────────────────
    let config = Config::from_env();

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let resolver = Resolver::from_config(&config)?;
    let chat_service = ChatService::with_limits(resolver, config.session_limits());

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app(chat_service)).await?;
    Ok(())
}
