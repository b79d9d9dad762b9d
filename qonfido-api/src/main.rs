mod app_state;
mod config;
mod domain;
mod router;
mod routes;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub(crate) use app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qonfido_api=debug,pinecone=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = config::read_config().context("Failed to read configuration")?;
    let components = app_state::build(&settings).context("Failed to initialize services")?;

    if settings.application.index_on_startup {
        let indexer = components.indexer;
        tokio::spawn(async move {
            match indexer.sync().await {
                Ok(count) => tracing::info!(records = count, "Startup indexing completed"),
                Err(e) => tracing::error!(error = %e, "Startup indexing failed"),
            }
        });
    }

    let app = router::create(components.app_state, settings.application.app_url.clone());

    let addr = format!("{}:{}", settings.application.host, settings.application.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
