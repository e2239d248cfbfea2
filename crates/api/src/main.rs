use anyhow::Context;

use lumora_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            lumora_observability::init(Default::default());
            tracing::error!(error = %e, "invalid configuration");
            return Err(e.into());
        }
    };
    lumora_observability::init(config.log_format);

    let app = lumora_api::app::build_app(&config)
        .await
        .context("failed to initialize application")?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        environment = %config.environment,
        auth_mode = config.auth.mode(),
        persistent = config.database_url.is_some(),
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
