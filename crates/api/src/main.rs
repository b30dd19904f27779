use anyhow::Context;

use pharmasafe_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pharmasafe_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let app = pharmasafe_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
