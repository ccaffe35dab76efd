#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pharmacrm_observability::init();

    let config = pharmacrm_api::config::ApiConfig::from_env();
    let service = pharmacrm_api::app::build_service(&config)?;
    let app = pharmacrm_api::app::build_app(service);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
