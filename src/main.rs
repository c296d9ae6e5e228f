use std::net::{Ipv4Addr, SocketAddr};

use todo_api::application::todo_service::TodoServiceImpl;
use todo_api::config::{self, AppConfig, Environment};
use todo_api::domain::repository::TodoStore;
use todo_api::http::routing::{self, todos};
use todo_api::infrastructure::sqlite_store::SqliteTodoStore;
use todo_api::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_value(std::env::var("ENV").ok().as_deref());
    let dotenv = config::load_dotenv(environment);
    telemetry::init(environment);
    match dotenv {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "loaded .env"),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "no .env file loaded"),
    }

    let config = AppConfig::from_env(environment)?;
    let store = SqliteTodoStore::connect(&config.database_url).await?;
    store.ping().await?;
    store.init().await?;
    tracing::info!(database_url = %config.database_url, "connected to store");

    let service = TodoServiceImpl::new(store.clone());
    let static_dir = config.static_bundle();
    if let Some(dir) = static_dir {
        tracing::info!(dir = %dir.display(), "serving static bundle");
    }
    let router = routing::app(todos::router(todos::AppState { service }), static_dir);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    tracing::info!(%addr, production = config.environment.is_production(), "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
