use rep_tracker::{AppState, Controller, HttpRemoteStore, LocalCache, RemoteConfig};
use std::{env, net::SocketAddr};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cache_dir = LocalCache::resolve_dir();
    fs::create_dir_all(&cache_dir).await?;
    let cache = LocalCache::new(cache_dir);

    let remote = HttpRemoteStore::new(RemoteConfig::from_env());
    let controller = Controller::new(remote, cache).await;
    let state = AppState::new(controller);

    let app = rep_tracker::router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
