use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use ul_journey::{
    clock::SystemClock, reminder::run_reminders, router, AppState, Config, FileStore,
    KeyValueStore, MemoryStore,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();

    let store: Arc<dyn KeyValueStore> = match FileStore::open(config.data_path.clone()).await {
        Ok(store) => {
            info!(path = %store.path().display(), "journal data file");
            Arc::new(store)
        }
        Err(err) => {
            warn!("data file unavailable, nothing will outlive this process: {err}");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::load(store, Arc::new(SystemClock), config.reminder_hour).await;
    tokio::spawn(run_reminders(state.clone(), config.reminder_poll));

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
