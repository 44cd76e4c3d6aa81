use habit_tracker::activities::ActivityRegistry;
use habit_tracker::storage::{
    LocalLogStore, LogStore, RemoteLogStore, RestLogTable, StaticSession,
};
use habit_tracker::{AppState, Config, load_data, router};
use std::{net::SocketAddr, sync::Arc};
use tokio::{fs, sync::Mutex};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let activities = match &config.activities_path {
        Some(path) => ActivityRegistry::load(path).await?,
        None => ActivityRegistry::default(),
    };

    let data = Arc::new(Mutex::new(load_data(&config.data_path).await));
    let logs: Arc<dyn LogStore> = match &config.backend {
        Some(backend) => {
            if backend.user_id.is_none() {
                warn!("BACKEND_USER_ID not set, day logs will not be saved remotely");
            }
            Arc::new(RemoteLogStore::new(
                Arc::new(RestLogTable::new(backend.rest.clone())),
                Arc::new(StaticSession::new(backend.user_id.clone())),
            ))
        }
        None => Arc::new(LocalLogStore::new(config.data_path.clone(), data.clone())),
    };
    info!(
        mode = logs.mode(),
        activities = activities.len(),
        "day log store ready"
    );

    let state = AppState::new(
        config.data_path.clone(),
        data,
        logs,
        activities,
        config.launch_date,
    );
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
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
