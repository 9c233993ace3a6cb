//! TaskFlow Timer - a state-managed timer engine server
//!
//! This is the main entry point for the taskflow-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use taskflow_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    store::MemoryStore,
    tasks::{store_error_listener_task, tick_driver_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "taskflow_timer={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting taskflow-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, user={}, pomodoro={}/{}/{}min x{}",
        config.host,
        config.port,
        config.user,
        config.work,
        config.short_break,
        config.long_break,
        config.cycles
    );

    // Create the document store and application state
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        store,
        config.pomodoro_defaults(),
    ));
    state
        .set_session(Some(config.user.clone()))
        .map_err(anyhow::Error::msg)?;

    // Start the timer tick driver and the store error listener
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        tick_driver_task(tick_state).await;
    });
    let listener_state = Arc::clone(&state);
    tokio::spawn(async move {
        store_error_listener_task(listener_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /tasks                  - Create a task");
    info!("  GET    /tasks                  - List tasks");
    info!("  GET    /tasks/:id              - Fetch a task");
    info!("  DELETE /tasks/:id              - Delete a task");
    info!("  POST   /tasks/:id/timer/start  - Start or resume a timer");
    info!("  POST   /tasks/:id/timer/pause  - Pause a running timer");
    info!("  POST   /tasks/:id/timer/reset  - Reset a timer");
    info!("  GET    /tasks/:id/timer        - Read live timer state");
    info!("  GET    /status                 - Engine status");
    info!("  GET    /health                 - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // The session is going away: commit in-progress elapsed time the same
    // way a hidden page would, without reporting failures nobody can see.
    if let Err(e) = state.flush_running_timers().await {
        error!("Failed to flush running timers: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
