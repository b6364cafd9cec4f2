//! Gym Session - A crash-resilient workout session timer and draft manager
//!
//! This is the main entry point for the gym-session application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use gym_session::{
    api::create_router,
    clock::SystemClock,
    config::Config,
    services::RemoteApi,
    state::{AppState, SessionManager},
    storage::FileStore,
    tasks::session_ticker_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "gym_session={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting gym-session server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, api_base={}, user={}",
        config.host, config.port, config.api_base, config.user
    );

    // Reconstruct the session draft from the durable store; a fresh
    // session starts running immediately.
    let data_dir = config.resolved_data_dir();
    info!("Session draft persisted under {}", data_dir.display());
    let store = FileStore::open(&data_dir).map_err(gym_session::SessionError::from)?;
    let session = SessionManager::load(Box::new(store), Box::new(SystemClock));

    let remote = RemoteApi::new(config.api_base.clone(), config.api_token.clone());
    let state = Arc::new(AppState::new(
        session,
        remote,
        config.user.clone(),
        config.port,
        config.host.clone(),
    ));

    // Start the 1 Hz ticker background task
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        session_ticker_task(ticker_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /session                                  - Current draft and metadata");
    info!("  DELETE /session                                  - Discard the draft");
    info!("  POST   /session/timer                            - Pause/resume the global timer");
    info!("  POST   /session/exercises                        - Add an exercise entry");
    info!("  DELETE /session/exercises/:id                    - Remove an entry");
    info!("  POST   /session/exercises/:id/sets               - Append a set");
    info!("  PUT    /session/exercises/:id/sets/:index        - Update a set field");
    info!("  POST   /session/exercises/:id/sets/:index/timer  - Toggle a set timer");
    info!("  POST   /session/finish                           - Submit workout, clear draft");
    info!("  GET    /library                                  - List the exercise library");
    info!("  GET    /health                                   - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
