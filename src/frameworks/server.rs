// Framework bootstrap for the duel server runtime.

use crate::frameworks::config;
use crate::frameworks::store::InMemoryStore;
use crate::interface_adapters::net::{
    get_room_handler, join_room_handler, report_hit_handler, room_events_handler,
    start_game_handler,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::GameCoordinator;

use axum::{
    Router,
    routing::{get, post},
};
use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state();

    let app = Router::new()
        .route("/rooms", post(join_room_handler))
        .route("/rooms/{room_id}", get(get_room_handler))
        .route("/rooms/{room_id}/start", post(start_game_handler))
        .route("/rooms/{room_id}/hits", post(report_hit_handler))
        .route("/rooms/{room_id}/events", get(room_events_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Arc<AppState> {
    // One shared in-memory store; every connected client reads and writes it.
    let store = Arc::new(InMemoryStore::new());
    let settings = config::game_settings();
    tracing::debug!(
        max_rounds = settings.max_rounds,
        surface_width = settings.bounds.width,
        surface_height = settings.bounds.height,
        "game settings loaded"
    );

    Arc::new(AppState {
        store: store.clone(),
        coordinator: GameCoordinator::new(store, settings),
    })
}
