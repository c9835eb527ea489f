//! Scramble Eggs Back binary entrypoint wiring the REST API, the game store and course lookup.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scramble_eggs_back::{
    config::AppConfig,
    dao::{
        course_catalog::{
            CourseCatalog,
            golf_api::{GolfApiCatalog, GolfApiConfig},
        },
        game_store::{
            GameStore,
            memory::MemoryGameStore,
            rest::{RestConfig, RestGameStore},
        },
    },
    routes,
    services::sync_supervisor,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let game_store = build_game_store().context("building game store")?;
    let courses = build_course_catalog().context("building course catalog")?;

    let app_state = AppState::new(config, game_store, courses);

    tokio::spawn(sync_supervisor::run(app_state.clone()));
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Use the hosted backend when its credentials are set, else keep games in memory.
fn build_game_store() -> anyhow::Result<Arc<dyn GameStore>> {
    match RestConfig::from_env() {
        Ok(rest_config) => {
            info!(url = %rest_config.base_url, "using remote game store");
            Ok(Arc::new(RestGameStore::connect(rest_config)?))
        }
        Err(err) => {
            warn!(error = %err, "remote game store not configured; games are kept in memory only");
            Ok(Arc::new(MemoryGameStore::new()))
        }
    }
}

/// Course lookup is optional: without an API key searches come back empty.
fn build_course_catalog() -> anyhow::Result<Option<Arc<dyn CourseCatalog>>> {
    match GolfApiConfig::from_env() {
        Ok(api_config) => {
            info!(url = %api_config.base_url, "course lookup enabled");
            Ok(Some(Arc::new(GolfApiCatalog::new(api_config)?)))
        }
        Err(err) => {
            warn!(error = %err, "course lookup disabled");
            Ok(None)
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
