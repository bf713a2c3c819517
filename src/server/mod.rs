// ============================================================================
// Module : server
// ============================================================================
// Serveur HTTP : authentification + proxy de la série mensuelle
//
//   POST /api/login             {username, password}
//   POST /api/register          {username, password, firstname, lastname}
//   GET  /api/monthly/:symbol
//
// Toute erreur est renvoyée en HTTP 500 {"Error": "..."}
// ============================================================================

use std::{future::Future, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub mod error;
pub mod routes;
pub mod state;
pub mod users;

pub use state::AppState;

use crate::config::Config;
use routes::{login_handler, monthly_handler, register_handler};

/// Construit le routeur avec CORS (le client navigateur appelle en mode cors)
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/login", post(login_handler))
        .route("/api/register", post(register_handler))
        .route("/api/monthly/:symbol", get(monthly_handler))
        .layer(cors)
        .with_state(state)
}

/// Sert le routeur sur un listener déjà ouvert jusqu'à `shutdown`
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr().context("listener has no local address")?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;

    info!("Server shutting down...");
    Ok(())
}

/// Point d'entrée du binaire : bind sur 0.0.0.0:PORT puis sert
pub async fn start_server(config: Config) -> Result<()> {
    info!("Initializing state...");
    let address = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(&config)?;

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ============================================================================
// Tests : vrai routeur, faux Alpha Vantage, appels via reqwest
// ============================================================================
