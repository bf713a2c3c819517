// ============================================================================
// Stockboard - Serveur
// ============================================================================
// Sert /api/login, /api/register et /api/monthly/:symbol
//
// CONCEPTS RUST CLÉS :
// 1. #[tokio::main] : main async, le runtime est créé par la macro
// 2. anyhow::Result : toute erreur de démarrage remonte avec son contexte
// 3. Graceful shutdown : Ctrl+C / SIGTERM terminent proprement le serveur
// ============================================================================

use std::env;

use anyhow::{Context, Result};
use tracing::{error, info};

use stockboard::{
    config::{self, Config},
    logging::init_logging,
    server::start_server,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Charge un éventuel fichier .env (absent en production, c'est normal)
    let dotenv = dotenvy::dotenv();

    // Logging en premier : le chargement de la config logue ses valeurs par défaut
    // Si l'init échoue, on continue quand même sans logs fichier
    let log_dir = config::log_dir(&|key: &str| env::var(key).ok());
    init_logging(&log_dir, "stockboard.log", true).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {e:#}");
        eprintln!("   Continuing without logging...");
    });

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded .env file");
    }

    let config = Config::from_env()
        .context("invalid configuration")
        .inspect_err(|e| error!(error = ?e, "Failed to load configuration"))?;
    info!(port = config.port, "Stockboard starting up");

    let result = start_server(config).await;

    match &result {
        Ok(()) => info!("Server exited normally"),
        Err(e) => error!(error = ?e, "Server exited with error"),
    }

    result
}
