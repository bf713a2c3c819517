// ============================================================================
// Initialisation du logging
// ============================================================================
// - Fichier : rotation quotidienne (tracing-appender)
// - Console : optionnelle (le serveur l'active, le client interactif non,
//   pour ne pas mélanger les logs avec les prompts)
// ============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filtre par défaut si RUST_LOG n'est pas défini
pub const DEFAULT_FILTER: &str = "stockboard=debug,info";

/// Initialise le système de logging
///
/// CONCEPT RUST : Tracing subscriber
/// - Registry : point central des logs
/// - Layer : transforme et route les logs
/// - EnvFilter : filtre par niveau (RUST_LOG env var)
/// - RollingFileAppender : rotation automatique
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/stockboard/logs/stockboard.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=stockboard=trace cargo run
/// ```
pub fn init_logging(log_dir: &Path, file_name: &str, console: bool) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    // Ancien format : stockboard.log.2024-01-15
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, file_name);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false) // Pas de codes couleur dans le fichier
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    // CONCEPT : Option<Layer> est aussi un Layer (None = désactivé)
    let console_layer = console.then(|| tracing_subscriber::fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    info!(log_dir = %log_dir.display(), "Logging initialized");
    Ok(())
}
