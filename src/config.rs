// ============================================================================
// Configuration
// ============================================================================
// Charge la configuration depuis les variables d'environnement
// (un fichier .env est chargé au démarrage par les binaires)
//
// CONCEPTS RUST :
// 1. FromStr : parsing générique des valeurs (u16, u64, ...)
// 2. Closures : la source des variables est injectée (testable sans env)
// 3. anyhow::Context : message clair si une variable est invalide
// ============================================================================

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

pub const DEFAULT_MONTHLY_URL: &str =
    "https://www.alphavantage.co/query?function=TIME_SERIES_MONTHLY";
pub const DEFAULT_SERVER_DOMAIN: &str = "http://localhost:3001";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Configuration du serveur
///
/// Le client n'a besoin que de SERVER_DOMAIN : voir [`client_domain`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Port d'écoute du serveur
    pub port: u16,

    /// Clé d'API Alpha Vantage (ALPHA_VANTAGE_KEY)
    pub api_key: String,

    /// URL de base de la série mensuelle, sans symbol ni apikey
    pub monthly_url: String,

    /// Timeout des requêtes vers l'API amont
    pub upstream_timeout: Duration,

    /// Répertoire des fichiers de logs
    pub log_dir: PathBuf,
}

impl Config {
    /// Charge la configuration depuis l'environnement du processus
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Charge la configuration depuis une source arbitraire
    ///
    /// CONCEPT RUST : Generic closure
    /// - F: Fn(&str) -> Option<String> accepte env::var comme une HashMap
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ALPHA_VANTAGE_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("ALPHA_VANTAGE_KEY must be set"))?;

        let timeout_secs: u64 = try_load(
            &lookup,
            "UPSTREAM_TIMEOUT_SECS",
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?;

        Ok(Self {
            port: try_load(&lookup, "PORT", DEFAULT_PORT)?,
            api_key: api_key.trim().to_string(),
            monthly_url: load_or(&lookup, "ALPHA_VANTAGE_MONTHLY_URL", DEFAULT_MONTHLY_URL),
            upstream_timeout: Duration::from_secs(timeout_secs),
            log_dir: log_dir(&lookup),
        })
    }
}

/// URL du serveur pour le client
///
/// Le client n'a pas besoin de la clé amont, il ne lit que cette variable.
pub fn client_domain<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    load_or(lookup, "SERVER_DOMAIN", DEFAULT_SERVER_DOMAIN)
        .trim_end_matches('/')
        .to_string()
}

/// Répertoire de logs (LOG_DIR ou défaut plateforme)
///
/// Ne dépend d'aucune autre variable : les binaires initialisent le logging
/// avant de charger le reste de la configuration.
pub fn log_dir<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup("LOG_DIR")
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_log_dir)
}

/// Répertoire de logs par défaut
///
/// - Linux/WSL : ~/.local/share/stockboard/logs
/// - macOS : ~/Library/Application Support/stockboard/logs
/// - Sinon : ./logs
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("stockboard").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

fn load_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| {
                warn!("Invalid {key} value: {e}");
                e
            })
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("ALPHA_VANTAGE_KEY", "demo")])).unwrap();

        assert_eq!(config.api_key, "demo");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.monthly_url, DEFAULT_MONTHLY_URL);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.log_dir, default_log_dir());
    }

    #[test]
    fn test_missing_api_key() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ALPHA_VANTAGE_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("ALPHA_VANTAGE_KEY", "secret"),
            ("PORT", "8080"),
            ("SERVER_DOMAIN", "https://quotes.example.com/"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("LOG_DIR", "/tmp/stockboard-logs"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/stockboard-logs"));
    }

    #[test]
    fn test_client_domain() {
        assert_eq!(client_domain(&lookup_from(&[])), DEFAULT_SERVER_DOMAIN);
        assert_eq!(
            client_domain(&lookup_from(&[("SERVER_DOMAIN", "https://quotes.example.com/")])),
            "https://quotes.example.com"
        );
    }

    #[test]
    fn test_log_dir_without_api_key() {
        // Le logging doit pouvoir démarrer même si la config est invalide
        let lookup = lookup_from(&[("LOG_DIR", "/tmp/stockboard-logs"), ("PORT", "oops")]);
        assert!(Config::from_lookup(&lookup).is_err());
        assert_eq!(log_dir(&lookup), PathBuf::from("/tmp/stockboard-logs"));

        assert_eq!(log_dir(&lookup_from(&[("LOG_DIR", "  ")])), default_log_dir());
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup_from(&[
            ("ALPHA_VANTAGE_KEY", "demo"),
            ("PORT", "not-a-port"),
        ]));
        assert!(result.is_err());
    }
}
