use std::sync::Arc;

use anyhow::{Context, Result};

use super::users::UserStore;
use crate::{api::AlphaVantage, config::Config};

/// État partagé par tous les handlers
pub struct AppState {
    pub quotes: AlphaVantage,
    pub users: UserStore,
}

impl AppState {
    /// Construit le client amont et un store d'utilisateurs vide
    pub fn new(config: &Config) -> Result<Arc<Self>> {
        let quotes = AlphaVantage::new(
            config.monthly_url.clone(),
            config.api_key.clone(),
            config.upstream_timeout,
        )
        .context("failed to build Alpha Vantage client")?;

        Ok(Arc::new(Self {
            quotes,
            users: UserStore::new(),
        }))
    }
}
