// ============================================================================
// API Client : Alpha Vantage (série mensuelle)
// ============================================================================
// Récupère la série mensuelle d'un ticker et la remodèle pour les graphiques
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. thiserror : erreurs typées, une variante par cas d'échec
// 3. Serde : désérialisation JSON vers des structures qui matchent l'API
// 4. BTreeMap : les clés "YYYY-MM-DD" sont triées chronologiquement
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::models::quote::{date_to_epoch_ms, round_price};
use crate::models::QuoteSeries;

// ============================================================================
// Erreurs
// ============================================================================
// Toutes ces erreurs finissent en HTTP 500 générique côté serveur,
// mais on les distingue pour les logs et les tests
// ============================================================================

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),

    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(StatusCode),

    #[error("upstream body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("upstream rejected the call: {0}")]
    Upstream(String),

    #[error("upstream rate limit reached: {0}")]
    RateLimited(String),

    #[error("invalid date key in time series: {0}")]
    InvalidDate(String),

    #[error("invalid price {value:?} for {date}")]
    InvalidPrice { date: String, value: String },
}

// ============================================================================
// Structures pour parser la réponse JSON d'Alpha Vantage
// ============================================================================
// Alpha Vantage préfixe ses champs par un numéro ("2. Symbol", "2. high"),
// d'où les #[serde(rename = "...")]
// ============================================================================

/// Réponse complète de TIME_SERIES_MONTHLY
#[derive(Debug, Deserialize)]
struct MonthlyResponse {
    #[serde(rename = "Meta Data")]
    meta: MetaData,

    /// CONCEPT RUST : BTreeMap
    /// - Map triée par clé
    /// - Les dates ISO se trient comme des chaînes, donc chronologiquement
    #[serde(rename = "Monthly Time Series")]
    series: BTreeMap<String, MonthlyBar>,
}

#[derive(Debug, Deserialize)]
struct MetaData {
    #[serde(rename = "2. Symbol")]
    symbol: String,

    #[serde(rename = "4. Time Zone")]
    time_zone: String,
}

/// Une barre mensuelle : Alpha Vantage envoie les prix sous forme de chaînes
#[derive(Debug, Deserialize)]
struct MonthlyBar {
    #[serde(rename = "2. high")]
    high: String,

    #[serde(rename = "3. low")]
    low: String,
}

// ============================================================================
// Client
// ============================================================================

/// Client Alpha Vantage partagé par toutes les requêtes du serveur
///
/// CONCEPT RUST : Clone bon marché
/// - reqwest::Client est un Arc interne, le cloner partage le pool de connexions
#[derive(Debug, Clone)]
pub struct AlphaVantage {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantage {
    /// Crée le client avec un timeout par requête
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, QuoteError> {
        // L'URL de base est validée une seule fois au démarrage
        Url::parse(&base_url).map_err(|e| QuoteError::InvalidUrl(format!("{base_url}: {e}")))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// Récupère et remodèle la série mensuelle d'un symbole
    ///
    /// CONCEPT RUST : #[instrument]
    /// - Ajoute un span avec le symbole à tous les logs de la fonction
    /// - skip(self) : la clé d'API ne doit pas finir dans les logs
    #[instrument(skip(self))]
    pub async fn fetch_monthly(&self, symbol: &str) -> Result<QuoteSeries, QuoteError> {
        let url = monthly_url(&self.base_url, symbol, &self.api_key)?;

        debug!("Sending HTTP request to Alpha Vantage");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if status != StatusCode::OK {
            error!(status = %status, "Alpha Vantage returned error status");
            return Err(QuoteError::Status(status));
        }

        let body: Value = response.json().await?;
        let series = parse_monthly_response(body)?;

        info!(months = series.len(), "Successfully fetched monthly series");
        Ok(series)
    }
}

/// Construit l'URL amont pour un symbole
///
/// L'URL est reconstruite à chaque appel à partir de la base : les paramètres
/// ne s'accumulent jamais d'une requête à l'autre.
///
/// CONCEPT RUST : query_pairs_mut
/// - Ajoute les paramètres à la query existante (ex: "?function=...")
/// - Encode automatiquement les caractères spéciaux du symbole
pub fn monthly_url(base_url: &str, symbol: &str, api_key: &str) -> Result<Url, QuoteError> {
    let mut url =
        Url::parse(base_url).map_err(|e| QuoteError::InvalidUrl(format!("{base_url}: {e}")))?;

    url.query_pairs_mut()
        .append_pair("symbol", symbol)
        .append_pair("apikey", api_key);

    Ok(url)
}

/// Remodèle la réponse JSON d'Alpha Vantage en QuoteSeries
///
/// Fonction pure : pour un même payload, le résultat est toujours le même.
///
/// Étapes :
/// 1. Détecte les payloads d'erreur ("Error Message", "Note", "Information")
/// 2. Désérialise Meta Data + Monthly Time Series
/// 3. Pour chaque mois : date -> ms UTC, high/low arrondis à 2 décimales
///
/// Ordre de sortie : du plus ancien au plus récent (ordre des clés du
/// BTreeMap), alors qu'Alpha Vantage envoie le mois le plus récent en premier.
/// Les graphiques attendent des timestamps croissants.
pub fn parse_monthly_response(body: Value) -> Result<QuoteSeries, QuoteError> {
    if let Some(message) = body.get("Error Message") {
        warn!(message = %message, "Alpha Vantage returned an error message");
        return Err(QuoteError::Upstream(message_text(message)));
    }

    // "Note" : limite d'appels atteinte ; "Information" : même chose, format récent
    for key in ["Note", "Information"] {
        if let Some(note) = body.get(key) {
            warn!(note = %note, "Alpha Vantage rate limit reached");
            return Err(QuoteError::RateLimited(message_text(note)));
        }
    }

    let response: MonthlyResponse = serde_json::from_value(body)?;
    debug!(
        symbol = %response.meta.symbol,
        timezone = %response.meta.time_zone,
        months = response.series.len(),
        "Parsing monthly time series"
    );

    let mut series = QuoteSeries::new(response.meta.symbol, response.meta.time_zone);

    for (date, bar) in &response.series {
        let timestamp = date_to_epoch_ms(date).ok_or_else(|| QuoteError::InvalidDate(date.clone()))?;
        let high = parse_price(date, &bar.high)?;
        let low = parse_price(date, &bar.low)?;

        series.push_month(timestamp, high, low);
    }

    Ok(series)
}

fn parse_price(date: &str, raw: &str) -> Result<f64, QuoteError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(round_price)
        .ok_or_else(|| QuoteError::InvalidPrice {
            date: date.to_string(),
            value: raw.to_string(),
        })
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
