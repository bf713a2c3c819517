// ============================================================================
// Module : client
// ============================================================================
// Côté client : formulaires de login/register, session, et accès aux
// endpoints du serveur (/api/login, /api/register, /api/monthly/:symbol)
//
// CONCEPTS RUST :
// 1. Génériques + serde : une seule fonction de décodage pour toutes les réponses
// 2. thiserror : une erreur typée par cas d'échec
// 3. reqwest::Url : construction sûre des chemins (encodage du symbole)
// ============================================================================

use reqwest::{StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{
    ErrorBody, LoginRequest, LoginResponse, QuoteSeries, RegisterRequest, RegisterResponse,
};

pub mod credentials;
pub mod session;

pub use credentials::{LoginForm, RegisterForm};
pub use session::Session;

/// Erreurs côté client
///
/// Pour l'utilisateur final, toutes se résument à l'état d'erreur générique
/// du formulaire.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    #[error("unknown form field: {0}")]
    UnknownField(String),

    #[error("request to server failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server answered HTTP {status}")]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("server response could not be parsed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client HTTP vers notre serveur (SERVER_DOMAIN)
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url,
        })
    }

    /// URL du serveur, normalisée par `Url::parse`
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /api/login`
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.post_json(&["api", "login"], request).await
    }

    /// `POST /api/register`
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ClientError> {
        self.post_json(&["api", "register"], request).await
    }

    /// `GET /api/monthly/:symbol`
    #[instrument(skip(self))]
    pub async fn monthly(&self, symbol: &str) -> Result<QuoteSeries, ClientError> {
        let url = self.endpoint(&["api", "monthly", symbol])?;
        debug!(url = %url, "Fetching monthly series");

        let response = self.http.get(url).send().await?;
        decode(response).await
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "Posting JSON");

        let response = self.http.post(url).json(body).send().await?;
        decode(response).await
    }

    /// Ajoute des segments au chemin de base (chaque segment est encodé)
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// HTTP 200 -> T ; tout autre statut -> Rejected (avec le message {"Error"} si présent)
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let text = response.text().await?;

    if status != StatusCode::OK {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .map(|body| body.error);
        warn!(status = %status, message = ?message, "Server rejected request");
        return Err(ClientError::Rejected { status, message });
    }

    Ok(serde_json::from_str(&text)?)
}
