// ============================================================================
// Structure : User
// ============================================================================
// Représente l'utilisateur authentifié, tel que conservé dans la session
// du client, ainsi que les payloads JSON échangés avec /api/login et
// /api/register
//
// CONCEPTS RUST :
// 1. #[serde(rename = "...")] : le nom JSON diffère du nom Rust
// 2. #[serde(default)] : champ absent -> valeur par défaut
// 3. From<T> : conversion idiomatique entre types
// ============================================================================

use serde::{Deserialize, Serialize};

/// Utilisateur authentifié (côté client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifiant attribué par le serveur
    pub id: u64,

    pub username: String,

    pub first_name: String,

    pub last_name: String,

    /// Toujours true pour un utilisateur issu d'un login/register réussi
    pub authenticated: bool,

    /// Symboles suivis par l'utilisateur (ex: ["AAPL", "IBM"])
    pub holdings: Vec<String>,
}

impl User {
    /// Crée un utilisateur authentifié
    pub fn authenticated(
        id: u64,
        username: String,
        first_name: String,
        last_name: String,
        holdings: Vec<String>,
    ) -> Self {
        Self {
            id,
            username,
            first_name,
            last_name,
            authenticated: true,
            holdings,
        }
    }

    /// Nom complet pour l'affichage
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// ============================================================================
// Payloads HTTP
// ============================================================================

/// Corps de `POST /api/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Corps de `POST /api/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
}

/// Réponse 200 de `POST /api/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: u64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub stocks: Vec<String>,
}

/// CONCEPT RUST : From trait
/// - `let user: User = response.into();`
impl From<LoginResponse> for User {
    fn from(resp: LoginResponse) -> Self {
        User::authenticated(
            resp.user_id,
            resp.username,
            resp.firstname,
            resp.lastname,
            resp.stocks,
        )
    }
}

/// Réponse 200 de `POST /api/register`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: u64,
}

/// Corps de toutes les réponses 500 : `{"Error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "Error")]
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
