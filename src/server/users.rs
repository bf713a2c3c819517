// ============================================================================
// UserStore : utilisateurs enregistrés (en mémoire)
// ============================================================================
// Stocke les comptes créés via /api/register pour la durée de vie du serveur
//
// CONCEPTS RUST :
// 1. tokio::sync::RwLock : plusieurs lecteurs OU un seul écrivain, en async
// 2. HashMap : lookup O(1) par username
// 3. SHA3 + sel : le mot de passe n'est jamais conservé en clair
// ============================================================================

use std::collections::HashMap;

use sha3::{Digest, Sha3_256};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("username {0:?} is already taken")]
    UsernameTaken(String),

    #[error("invalid username or password")]
    InvalidCredentials,
}

/// Un compte tel que stocké par le serveur
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: u64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub holdings: Vec<String>,
    salt: [u8; 16],
    password_digest: String,
}

impl StoredUser {
    fn verify(&self, password: &str) -> bool {
        hash_password(&self.salt, password) == self.password_digest
    }
}

#[derive(Debug)]
struct Inner {
    by_username: HashMap<String, StoredUser>,
    next_id: u64,
}

/// Store partagé entre toutes les requêtes (via AppState)
#[derive(Debug)]
pub struct UserStore {
    inner: RwLock<Inner>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                by_username: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Crée un compte et retourne son identifiant
    ///
    /// Les identifiants sont attribués séquentiellement à partir de 1.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<u64, UserError> {
        if username.is_empty() {
            return Err(UserError::EmptyField("username"));
        }
        if password.is_empty() {
            return Err(UserError::EmptyField("password"));
        }

        // CONCEPT : Lock en écriture
        // - Le check "existe déjà" et l'insertion se font sous le même lock
        let mut inner = self.inner.write().await;
        if inner.by_username.contains_key(username) {
            debug!(username, "Registration rejected: username taken");
            return Err(UserError::UsernameTaken(username.to_string()));
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let salt: [u8; 16] = rand::random();
        let user = StoredUser {
            id,
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            holdings: Vec::new(),
            salt,
            password_digest: hash_password(&salt, password),
        };
        inner.by_username.insert(username.to_string(), user);

        info!(user_id = id, username, "User registered");
        Ok(id)
    }

    /// Vérifie les identifiants et retourne le compte
    ///
    /// Utilisateur inconnu et mauvais mot de passe donnent la même erreur.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<StoredUser, UserError> {
        let inner = self.inner.read().await;

        match inner.by_username.get(username) {
            Some(user) if user.verify(password) => {
                info!(user_id = user.id, username, "User authenticated");
                Ok(user.clone())
            }
            _ => {
                debug!(username, "Authentication failed");
                Err(UserError::InvalidCredentials)
            }
        }
    }

    /// Nombre de comptes enregistrés
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_username.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn hash_password(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
