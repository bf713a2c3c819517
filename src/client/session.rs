// ============================================================================
// Session : utilisateur authentifié côté client
// ============================================================================
// Garde l'utilisateur connecté pendant la durée de vie du processus client
// (l'équivalent du sessionStorage d'un onglet de navigateur)
//
// CONCEPTS RUST :
// 1. Arc<RwLock<>> : partage entre tâches, lecture concurrente
// 2. Clone : cloner une Session partage le même état (Arc)
// 3. PoisonError::into_inner : un panic ailleurs ne rend pas la session illisible
// ============================================================================

use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::models::User;

/// Session partagée du client
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Arc<RwLock<Option<User>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre l'utilisateur authentifié (remplace le précédent)
    pub fn set_user(&self, user: User) {
        info!(user_id = user.id, username = %user.username, "Session started");
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    /// Utilisateur courant, s'il y en a un
    pub fn user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|u| u.authenticated)
            .unwrap_or(false)
    }

    /// Détruit la session
    pub fn logout(&self) {
        if let Some(user) = self
            .user
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            info!(user_id = user.id, "Session cleared");
        }
    }
}
