// ============================================================================
// Stockboard - Library
// ============================================================================
// Expose les modules publics pour les binaires et les tests
// ============================================================================

pub mod api;     // API Alpha Vantage (série mensuelle)
pub mod client;  // Formulaires, session, client HTTP du serveur
pub mod config;  // Variables d'environnement
pub mod logging; // Tracing : fichier + console
pub mod models;  // Structures de données
pub mod server;  // Serveur HTTP (axum)

#[cfg(test)]
mod test_support; // Faux Alpha Vantage + helpers de tests
