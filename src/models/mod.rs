// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod quote; // Séries de prix mensuels (quote.rs)
pub mod user;  // Utilisateur et payloads d'authentification (user.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use stockboard::models::quote::QuoteSeries;
// On peut faire : use stockboard::models::QuoteSeries;
pub use quote::{PricePoint, Prices, QuoteSeries};
pub use user::{
    ErrorBody, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User,
};
