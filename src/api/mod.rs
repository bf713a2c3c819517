// ============================================================================
// Module : api
// ============================================================================
// Ce module contient les clients des APIs financières externes
// (pour l'instant : la série mensuelle d'Alpha Vantage)
// ============================================================================

pub mod alpha_vantage; // Client API Alpha Vantage

// Re-export des types principaux
pub use alpha_vantage::{AlphaVantage, QuoteError};
