// ============================================================================
// Structure : QuoteSeries
// ============================================================================
// Série mensuelle d'un ticker, remodelée pour une librairie de graphiques
// (Highcharts attend des paires [timestamp_ms, valeur])
//
// CONCEPTS RUST :
// 1. Tuple struct : PricePoint(i64, f64) se sérialise en tableau JSON [ts, val]
// 2. Composition : QuoteSeries contient Prices qui contient deux Vec
// 3. f64 : floating point 64 bits pour les prix
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Un point du graphique : (timestamp en millisecondes UTC, prix)
///
/// CONCEPT RUST : Tuple struct + serde
/// - Une tuple struct est sérialisée comme un tableau JSON
/// - PricePoint(1577836800000, 100.46) -> [1577836800000, 100.46]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint(pub i64, pub f64);

impl PricePoint {
    /// Timestamp en millisecondes depuis l'epoch (UTC)
    pub fn timestamp_ms(&self) -> i64 {
        self.0
    }

    /// Prix arrondi
    pub fn price(&self) -> f64 {
        self.1
    }
}

/// Les deux séries parallèles (hauts et bas mensuels)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prices {
    /// Contient des paires [date, high]
    pub high: Vec<PricePoint>,

    /// Contient des paires [date, low]
    pub low: Vec<PricePoint>,
}

/// Réponse de `GET /api/monthly/:symbol`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSeries {
    /// Symbole tel que renvoyé par l'API amont (ex: "IBM")
    pub symbol: String,

    /// Fuseau horaire annoncé par l'API amont (ex: "US/Eastern")
    pub timezone: String,

    pub prices: Prices,
}

impl QuoteSeries {
    /// Crée une série vide
    pub fn new(symbol: String, timezone: String) -> Self {
        Self {
            symbol,
            timezone,
            prices: Prices::default(),
        }
    }

    /// Ajoute un mois : le même timestamp est poussé dans les deux séries
    ///
    /// CONCEPT : Séries parallèles
    /// - high[i] et low[i] partagent toujours le même timestamp
    pub fn push_month(&mut self, timestamp_ms: i64, high: f64, low: f64) {
        self.prices.high.push(PricePoint(timestamp_ms, high));
        self.prices.low.push(PricePoint(timestamp_ms, low));
    }

    /// Nombre de mois dans la série
    pub fn len(&self) -> usize {
        self.prices.high.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.high.is_empty()
    }

    /// Plus haut sur toute la période
    pub fn max_high(&self) -> Option<f64> {
        self.prices
            .high
            .iter()
            .map(|p| p.price())
            .max_by(|a, b| a.total_cmp(b))
    }

    /// Plus bas sur toute la période
    pub fn min_low(&self) -> Option<f64> {
        self.prices
            .low
            .iter()
            .map(|p| p.price())
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Arrondit un prix à deux décimales
///
/// CONCEPT RUST : f64::round
/// - round() arrondit "half away from zero"
/// - Pour des prix positifs, identique à l'arrondi des graphiques côté navigateur
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convertit une date "YYYY-MM-DD" en millisecondes UTC (minuit)
///
/// Retourne None si la date n'est pas au format attendu.
pub fn date_to_epoch_ms(date: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().timestamp_millis())
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_price() {
        assert_eq!(round_price(100.456), 100.46);
        assert_eq!(round_price(99.994), 99.99);
        assert_eq!(round_price(12.0), 12.0);
        assert_eq!(round_price(0.005), 0.01);
    }

    #[test]
    fn test_date_to_epoch_ms() {
        assert_eq!(date_to_epoch_ms("2020-01-01"), Some(1_577_836_800_000));
        assert_eq!(date_to_epoch_ms("1970-01-01"), Some(0));
        assert_eq!(date_to_epoch_ms("2020-02-30"), None);
        assert_eq!(date_to_epoch_ms("not a date"), None);
    }

    #[test]
    fn test_price_point_serializes_as_pair() {
        let json = serde_json::to_string(&PricePoint(1_577_836_800_000, 100.46)).unwrap();
        assert_eq!(json, "[1577836800000,100.46]");
    }

    #[test]
    fn test_quote_series_json_shape() {
        let mut series = QuoteSeries::new("IBM".to_string(), "US/Eastern".to_string());
        series.push_month(1_577_836_800_000, 100.46, 90.1);

        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["symbol"], "IBM");
        assert_eq!(value["timezone"], "US/Eastern");
        assert_eq!(value["prices"]["high"][0][0], 1_577_836_800_000_i64);
        assert_eq!(value["prices"]["high"][0][1], 100.46);
        assert_eq!(value["prices"]["low"][0][1], 90.1);
    }

    #[test]
    fn test_min_max() {
        let mut series = QuoteSeries::new("IBM".to_string(), "US/Eastern".to_string());
        assert!(series.is_empty());
        assert_eq!(series.max_high(), None);

        series.push_month(0, 110.0, 95.0);
        series.push_month(1, 120.5, 99.0);

        assert_eq!(series.len(), 2);
        assert_eq!(series.max_high(), Some(120.5));
        assert_eq!(series.min_low(), Some(95.0));
    }
}
