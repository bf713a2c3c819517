// ============================================================================
// Outils de test partagés
// ============================================================================
// Un faux Alpha Vantage local + des helpers pour lancer de vrais serveurs
// axum sur 127.0.0.1:0 (port choisi par l'OS)
// ============================================================================

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::config::Config;

pub const TEST_API_KEY: &str = "test-key";

/// Lance un routeur sur un port libre et retourne son adresse
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Queries reçues par le faux upstream, dans l'ordre
pub type SeenQueries = Arc<Mutex<Vec<String>>>;

/// Faux Alpha Vantage : la réponse dépend du symbole demandé
///
/// - IBM : série valide
/// - NOTE : payload de rate limit
/// - ERR : payload "Error Message"
/// - DOWN : HTTP 503
/// - GARBAGE : corps non JSON
pub async fn spawn_fake_upstream() -> (SocketAddr, SeenQueries) {
    let seen: SeenQueries = Arc::default();
    let app = Router::new()
        .route("/query", get(fake_monthly))
        .with_state(seen.clone());
    (spawn(app).await, seen)
}

async fn fake_monthly(
    State(seen): State<SeenQueries>,
    RawQuery(query): RawQuery,
) -> (StatusCode, String) {
    let query = query.unwrap_or_default();
    seen.lock().unwrap().push(query.clone());

    let params: Vec<(String, String)> = reqwest::Url::parse(&format!("http://x/?{query}"))
        .unwrap()
        .query_pairs()
        .into_owned()
        .collect();
    let param = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };

    if param("apikey") != TEST_API_KEY {
        let body = json!({ "Error Message": "the parameter apikey is invalid or missing" });
        return (StatusCode::OK, body.to_string());
    }

    match param("symbol").as_str() {
        "IBM" => (StatusCode::OK, monthly_payload().to_string()),
        "NOTE" => (
            StatusCode::OK,
            json!({ "Note": "Our standard API call frequency is 5 calls per minute." }).to_string(),
        ),
        "DOWN" => (StatusCode::SERVICE_UNAVAILABLE, String::new()),
        "GARBAGE" => (StatusCode::OK, "<html>not json</html>".to_string()),
        _ => (
            StatusCode::OK,
            json!({ "Error Message": "Invalid API call." }).to_string(),
        ),
    }
}

/// Payload mensuel valide (deux mois, ordre amont : plus récent d'abord)
pub fn monthly_payload() -> Value {
    json!({
        "Meta Data": {
            "1. Information": "Monthly Prices (open, high, low, close) and Volumes",
            "2. Symbol": "IBM",
            "3. Last Refreshed": "2020-02-28",
            "4. Time Zone": "US/Eastern"
        },
        "Monthly Time Series": {
            "2020-02-28": {
                "1. open": "144.25",
                "2. high": "158.75",
                "3. low": "126.31",
                "4. close": "130.15",
                "5. volume": "101563125"
            },
            "2020-01-01": {
                "1. open": "135.0",
                "2. high": "100.456",
                "3. low": "99.9949",
                "4. close": "143.73",
                "5. volume": "94372111"
            }
        }
    })
}

/// Configuration pointant vers le faux upstream
pub fn test_config(upstream: SocketAddr) -> Config {
    let monthly_url = format!("http://{upstream}/query?function=TIME_SERIES_MONTHLY");
    Config::from_lookup(move |key| match key {
        "ALPHA_VANTAGE_KEY" => Some(TEST_API_KEY.to_string()),
        "ALPHA_VANTAGE_MONTHLY_URL" => Some(monthly_url.clone()),
        "UPSTREAM_TIMEOUT_SECS" => Some("5".to_string()),
        "LOG_DIR" => Some("./logs".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Lance le vrai serveur (faux upstream derrière) et retourne son URL de base
pub async fn spawn_app() -> (String, SeenQueries) {
    let (upstream, seen) = spawn_fake_upstream().await;
    let state = crate::server::AppState::new(&test_config(upstream)).unwrap();
    let addr = spawn(crate::server::router(state)).await;
    (format!("http://{addr}"), seen)
}

/// Json d'un corps déjà parsé, pour les assertions
pub fn body_json(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}
