// ============================================================================
// Stockboard - Client terminal
// ============================================================================
// Formulaire de login/register dans le terminal, puis consultation des
// séries mensuelles via le serveur (SERVER_DOMAIN)
//
// CONCEPTS RUST CLÉS :
// 1. Async dans sync : tokio::runtime::Runtime + block_on pour les appels HTTP
// 2. stdin/stdout : lecture ligne par ligne, flush explicite des prompts
// 3. Logs vers fichier uniquement (la console sert aux prompts)
// ============================================================================

use std::env;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use chrono::DateTime;
use tracing::{error, info};

use stockboard::client::{ApiClient, LoginForm, RegisterForm, Session};
use stockboard::config::{client_domain, log_dir};
use stockboard::logging::init_logging;
use stockboard::models::{QuoteSeries, User};

/// Message affiché pour toute erreur (pas de détail pour l'utilisateur)
const GENERIC_ERROR: &str = "❌ Une erreur est survenue. Veuillez réessayer plus tard.";

fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let lookup = |key: &str| env::var(key).ok();

    init_logging(&log_dir(&lookup), "stockboard-client.log", false).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {e:#}");
        eprintln!("   Continuing without logging...");
    });

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded .env file");
    }

    let api = ApiClient::new(&client_domain(&lookup)).context("invalid SERVER_DOMAIN")?;
    info!(server = %api.base_url(), "Stockboard client starting up");
    println!("📈 Stockboard, serveur : {}\n", api.base_url());
    let session = Session::new();
    let runtime = tokio::runtime::Runtime::new()?;

    let user = match prompt("Login ou register ? [l/r] : ")?.trim() {
        "r" | "register" => runtime.block_on(register(&api, &session))?,
        _ => runtime.block_on(login(&api, &session))?,
    };

    println!("\n✅ Connecté : {} (id {})", user.display_name(), user.id);
    if !user.holdings.is_empty() {
        println!("   Positions : {}", user.holdings.join(", "));
    }

    // Boucle de consultation : une ligne vide quitte
    loop {
        let symbol = prompt("\nSymbole (vide pour quitter) : ")?;
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            break;
        }

        match runtime.block_on(api.monthly(&symbol)) {
            Ok(series) => print_series(&series),
            Err(e) => {
                error!(%symbol, error = %e, "Failed to fetch monthly series");
                println!("{GENERIC_ERROR}");
            }
        }
    }

    session.logout();
    info!("Client exited normally");
    Ok(())
}

/// Remplit le formulaire de login champ par champ puis le soumet
async fn login(api: &ApiClient, session: &Session) -> Result<User> {
    let mut form = LoginForm::new();
    form.handle_change("username", &prompt("Username : ")?)?;
    form.handle_change("password", &prompt("Password : ")?)?;

    match form.submit(api, session).await {
        Ok(user) => Ok(user),
        Err(e) => {
            println!("{GENERIC_ERROR}");
            bail!("login failed: {e}")
        }
    }
}

async fn register(api: &ApiClient, session: &Session) -> Result<User> {
    let mut form = RegisterForm::new();
    form.handle_change("username", &prompt("Username : ")?)?;
    form.handle_change("firstname", &prompt("First Name : ")?)?;
    form.handle_change("lastname", &prompt("Last Name : ")?)?;
    form.handle_change("password", &prompt("Password : ")?)?;

    match form.submit(api, session).await {
        Ok(user) => Ok(user),
        Err(e) => {
            println!("{GENERIC_ERROR}");
            bail!("registration failed: {e}")
        }
    }
}

/// Affiche un prompt et lit une ligne (sans le retour à la ligne)
///
/// EOF donne une chaîne vide.
fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Résumé de la série : période, extrêmes, dernier mois
fn print_series(series: &QuoteSeries) {
    let month = |ts: i64| {
        DateTime::from_timestamp_millis(ts)
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_else(|| "?".to_string())
    };

    let (Some(first), Some(last_high), Some(last_low)) = (
        series.prices.high.first(),
        series.prices.high.last(),
        series.prices.low.last(),
    ) else {
        println!("Aucune donnée pour {}", series.symbol);
        return;
    };

    println!(
        "{} ({}) : {} mois, de {} à {}",
        series.symbol,
        series.timezone,
        series.len(),
        month(first.timestamp_ms()),
        month(last_high.timestamp_ms())
    );
    if let (Some(max), Some(min)) = (series.max_high(), series.min_low()) {
        println!("   Plus haut : ${max:.2}   Plus bas : ${min:.2}");
    }
    println!(
        "   Dernier mois : haut ${:.2}  bas ${:.2}",
        last_high.price(),
        last_low.price()
    );
}
