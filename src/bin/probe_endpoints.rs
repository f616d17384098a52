use anyhow::Result;
use std::time::Instant;

use esports_bet_client::account::{self, Credentials};
use esports_bet_client::api::{BettingApi, HttpApi};
use esports_bet_client::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let path = std::env::var("ESPORTS_BET_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = Config::load_or_default(&path)?;
    let api = HttpApi::new(&cfg.server.base_url, cfg.server.routes())?;
    println!("Server: {}{}", cfg.server.base_url, api.routes().balance());

    // Balance needs a session
    if let (Ok(email), Ok(password)) = (
        std::env::var("ESPORTS_BET_EMAIL"),
        std::env::var("ESPORTS_BET_PASSWORD"),
    ) {
        let start = Instant::now();
        let creds = Credentials {
            email,
            password,
            remember_me: false,
        };
        match account::login(&api, &creds).await {
            Ok(()) => println!("Login: ok ({}ms)", start.elapsed().as_millis()),
            Err(e) => println!("Login: {} ({}ms)", e, start.elapsed().as_millis()),
        }
    }

    let start = Instant::now();
    match api.balance().await {
        Ok(balance) => println!("Balance: {} ({}ms)", balance, start.elapsed().as_millis()),
        Err(e) => println!("Balance: {} ({}ms)", e, start.elapsed().as_millis()),
    }

    let start = Instant::now();
    match api.upcoming_matches().await {
        Ok(list) => println!("Upcoming: {} matches ({}ms)", list.len(), start.elapsed().as_millis()),
        Err(e) => println!("Upcoming: {} ({}ms)", e, start.elapsed().as_millis()),
    }

    let start = Instant::now();
    match api.live_matches().await {
        Ok(list) => println!("Live: {} matches ({}ms)", list.len(), start.elapsed().as_millis()),
        Err(e) => println!("Live: {} ({}ms)", e, start.elapsed().as_millis()),
    }

    Ok(())
}
