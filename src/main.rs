use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use esports_bet_client::account::Credentials;
use esports_bet_client::api::HttpApi;
use esports_bet_client::app::{App, Control};
use esports_bet_client::command::Command;
use esports_bet_client::config::Config;
use esports_bet_client::events::Event;
use esports_bet_client::feeds;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let path = std::env::var("ESPORTS_BET_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = Config::load_or_default(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.general.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!(config = %path, server = %cfg.server.base_url, "starting");

    let api = Arc::new(HttpApi::new(&cfg.server.base_url, cfg.server.routes())?);

    // Create the event channel
    let (tx, mut rx) = mpsc::channel::<Event>(100);
    let mut app = App::new(api.clone(), &cfg, tx.clone());

    if let (Ok(email), Ok(password)) = (
        std::env::var("ESPORTS_BET_EMAIL"),
        std::env::var("ESPORTS_BET_PASSWORD"),
    ) {
        app.login(Credentials {
            email,
            password,
            remember_me: false,
        })
        .await;
    }

    // Start feeds
    let handles = feeds::spawn_all(api, &cfg.polling, tx.clone());
    spawn_input(tx.clone());
    let ctrl_c_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = ctrl_c_tx.send(Event::Shutdown).await;
        }
    });
    drop(tx);

    // Main event loop
    println!("Type 'help' for commands, 'quit' to exit.");
    while let Some(event) = rx.recv().await {
        if app.handle(event).await == Control::Quit {
            info!("shutting down");
            break;
        }
    }

    for handle in handles {
        handle.abort();
    }
    Ok(())
}

/// Read stdin lines into `Event::Input`. End of input shuts down.
fn spawn_input(tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match line.parse::<Command>() {
                    Ok(command) => {
                        if tx.send(Event::Input(command)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => println!("{}", e),
                },
                Ok(None) => {
                    let _ = tx.send(Event::Shutdown).await;
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "stdin read failed");
                    let _ = tx.send(Event::Shutdown).await;
                    break;
                }
            }
        }
    });
}
