use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::delayed_interval;
use crate::api::BettingApi;
use crate::events::Event;

/// Fetch the balance once. `None` when the request failed.
pub async fn poll_once<A: BettingApi>(api: &A) -> Option<Event> {
    match api.balance().await {
        Ok(balance) => Some(Event::Balance(balance)),
        Err(e) => {
            debug!(feed = "balance", error = %e, "poll failed");
            None
        }
    }
}

/// Spawns a task that refreshes the balance every `every`.
pub fn spawn<A: BettingApi + 'static>(
    api: Arc<A>,
    every: Duration,
    tx: mpsc::Sender<Event>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = delayed_interval(every).await;
        loop {
            ticker.tick().await;
            if let Some(event) = poll_once(api.as_ref()).await {
                if tx.send(event).await.is_err() {
                    debug!(feed = "balance", "receiver gone, stopping");
                    break;
                }
            }
        }
    })
}
