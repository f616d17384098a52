use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::delayed_interval;
use crate::api::{ApiError, BettingApi, Match};
use crate::events::Event;

/// Fetch upcoming matches once.
pub async fn poll_upcoming<A: BettingApi>(api: &A) -> Option<Event> {
    wrap("upcoming", api.upcoming_matches().await, Event::Matches)
}

/// Fetch live matches once.
pub async fn poll_live<A: BettingApi>(api: &A) -> Option<Event> {
    wrap("live", api.live_matches().await, Event::LiveMatches)
}

fn wrap(
    feed: &'static str,
    result: Result<Vec<Match>, ApiError>,
    to_event: fn(Vec<Match>) -> Event,
) -> Option<Event> {
    match result {
        Ok(list) => Some(to_event(list)),
        Err(e) => {
            debug!(feed, error = %e, "poll failed");
            None
        }
    }
}

pub fn spawn_upcoming<A: BettingApi + 'static>(
    api: Arc<A>,
    every: Duration,
    tx: mpsc::Sender<Event>,
) -> JoinHandle<()> {
    spawn_poller("upcoming", every, tx, move || {
        let api = api.clone();
        async move { poll_upcoming(api.as_ref()).await }
    })
}

pub fn spawn_live<A: BettingApi + 'static>(
    api: Arc<A>,
    every: Duration,
    tx: mpsc::Sender<Event>,
) -> JoinHandle<()> {
    spawn_poller("live", every, tx, move || {
        let api = api.clone();
        async move { poll_live(api.as_ref()).await }
    })
}

fn spawn_poller<F, Fut>(
    feed: &'static str,
    every: Duration,
    tx: mpsc::Sender<Event>,
    mut poll: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Option<Event>> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = delayed_interval(every).await;
        loop {
            ticker.tick().await;
            if let Some(event) = poll().await {
                if tx.send(event).await.is_err() {
                    debug!(feed, "receiver gone, stopping");
                    break;
                }
            }
        }
    })
}
