//! Background pollers.
//!
//! Each feed runs on its own fixed interval and pushes results into the
//! event channel. Feeds don't coordinate; a failed poll is logged and
//! dropped until the next tick.

pub mod balance;
pub mod clock;
pub mod matches;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::api::BettingApi;
use crate::config::Polling;
use crate::events::Event;

/// Start every poller. Handles are returned so callers may abort them.
pub fn spawn_all<A: BettingApi + 'static>(
    api: Arc<A>,
    polling: &Polling,
    tx: mpsc::Sender<Event>,
) -> Vec<JoinHandle<()>> {
    vec![
        matches::spawn_upcoming(api.clone(), polling.matches(), tx.clone()),
        balance::spawn(api.clone(), polling.balance(), tx.clone()),
        matches::spawn_live(api, polling.live(), tx.clone()),
        clock::spawn(polling.clock(), tx),
    ]
}

/// Interval whose first tick fires one period from now, not immediately.
async fn delayed_interval(every: Duration) -> Interval {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;
    ticker
}
