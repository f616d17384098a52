use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::events::Event;

/// Spawns a task that sends `Tick` every `every`.
pub fn spawn(every: Duration, tx: mpsc::Sender<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = super::delayed_interval(every).await;
        loop {
            ticker.tick().await;
            if tx.send(Event::Tick).await.is_err() {
                break;
            }
        }
    })
}
