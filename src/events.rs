use rust_decimal::Decimal;

use crate::api::{ApiError, Match, MatchDetails, PlaceBetResponse};
use crate::command::Command;

/// Everything the main loop reacts to. Feeds, spawned requests and the
/// input reader all send into one channel.
#[derive(Debug)]
pub enum Event {
    // Balance poll or post-action refresh
    Balance(Decimal),

    // Upcoming-match poll
    Matches(Vec<Match>),

    // Live-status poll
    LiveMatches(Vec<Match>),

    // Single-match refresh after a bet
    MatchDetails(MatchDetails),

    // Answer to an in-flight bet placement
    BetResult(Result<PlaceBetResponse, ApiError>),

    // Clock tick (countdowns, advisory expiry)
    Tick,

    // A line the user typed
    Input(Command),

    // Ctrl+C or end of input
    Shutdown,
}
