mod cancel;
mod form;
mod stake;
mod winnings;

pub use cancel::{cancel_bet, cancel_failure_advisory, BetCancelled};
pub use form::{BetForm, BetPlaced, BetReceipt, FormError};
pub use stake::{check_stake, parse_stake, ClampReason, StakeAdjustment, StakeLimits};
pub use winnings::{calc_winnings, WinningsQuote};

use crate::advisory::Advisory;

impl From<&StakeAdjustment> for Advisory {
    fn from(adj: &StakeAdjustment) -> Self {
        Advisory::warning(adj.message())
    }
}
