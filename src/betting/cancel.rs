use rust_decimal::Decimal;
use tracing::info;

use super::FormError;
use crate::advisory::Advisory;
use crate::api::BettingApi;
use crate::format::two_dp;

pub const CANCEL_FAILED_MESSAGE: &str = "Failed to cancel bet";
pub const CANCEL_TRANSPORT_MESSAGE: &str = "Error cancelling bet";

/// A pending bet the server cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetCancelled {
    pub bet_id: i64,
    pub refund: Decimal,
}

impl BetCancelled {
    pub fn advisory(&self) -> Advisory {
        Advisory::success(format!(
            "Bet cancelled successfully! Refund: {}",
            two_dp(self.refund)
        ))
    }
}

/// Advisory for a failed cancellation.
pub fn cancel_failure_advisory(err: &FormError) -> Advisory {
    match err {
        FormError::Rejected(message) => Advisory::danger(message.clone()),
        _ => Advisory::danger(CANCEL_TRANSPORT_MESSAGE),
    }
}

/// Cancel a pending bet. The caller refreshes the balance afterwards.
pub async fn cancel_bet<A: BettingApi>(api: &A, bet_id: i64) -> Result<BetCancelled, FormError> {
    let resp = api.cancel_bet(bet_id).await.map_err(|e| match e.server_message() {
        Some(message) => FormError::Rejected(message.to_string()),
        None => FormError::Transport(e),
    })?;

    if !resp.success {
        let message = resp
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| CANCEL_FAILED_MESSAGE.to_string());
        return Err(FormError::Rejected(message));
    }

    let cancelled = BetCancelled {
        bet_id,
        refund: resp.refund_amount.unwrap_or(Decimal::ZERO),
    };
    info!(bet_id, refund = %cancelled.refund, "bet cancelled");
    Ok(cancelled)
}
