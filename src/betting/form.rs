use futures_util::future;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use super::stake::{check_stake, parse_stake, StakeAdjustment, StakeLimits};
use super::winnings::{calc_winnings, WinningsQuote};
use crate::advisory::Advisory;
use crate::api::{ApiError, BettingApi, MatchDetails, PlaceBetRequest, PlaceBetResponse};
use crate::format::two_dp;
use crate::state::Selection;

pub const INVALID_BET_MESSAGE: &str = "Please select a team and enter a valid bet amount";
pub const PLACE_FAILED_MESSAGE: &str = "Failed to place bet";
pub const PLACE_TRANSPORT_MESSAGE: &str = "An error occurred while placing the bet";

#[derive(Debug, Error)]
pub enum FormError {
    #[error("no team selected")]
    NoSelection,

    #[error("stake must be positive")]
    InvalidStake,

    #[error("a bet is already being placed")]
    Busy,

    /// Server refused the bet; carries its message verbatim.
    #[error("bet rejected: {0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] ApiError),
}

impl FormError {
    /// Whether the error was raised before any request went out.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::NoSelection | Self::InvalidStake | Self::Busy)
    }

    pub fn advisory(&self) -> Advisory {
        match self {
            Self::NoSelection | Self::InvalidStake => Advisory::danger(INVALID_BET_MESSAGE),
            Self::Busy => Advisory::info("Your bet is still being placed"),
            Self::Rejected(message) => Advisory::danger(message.clone()),
            Self::Transport(_) => Advisory::danger(PLACE_TRANSPORT_MESSAGE),
        }
    }
}

/// A bet the server accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetPlaced {
    pub match_id: i64,
    pub team_id: i64,
    pub stake: Decimal,
    pub bet_id: Option<i64>,
    /// Server figure when present, else the local quote
    pub potential_winnings: Decimal,
    /// Odds the server locked in
    pub odds: Option<Decimal>,
}

impl BetPlaced {
    pub fn advisory(&self) -> Advisory {
        Advisory::success(format!(
            "Bet placed successfully! Potential winnings: {}",
            two_dp(self.potential_winnings)
        ))
    }
}

/// Result of `BetForm::submit`: the placed bet plus the follow-up refreshes.
/// A refresh that failed is `None`.
#[derive(Debug, Clone)]
pub struct BetReceipt {
    pub placed: BetPlaced,
    pub balance: Option<Decimal>,
    pub details: Option<MatchDetails>,
}

#[derive(Debug, Clone)]
struct Pending {
    selection: Selection,
    stake: Decimal,
}

/// Bet entry form controller.
///
/// Owns the selection, the raw stake text and the cached balance for one
/// betting panel. The balance is only a hint for validation; the server
/// re-checks everything.
#[derive(Debug, Default)]
pub struct BetForm {
    limits: StakeLimits,
    selection: Option<Selection>,
    amount_input: String,
    balance: Option<Decimal>,
    pending: Option<Pending>,
}

impl BetForm {
    pub fn new(limits: StakeLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    // =========================================================================
    // STATE
    // =========================================================================

    pub fn limits(&self) -> StakeLimits {
        self.limits
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    /// Parsed stake; unparseable text is zero.
    pub fn stake(&self) -> Decimal {
        parse_stake(&self.amount_input)
    }

    pub fn balance(&self) -> Option<Decimal> {
        self.balance
    }

    pub fn set_balance(&mut self, balance: Decimal) {
        self.balance = Some(balance);
    }

    /// True while a placement is in flight. The submit control should
    /// render as loading and further submits are refused.
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// Current potential winnings for the entered stake.
    pub fn quote(&self) -> WinningsQuote {
        calc_winnings(self.stake(), self.selection.as_ref().map(|s| s.odds))
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Pick a team. Replaces any earlier pick.
    pub fn select(&mut self, selection: Selection) -> WinningsQuote {
        debug!(
            match_id = selection.match_id,
            team_id = selection.team_id,
            odds = %selection.odds,
            "team selected"
        );
        self.selection = Some(selection);
        self.quote()
    }

    /// Keystroke path: store the text and requote. No validation.
    pub fn input_amount(&mut self, text: &str) -> WinningsQuote {
        self.amount_input = text.to_string();
        self.quote()
    }

    /// Blur/change path: clamp the stake into range.
    /// A clamp rewrites the input text to the clamped value.
    pub fn commit_amount(&mut self) -> Option<StakeAdjustment> {
        let balance = self.balance.unwrap_or(Decimal::ZERO);
        let adjustment = check_stake(self.stake(), balance, self.limits)?;
        self.amount_input = adjustment.to.normalize().to_string();
        Some(adjustment)
    }

    /// Preset stake button. Same path as typing the value and leaving the field.
    pub fn quick_amount(&mut self, preset: Decimal) -> (WinningsQuote, Option<StakeAdjustment>) {
        self.input_amount(&preset.normalize().to_string());
        let adjustment = self.commit_amount();
        (self.quote(), adjustment)
    }

    /// Clear selection and stake.
    pub fn reset(&mut self) {
        self.selection = None;
        self.amount_input.clear();
    }

    // =========================================================================
    // SUBMISSION
    // =========================================================================

    /// Validate locally and mark the form as submitting.
    /// Returns the request to send; nothing is sent on error.
    pub fn begin_submit(&mut self) -> Result<PlaceBetRequest, FormError> {
        if self.pending.is_some() {
            return Err(FormError::Busy);
        }
        let selection = self.selection.clone().ok_or(FormError::NoSelection)?;
        let stake = self.stake();
        if stake <= Decimal::ZERO {
            return Err(FormError::InvalidStake);
        }

        let request = PlaceBetRequest {
            match_id: selection.match_id,
            team_id: selection.team_id,
            amount: stake,
        };
        self.pending = Some(Pending { selection, stake });
        Ok(request)
    }

    /// Apply the server's answer to a submission started with `begin_submit`.
    ///
    /// Success clears the form. Failure leaves selection and stake as they
    /// were so the user can retry.
    pub fn finish_submit(
        &mut self,
        result: Result<PlaceBetResponse, ApiError>,
    ) -> Result<BetPlaced, FormError> {
        let pending = self.pending.take().ok_or_else(|| {
            FormError::Transport(ApiError::Unexpected("no bet in flight".to_string()))
        })?;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                return Err(match e.server_message() {
                    Some(message) => FormError::Rejected(message.to_string()),
                    None => FormError::Transport(e),
                })
            }
        };

        if !resp.success {
            let message = resp
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| PLACE_FAILED_MESSAGE.to_string());
            return Err(FormError::Rejected(message));
        }

        let local = calc_winnings(pending.stake, Some(pending.selection.odds));
        let placed = BetPlaced {
            match_id: pending.selection.match_id,
            team_id: pending.selection.team_id,
            stake: pending.stake,
            bet_id: resp.bet_id,
            potential_winnings: resp.potential_winnings.unwrap_or(local.winnings),
            odds: resp.odds,
        };
        info!(
            match_id = placed.match_id,
            bet_id = ?placed.bet_id,
            stake = %placed.stake,
            "bet placed"
        );

        self.reset();
        Ok(placed)
    }

    /// Place the bet and run the follow-up refreshes.
    ///
    /// On success the cached balance is refreshed and the affected match is
    /// re-fetched. Refresh failures are dropped; the bet still counts.
    pub async fn submit<A: BettingApi>(&mut self, api: &A) -> Result<BetReceipt, FormError> {
        let request = self.begin_submit()?;
        let result = api.place_bet(&request).await;
        let placed = self.finish_submit(result)?;

        let (balance, details) =
            future::join(api.balance(), api.match_details(placed.match_id)).await;

        let balance = match balance {
            Ok(balance) => {
                self.balance = Some(balance);
                Some(balance)
            }
            Err(e) => {
                debug!(error = %e, "balance refresh after bet failed");
                None
            }
        };
        let details = details
            .map_err(|e| debug!(error = %e, "match refresh after bet failed"))
            .ok();

        Ok(BetReceipt {
            placed,
            balance,
            details,
        })
    }
}
