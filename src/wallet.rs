use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::{debug, info};

use crate::advisory::Advisory;
use crate::api::{ApiError, BettingApi, WalletAction, WalletRequest};

/// Largest single deposit the server accepts.
pub const MAX_DEPOSIT: Decimal = dec!(10000);

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Amount must be positive")]
    NonPositive,

    #[error("Maximum deposit amount is $10,000")]
    AboveMaxDeposit,

    #[error("server refused the {0:?} request")]
    Refused(WalletAction),

    #[error("transport error: {source}")]
    Transport {
        action: WalletAction,
        #[source]
        source: ApiError,
    },
}

impl WalletError {
    pub fn advisory(&self) -> Advisory {
        match self {
            Self::NonPositive | Self::AboveMaxDeposit => Advisory::danger(self.to_string()),
            Self::Refused(WalletAction::AddFunds) => {
                Advisory::danger("Failed to add funds. Please try again.")
            }
            Self::Refused(WalletAction::WithdrawFunds) => {
                Advisory::danger("Failed to process withdrawal. Please try again.")
            }
            Self::Transport {
                action: WalletAction::AddFunds,
                ..
            } => Advisory::danger("An error occurred while adding funds."),
            Self::Transport {
                action: WalletAction::WithdrawFunds,
                ..
            } => Advisory::danger("An error occurred while processing withdrawal."),
        }
    }
}

/// A wallet change the server accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletUpdate {
    pub action: WalletAction,
    pub amount: Decimal,
    /// Balance fetched right after; `None` if that refresh failed
    pub balance: Option<Decimal>,
}

impl WalletUpdate {
    pub fn advisory(&self) -> Advisory {
        match self.action {
            WalletAction::AddFunds => Advisory::success("Funds added successfully!"),
            WalletAction::WithdrawFunds => Advisory::success("Withdrawal processed successfully!"),
        }
    }
}

fn check_amount(action: WalletAction, amount: Decimal) -> Result<(), WalletError> {
    if amount <= Decimal::ZERO {
        return Err(WalletError::NonPositive);
    }
    if action == WalletAction::AddFunds && amount > MAX_DEPOSIT {
        return Err(WalletError::AboveMaxDeposit);
    }
    Ok(())
}

async fn submit<A: BettingApi>(
    api: &A,
    action: WalletAction,
    amount: Decimal,
    description: Option<String>,
) -> Result<WalletUpdate, WalletError> {
    check_amount(action, amount)?;

    let request = WalletRequest {
        action,
        amount,
        description: description.filter(|d| !d.trim().is_empty()),
    };
    let accepted = api
        .wallet(&request)
        .await
        .map_err(|source| WalletError::Transport { action, source })?;
    if !accepted {
        return Err(WalletError::Refused(action));
    }
    info!(?action, %amount, "wallet updated");

    let balance = api
        .balance()
        .await
        .map_err(|e| debug!(error = %e, "balance refresh after wallet update failed"))
        .ok();

    Ok(WalletUpdate {
        action,
        amount,
        balance,
    })
}

pub async fn add_funds<A: BettingApi>(
    api: &A,
    amount: Decimal,
    description: Option<String>,
) -> Result<WalletUpdate, WalletError> {
    submit(api, WalletAction::AddFunds, amount, description).await
}

pub async fn withdraw_funds<A: BettingApi>(
    api: &A,
    amount: Decimal,
    description: Option<String>,
) -> Result<WalletUpdate, WalletError> {
    submit(api, WalletAction::WithdrawFunds, amount, description).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, FakeApi};

    #[tokio::test]
    async fn test_add_funds_refreshes_balance() {
        let api = FakeApi::new();
        api.push_wallet(Ok(true));
        api.push_balance(Ok(dec!(150)));

        let update = add_funds(&api, dec!(50), Some("top up".into())).await.unwrap();
        assert_eq!(update.balance, Some(dec!(150)));
        assert_eq!(update.advisory().message, "Funds added successfully!");

        let calls = api.calls();
        assert_eq!(
            calls[0],
            Call::Wallet(WalletRequest {
                action: WalletAction::AddFunds,
                amount: dec!(50),
                description: Some("top up".into()),
            })
        );
        assert_eq!(calls[1], Call::Balance);
    }

    #[tokio::test]
    async fn test_local_amount_checks() {
        let api = FakeApi::new();

        let err = add_funds(&api, dec!(0), None).await.unwrap_err();
        assert_eq!(err.advisory().message, "Amount must be positive");

        let err = add_funds(&api, dec!(10000.01), None).await.unwrap_err();
        assert_eq!(err.advisory().message, "Maximum deposit amount is $10,000");

        // Withdrawals have no upper bound client-side; server decides
        api.push_wallet(Ok(true));
        api.push_balance(Ok(dec!(0)));
        assert!(withdraw_funds(&api, dec!(20000), None).await.is_ok());
    }

    #[tokio::test]
    async fn test_withdraw_refused() {
        let api = FakeApi::new();
        api.push_wallet(Ok(false));

        let err = withdraw_funds(&api, dec!(10), Some("  ".into())).await.unwrap_err();
        assert_eq!(
            err.advisory().message,
            "Failed to process withdrawal. Please try again."
        );
        // Blank description is dropped, no balance refresh after refusal
        assert_eq!(
            api.calls(),
            vec![Call::Wallet(WalletRequest {
                action: WalletAction::WithdrawFunds,
                amount: dec!(10),
                description: None,
            })]
        );
    }

    #[tokio::test]
    async fn test_transport_error() {
        let api = FakeApi::new();
        let err = add_funds(&api, dec!(10), None).await.unwrap_err();
        assert_eq!(err.advisory().message, "An error occurred while adding funds.");
    }
}
