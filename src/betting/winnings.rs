use crate::format::round_cents;
use rust_decimal::Decimal;

/// Potential payout for a stake at given odds.
/// Both fields are rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WinningsQuote {
    /// stake × odds
    pub winnings: Decimal,
    /// winnings − stake
    pub profit: Decimal,
}

impl WinningsQuote {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.winnings.is_zero() && self.profit.is_zero()
    }
}

/// Calculate potential winnings.
///
/// Returns a zero quote when there are no odds (nothing selected) or the
/// stake is not positive. Rounding happens after the arithmetic, so
/// `profit` is `round(s·o − s)`, not `round(s·o) − s`.
pub fn calc_winnings(stake: Decimal, odds: Option<Decimal>) -> WinningsQuote {
    let odds = match odds {
        Some(o) => o,
        None => return WinningsQuote::zero(), // No selection
    };

    if stake <= Decimal::ZERO {
        return WinningsQuote::zero();
    }

    // Out-of-range input quotes zero; commit_amount clamps it later
    let Some(winnings) = stake.checked_mul(odds) else {
        return WinningsQuote::zero();
    };
    let Some(profit) = winnings.checked_sub(stake) else {
        return WinningsQuote::zero();
    };
    WinningsQuote {
        winnings: round_cents(winnings),
        profit: round_cents(profit),
    }
}
