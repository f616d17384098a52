use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

/// Stake bounds enforced client-side before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeLimits {
    pub min_bet: Decimal,
    pub max_bet: Decimal,
}

impl Default for StakeLimits {
    fn default() -> Self {
        Self {
            min_bet: dec!(1),
            max_bet: dec!(10000),
        }
    }
}

/// Why a stake was clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampReason {
    BelowMinimum,
    AboveMaximum,
    AboveBalance,
}

/// A clamp applied to the stake input during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeAdjustment {
    pub reason: ClampReason,
    /// Stake as typed
    pub from: Decimal,
    /// Stake written back into the input
    pub to: Decimal,
    pub limits: StakeLimits,
}

impl StakeAdjustment {
    /// User-facing warning text.
    pub fn message(&self) -> String {
        match self.reason {
            ClampReason::BelowMinimum => {
                format!("Minimum bet amount is {}", self.limits.min_bet.normalize())
            }
            ClampReason::AboveMaximum => {
                format!("Maximum bet amount is {}", self.limits.max_bet.normalize())
            }
            ClampReason::AboveBalance => "Insufficient balance for this bet amount".to_string(),
        }
    }
}

/// Parse raw stake text the way a browser number field reads it: the
/// longest leading number wins and trailing junk is ignored, so `"12abc"`
/// is 12 and `"1,500"` is 1. No leading number, or a value outside the
/// `Decimal` range, counts as zero.
pub fn parse_stake(text: &str) -> Decimal {
    let Some(number) = leading_number(text.trim_start()) else {
        return Decimal::ZERO;
    };
    let parsed = if number.contains('e') {
        Decimal::from_scientific(&number)
    } else {
        Decimal::from_str(&number)
    };
    parsed.unwrap_or(Decimal::ZERO)
}

/// Canonical form of the numeric prefix of `s`: `[sign] digits [. digits]
/// [e [sign] digits]`, with a leading `+` dropped and a bare `.5` written
/// as `0.5`.
fn leading_number(s: &str) -> Option<String> {
    let mut chars = s.chars().peekable();
    let mut out = String::new();

    match chars.peek() {
        Some('-') => {
            out.push('-');
            chars.next();
        }
        Some('+') => {
            chars.next();
        }
        _ => {}
    }

    let mut int_digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        int_digits.push(c);
    }

    let mut frac_digits = String::new();
    if chars.next_if_eq(&'.').is_some() {
        while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
            frac_digits.push(c);
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }
    out.push_str(if int_digits.is_empty() { "0" } else { &int_digits });
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(&frac_digits);
    }

    if chars.next_if(|c| *c == 'e' || *c == 'E').is_some() {
        let mut exponent = String::new();
        match chars.peek() {
            Some('-') => {
                exponent.push('-');
                chars.next();
            }
            Some('+') => {
                chars.next();
            }
            _ => {}
        }
        let sign_len = exponent.len();
        while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
            exponent.push(c);
        }
        // "12e" or "12e-" keeps just the mantissa
        if exponent.len() > sign_len {
            out.push('e');
            out.push_str(&exponent);
        }
    }
    Some(out)
}

/// Validate a stake against limits and the cached balance.
///
/// Checks run in order: below minimum, above maximum, above balance.
/// The ranges are disjoint so at most one fires. Non-positive stakes are
/// left alone (submission rejects them), and the balance check is skipped
/// while the balance is unknown or zero.
pub fn check_stake(
    stake: Decimal,
    balance: Decimal,
    limits: StakeLimits,
) -> Option<StakeAdjustment> {
    let clamp = |reason, to| StakeAdjustment {
        reason,
        from: stake,
        to,
        limits,
    };

    if stake > Decimal::ZERO && stake < limits.min_bet {
        Some(clamp(ClampReason::BelowMinimum, limits.min_bet))
    } else if stake > limits.max_bet {
        Some(clamp(ClampReason::AboveMaximum, limits.max_bet))
    } else if balance > Decimal::ZERO && stake > balance {
        Some(clamp(ClampReason::AboveBalance, balance.min(limits.max_bet)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stake() {
        assert_eq!(parse_stake("25"), dec!(25));
        assert_eq!(parse_stake("  12.75 "), dec!(12.75));
        assert_eq!(parse_stake(""), Decimal::ZERO);
        assert_eq!(parse_stake("abc"), Decimal::ZERO);
        assert_eq!(parse_stake("-4"), dec!(-4));
    }

    #[test]
    fn test_parse_stake_reads_leading_number() {
        assert_eq!(parse_stake("12abc"), dec!(12));
        assert_eq!(parse_stake("1,500"), dec!(1));
        assert_eq!(parse_stake("1e3"), dec!(1000));
        assert_eq!(parse_stake("2.5E-1"), dec!(0.25));
        assert_eq!(parse_stake("12e"), dec!(12));
        assert_eq!(parse_stake(".5"), dec!(0.5));
        assert_eq!(parse_stake("+7."), dec!(7));
        assert_eq!(parse_stake("-"), Decimal::ZERO);
        assert_eq!(parse_stake("."), Decimal::ZERO);
    }

    #[test]
    fn test_below_minimum_clamps_to_min() {
        let adj = check_stake(dec!(0.5), dec!(500), StakeLimits::default()).unwrap();
        assert_eq!(adj.reason, ClampReason::BelowMinimum);
        assert_eq!(adj.to, dec!(1));
        assert_eq!(adj.message(), "Minimum bet amount is 1");
    }

    #[test]
    fn test_above_maximum_clamps_to_max() {
        // Balance is irrelevant once the max fires
        let adj = check_stake(dec!(20000), dec!(50000), StakeLimits::default()).unwrap();
        assert_eq!(adj.reason, ClampReason::AboveMaximum);
        assert_eq!(adj.to, dec!(10000));
        assert_eq!(adj.message(), "Maximum bet amount is 10000");
    }

    #[test]
    fn test_above_balance_clamps_to_balance() {
        let adj = check_stake(dec!(300), dec!(250.50), StakeLimits::default()).unwrap();
        assert_eq!(adj.reason, ClampReason::AboveBalance);
        assert_eq!(adj.to, dec!(250.50));
        assert_eq!(adj.message(), "Insufficient balance for this bet amount");
    }

    #[test]
    fn test_balance_check_skipped_when_unknown() {
        assert_eq!(check_stake(dec!(300), Decimal::ZERO, StakeLimits::default()), None);
    }

    #[test]
    fn test_zero_and_negative_not_clamped() {
        assert_eq!(check_stake(Decimal::ZERO, dec!(100), StakeLimits::default()), None);
        assert_eq!(check_stake(dec!(-5), dec!(100), StakeLimits::default()), None);
    }

    #[test]
    fn test_in_range_passes() {
        assert_eq!(check_stake(dec!(1), dec!(100), StakeLimits::default()), None);
        assert_eq!(check_stake(dec!(100), dec!(100), StakeLimits::default()), None);
    }

    #[test]
    fn test_custom_limits() {
        let limits = StakeLimits {
            min_bet: dec!(5),
            max_bet: dec!(200),
        };
        let adj = check_stake(dec!(2), Decimal::ZERO, limits).unwrap();
        assert_eq!(adj.to, dec!(5));
        assert_eq!(adj.message(), "Minimum bet amount is 5");
    }
}
