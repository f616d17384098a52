use rust_decimal::Decimal;

/// The team a user picked for the bet being entered.
/// Lives for one bet-entry interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub match_id: i64,
    pub team_id: i64,
    /// Display name of the picked team
    pub team_name: String,
    /// Decimal odds shown on the button when picked
    pub odds: Decimal,
}

impl Selection {
    pub fn new(match_id: i64, team_id: i64, team_name: impl Into<String>, odds: Decimal) -> Self {
        Self {
            match_id,
            team_id,
            team_name: team_name.into(),
            odds,
        }
    }
}
