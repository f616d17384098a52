use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Form body for `POST /bets/place`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBetRequest {
    pub match_id: i64,
    pub team_id: i64,
    pub amount: Decimal,
}

/// Form body for `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<&'static str>,
}

/// Form body for `POST /register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Terms checkbox; the server refuses the form without it
    pub terms: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WalletAction {
    AddFunds,
    WithdrawFunds,
}

/// Form body for `POST /dashboard` wallet actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletRequest {
    pub action: WalletAction,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Raw answer to a form post that renders HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormReply {
    pub status_ok: bool,
    pub body: String,
}

/// `POST /bets/place` response. Errors share the shape with `success: false`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBetResponse {
    #[serde(default)]
    pub success: bool,
    pub bet_id: Option<i64>,
    pub potential_winnings: Option<Decimal>,
    pub odds: Option<Decimal>,
    pub error: Option<String>,
}

/// `POST /bets/cancel/{id}` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBetResponse {
    #[serde(default)]
    pub success: bool,
    pub refund_amount: Option<Decimal>,
    pub error: Option<String>,
}

/// `GET /api/user/balance` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    #[serde(default)]
    pub success: bool,
    pub balance: Option<Decimal>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub team_name: String,
    #[serde(default)]
    pub team_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: i64,
    #[serde(default)]
    pub tournament_name: String,
}

/// A match as the server serializes it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i64,
    pub team1: Team,
    pub team2: Team,
    pub team1_odds: Decimal,
    pub team2_odds: Decimal,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub tournament: Option<Tournament>,
    /// Start time. Absent when the server sends a shape we can't read.
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub match_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub betting_enabled: Option<bool>,
}

/// Aggregate stakes on a match (`bettingStats`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BettingStats {
    pub total_bets: Option<i64>,
    pub total_amount: Option<Decimal>,
    pub team1_bets: Option<i64>,
    pub team2_bets: Option<i64>,
    pub team1_amount: Option<Decimal>,
    pub team2_amount: Option<Decimal>,
}

/// `GET /matches/details/{id}?format=json` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    #[serde(rename = "match", default)]
    pub fixture: Option<Match>,
    #[serde(default)]
    pub betting_stats: Option<BettingStats>,
}

/// Match-list body. The JSON API wraps the list; the page servlet
/// returns it bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MatchListBody {
    // Tried first: a struct variant would also accept a JSON array
    Bare(Vec<Match>),
    Wrapped {
        #[serde(default)]
        success: bool,
        #[serde(default)]
        matches: Vec<Match>,
    },
}

impl MatchListBody {
    /// Matches carried by the body. A wrapped body with `success: false`
    /// yields nothing.
    pub fn into_matches(self) -> Vec<Match> {
        match self {
            Self::Bare(matches) => matches,
            Self::Wrapped { success, matches } if success => matches,
            Self::Wrapped { .. } => Vec::new(),
        }
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let text = match value.as_str() {
        Some(s) => s,
        None => return Ok(None),
    };
    Ok(DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const MATCH_JSON: &str = r#"{
        "id": 7,
        "team1": {"id": 1, "teamName": "Falcons", "teamCode": "FLC"},
        "team2": {"id": 2, "teamName": "Vipers"},
        "team1Odds": 1.50,
        "team2Odds": "2.50",
        "status": "LIVE",
        "tournament": {"id": 3, "tournamentName": "Spring Cup"},
        "matchDate": "2026-10-18 19:30:00",
        "totalPool": 1200.00
    }"#;

    #[test]
    fn test_match_decodes_numbers_and_strings() {
        let m: Match = serde_json::from_str(MATCH_JSON).unwrap();
        assert_eq!(m.id, 7);
        assert_eq!(m.team1.team_name, "Falcons");
        assert_eq!(m.team1_odds, dec!(1.50));
        assert_eq!(m.team2_odds, dec!(2.50));
        assert_eq!(m.status, MatchStatus::Live);
        assert_eq!(m.tournament.unwrap().tournament_name, "Spring Cup");
        assert!(m.match_date.is_some());
    }

    #[test]
    fn test_match_date_object_is_ignored() {
        let json = r#"{
            "id": 1,
            "team1": {"id": 1, "teamName": "A"},
            "team2": {"id": 2, "teamName": "B"},
            "team1Odds": 1.9, "team2Odds": 1.9,
            "matchDate": {"date": {"year": 2026}}
        }"#;
        let m: Match = serde_json::from_str(json).unwrap();
        assert_eq!(m.match_date, None);
        assert_eq!(m.status, MatchStatus::Scheduled);
    }

    #[test]
    fn test_unknown_status() {
        let json = r#"{
            "id": 1,
            "team1": {"id": 1, "teamName": "A"},
            "team2": {"id": 2, "teamName": "B"},
            "team1Odds": 1.9, "team2Odds": 1.9,
            "status": "POSTPONED"
        }"#;
        let m: Match = serde_json::from_str(json).unwrap();
        assert_eq!(m.status, MatchStatus::Unknown);
    }

    #[test]
    fn test_match_list_wrapped_and_bare() {
        let wrapped = format!(r#"{{"success": true, "count": 1, "matches": [{}]}}"#, MATCH_JSON);
        let body: MatchListBody = serde_json::from_str(&wrapped).unwrap();
        assert_eq!(body.into_matches().len(), 1);

        let bare = format!("[{}]", MATCH_JSON);
        let body: MatchListBody = serde_json::from_str(&bare).unwrap();
        assert_eq!(body.into_matches().len(), 1);

        let body: MatchListBody = serde_json::from_str("[]").unwrap();
        assert!(matches!(body, MatchListBody::Bare(ref l) if l.is_empty()));

        let failed = r#"{"success": false, "error": "Internal server error"}"#;
        let body: MatchListBody = serde_json::from_str(failed).unwrap();
        assert!(body.into_matches().is_empty());
    }

    #[test]
    fn test_register_request_accepts_terms() {
        let req = RegisterRequest {
            email: "a@b.c".into(),
            username: "ann".into(),
            full_name: "Ann".into(),
            password: "Str0ng!pw".into(),
            confirm_password: "Str0ng!pw".into(),
            phone: None,
            terms: "on",
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["terms"], "on");
        assert_eq!(body["fullName"], "Ann");
        assert_eq!(body["confirmPassword"], "Str0ng!pw");
        assert!(body.get("phone").is_none());
    }

    #[test]
    fn test_place_bet_error_shape() {
        let json = r#"{"success": false, "error": "Insufficient funds", "statusCode": 400}"#;
        let resp: PlaceBetResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Insufficient funds"));
        assert_eq!(resp.potential_winnings, None);
    }

    #[test]
    fn test_match_details_decodes() {
        let json = format!(
            r#"{{"match": {}, "bettingStats": {{"totalBets": 4, "team1Amount": 80.5}}}}"#,
            MATCH_JSON
        );
        let details: MatchDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(details.fixture.unwrap().id, 7);
        let stats = details.betting_stats.unwrap();
        assert_eq!(stats.total_bets, Some(4));
        assert_eq!(stats.team1_amount, Some(dec!(80.5)));
    }
}
