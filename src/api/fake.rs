//! Scripted `BettingApi` for unit tests. Records every call.

use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::types::*;
use super::{ApiError, BettingApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(LoginRequest),
    Register(RegisterRequest),
    PlaceBet(PlaceBetRequest),
    CancelBet(i64),
    Balance,
    MatchDetails(i64),
    Upcoming,
    Live,
    Wallet(WalletRequest),
}

#[derive(Default)]
struct Script {
    calls: Vec<Call>,
    form_replies: VecDeque<Result<FormReply, ApiError>>,
    place_bet: VecDeque<Result<PlaceBetResponse, ApiError>>,
    cancel_bet: VecDeque<Result<CancelBetResponse, ApiError>>,
    balances: VecDeque<Result<Decimal, ApiError>>,
    details: VecDeque<Result<MatchDetails, ApiError>>,
    match_lists: VecDeque<Result<Vec<Match>, ApiError>>,
    wallet: VecDeque<Result<bool, ApiError>>,
}

/// Responses are queued per endpoint and popped in order. An empty queue
/// answers with `ApiError::Unexpected`.
#[derive(Default)]
pub struct FakeApi {
    script: Mutex<Script>,
}

fn exhausted<T>(what: &str) -> Result<T, ApiError> {
    Err(ApiError::Unexpected(format!("no scripted {} response", what)))
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut script = self.script.lock().unwrap();
        f(&mut script)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.with(|s| s.calls.clone())
    }

    pub fn push_form_reply(&self, reply: Result<FormReply, ApiError>) {
        self.with(|s| s.form_replies.push_back(reply));
    }

    pub fn push_place_bet(&self, resp: Result<PlaceBetResponse, ApiError>) {
        self.with(|s| s.place_bet.push_back(resp));
    }

    pub fn push_cancel_bet(&self, resp: Result<CancelBetResponse, ApiError>) {
        self.with(|s| s.cancel_bet.push_back(resp));
    }

    pub fn push_balance(&self, resp: Result<Decimal, ApiError>) {
        self.with(|s| s.balances.push_back(resp));
    }

    pub fn push_details(&self, resp: Result<MatchDetails, ApiError>) {
        self.with(|s| s.details.push_back(resp));
    }

    pub fn push_match_list(&self, resp: Result<Vec<Match>, ApiError>) {
        self.with(|s| s.match_lists.push_back(resp));
    }

    pub fn push_wallet(&self, resp: Result<bool, ApiError>) {
        self.with(|s| s.wallet.push_back(resp));
    }
}

impl BettingApi for FakeApi {
    async fn login(&self, req: &LoginRequest) -> Result<FormReply, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Login(req.clone()));
            s.form_replies.pop_front().unwrap_or_else(|| exhausted("form"))
        })
    }

    async fn register(&self, req: &RegisterRequest) -> Result<FormReply, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Register(req.clone()));
            s.form_replies.pop_front().unwrap_or_else(|| exhausted("form"))
        })
    }

    async fn place_bet(&self, req: &PlaceBetRequest) -> Result<PlaceBetResponse, ApiError> {
        self.with(|s| {
            s.calls.push(Call::PlaceBet(req.clone()));
            s.place_bet.pop_front().unwrap_or_else(|| exhausted("place_bet"))
        })
    }

    async fn cancel_bet(&self, bet_id: i64) -> Result<CancelBetResponse, ApiError> {
        self.with(|s| {
            s.calls.push(Call::CancelBet(bet_id));
            s.cancel_bet.pop_front().unwrap_or_else(|| exhausted("cancel_bet"))
        })
    }

    async fn balance(&self) -> Result<Decimal, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Balance);
            s.balances.pop_front().unwrap_or_else(|| exhausted("balance"))
        })
    }

    async fn match_details(&self, match_id: i64) -> Result<MatchDetails, ApiError> {
        self.with(|s| {
            s.calls.push(Call::MatchDetails(match_id));
            s.details.pop_front().unwrap_or_else(|| exhausted("details"))
        })
    }

    async fn upcoming_matches(&self) -> Result<Vec<Match>, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Upcoming);
            s.match_lists.pop_front().unwrap_or_else(|| exhausted("match list"))
        })
    }

    async fn live_matches(&self) -> Result<Vec<Match>, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Live);
            s.match_lists.pop_front().unwrap_or_else(|| exhausted("match list"))
        })
    }

    async fn wallet(&self, req: &WalletRequest) -> Result<bool, ApiError> {
        self.with(|s| {
            s.calls.push(Call::Wallet(req.clone()));
            s.wallet.pop_front().unwrap_or_else(|| exhausted("wallet"))
        })
    }
}

/// Two-team match fixture with the given odds.
pub fn sample_match(id: i64, team1_odds: Decimal, team2_odds: Decimal) -> Match {
    Match {
        id,
        team1: Team {
            id: id * 10 + 1,
            team_name: format!("Falcons {}", id),
            team_code: None,
        },
        team2: Team {
            id: id * 10 + 2,
            team_name: format!("Vipers {}", id),
            team_code: None,
        },
        team1_odds,
        team2_odds,
        status: MatchStatus::Scheduled,
        tournament: Some(Tournament {
            id: 1,
            tournament_name: "Spring Cup".to_string(),
        }),
        match_date: None,
        betting_enabled: Some(true),
    }
}
