pub mod html;
pub mod http;
pub mod types;

#[cfg(test)]
pub mod fake;

pub use http::HttpApi;
pub use types::*;

use rust_decimal::Decimal;
use serde::Deserialize;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Server answered with `success: false` or a non-2xx status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    /// Message the server attached to a logical failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Which spelling of the match-list endpoints the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchListRoute {
    /// `/api/matches/{upcoming,live}` returning `{success, matches}`
    #[default]
    Api,
    /// `/matches/{upcoming,live}?format=json`
    Servlet,
}

/// Endpoint paths under the application's context path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    context_path: String,
    match_list: MatchListRoute,
}

impl Routes {
    pub fn new(context_path: &str, match_list: MatchListRoute) -> Self {
        let trimmed = context_path.trim_end_matches('/');
        let context_path = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        Self {
            context_path,
            match_list,
        }
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}{}", self.context_path, suffix)
    }

    pub fn login(&self) -> String {
        self.path("/login")
    }

    pub fn register(&self) -> String {
        self.path("/register")
    }

    pub fn place_bet(&self) -> String {
        self.path("/bets/place")
    }

    pub fn cancel_bet(&self, bet_id: i64) -> String {
        self.path(&format!("/bets/cancel/{}", bet_id))
    }

    pub fn balance(&self) -> String {
        self.path("/api/user/balance")
    }

    pub fn match_details(&self, match_id: i64) -> String {
        self.path(&format!("/matches/details/{}?format=json", match_id))
    }

    pub fn upcoming_matches(&self) -> String {
        self.match_list("upcoming")
    }

    pub fn live_matches(&self) -> String {
        self.match_list("live")
    }

    pub fn dashboard(&self) -> String {
        self.path("/dashboard")
    }

    fn match_list(&self, which: &str) -> String {
        match self.match_list {
            MatchListRoute::Api => self.path(&format!("/api/matches/{}", which)),
            MatchListRoute::Servlet => self.path(&format!("/matches/{}?format=json", which)),
        }
    }
}

/// The betting server as seen from the client.
///
/// Every call is a single request; there is no retry. Logical failures
/// that the server reports in-band are returned as the decoded response
/// (`success: false`) for bet calls and as `ApiError::Server` elsewhere.
pub trait BettingApi: Send + Sync {
    fn login(&self, req: &LoginRequest) -> impl Future<Output = Result<FormReply, ApiError>> + Send;

    fn register(
        &self,
        req: &RegisterRequest,
    ) -> impl Future<Output = Result<FormReply, ApiError>> + Send;

    fn place_bet(
        &self,
        req: &PlaceBetRequest,
    ) -> impl Future<Output = Result<PlaceBetResponse, ApiError>> + Send;

    fn cancel_bet(
        &self,
        bet_id: i64,
    ) -> impl Future<Output = Result<CancelBetResponse, ApiError>> + Send;

    /// Current wallet balance.
    fn balance(&self) -> impl Future<Output = Result<Decimal, ApiError>> + Send;

    fn match_details(
        &self,
        match_id: i64,
    ) -> impl Future<Output = Result<MatchDetails, ApiError>> + Send;

    fn upcoming_matches(&self) -> impl Future<Output = Result<Vec<Match>, ApiError>> + Send;

    fn live_matches(&self) -> impl Future<Output = Result<Vec<Match>, ApiError>> + Send;

    /// Add or withdraw funds. `Ok(true)` when the server accepted the form.
    fn wallet(&self, req: &WalletRequest) -> impl Future<Output = Result<bool, ApiError>> + Send;
}
