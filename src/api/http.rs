use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::types::*;
use super::{ApiError, BettingApi, Routes};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// `BettingApi` over HTTP. Holds the session cookie between calls.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    routes: Routes,
}

impl HttpApi {
    pub fn new(base_url: &str, routes: Routes) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            routes,
        })
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        decode(response).await
    }

    async fn post_json<T, F>(&self, path: &str, form: Option<&F>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        let mut request = self.client.post(&url);
        if let Some(form) = form {
            request = request.form(form);
        }
        decode(request.send().await?).await
    }

    async fn post_form<F: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &F,
    ) -> Result<FormReply, ApiError> {
        let url = self.url(path);
        debug!(%url, "POST form");
        let response = self.client.post(&url).form(form).send().await?;
        let status_ok = response.status().is_success();
        let body = response.text().await?;
        Ok(FormReply { status_ok, body })
    }

    async fn match_list(&self, path: &str) -> Result<Vec<Match>, ApiError> {
        match self.get_json::<MatchListBody>(path).await? {
            MatchListBody::Wrapped { success: false, .. } => Err(ApiError::Server {
                status: 200,
                message: "match list unavailable".to_string(),
            }),
            body => Ok(body.into_matches()),
        }
    }
}

/// Decode a JSON body. The server sends JSON error bodies with non-2xx
/// statuses, so the body is tried first and the status only decides how
/// an undecodable body is reported.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    match serde_json::from_str::<T>(&text) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(ApiError::Server {
            status: status.as_u16(),
            message: error_field(&text).unwrap_or_default(),
        }),
        Err(e) => Err(ApiError::Decode(e)),
    }
}

fn error_field(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

impl BettingApi for HttpApi {
    async fn login(&self, req: &LoginRequest) -> Result<FormReply, ApiError> {
        self.post_form(&self.routes.login(), req).await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<FormReply, ApiError> {
        self.post_form(&self.routes.register(), req).await
    }

    async fn place_bet(&self, req: &PlaceBetRequest) -> Result<PlaceBetResponse, ApiError> {
        self.post_json(&self.routes.place_bet(), Some(req)).await
    }

    async fn cancel_bet(&self, bet_id: i64) -> Result<CancelBetResponse, ApiError> {
        self.post_json::<_, ()>(&self.routes.cancel_bet(bet_id), None).await
    }

    async fn balance(&self) -> Result<Decimal, ApiError> {
        let resp: BalanceResponse = self.get_json(&self.routes.balance()).await?;
        match resp.balance {
            Some(balance) if resp.success => Ok(balance),
            _ => Err(ApiError::Server {
                status: 200,
                message: resp.error.unwrap_or_else(|| "balance unavailable".to_string()),
            }),
        }
    }

    async fn match_details(&self, match_id: i64) -> Result<MatchDetails, ApiError> {
        self.get_json(&self.routes.match_details(match_id)).await
    }

    async fn upcoming_matches(&self) -> Result<Vec<Match>, ApiError> {
        self.match_list(&self.routes.upcoming_matches()).await
    }

    async fn live_matches(&self) -> Result<Vec<Match>, ApiError> {
        self.match_list(&self.routes.live_matches()).await
    }

    async fn wallet(&self, req: &WalletRequest) -> Result<bool, ApiError> {
        let reply = self.post_form(&self.routes.dashboard(), req).await?;
        Ok(reply.status_ok)
    }
}
