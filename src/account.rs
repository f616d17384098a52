//! Login and registration.
//!
//! Both endpoints answer with rendered HTML. Password checks run locally
//! before anything is posted.

use thiserror::Error;
use tracing::{info, warn};

use crate::advisory::Advisory;
use crate::api::html::{extract_alert_danger, is_form_success};
use crate::api::{ApiError, BettingApi, FormReply, LoginRequest, RegisterRequest};

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Password must be at least 8 characters with uppercase, lowercase, number and special character.")]
    WeakPassword,

    /// Server re-rendered the form with this message.
    #[error("{0}")]
    Rejected(String),

    #[error("transport error during {flow}: {source}")]
    Transport {
        flow: Flow,
        #[source]
        source: ApiError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Login,
    Registration,
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flow::Login => f.write_str("login"),
            Flow::Registration => f.write_str("registration"),
        }
    }
}

impl Flow {
    fn fallback(&self) -> &'static str {
        match self {
            Flow::Login => "Login failed. Please check your credentials.",
            Flow::Registration => "Registration failed. Please try again.",
        }
    }
}

impl AccountError {
    pub fn advisory(&self) -> Advisory {
        match self {
            Self::Transport { flow, .. } => Advisory::danger(format!(
                "An error occurred during {}. Please try again.",
                flow
            )),
            other => Advisory::danger(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: Option<String>,
}

/// At least 8 chars with upper, lower, digit and one special character.
pub fn is_password_strong(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| SPECIAL_CHARS.contains(c))
}

impl Registration {
    /// Local checks: matching passwords first, then strength.
    pub fn validate(&self) -> Result<(), AccountError> {
        if self.password != self.confirm_password {
            return Err(AccountError::PasswordMismatch);
        }
        if !is_password_strong(&self.password) {
            return Err(AccountError::WeakPassword);
        }
        Ok(())
    }
}

fn interpret(flow: Flow, reply: FormReply) -> Result<(), AccountError> {
    if is_form_success(reply.status_ok, &reply.body) {
        return Ok(());
    }
    let message = extract_alert_danger(&reply.body).unwrap_or_else(|| flow.fallback().to_string());
    warn!(%flow, %message, "form rejected");
    Err(AccountError::Rejected(message))
}

/// Log in. The session cookie is kept by the API client.
pub async fn login<A: BettingApi>(api: &A, creds: &Credentials) -> Result<(), AccountError> {
    let email = creds.email.trim();
    if email.is_empty() || creds.password.trim().is_empty() {
        return Err(AccountError::MissingCredentials);
    }

    let request = LoginRequest {
        email: email.to_string(),
        password: creds.password.clone(),
        remember_me: creds.remember_me.then_some("on"),
    };
    let reply = api
        .login(&request)
        .await
        .map_err(|source| AccountError::Transport {
            flow: Flow::Login,
            source,
        })?;

    interpret(Flow::Login, reply)?;
    info!(email, "logged in");
    Ok(())
}

/// Validate locally, then register.
pub async fn register<A: BettingApi>(api: &A, form: &Registration) -> Result<Advisory, AccountError> {
    form.validate()?;

    let request = RegisterRequest {
        email: form.email.trim().to_string(),
        username: form.username.trim().to_string(),
        full_name: form.full_name.trim().to_string(),
        password: form.password.clone(),
        confirm_password: form.confirm_password.clone(),
        phone: form
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string),
        terms: "on",
    };
    let reply = api
        .register(&request)
        .await
        .map_err(|source| AccountError::Transport {
            flow: Flow::Registration,
            source,
        })?;

    interpret(Flow::Registration, reply)?;
    info!(username = %request.username, "registered");
    Ok(Advisory::success(
        "Registration successful! Welcome to E-Sports Betting!",
    ))
}
