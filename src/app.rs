//! Main-loop state and event handling.
//!
//! `App` owns every piece of view state. Feeds and spawned requests only
//! talk to it through `Event`s, so nothing here needs a lock.

use chrono::{Local, NaiveDateTime};
use futures_util::future;
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::account::{self, Credentials, Registration};
use crate::advisory::{Advisory, AdvisoryBoard};
use crate::api::{BettingApi, PlaceBetRequest};
use crate::betting::{cancel_bet, cancel_failure_advisory, BetForm, StakeAdjustment, WinningsQuote};
use crate::command::{Command, HELP};
use crate::config::Config;
use crate::countdown::format_remaining;
use crate::events::Event;
use crate::format::{currency, two_dp};
use crate::state::{MatchBoard, MatchSummary};
use crate::wallet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App<A> {
    api: Arc<A>,
    tx: mpsc::Sender<Event>,
    form: BetForm,
    board: MatchBoard,
    advisories: AdvisoryBoard,
    quick_amounts: Vec<Decimal>,
}

impl<A: BettingApi + 'static> App<A> {
    pub fn new(api: Arc<A>, config: &Config, tx: mpsc::Sender<Event>) -> Self {
        Self {
            api,
            tx,
            form: BetForm::new(config.betting.limits()),
            board: MatchBoard::new(),
            advisories: AdvisoryBoard::new(),
            quick_amounts: config.betting.quick_amounts.clone(),
        }
    }

    pub fn form(&self) -> &BetForm {
        &self.form
    }

    pub fn board(&self) -> &MatchBoard {
        &self.board
    }

    pub fn advisories(&self) -> &AdvisoryBoard {
        &self.advisories
    }

    fn advise(&mut self, advisory: Advisory) {
        self.advisories.push(advisory);
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    pub async fn handle(&mut self, event: Event) -> Control {
        match event {
            Event::Balance(balance) => {
                self.form.set_balance(balance);
                info!(balance = %currency(balance), "balance");
            }
            Event::Matches(list) => {
                debug!(count = list.len(), "upcoming matches refreshed");
                self.board.apply_matches(list);
            }
            Event::LiveMatches(list) => {
                for id in self.board.mark_live(list) {
                    info!(match_id = id, "match is live");
                }
            }
            Event::MatchDetails(details) => {
                if let Some(id) = self.board.apply_details(details) {
                    debug!(match_id = id, "match refreshed");
                }
            }
            Event::BetResult(result) => match self.form.finish_submit(result) {
                Ok(placed) => {
                    self.advise(placed.advisory());
                    self.spawn_refresh(Some(placed.match_id));
                }
                Err(e) => {
                    warn!(error = %e, "bet failed");
                    self.advise(e.advisory());
                }
            },
            Event::Tick => self.tick(Instant::now(), Local::now().naive_local()),
            Event::Input(command) => return self.command(command).await,
            Event::Shutdown => return Control::Quit,
        }
        Control::Continue
    }

    fn tick(&mut self, now: Instant, wall: NaiveDateTime) {
        self.advisories.expire(now);
        for m in self.board.scheduled() {
            if let Some(start) = m.starts_at {
                debug!(match_id = m.id, countdown = %format_remaining(start, wall), "countdown");
            }
        }
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    async fn command(&mut self, command: Command) -> Control {
        match command {
            Command::Select { match_id, team_id } => {
                match self.board.selection(match_id, team_id) {
                    Some(selection) => {
                        let quote = self.form.select(selection);
                        println!("{}", self.render_quote(quote));
                    }
                    None => self.advise(Advisory::danger(format!(
                        "No team {} in match {}",
                        team_id, match_id
                    ))),
                }
            }
            Command::Amount(text) => {
                self.form.input_amount(&text);
                let adjustment = self.form.commit_amount();
                self.after_amount(adjustment);
            }
            Command::Quick(n) => match n.checked_sub(1).and_then(|i| self.quick_amounts.get(i)) {
                Some(&preset) => {
                    let (_, adjustment) = self.form.quick_amount(preset);
                    self.after_amount(adjustment);
                }
                None => self.advise(Advisory::warning(format!(
                    "Quick amount must be between 1 and {}",
                    self.quick_amounts.len()
                ))),
            },
            Command::Place => self.place(),
            Command::Reset => {
                self.form.reset();
                println!("Bet form cleared");
            }
            Command::Cancel(bet_id) => match cancel_bet(self.api.as_ref(), bet_id).await {
                Ok(cancelled) => {
                    self.advise(cancelled.advisory());
                    self.spawn_refresh(None);
                }
                Err(e) => {
                    warn!(bet_id, error = %e, "cancel failed");
                    self.advise(cancel_failure_advisory(&e));
                }
            },
            Command::Balance => self.spawn_refresh(None),
            Command::Details(match_id) => self.spawn_details(match_id),
            Command::Search(query) => {
                println!("{}", render_matches(&self.board.search(&query)));
            }
            Command::Login {
                email,
                password,
                remember_me,
            } => {
                self.login(Credentials {
                    email,
                    password,
                    remember_me,
                })
                .await
            }
            Command::Register {
                email,
                username,
                password,
                confirm_password,
                full_name,
            } => {
                let form = Registration {
                    email,
                    username,
                    full_name,
                    password,
                    confirm_password,
                    phone: None,
                };
                match account::register(self.api.as_ref(), &form).await {
                    Ok(advisory) => self.advise(advisory),
                    Err(e) => self.advise(e.advisory()),
                }
            }
            Command::Deposit {
                amount,
                description,
            } => {
                let result = wallet::add_funds(self.api.as_ref(), amount, description).await;
                self.after_wallet(result);
            }
            Command::Withdraw {
                amount,
                description,
            } => {
                let result = wallet::withdraw_funds(self.api.as_ref(), amount, description).await;
                self.after_wallet(result);
            }
            Command::Dismiss(n) => {
                if n.checked_sub(1)
                    .and_then(|i| self.advisories.dismiss(i))
                    .is_none()
                {
                    println!("No advisory {}", n);
                }
            }
            Command::Status => println!("{}", self.render_status()),
            Command::Help => println!("{}", HELP),
            Command::Quit => return Control::Quit,
        }
        Control::Continue
    }

    /// Log in and pull the balance for the new session.
    pub async fn login(&mut self, creds: Credentials) {
        match account::login(self.api.as_ref(), &creds).await {
            Ok(()) => {
                self.advise(Advisory::success(format!("Logged in as {}", creds.email.trim())));
                self.spawn_refresh(None);
            }
            Err(e) => self.advise(e.advisory()),
        }
    }

    fn after_amount(&mut self, adjustment: Option<StakeAdjustment>) {
        if let Some(adj) = &adjustment {
            self.advise(adj.into());
        }
        println!("{}", self.render_quote(self.form.quote()));
    }

    fn after_wallet(&mut self, result: Result<wallet::WalletUpdate, wallet::WalletError>) {
        match result {
            Ok(update) => {
                if let Some(balance) = update.balance {
                    self.form.set_balance(balance);
                }
                self.advise(update.advisory());
            }
            Err(e) => {
                warn!(error = %e, "wallet request failed");
                self.advise(e.advisory());
            }
        }
    }

    // =========================================================================
    // BACKGROUND REQUESTS
    // =========================================================================

    /// Start a placement. The answer comes back as `Event::BetResult`;
    /// until then the form refuses another submit.
    fn place(&mut self) {
        match self.form.begin_submit() {
            Ok(request) => {
                info!(
                    match_id = request.match_id,
                    team_id = request.team_id,
                    amount = %request.amount,
                    "placing bet"
                );
                self.spawn_place(request);
            }
            Err(e) => self.advise(e.advisory()),
        }
    }

    fn spawn_place(&self, request: PlaceBetRequest) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.place_bet(&request).await;
            let _ = tx.send(Event::BetResult(result)).await;
        });
    }

    /// Refresh the balance and, when given, one match. Failures are dropped.
    fn spawn_refresh(&self, match_id: Option<i64>) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let details = async {
                match match_id {
                    Some(id) => Some(api.match_details(id).await),
                    None => None,
                }
            };
            let (balance, details) = future::join(api.balance(), details).await;

            match balance {
                Ok(b) => {
                    let _ = tx.send(Event::Balance(b)).await;
                }
                Err(e) => debug!(error = %e, "balance refresh failed"),
            }
            match details {
                Some(Ok(d)) => {
                    let _ = tx.send(Event::MatchDetails(d)).await;
                }
                Some(Err(e)) => debug!(error = %e, "match refresh failed"),
                None => {}
            }
        });
    }

    fn spawn_details(&self, match_id: i64) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match api.match_details(match_id).await {
                Ok(d) => {
                    let _ = tx.send(Event::MatchDetails(d)).await;
                }
                Err(e) => debug!(match_id, error = %e, "match refresh failed"),
            }
        });
    }

    // =========================================================================
    // RENDERING
    // =========================================================================

    fn render_quote(&self, quote: WinningsQuote) -> String {
        format!(
            "Potential winnings: {}  Profit: {}",
            two_dp(quote.winnings),
            two_dp(quote.profit)
        )
    }

    pub fn render_status(&self) -> String {
        let mut out = String::new();
        let balance = self
            .form
            .balance()
            .map(currency)
            .unwrap_or_else(|| "unknown".to_string());
        let _ = writeln!(out, "Balance: {}", balance);
        match self.form.selection() {
            Some(s) => {
                let _ = writeln!(
                    out,
                    "Selected: {} (match {}) @ {}",
                    s.team_name, s.match_id, s.odds
                );
            }
            None => {
                let _ = writeln!(out, "Selected: none");
            }
        }
        let _ = writeln!(out, "Stake: {}", self.form.amount_input());
        let _ = write!(out, "{}", self.render_quote(self.form.quote()));
        if self.form.is_submitting() {
            let _ = write!(out, "\nPlacing bet...");
        }
        for (i, advisory) in self.advisories.active().enumerate() {
            let _ = write!(out, "\n{}. {}", i + 1, advisory);
        }
        out
    }
}

/// One line per match: id, teams with odds, status and tournament.
pub fn render_matches(matches: &[&MatchSummary]) -> String {
    if matches.is_empty() {
        return "No matches found".to_string();
    }
    matches
        .iter()
        .map(|m| {
            format!(
                "#{:<5} {} [{}] {} vs {} [{}] {} {:?}  {}",
                m.id,
                m.team1.team_name,
                m.team1.id,
                m.team1_odds,
                m.team2.team_name,
                m.team2.id,
                m.team2_odds,
                m.status,
                m.tournament_name.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
