use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::api::{MatchListRoute, Routes};
use crate::betting::StakeLimits;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: Server,
    pub betting: Betting,
    pub polling: Polling,
    pub general: General,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub base_url: String,
    /// Path prefix the app is deployed under
    pub context_path: String,
    pub match_list_route: MatchListRoute,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            context_path: "/ESportsBetting".to_string(),
            match_list_route: MatchListRoute::Api,
        }
    }
}

impl Server {
    pub fn routes(&self) -> Routes {
        Routes::new(&self.context_path, self.match_list_route)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Betting {
    pub min_bet: Decimal,
    pub max_bet: Decimal,
    /// Preset stake buttons
    pub quick_amounts: Vec<Decimal>,
}

impl Default for Betting {
    fn default() -> Self {
        let limits = StakeLimits::default();
        Self {
            min_bet: limits.min_bet,
            max_bet: limits.max_bet,
            quick_amounts: vec![dec!(10), dec!(25), dec!(50), dec!(100)],
        }
    }
}

impl Betting {
    pub fn limits(&self) -> StakeLimits {
        StakeLimits {
            min_bet: self.min_bet,
            max_bet: self.max_bet,
        }
    }
}

/// Background refresh intervals, in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Polling {
    pub matches_secs: u64,
    pub balance_secs: u64,
    pub live_secs: u64,
    pub clock_secs: u64,
}

impl Default for Polling {
    fn default() -> Self {
        Self {
            matches_secs: 30,
            balance_secs: 60,
            live_secs: 10,
            clock_secs: 1,
        }
    }
}

impl Polling {
    pub fn matches(&self) -> Duration {
        secs(self.matches_secs)
    }

    pub fn balance(&self) -> Duration {
        secs(self.balance_secs)
    }

    pub fn live(&self) -> Duration {
        secs(self.live_secs)
    }

    pub fn clock(&self) -> Duration {
        secs(self.clock_secs)
    }
}

// tokio intervals panic on zero
fn secs(n: u64) -> Duration {
    Duration::from_secs(n.max(1))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct General {
    pub log_level: String,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load if the file exists, else defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        if config.betting.min_bet > config.betting.max_bet {
            anyhow::bail!(
                "betting.min_bet ({}) exceeds betting.max_bet ({})",
                config.betting.min_bet,
                config.betting.max_bet
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg.server.context_path, "/ESportsBetting");
        assert_eq!(cfg.betting.limits(), StakeLimits::default());
        assert_eq!(cfg.polling.matches(), Duration::from_secs(30));
        assert_eq!(cfg.polling.balance(), Duration::from_secs(60));
        assert_eq!(cfg.polling.live(), Duration::from_secs(10));
        assert_eq!(cfg.general.log_level, "info");
    }

    #[test]
    fn test_partial_config() {
        let cfg = Config::parse(
            r#"
            [server]
            base_url = "https://bets.example.com"
            match_list_route = "servlet"

            [betting]
            max_bet = 500
            quick_amounts = [5, 20]

            [polling]
            live_secs = 0
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.base_url, "https://bets.example.com");
        assert_eq!(cfg.server.context_path, "/ESportsBetting");
        assert_eq!(
            cfg.server.routes().live_matches(),
            "/ESportsBetting/matches/live?format=json"
        );
        assert_eq!(cfg.betting.max_bet, dec!(500));
        assert_eq!(cfg.betting.min_bet, dec!(1));
        assert_eq!(cfg.betting.quick_amounts, vec![dec!(5), dec!(20)]);
        assert_eq!(cfg.polling.live(), Duration::from_secs(1)); // Zero bumped to 1
    }

    #[test]
    fn test_inverted_limits_rejected() {
        let err = Config::parse("[betting]\nmin_bet = 50\nmax_bet = 10").unwrap_err();
        assert!(err.to_string().contains("min_bet"));
    }
}
