//! Transient user-facing messages.
//!
//! An advisory never blocks anything. It can be dismissed and expires on
//! its own a few seconds after it was raised.

use std::fmt;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// How long an advisory stays up.
pub const ADVISORY_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Danger,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Warning => "warning",
            Level::Danger => "danger",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub level: Level,
    pub message: String,
}

impl Advisory {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(Level::Danger, message)
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

#[derive(Debug, Clone)]
struct Posted {
    advisory: Advisory,
    posted_at: Instant,
}

/// Advisories currently on screen, oldest first.
#[derive(Debug, Default)]
pub struct AdvisoryBoard {
    active: Vec<Posted>,
}

impl AdvisoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an advisory and log it at a matching level.
    pub fn push(&mut self, advisory: Advisory) {
        self.push_at(advisory, Instant::now());
    }

    pub fn push_at(&mut self, advisory: Advisory, now: Instant) {
        match advisory.level {
            Level::Info | Level::Success => info!(kind = %advisory.level, "{}", advisory.message),
            Level::Warning => warn!("{}", advisory.message),
            Level::Danger => error!("{}", advisory.message),
        }
        self.active.push(Posted {
            advisory,
            posted_at: now,
        });
    }

    /// Close one advisory by position. Returns it if it was still up.
    pub fn dismiss(&mut self, index: usize) -> Option<Advisory> {
        if index < self.active.len() {
            Some(self.active.remove(index).advisory)
        } else {
            None
        }
    }

    /// Drop advisories older than `ADVISORY_TTL`. Returns how many expired.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        self.active
            .retain(|p| now.saturating_duration_since(p.posted_at) < ADVISORY_TTL);
        before - self.active.len()
    }

    pub fn active(&self) -> impl Iterator<Item = &Advisory> {
        self.active.iter().map(|p| &p.advisory)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Most recent advisory, if any.
    pub fn latest(&self) -> Option<&Advisory> {
        self.active.last().map(|p| &p.advisory)
    }
}
