//! Per-tab request state for the dashboard.
//!
//! Each tab owns one [`TabState`]. Starting a request hands out a fresh
//! [`RequestToken`]; only the result carrying the latest token is applied,
//! so a slow earlier response can never overwrite a newer one.

use std::fmt;

use tracing::debug;

use crate::{
    error::FetchError,
    model::{CurrentConditions, HistoricalResponse, MarineConditions},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Current,
    Historical,
    Marine,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Current => "current",
            Tab::Historical => "historical",
            Tab::Marine => "marine",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Current => "Current",
            Tab::Historical => "Historical",
            Tab::Marine => "Marine",
        }
    }

    pub const fn all() -> &'static [Tab] {
        &[Tab::Current, Tab::Historical, Tab::Marine]
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Success(T),
    Failure(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failure(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TabState<T> {
    state: RequestState<T>,
    latest: u64,
}

impl<T> Default for TabState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TabState<T> {
    pub fn new() -> Self {
        Self { state: RequestState::Idle, latest: 0 }
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    /// Start a request: drops whatever was shown and returns its token.
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        self.state = RequestState::Loading;
        RequestToken(self.latest)
    }

    /// Apply a result. Returns `false` when `token` has been superseded and
    /// the result was discarded.
    pub fn settle(&mut self, token: RequestToken, result: Result<T, FetchError>) -> bool {
        if token.0 != self.latest {
            debug!(token = token.0, latest = self.latest, "discarding stale response");
            return false;
        }

        self.state = match result {
            Ok(data) => RequestState::Success(data),
            Err(err) => RequestState::Failure(err.to_string()),
        };
        true
    }
}

/// Orchestration state: three independent tabs plus navigation.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub active: Tab,
    pub current: TabState<CurrentConditions>,
    pub historical: TabState<HistoricalResponse>,
    pub marine: TabState<MarineConditions>,
    last_searched_city: Option<String>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, tab: Tab) {
        self.active = tab;
    }

    /// Start a current-conditions search; remembers the query for the
    /// historical tab.
    pub fn begin_current(&mut self, query: &str) -> RequestToken {
        self.last_searched_city = Some(query.to_string());
        self.current.begin()
    }

    pub fn last_searched_city(&self) -> Option<&str> {
        self.last_searched_city.as_deref()
    }

    pub fn is_loading(&self, tab: Tab) -> bool {
        match tab {
            Tab::Current => self.current.state().is_loading(),
            Tab::Historical => self.historical.state().is_loading(),
            Tab::Marine => self.marine.state().is_loading(),
        }
    }
}
