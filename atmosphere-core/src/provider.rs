use crate::{
    Config,
    error::NetworkError,
    provider::weatherstack::WeatherstackClient,
};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest::{Client, Url};
use std::fmt::Debug;
use thiserror::Error;

pub mod weatherstack;

/// The three Weatherstack endpoints the dashboard talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Current,
    Historical,
    Marine,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Historical => "historical",
            Endpoint::Marine => "marine",
        }
    }

    /// Message used when a provider error body carries no `info`.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Endpoint::Current => "Failed to fetch weather data",
            Endpoint::Historical => "Failed to fetch historical weather data",
            Endpoint::Marine => "Failed to fetch marine weather data",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single GET. No retries, no timeout.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: Url) -> Result<RawResponse, NetworkError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: Url) -> Result<RawResponse, NetworkError> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(|e| NetworkError::Body(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

/// Build a client over real HTTP from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<WeatherstackClient<HttpTransport>> {
    let access_key = config.access_key()?;
    let client = WeatherstackClient::new(access_key).with_base_url(config.base_url());
    Ok(client)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    Format(String),

    #[error("Historical date {date} is in the future (latest allowed: {today}).")]
    Future { date: NaiveDate, today: NaiveDate },
}

/// Validate a historical date: `YYYY-MM-DD`, not after `today`.
pub fn parse_historical_date(input: &str, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| DateError::Format(input.to_string()))?;

    if date > today {
        return Err(DateError::Future { date, today });
    }
    Ok(date)
}

/// One week before `today`, the default date of the historical form.
pub fn default_historical_date(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(7)).unwrap_or(today)
}
