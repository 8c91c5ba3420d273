use chrono::NaiveDate;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{ErrorEnvelope, FetchError, NetworkError, ProviderError},
    model::{CurrentConditions, HistoricalResponse, MarineConditions, MarineSource},
};

use super::{Endpoint, HttpTransport, Transport};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherstack.com";

/// Metric units: °C, km/h, mm, hPa.
const UNITS: &str = "m";

#[derive(Debug, Clone)]
pub struct WeatherstackClient<T = HttpTransport> {
    access_key: String,
    base_url: String,
    transport: T,
}

impl WeatherstackClient<HttpTransport> {
    pub fn new(access_key: String) -> Self {
        Self::with_transport(access_key, HttpTransport::new())
    }
}

impl<T: Transport> WeatherstackClient<T> {
    pub fn with_transport(access_key: String, transport: T) -> Self {
        Self { access_key, base_url: DEFAULT_BASE_URL.to_string(), transport }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// `{base}/{endpoint}?access_key=..&query=..&units=m&<extra>`
    pub fn endpoint_url(
        &self,
        endpoint: Endpoint,
        query: &str,
        extra: &[(&str, &str)],
    ) -> Result<Url, NetworkError> {
        let raw = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.as_str());

        let mut params = vec![
            ("access_key", self.access_key.as_str()),
            ("query", query),
            ("units", UNITS),
        ];
        params.extend_from_slice(extra);

        Url::parse_with_params(&raw, &params)
            .map_err(|e| NetworkError::Transport(format!("invalid request URL '{raw}': {e}")))
    }

    pub async fn fetch_current(&self, query: &str) -> Result<CurrentConditions, FetchError> {
        self.request(Endpoint::Current, query, &[], Endpoint::Current.fallback_message()).await
    }

    /// The returned mapping is keyed by date; use
    /// [`HistoricalResponse::day_for`] to pick the requested day.
    pub async fn fetch_historical(
        &self,
        query: &str,
        date: NaiveDate,
    ) -> Result<HistoricalResponse, FetchError> {
        let date = date.format("%Y-%m-%d").to_string();
        self.request(
            Endpoint::Historical,
            query,
            &[("historical_date", date.as_str())],
            Endpoint::Historical.fallback_message(),
        )
        .await
    }

    /// Marine conditions, falling back to current conditions when the
    /// marine endpoint reports a provider error (usually a plan restriction).
    pub async fn fetch_marine(&self, query: &str) -> Result<MarineConditions, FetchError> {
        let marine_fallback = Endpoint::Marine.fallback_message();

        match self.request::<MarineConditions>(Endpoint::Marine, query, &[], marine_fallback).await {
            Ok(mut marine) => {
                marine.source = MarineSource::Marine;
                Ok(marine)
            }
            Err(FetchError::Provider(err)) => {
                warn!(
                    code = err.code,
                    kind = %err.kind,
                    "marine endpoint unavailable, falling back to current conditions"
                );
                let current: CurrentConditions =
                    self.request(Endpoint::Current, query, &[], marine_fallback).await?;
                Ok(MarineConditions::from(current))
            }
            Err(err) => Err(err),
        }
    }

    async fn request<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &str,
        extra: &[(&str, &str)],
        fallback_message: &str,
    ) -> Result<R, FetchError> {
        let url = self.endpoint_url(endpoint, query, extra)?;
        debug!(%endpoint, url = %redact(&url), "sending Weatherstack request");

        let res = self.transport.get(url).await?;

        if !res.is_success() {
            debug!(%endpoint, status = res.status, body = %truncate_body(&res.body), "request failed");
            return Err(NetworkError::Status { status: res.status }.into());
        }

        decode(&res.body, fallback_message)
    }
}

/// Split a body into a provider error or the expected success shape.
fn decode<R: DeserializeOwned>(body: &str, fallback_message: &str) -> Result<R, FetchError> {
    let value: Value = serde_json::from_str(body).map_err(|e| NetworkError::Body(e.to_string()))?;

    if is_provider_error(&value) {
        let envelope: ErrorEnvelope =
            serde_json::from_value(value).map_err(|e| NetworkError::Body(e.to_string()))?;
        return Err(ProviderError::from_envelope(envelope, fallback_message).into());
    }

    serde_json::from_value(value).map_err(|e| NetworkError::Body(e.to_string()).into())
}

fn is_provider_error(value: &Value) -> bool {
    value.get("success").and_then(Value::as_bool) == Some(false)
}

fn redact(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "access_key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
