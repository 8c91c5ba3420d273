//! "Use my location": resolve the device position into a `lat,lon` query.

use std::{fmt::Debug, str::FromStr, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Query string accepted by every weather endpoint.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinates {
    type Err = GeolocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s.split_once(',').ok_or(GeolocationError::PositionUnavailable)?;
        let latitude: f64 = lat.trim().parse().map_err(|_| GeolocationError::PositionUnavailable)?;
        let longitude: f64 = lon.trim().parse().map_err(|_| GeolocationError::PositionUnavailable)?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeolocationError::PositionUnavailable);
        }
        Ok(Self { latitude, longitude })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coords: Coordinates,
    /// When the position was acquired.
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    /// Oldest cached position that is still acceptable.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Your device does not support geolocation.")]
    Unsupported,

    #[error("Location permission denied. Please enable location services.")]
    PermissionDenied,

    #[error("Location information is unavailable.")]
    PositionUnavailable,

    #[error("The request to get user location timed out.")]
    Timeout,
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self, options: &PositionOptions)
    -> Result<Position, GeolocationError>;
}

/// Ask `geolocator` for a position and turn it into a weather query.
pub async fn locate<G: Geolocator + ?Sized>(
    geolocator: &G,
    options: &PositionOptions,
) -> Result<String, GeolocationError> {
    let position = tokio::time::timeout(options.timeout, geolocator.current_position(options))
        .await
        .map_err(|_| GeolocationError::Timeout)??;

    // A timestamp in the future reads as a negative age and counts as fresh.
    if let Ok(age) = Utc::now().signed_duration_since(position.timestamp).to_std() {
        if age > options.maximum_age {
            debug!(age_secs = age.as_secs(), "cached position too old");
            return Err(GeolocationError::PositionUnavailable);
        }
    }

    Ok(position.coords.to_query())
}
