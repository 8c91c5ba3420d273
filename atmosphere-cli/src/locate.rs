use async_trait::async_trait;
use atmosphere_core::{
    Config,
    geo::{Coordinates, GeolocationError, Geolocator, Position, PositionOptions},
};
use chrono::Utc;

/// Terminal stand-in for device geolocation: reports the `home`
/// coordinates stored in the config file.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredGeolocator {
    home: Result<Option<Coordinates>, GeolocationError>,
}

impl ConfiguredGeolocator {
    pub fn from_config(config: &Config) -> Self {
        Self { home: config.home_coordinates() }
    }
}

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Position, GeolocationError> {
        let coords = self.home?.ok_or(GeolocationError::Unsupported)?;
        Ok(Position { coords, timestamp: Utc::now() })
    }
}
