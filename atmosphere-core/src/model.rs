use std::{collections::BTreeMap, fmt};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Location block carried by every successful Weatherstack response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: String,
    /// Coordinates are sent as strings, e.g. `"51.517"`.
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
    /// Location-local wall clock, `YYYY-MM-DD HH:MM`.
    #[serde(default)]
    pub localtime: String,
    #[serde(default)]
    pub timezone_id: Option<String>,
    #[serde(default)]
    pub utc_offset: Option<String>,
    #[serde(default)]
    pub localtime_epoch: Option<i64>,
}

impl Location {
    /// `"region, country"` or just the country when the region is blank.
    pub fn subtitle(&self) -> String {
        if self.region.is_empty() {
            self.country.clone()
        } else {
            format!("{}, {}", self.region, self.country)
        }
    }
}

/// Day/night flag. The provider sends `"yes"` for daytime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum DayPhase {
    #[default]
    Day,
    Night,
}

impl DayPhase {
    pub fn is_day(self) -> bool {
        matches!(self, DayPhase::Day)
    }
}

impl From<String> for DayPhase {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("yes") { DayPhase::Day } else { DayPhase::Night }
    }
}

impl From<Option<String>> for DayPhase {
    fn from(value: Option<String>) -> Self {
        value.map(DayPhase::from).unwrap_or_default()
    }
}

impl From<DayPhase> for String {
    fn from(value: DayPhase) -> Self {
        match value {
            DayPhase::Day => "yes".to_string(),
            DayPhase::Night => "no".to_string(),
        }
    }
}

/// Metric bag shared by the current and marine endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentMetrics {
    #[serde(deserialize_with = "lenient::or_default")]
    pub observation_time: String,
    #[serde(deserialize_with = "lenient::number")]
    pub temperature: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub feelslike: f64,
    #[serde(deserialize_with = "lenient::integer")]
    pub humidity: u8,
    #[serde(deserialize_with = "lenient::number")]
    pub wind_speed: f64,
    #[serde(deserialize_with = "lenient::integer")]
    pub wind_degree: u16,
    #[serde(deserialize_with = "lenient::or_default")]
    pub wind_dir: String,
    #[serde(deserialize_with = "lenient::number")]
    pub pressure: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub visibility: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub uv_index: f64,
    #[serde(deserialize_with = "lenient::integer")]
    pub cloudcover: u8,
    #[serde(deserialize_with = "lenient::number")]
    pub precip: f64,
    pub is_day: DayPhase,
    #[serde(deserialize_with = "lenient::integer")]
    pub weather_code: u16,
    #[serde(deserialize_with = "lenient::or_default")]
    pub weather_descriptions: Vec<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub weather_icons: Vec<String>,
}

impl CurrentMetrics {
    pub fn description(&self) -> Option<&str> {
        self.weather_descriptions.first().map(String::as_str)
    }

    pub fn icon_url(&self) -> Option<&str> {
        self.weather_icons.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: Location,
    pub current: CurrentMetrics,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: Option<String>,
    pub moon_illumination: Option<u8>,
}

/// One hour of a historical day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyRecord {
    /// Provider "HMM" clock: `"0"`, `"300"`, `"1500"`.
    #[serde(deserialize_with = "lenient::or_default")]
    pub time: String,
    #[serde(deserialize_with = "lenient::number")]
    pub temperature: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub feelslike: f64,
    #[serde(deserialize_with = "lenient::integer")]
    pub humidity: u8,
    #[serde(deserialize_with = "lenient::number")]
    pub wind_speed: f64,
    #[serde(deserialize_with = "lenient::integer")]
    pub wind_degree: u16,
    #[serde(deserialize_with = "lenient::or_default")]
    pub wind_dir: String,
    #[serde(deserialize_with = "lenient::number")]
    pub windgust: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub pressure: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub visibility: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub precip: f64,
    #[serde(deserialize_with = "lenient::integer")]
    pub cloudcover: u8,
    #[serde(deserialize_with = "lenient::number")]
    pub uv_index: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub heatindex: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub dewpoint: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub windchill: f64,
    #[serde(deserialize_with = "lenient::integer")]
    pub weather_code: u16,
    #[serde(deserialize_with = "lenient::or_default")]
    pub weather_descriptions: Vec<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub weather_icons: Vec<String>,
    #[serde(deserialize_with = "lenient::integer")]
    pub chanceofrain: u8,
    #[serde(deserialize_with = "lenient::integer")]
    pub chanceofremdry: u8,
    #[serde(deserialize_with = "lenient::integer")]
    pub chanceofwindy: u8,
    #[serde(deserialize_with = "lenient::integer")]
    pub chanceofovercast: u8,
    #[serde(deserialize_with = "lenient::integer")]
    pub chanceofsunshine: u8,
    #[serde(deserialize_with = "lenient::integer")]
    pub chanceoffrost: u8,
    #[serde(deserialize_with = "lenient::integer")]
    pub chanceofhightemp: u8,
    #[serde(deserialize_with = "lenient::integer")]
    pub chanceoffog: u8,
    #[serde(deserialize_with = "lenient::integer")]
    pub chanceofsnow: u8,
    #[serde(deserialize_with = "lenient::integer")]
    pub chanceofthunder: u8,
}

impl HourlyRecord {
    pub fn description(&self) -> Option<&str> {
        self.weather_descriptions.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalDay {
    #[serde(deserialize_with = "lenient::or_default")]
    pub date: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub date_epoch: i64,
    pub astro: Option<Astro>,
    #[serde(deserialize_with = "lenient::number")]
    pub mintemp: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub maxtemp: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub avgtemp: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub totalsnow: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub sunhour: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub uv_index: f64,
    #[serde(deserialize_with = "lenient::or_default")]
    pub hourly: Vec<HourlyRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalResponse {
    pub location: Location,
    #[serde(default)]
    pub historical: BTreeMap<String, HistoricalDay>,
}

impl HistoricalResponse {
    /// Pick the entry for `date`.
    ///
    /// The provider normally answers with exactly one key equal to the
    /// requested date. When that key is missing the earliest entry is used
    /// instead; an empty mapping yields `None`.
    pub fn day_for(&self, date: NaiveDate) -> Option<&HistoricalDay> {
        let key = date.format("%Y-%m-%d").to_string();
        if let Some(day) = self.historical.get(&key) {
            if self.historical.len() > 1 {
                warn!(count = self.historical.len(), "historical response carried extra date keys");
            }
            return Some(day);
        }

        let first = self.historical.values().next();
        if first.is_some() {
            warn!(requested = %key, "historical response did not contain the requested date");
        }
        first
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TideKind {
    High,
    Low,
    Other(String),
}

impl Default for TideKind {
    fn default() -> Self {
        TideKind::Other(String::new())
    }
}

impl From<String> for TideKind {
    fn from(value: String) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "high" => TideKind::High,
            "low" => TideKind::Low,
            _ => TideKind::Other(value),
        }
    }
}

impl From<TideKind> for String {
    fn from(value: TideKind) -> Self {
        match value {
            TideKind::High => "HIGH".to_string(),
            TideKind::Low => "LOW".to_string(),
            TideKind::Other(s) => s,
        }
    }
}

impl fmt::Display for TideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TideKind::High => f.write_str("high"),
            TideKind::Low => f.write_str("low"),
            TideKind::Other(s) => f.write_str(&s.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TideEntry {
    #[serde(rename = "tideTime", default, deserialize_with = "lenient::or_default")]
    pub tide_time: String,
    #[serde(rename = "tideHeight_mt", default, deserialize_with = "lenient::or_default")]
    pub tide_height_m: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub tide_type: TideKind,
}

impl TideEntry {
    /// Tide times arrive as `"4:38 AM"` or `"16:38"`.
    pub fn parsed_time(&self) -> Option<NaiveTime> {
        let raw = self.tide_time.trim();
        NaiveTime::parse_from_str(raw, "%I:%M %p")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TideDay {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub tide_data: Vec<TideEntry>,
}

impl TideDay {
    /// Tides ordered by time of day. The provider does not guarantee any
    /// order, so entries are sorted here; unparsable times keep their
    /// relative order at the end.
    pub fn chronological(&self) -> Vec<&TideEntry> {
        let mut entries: Vec<&TideEntry> = self.tide_data.iter().collect();
        entries.sort_by_key(|e| match e.parsed_time() {
            Some(t) => (0, Some(t)),
            None => (1, None),
        });
        entries
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarineData {
    #[serde(default)]
    pub tides: Vec<TideDay>,
}

/// Where a [`MarineConditions`] value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarineSource {
    #[default]
    Marine,
    /// The marine endpoint refused the request and current conditions were used.
    CurrentFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarineConditions {
    pub location: Location,
    #[serde(default)]
    pub current: CurrentMetrics,
    #[serde(default)]
    pub marine: Option<MarineData>,
    #[serde(skip)]
    pub source: MarineSource,
}

impl MarineConditions {
    /// First tide day, if the plan returned any tide data.
    pub fn tides(&self) -> Option<&TideDay> {
        self.marine.as_ref().and_then(|m| m.tides.first())
    }
}

impl From<CurrentConditions> for MarineConditions {
    fn from(value: CurrentConditions) -> Self {
        Self {
            location: value.location,
            current: value.current,
            marine: None,
            source: MarineSource::CurrentFallback,
        }
    }
}

/// Field deserializers that accept `null` and loosely typed numbers, so one
/// odd value does not reject a whole response.
mod lenient {
    use serde::{Deserialize, Deserializer};

    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        or_default(deserializer)
    }

    /// Integers that may arrive as floats (`81.0`); rounded, out of range → default.
    pub fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<i64> + Default,
    {
        let value: Option<f64> = Option::deserialize(deserializer)?;
        Ok(value
            .filter(|v| v.is_finite())
            .and_then(|v| T::try_from(v.round() as i64).ok())
            .unwrap_or_default())
    }
}
