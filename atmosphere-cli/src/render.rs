//! Terminal views for the three dashboard tabs.

use std::fmt;

use atmosphere_core::{
    CurrentConditions, Dashboard, HistoricalDay, HistoricalResponse, MarineConditions,
    RequestState, Tab,
    glyph::weather_glyph,
    model::{DayPhase, Location, MarineSource},
    timefmt::{format_local_time, hourly_label, round_half_up},
};
use chrono::NaiveDate;

pub const CITY_PRESETS: &[&str] = &["London", "Tokyo", "New York", "Sydney", "Dubai"];

pub const MARINE_PRESETS: &[&str] =
    &["Pacific Ocean", "Atlantic Ocean", "Mediterranean Sea", "North Sea", "Caribbean Sea"];

const HOURLY_PREVIEW: usize = 6;
const TIDE_PREVIEW: usize = 4;

/// Render whatever `tab` currently holds.
pub fn render_tab(dashboard: &Dashboard, tab: Tab, historical_date: NaiveDate) -> String {
    if dashboard.is_loading(tab) {
        return format!("Loading {} conditions...", tab.as_str());
    }

    match tab {
        Tab::Current => match dashboard.current.state() {
            RequestState::Success(data) => CurrentView(data).to_string(),
            RequestState::Failure(msg) => ErrorView { tab, message: msg }.to_string(),
            _ => Placeholder(tab).to_string(),
        },
        Tab::Historical => match dashboard.historical.state() {
            RequestState::Success(data) => match HistoricalView::new(data, historical_date) {
                Some(view) => view.to_string(),
                None => format!("No historical data returned for {historical_date}.\n"),
            },
            RequestState::Failure(msg) => ErrorView { tab, message: msg }.to_string(),
            _ => Placeholder(tab).to_string(),
        },
        Tab::Marine => match dashboard.marine.state() {
            RequestState::Success(data) => MarineView(data).to_string(),
            RequestState::Failure(msg) => ErrorView { tab, message: msg }.to_string(),
            _ => Placeholder(tab).to_string(),
        },
    }
}

pub struct CurrentView<'a>(pub &'a CurrentConditions);

impl fmt::Display for CurrentView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let CurrentConditions { location, current } = self.0;
        let glyph = weather_glyph(current.weather_code, current.is_day);

        writeln!(f, "{glyph}  {}", location.name)?;
        writeln!(f, "   {}", location.subtitle())?;
        writeln!(f, "   {}", format_local_time(&location.localtime))?;
        writeln!(f)?;

        let phase = if current.is_day.is_day() { "☀️ Daytime" } else { "🌙 Nighttime" };
        writeln!(
            f,
            "   {}°C  {}  {phase}",
            round_half_up(current.temperature),
            current.description().unwrap_or_default(),
        )?;
        if let Some(icon) = current.icon_url() {
            writeln!(f, "   Icon: {icon}")?;
        }
        writeln!(f)?;

        stat(f, "Feels Like", format!("{}°C", round_half_up(current.feelslike)))?;
        stat(f, "Humidity", format!("{}%", current.humidity))?;
        stat(f, "Wind", format!("{} km/h", current.wind_speed))?;
        stat(f, "Visibility", format!("{} km", current.visibility))?;
        stat(f, "UV Index", current.uv_index.to_string())?;
        stat(f, "Pressure", format!("{} hPa", current.pressure))?;
        writeln!(f)?;

        write!(f, "   💨 Wind Direction: {}   ☁️ Cloud Cover: {}%", current.wind_dir, current.cloudcover)?;
        if current.precip > 0.0 {
            write!(f, "   🌧️ Precip: {} mm", current.precip)?;
        }
        writeln!(f)
    }
}

/// Detail panel for the selected historical day.
pub struct HistoricalView<'a> {
    location: &'a Location,
    day: &'a HistoricalDay,
}

impl<'a> HistoricalView<'a> {
    /// `None` when the response holds no day to show.
    pub fn new(data: &'a HistoricalResponse, date: NaiveDate) -> Option<Self> {
        data.day_for(date).map(|day| Self { location: &data.location, day })
    }
}

impl fmt::Display for HistoricalView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = self.day;
        let glyph = if day.avgtemp > 25.0 {
            "☀️"
        } else if day.avgtemp > 10.0 {
            "🌤️"
        } else {
            "❄️"
        };

        writeln!(f, "{glyph}  {}", self.location.name)?;
        writeln!(f, "   {} · {}", self.location.country, day.date)?;
        writeln!(f)?;

        stat(f, "Max Temp", format!("{}°C", day.maxtemp))?;
        stat(f, "Min Temp", format!("{}°C", day.mintemp))?;
        stat(f, "Avg Temp", format!("{}°C", day.avgtemp))?;
        stat(f, "Sun Hours", format!("{}h", day.sunhour))?;

        if let Some(astro) = &day.astro {
            writeln!(f)?;
            writeln!(f, "   🌅 Astronomy")?;
            stat(f, "Sunrise", astro.sunrise.clone())?;
            stat(f, "Sunset", astro.sunset.clone())?;
            stat(f, "Moonrise", astro.moonrise.clone())?;
            stat(f, "Moonset", astro.moonset.clone())?;
        }

        if !day.hourly.is_empty() {
            writeln!(f)?;
            writeln!(f, "   ⏱️ Hourly Breakdown")?;
            for hour in day.hourly.iter().take(HOURLY_PREVIEW) {
                write!(
                    f,
                    "   {}  {:>5}°  💧 {}%  {}",
                    hourly_label(&hour.time),
                    hour.temperature,
                    hour.humidity,
                    weather_glyph(hour.weather_code, DayPhase::Day),
                )?;
                if let Some(desc) = hour.description() {
                    write!(f, " {desc}")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

pub struct MarineView<'a>(pub &'a MarineConditions);

impl fmt::Display for MarineView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let MarineConditions { location, current, source, .. } = self.0;

        let name = if location.name.is_empty() { "Marine Station" } else { &location.name };
        writeln!(f, "🌊  {name}")?;
        if location.country.is_empty() {
            writeln!(f, "   {}", location.localtime)?;
        } else {
            writeln!(f, "   {} · {}", location.country, location.localtime)?;
        }
        if let Some(desc) = current.description() {
            writeln!(f, "   {desc}")?;
        }
        if *source == MarineSource::CurrentFallback {
            writeln!(f, "   (marine data not available on this plan; showing current conditions)")?;
        }
        writeln!(f)?;

        let wind = if current.wind_dir.is_empty() {
            format!("{} km/h", current.wind_speed)
        } else {
            format!("{} km/h {}", current.wind_speed, current.wind_dir)
        };

        stat(f, "Sea Temp", format!("{}°C (surface)", current.temperature))?;
        stat(f, "Wind Speed", wind)?;
        stat(f, "Visibility", format!("{} km", current.visibility))?;
        stat(f, "Humidity", format!("{}%", current.humidity))?;
        stat(f, "Pressure", format!("{} hPa", current.pressure))?;
        stat(f, "Cloud Cover", format!("{}%", current.cloudcover))?;
        stat(f, "UV Index", current.uv_index.to_string())?;
        stat(f, "Feels Like", format!("{}°C", current.feelslike))?;

        if let Some(tides) = self.0.tides().filter(|t| !t.tide_data.is_empty()) {
            writeln!(f)?;
            writeln!(f, "   🌊 Tide Information")?;
            for tide in tides.chronological().into_iter().take(TIDE_PREVIEW) {
                writeln!(
                    f,
                    "   {:<9} {:>6} m  {} tide",
                    tide.tide_time, tide.tide_height_m, tide.tide_type
                )?;
            }
        }
        Ok(())
    }
}

pub struct ErrorView<'a> {
    pub tab: Tab,
    pub message: &'a str,
}

impl fmt::Display for ErrorView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (glyph, title, hint) = match self.tab {
            Tab::Current => (
                "⛈️",
                "Couldn't fetch weather data",
                Some("Try checking the city name or your connection."),
            ),
            Tab::Historical => ("⚠️", "Unable to fetch historical data", None),
            Tab::Marine => (
                "🌊",
                "Marine data unavailable",
                Some("Try entering coordinates (lat,lon) or a coastal city name."),
            ),
        };

        writeln!(f, "{glyph}  {title}")?;
        writeln!(f, "   {}", self.message)?;
        if let Some(hint) = hint {
            writeln!(f, "   {hint}")?;
        }
        Ok(())
    }
}

/// Shown before the first request of a tab.
pub struct Placeholder(pub Tab);

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Tab::Current => {
                writeln!(f, "🌤️  Discover Your Weather")?;
                writeln!(f, "   Search any city to get real-time atmospheric conditions.")?;
                writeln!(f, "   Try: {}", CITY_PRESETS.join(", "))
            }
            Tab::Historical => {
                writeln!(f, "📅  Historical Weather Lookup")?;
                writeln!(f, "   Pick a city and a past date.")
            }
            Tab::Marine => {
                writeln!(f, "🌊  Marine Weather Lookup")?;
                writeln!(f, "   Try: {}", MARINE_PRESETS.join(", "))
            }
        }
    }
}

fn stat(f: &mut fmt::Formatter<'_>, label: &str, value: String) -> fmt::Result {
    writeln!(f, "   {label:<12}{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use atmosphere_core::{
        FetchError, ProviderError,
        model::CurrentMetrics,
    };

    fn london(temperature: f64, feelslike: f64) -> CurrentConditions {
        let json = format!(
            r#"{{
                "location": {{"name": "London", "country": "United Kingdom",
                              "region": "City of London, Greater London", "localtime": "2024-01-15 14:30"}},
                "current": {{"temperature": {temperature}, "feelslike": {feelslike}, "weather_code": 113,
                             "is_day": "yes", "weather_descriptions": ["Sunny"], "humidity": 70,
                             "wind_speed": 11, "wind_dir": "SW", "pressure": 1020, "visibility": 10,
                             "uv_index": 1, "cloudcover": 25, "precip": 0}}
            }}"#
        );
        serde_json::from_str(&json).expect("valid json")
    }

    #[test]
    fn current_view_rounds_like_math_round() {
        let out = CurrentView(&london(7.5, -2.5)).to_string();

        assert!(out.contains("   8°C  Sunny"), "{out}");
        assert!(out.contains("Feels Like  -2°C"), "{out}");
        assert!(out.contains("Monday, January 15, 2024 at 02:30 PM"));
        assert!(out.contains("City of London, Greater London, United Kingdom"));
        assert!(out.starts_with("☀️  London"));
        assert!(!out.contains("Precip"));
    }

    #[test]
    fn current_view_shows_precip_and_night() {
        let mut data = london(3.2, 1.0);
        data.current.precip = 0.4;
        data.current.is_day = DayPhase::Night;
        let out = CurrentView(&data).to_string();

        assert!(out.contains("🌧️ Precip: 0.4 mm"));
        assert!(out.contains("🌙 Nighttime"));
        assert!(out.starts_with("🌙  London"));
    }

    fn historical(keys: &[&str]) -> HistoricalResponse {
        let days: Vec<String> = keys
            .iter()
            .map(|k| {
                format!(
                    r#""{k}": {{"date": "{k}", "mintemp": 2, "maxtemp": 9, "avgtemp": 5.5, "sunhour": 8.7,
                               "astro": {{"sunrise": "06:29 AM", "sunset": "05:48 PM", "moonrise": "11:27 PM", "moonset": "09:04 AM"}},
                               "hourly": [{{"time": "0", "temperature": 3, "humidity": 80, "weather_descriptions": ["Clear"]}},
                                          {{"time": "300", "temperature": 2, "humidity": 85}}]}}"#
                )
            })
            .collect();
        let json = format!(
            r#"{{"location": {{"name": "Paris", "country": "France"}}, "historical": {{{}}}}}"#,
            days.join(",")
        );
        serde_json::from_str(&json).expect("valid json")
    }

    #[test]
    fn historical_view_renders_single_entry() {
        let data = historical(&["2024-03-01"]);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let out = HistoricalView::new(&data, date).expect("one day").to_string();

        assert!(out.starts_with("❄️  Paris"));
        assert!(out.contains("France · 2024-03-01"));
        assert!(out.contains("Avg Temp    5.5°C"));
        assert!(out.contains("Sunrise     06:29 AM"));
        assert!(out.contains("00:00"));
        assert!(out.contains("03:00"));
        assert!(out.lines().any(|l| l.contains("00:00") && l.ends_with(" Clear")));
    }

    #[test]
    fn historical_view_absent_for_empty_mapping() {
        let data = historical(&[]);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(HistoricalView::new(&data, date).is_none());
    }

    fn marine(source: MarineSource, tides: bool) -> MarineConditions {
        let marine = if tides {
            r#", "marine": {"tides": [{"date": "2024-06-01", "tide_data": [
                {"tideTime": "4:57 PM", "tideHeight_mt": "1.20", "tide_type": "HIGH"},
                {"tideTime": "10:41 AM", "tideHeight_mt": "0.31", "tide_type": "LOW"}]}]}"#
        } else {
            ""
        };
        let json = format!(
            r#"{{"location": {{"name": "", "country": "", "localtime": "2024-06-01 09:00"}},
                 "current": {{"temperature": 15, "wind_speed": 20, "wind_dir": "SW"}}{marine}}}"#
        );
        let mut data: MarineConditions = serde_json::from_str(&json).expect("valid json");
        data.source = source;
        data
    }

    #[test]
    fn marine_view_sorts_tides_and_names_unknown_station() {
        let out = MarineView(&marine(MarineSource::Marine, true)).to_string();

        assert!(out.starts_with("🌊  Marine Station"));
        let low = out.find("low tide").expect("low tide shown");
        let high = out.find("high tide").expect("high tide shown");
        assert!(low < high, "{out}");
        assert!(out.contains("Sea Temp    15°C (surface)"));
    }

    #[test]
    fn marine_view_explains_fallback() {
        let out = MarineView(&marine(MarineSource::CurrentFallback, false)).to_string();
        assert!(out.contains("showing current conditions"));
        assert!(!out.contains("Tide Information"));
    }

    #[test]
    fn render_tab_follows_request_state() {
        let mut dash = Dashboard::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        assert!(render_tab(&dash, Tab::Current, date).contains("Discover Your Weather"));

        let t = dash.begin_current("London");
        assert!(render_tab(&dash, Tab::Current, date).starts_with("Loading current"));

        let err: FetchError =
            ProviderError::new(615, "request_failed", None, "Failed to fetch weather data").into();
        dash.current.settle(t, Err(err));
        let out = render_tab(&dash, Tab::Current, date);
        assert!(out.contains("Couldn't fetch weather data"));
        assert!(out.contains("Failed to fetch weather data"));

        let t = dash.historical.begin();
        dash.historical.settle(t, Ok(historical(&[])));
        assert!(render_tab(&dash, Tab::Historical, date).starts_with("No historical data"));
    }

    #[test]
    fn error_view_per_tab() {
        let out = ErrorView { tab: Tab::Marine, message: "nope" }.to_string();
        assert!(out.contains("Marine data unavailable"));
        assert!(out.contains("coastal city name"));

        let out = ErrorView { tab: Tab::Historical, message: "nope" }.to_string();
        assert!(out.contains("Unable to fetch historical data"));
    }

    #[test]
    fn default_metrics_render_without_panicking() {
        let data = CurrentConditions {
            location: london(0.0, 0.0).location,
            current: CurrentMetrics::default(),
        };
        assert!(!CurrentView(&data).to_string().is_empty());
    }
}
