use anyhow::{Context, anyhow, bail};
use atmosphere_core::{
    Config, Dashboard, Tab, WeatherstackClient,
    geo::{Coordinates, PositionOptions, locate},
    provider::{
        HttpTransport, client_from_config, default_historical_date, parse_historical_date,
    },
};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use inquire::{CustomUserError, Password, PasswordDisplayMode, Select, Text};
use tracing::info;

use crate::{
    locate::ConfiguredGeolocator,
    render::{CITY_PRESETS, MARINE_PRESETS, render_tab},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "atmosphere", version, about = "Current, historical and marine weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Weatherstack access key and an optional home location.
    Configure,

    /// Show current conditions.
    Current(Target),

    /// Show conditions for a past date.
    Historical {
        #[command(flatten)]
        target: Target,

        /// Date as YYYY-MM-DD; defaults to one week ago.
        #[arg(long)]
        date: Option<String>,
    },

    /// Show marine conditions (falls back to current conditions).
    Marine(Target),

    /// Fetch all three tabs at once.
    Overview {
        /// City, region, or "lat,lon".
        query: String,

        /// Historical date as YYYY-MM-DD; defaults to one week ago.
        #[arg(long)]
        date: Option<String>,
    },

    /// Browse the dashboard tab by tab.
    Interactive,
}

/// Where to look up the weather.
#[derive(Debug, Args)]
pub struct Target {
    /// City, region, or "lat,lon" coordinates.
    query: Option<String>,

    /// Use the configured home location instead of a query.
    #[arg(long, conflicts_with = "query")]
    here: bool,
}

impl Target {
    async fn resolve(&self, config: &Config) -> anyhow::Result<String> {
        if self.here {
            return locate_home(config).await;
        }

        match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => Ok(q.to_string()),
            _ => bail!("Enter a city, region, or coordinates, or pass --here."),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current(target) => {
                let config = Config::load()?;
                let query = target.resolve(&config).await?;
                let client = client_from_config(&config)?;

                let mut dash = Dashboard::new();
                let token = dash.begin_current(&query);
                dash.current.settle(token, client.fetch_current(&query).await);
                show(&dash, Tab::Current, today())
            }
            Command::Historical { target, date } => {
                let config = Config::load()?;
                let query = target.resolve(&config).await?;
                let date = historical_date(date.as_deref())?;
                let client = client_from_config(&config)?;

                let mut dash = Dashboard::new();
                let token = dash.historical.begin();
                dash.historical.settle(token, client.fetch_historical(&query, date).await);
                show(&dash, Tab::Historical, date)
            }
            Command::Marine(target) => {
                let config = Config::load()?;
                let query = target.resolve(&config).await?;
                let client = client_from_config(&config)?;

                let mut dash = Dashboard::new();
                let token = dash.marine.begin();
                dash.marine.settle(token, client.fetch_marine(&query).await);
                show(&dash, Tab::Marine, today())
            }
            Command::Overview { query, date } => {
                let config = Config::load()?;
                let date = historical_date(date.as_deref())?;
                let client = client_from_config(&config)?;
                overview(&client, query.trim(), date).await
            }
            Command::Interactive => {
                let config = Config::load()?;
                let client = client_from_config(&config)?;
                interactive(&config, &client).await
            }
        }
    }
}

async fn overview(
    client: &WeatherstackClient<HttpTransport>,
    query: &str,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let mut dash = Dashboard::new();
    let current = dash.begin_current(query);
    let historical = dash.historical.begin();
    let marine = dash.marine.begin();

    let (c, h, m) = tokio::join!(
        client.fetch_current(query),
        client.fetch_historical(query, date),
        client.fetch_marine(query),
    );
    dash.current.settle(current, c);
    dash.historical.settle(historical, h);
    dash.marine.settle(marine, m);

    for tab in Tab::all() {
        println!("── {tab} ──");
        println!("{}", render_tab(&dash, *tab, date));
    }
    Ok(())
}

async fn interactive(
    config: &Config,
    client: &WeatherstackClient<HttpTransport>,
) -> anyhow::Result<()> {
    const QUIT: &str = "Quit";

    let mut dash = Dashboard::new();
    let mut picked_date = default_historical_date(today());

    loop {
        let mut options: Vec<String> = Tab::all().iter().map(|t| t.label().to_string()).collect();
        options.push(QUIT.to_string());

        let choice = Select::new("Tab:", options).prompt()?;
        let tab = match choice.as_str() {
            "Current" => Tab::Current,
            "Historical" => Tab::Historical,
            "Marine" => Tab::Marine,
            _ => return Ok(()),
        };
        dash.select(tab);
        println!("{}", render_tab(&dash, tab, picked_date));

        let Some(query) = prompt_query(config, &dash, tab).await? else {
            continue;
        };

        match tab {
            Tab::Current => {
                let token = dash.begin_current(&query);
                dash.current.settle(token, client.fetch_current(&query).await);
            }
            Tab::Historical => {
                let default = picked_date.format("%Y-%m-%d").to_string();
                let input = Text::new("Date (YYYY-MM-DD):").with_default(&default).prompt()?;
                match parse_historical_date(&input, today()) {
                    Ok(d) => picked_date = d,
                    Err(err) => {
                        eprintln!("{err}");
                        continue;
                    }
                }
                let token = dash.historical.begin();
                dash.historical.settle(token, client.fetch_historical(&query, picked_date).await);
            }
            Tab::Marine => {
                let token = dash.marine.begin();
                dash.marine.settle(token, client.fetch_marine(&query).await);
            }
        }

        println!("{}", render_tab(&dash, dash.active, picked_date));
    }
}

/// Ask for a location. An empty answer uses the home location; `None`
/// means the lookup failed and was already reported.
async fn prompt_query(
    config: &Config,
    dash: &Dashboard,
    tab: Tab,
) -> anyhow::Result<Option<String>> {
    let (placeholder, presets) = match tab {
        Tab::Marine => ("e.g. Pacific Ocean, 48.8566,2.3522...", MARINE_PRESETS),
        _ => ("Search city, region, or country...", CITY_PRESETS),
    };

    let last_city = dash.last_searched_city().unwrap_or_default().to_string();

    let mut prompt = Text::new("Location:")
        .with_placeholder(placeholder)
        .with_help_message("Leave empty to use your home location")
        .with_autocomplete(preset_suggestions(presets));

    if tab == Tab::Historical && !last_city.is_empty() {
        prompt = prompt.with_default(&last_city);
    }

    let answer = prompt.prompt()?;
    let answer = answer.trim();
    if !answer.is_empty() {
        return Ok(Some(answer.to_string()));
    }

    match locate_home(config).await {
        Ok(query) => Ok(Some(query)),
        Err(err) => {
            eprintln!("Location Error: {err}");
            Ok(None)
        }
    }
}

fn preset_suggestions(
    presets: &'static [&'static str],
) -> impl Fn(&str) -> Result<Vec<String>, CustomUserError> + Clone {
    move |input: &str| {
        let lower = input.to_lowercase();
        Ok(presets
            .iter()
            .filter(|p| p.to_lowercase().starts_with(&lower))
            .map(|p| p.to_string())
            .collect())
    }
}

async fn locate_home(config: &Config) -> anyhow::Result<String> {
    let geolocator = ConfiguredGeolocator::from_config(config);
    let query = locate(&geolocator, &PositionOptions::default()).await.map_err(|err| {
        anyhow!("{err}\nHint: set a home location with `atmosphere configure`.")
    })?;

    info!(%query, "using home location");
    Ok(query)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("Weatherstack access key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !key.trim().is_empty() {
        config.set_access_key(&key);
    } else if config.access_key.is_none() {
        bail!("An access key is required. Get one at https://weatherstack.com.");
    }

    let current_home = config.home.clone().unwrap_or_default();
    let home = Text::new("Home location (lat,lon), optional:")
        .with_default(&current_home)
        .prompt()?;
    let home = home.trim();
    if home.is_empty() {
        config.home = None;
    } else {
        let coords: Coordinates = home
            .parse()
            .with_context(|| format!("Invalid home coordinates '{home}'. Expected \"lat,lon\"."))?;
        config.set_home(coords);
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn historical_date(input: Option<&str>) -> anyhow::Result<NaiveDate> {
    let today = today();
    match input {
        Some(raw) => Ok(parse_historical_date(raw, today)?),
        None => Ok(default_historical_date(today)),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Print one tab; a failed fetch makes the command exit non-zero.
fn show(dash: &Dashboard, tab: Tab, date: NaiveDate) -> anyhow::Result<()> {
    println!("{}", render_tab(dash, tab, date));

    let failed = match tab {
        Tab::Current => dash.current.state().error().is_some(),
        Tab::Historical => dash.historical.state().error().is_some(),
        Tab::Marine => dash.marine.state().error().is_some(),
    };
    if failed {
        bail!("{} request failed", tab.as_str());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_historical_with_date() {
        let cli = Cli::try_parse_from(["atmosphere", "historical", "Paris", "--date", "2024-03-01"])
            .expect("valid args");
        match cli.command {
            Command::Historical { target, date } => {
                assert_eq!(target.query.as_deref(), Some("Paris"));
                assert_eq!(date.as_deref(), Some("2024-03-01"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn here_conflicts_with_query() {
        assert!(Cli::try_parse_from(["atmosphere", "current", "London", "--here"]).is_err());
        assert!(Cli::try_parse_from(["atmosphere", "marine", "--here"]).is_ok());
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let target = Target { query: Some("   ".into()), here: false };
        let err = target.resolve(&Config::default()).await.unwrap_err();
        assert!(err.to_string().contains("Enter a city"));
    }

    #[tokio::test]
    async fn here_uses_home_location() {
        let config = Config { home: Some("40.7128,-74.006".into()), ..Config::default() };
        let target = Target { query: None, here: true };
        assert_eq!(target.resolve(&config).await.unwrap(), "40.7128,-74.006");
    }

    #[test]
    fn historical_date_rejects_bad_input() {
        assert!(historical_date(Some("yesterday")).is_err());
        assert!(historical_date(Some("2999-01-01")).is_err());
        assert!(historical_date(None).is_ok());
    }
}
