use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Confirm, Password, PasswordDisplayMode};
use myweather_core::{
    AuthorizationStatus, Config, Coordinate, SimulatedLocationService, WeatherSession,
    provider_from_config,
};

use crate::display::TerminalDisplay;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "myweather", version, about = "What's My Weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show weather for the (simulated) device location.
    Show(ShowArgs),
}

#[derive(Debug, clap::Args)]
pub struct ShowArgs {
    /// Device latitude; defaults to the fallback coordinate.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Device longitude; defaults to the fallback coordinate.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Current location permission state.
    #[arg(long, value_enum, default_value_t = StatusArg::NotDetermined)]
    pub status: StatusArg,

    /// Answer given when permission is requested; `not-determined` dismisses the dialog.
    #[arg(long, value_enum, default_value_t = StatusArg::Authorized)]
    pub grant: StatusArg,

    /// Pretend location services are turned off device-wide.
    #[arg(long)]
    pub services_disabled: bool,

    /// Offer a refresh after each result.
    #[arg(long, short)]
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    NotDetermined,
    Denied,
    Authorized,
    Restricted,
}

impl From<StatusArg> for AuthorizationStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::NotDetermined => AuthorizationStatus::NotDetermined,
            StatusArg::Denied => AuthorizationStatus::Denied,
            StatusArg::Authorized => AuthorizationStatus::Authorized,
            StatusArg::Restricted => AuthorizationStatus::Other,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show(args) => show(args).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

async fn show(args: ShowArgs) -> Result<()> {
    let config = Config::load()?;
    let fallback = config.fallback_coordinate()?;
    let provider = provider_from_config(&config)?;

    let device = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon).context("Invalid device coordinate")?,
        _ => fallback,
    };

    let service = SimulatedLocationService::new(args.status.into(), device)
        .with_grant(args.grant.into())
        .with_services_enabled(!args.services_disabled);

    let mut session = WeatherSession::new(service, provider, fallback);
    let mut screen = TerminalDisplay::default();

    session.start(&mut screen).await;
    session.drain_events(&mut screen).await;

    while args.interactive {
        let again = Confirm::new("새로고침하시겠습니까?")
            .with_default(false)
            .prompt()
            .context("Failed to read answer")?;
        if !again {
            break;
        }

        session.refresh(&mut screen).await;
        session.drain_events(&mut screen).await;
    }

    if session.record().is_none() && !screen.notified() {
        anyhow::bail!("No weather data available");
    }

    Ok(())
}
