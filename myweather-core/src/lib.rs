//! Core library for the `myweather` app.
//!
//! This crate defines:
//! - Location permission handling and one-shot coordinate resolution
//! - The OpenWeather client and the fetch state machine
//! - The session driver tying both to a display
//! - Configuration handling
//!
//! It is used by `myweather-cli`, but any front end implementing
//! [`WeatherDisplay`] and [`LocationService`] can drive it.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod location;
pub mod model;
pub mod provider;
pub mod session;

pub use config::{Config, FallbackConfig};
pub use error::FetchError;
pub use fetcher::{FetchOutcome, FetchState, WeatherCell, WeatherFetcher};
pub use location::{
    LocationEvent, LocationResolver, LocationService, Refresh, Resolution,
    SimulatedLocationService,
};
pub use model::{AuthorizationStatus, Coordinate, CoordinateError, WeatherDetail, WeatherRecord};
pub use provider::{OpenWeatherProvider, WeatherProvider, provider_from_config};
pub use session::{Prompt, WeatherDisplay, WeatherSession};
