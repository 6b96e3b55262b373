use crate::{Config, error::FetchError, model::{Coordinate, WeatherRecord}};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current weather for a coordinate. One call is one attempt.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, coordinate: Coordinate) -> Result<WeatherRecord, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.resolve_api_key()?;
    Ok(OpenWeatherProvider::from_config(config, api_key))
}
