use tracing::{debug, info, warn};

use crate::{
    error::FetchError,
    model::{Coordinate, WeatherRecord},
    provider::WeatherProvider,
};

/// Holds the last successfully fetched record. Only a successful fetch may
/// replace it.
#[derive(Debug, Default)]
pub struct WeatherCell {
    record: Option<WeatherRecord>,
}

impl WeatherCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&WeatherRecord> {
        self.record.as_ref()
    }

    /// Replace the whole record, returning the previous one.
    pub fn replace(&mut self, record: WeatherRecord) -> Option<WeatherRecord> {
        self.record.replace(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Requesting,
    Rendered,
}

#[derive(Debug)]
pub enum FetchOutcome {
    Rendered,
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, FetchOutcome::Rendered)
    }
}

/// Runs single fetch attempts against a provider and applies the result.
#[derive(Debug)]
pub struct WeatherFetcher<P> {
    provider: P,
    state: FetchState,
    requests: u64,
}

impl<P: WeatherProvider> WeatherFetcher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, state: FetchState::Idle, requests: 0 }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Number of fetches issued so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// One attempt, no retry. Failures are logged and leave `cell` untouched.
    pub async fn fetch(&mut self, coordinate: Coordinate, cell: &mut WeatherCell) -> FetchOutcome {
        self.state = FetchState::Requesting;
        self.requests += 1;
        debug!(%coordinate, "fetching weather");

        match self.provider.current_weather(coordinate).await {
            Ok(record) => {
                info!(
                    location = %record.location_name,
                    temp = record.temperature_c,
                    "weather updated"
                );
                cell.replace(record);
                self.state = FetchState::Rendered;
                FetchOutcome::Rendered
            }
            Err(err) => {
                warn!(%coordinate, error = %err, "weather fetch failed");
                self.state = FetchState::Idle;
                FetchOutcome::Failed(err)
            }
        }
    }
}
