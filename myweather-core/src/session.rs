//! One screen session: resolve a coordinate, fetch, hand the record to a display.

use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    error::FetchError,
    fetcher::{FetchOutcome, WeatherCell, WeatherFetcher},
    location::{LocationEvent, LocationResolver, LocationService, Refresh, Resolution},
    model::{AuthorizationStatus, Coordinate, WeatherRecord},
    provider::WeatherProvider,
};

/// User-facing prompts the display is asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Location services are off device-wide.
    ServicesDisabled,
    /// Permission was denied; point the user at the settings screen.
    OpenSettings,
}

/// Consumer of session results.
pub trait WeatherDisplay {
    fn render(&mut self, record: &WeatherRecord);

    fn prompt(&mut self, prompt: Prompt);

    fn fetch_failed(&mut self, _error: &FetchError) {}

    /// The permission state is one the session cannot act on.
    fn unsupported_status(&mut self, _status: AuthorizationStatus) {}
}

#[derive(Debug)]
pub struct WeatherSession<S, P> {
    resolver: LocationResolver<S>,
    fetcher: WeatherFetcher<P>,
    cell: WeatherCell,
    events: mpsc::UnboundedReceiver<LocationEvent>,
}

impl<S, P> WeatherSession<S, P>
where
    S: LocationService,
    P: WeatherProvider,
{
    pub fn new(mut service: S, provider: P, fallback: Coordinate) -> Self {
        let events = service.subscribe();
        Self {
            resolver: LocationResolver::new(service, fallback),
            fetcher: WeatherFetcher::new(provider),
            cell: WeatherCell::new(),
            events,
        }
    }

    pub fn record(&self) -> Option<&WeatherRecord> {
        self.cell.get()
    }

    pub fn resolver(&self) -> &LocationResolver<S> {
        &self.resolver
    }

    pub fn fetcher(&self) -> &WeatherFetcher<P> {
        &self.fetcher
    }

    /// Initial authorization check.
    pub async fn start<D: WeatherDisplay>(&mut self, display: &mut D) -> Resolution {
        let resolution = self.resolver.check();
        self.apply(resolution, display).await;
        resolution
    }

    /// Manual refresh requested by the user.
    pub async fn refresh<D: WeatherDisplay>(&mut self, display: &mut D) -> Refresh {
        let refresh = self.resolver.refresh();
        match refresh {
            Refresh::OpenSettings => display.prompt(Prompt::OpenSettings),
            Refresh::Checked(resolution) => self.apply(resolution, display).await,
        }
        refresh
    }

    /// Next pending location event, without waiting.
    pub fn try_next_event(&mut self) -> Option<LocationEvent> {
        self.events.try_recv().ok()
    }

    /// Wait for the next location event. `None` once the service is gone.
    pub async fn next_event(&mut self) -> Option<LocationEvent> {
        self.events.recv().await
    }

    pub async fn handle_event<D: WeatherDisplay>(&mut self, event: LocationEvent, display: &mut D) {
        debug!(?event, "location event");
        match event {
            LocationEvent::AuthorizationChanged => {
                let resolution = self.resolver.on_authorization_changed();
                self.apply(resolution, display).await;
            }
            LocationEvent::LocationsUpdated(locations) => {
                if let Some(coordinate) = self.resolver.on_locations_updated(&locations) {
                    self.fetch(coordinate, display).await;
                }
            }
        }
    }

    /// Handle every event already queued, including ones raised while handling.
    pub async fn drain_events<D: WeatherDisplay>(&mut self, display: &mut D) -> usize {
        let mut handled = 0;
        while let Some(event) = self.try_next_event() {
            self.handle_event(event, display).await;
            handled += 1;
        }
        handled
    }

    async fn apply<D: WeatherDisplay>(&mut self, resolution: Resolution, display: &mut D) {
        match resolution {
            Resolution::ServicesDisabled => display.prompt(Prompt::ServicesDisabled),
            Resolution::Fallback(coordinate) => self.fetch(coordinate, display).await,
            Resolution::Unsupported(status) => display.unsupported_status(status),
            Resolution::AwaitingAuthorization | Resolution::Updating => {}
        }
    }

    async fn fetch<D: WeatherDisplay>(&mut self, coordinate: Coordinate, display: &mut D) {
        match self.fetcher.fetch(coordinate, &mut self.cell).await {
            FetchOutcome::Rendered => {
                if let Some(record) = self.cell.get() {
                    display.render(record);
                }
            }
            FetchOutcome::Failed(err) => display.fetch_failed(&err),
        }
    }
}
