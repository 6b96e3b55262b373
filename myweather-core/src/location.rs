//! Location permission handling and one-shot coordinate resolution.
//!
//! The platform side is abstracted behind [`LocationService`]. Permission and
//! position changes arrive as [`LocationEvent`]s on the receiver returned by
//! [`LocationService::subscribe`], and are fed back into the
//! [`LocationResolver`] by whoever drives the session.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::model::{AuthorizationStatus, Coordinate};

pub mod simulated;

pub use simulated::SimulatedLocationService;

/// Notifications delivered by a [`LocationService`].
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    AuthorizationChanged,
    /// Batch of fixes, oldest first.
    LocationsUpdated(Vec<Coordinate>),
}

/// Platform location/permission API.
pub trait LocationService {
    /// Whether location services are enabled device-wide.
    fn services_enabled(&self) -> bool;

    fn authorization_status(&self) -> AuthorizationStatus;

    /// Ask the user for permission. The answer arrives as
    /// [`LocationEvent::AuthorizationChanged`].
    fn request_authorization(&mut self);

    fn start_updates(&mut self);

    fn stop_updates(&mut self);

    /// Register for events. Only the most recent subscriber receives them.
    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<LocationEvent>;
}

/// Result of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    ServicesDisabled,
    /// Authorization was requested; wait for `AuthorizationChanged`.
    AwaitingAuthorization,
    /// Permission denied, use this coordinate instead.
    Fallback(Coordinate),
    /// Location updates are running; a fix will arrive as an event.
    Updating,
    Unsupported(AuthorizationStatus),
}

/// Result of a user-triggered refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Refresh {
    /// Permission is denied; the user should be sent to settings.
    OpenSettings,
    /// Refresh fell through to a regular authorization check.
    Checked(Resolution),
}

#[derive(Debug)]
pub struct LocationResolver<S> {
    service: S,
    fallback: Coordinate,
    updating: bool,
    authorization_pending: bool,
}

impl<S: LocationService> LocationResolver<S> {
    pub fn new(service: S, fallback: Coordinate) -> Self {
        Self { service, fallback, updating: false, authorization_pending: false }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn check(&mut self) -> Resolution {
        if !self.service.services_enabled() {
            debug!("location services disabled");
            return Resolution::ServicesDisabled;
        }

        let status = self.service.authorization_status();
        debug!(%status, "checking location authorization");

        match status {
            AuthorizationStatus::NotDetermined => {
                if !self.authorization_pending {
                    self.authorization_pending = true;
                    self.service.request_authorization();
                }
                Resolution::AwaitingAuthorization
            }
            AuthorizationStatus::Denied => Resolution::Fallback(self.fallback),
            AuthorizationStatus::Authorized => {
                self.begin_updates();
                Resolution::Updating
            }
            AuthorizationStatus::Other => {
                warn!(%status, "unsupported location authorization status");
                Resolution::Unsupported(status)
            }
        }
    }

    pub fn on_authorization_changed(&mut self) -> Resolution {
        self.authorization_pending = false;
        self.check()
    }

    /// Consume a batch of fixes. Yields the newest one if updates were
    /// running and stops them; later batches yield nothing until updates are
    /// started again.
    pub fn on_locations_updated(&mut self, locations: &[Coordinate]) -> Option<Coordinate> {
        if !self.updating {
            debug!(count = locations.len(), "ignoring location update, not updating");
            return None;
        }

        let latest = *locations.last()?;
        self.updating = false;
        self.service.stop_updates();
        debug!(coordinate = %latest, "location resolved");

        Some(latest)
    }

    pub fn refresh(&mut self) -> Refresh {
        if self.service.services_enabled()
            && self.service.authorization_status() == AuthorizationStatus::Denied
        {
            return Refresh::OpenSettings;
        }

        Refresh::Checked(self.check())
    }

    fn begin_updates(&mut self) {
        if self.updating {
            // Restart so the next fix is a fresh one.
            self.service.stop_updates();
        }
        self.updating = true;
        self.service.start_updates();
    }
}
