use tokio::sync::mpsc;
use tracing::debug;

use super::{LocationEvent, LocationService};
use crate::model::{AuthorizationStatus, Coordinate};

/// In-process stand-in for a platform location API.
///
/// Reports a fixed device position. Authorization requests are answered
/// immediately with the configured `grant`.
#[derive(Debug)]
pub struct SimulatedLocationService {
    enabled: bool,
    status: AuthorizationStatus,
    grant: AuthorizationStatus,
    fix: Coordinate,
    updating: bool,
    auth_requests: usize,
    tx: Option<mpsc::UnboundedSender<LocationEvent>>,
}

impl SimulatedLocationService {
    pub fn new(status: AuthorizationStatus, fix: Coordinate) -> Self {
        Self {
            enabled: true,
            status,
            grant: AuthorizationStatus::Authorized,
            fix,
            updating: false,
            auth_requests: 0,
            tx: None,
        }
    }

    /// Status the simulated user picks when asked for permission.
    pub fn with_grant(mut self, grant: AuthorizationStatus) -> Self {
        self.grant = grant;
        self
    }

    pub fn with_services_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Change the permission state. Only an actual change is announced.
    pub fn set_status(&mut self, status: AuthorizationStatus) {
        if self.status == status {
            return;
        }
        self.status = status;
        self.emit(LocationEvent::AuthorizationChanged);
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn authorization_requests(&self) -> usize {
        self.auth_requests
    }

    fn emit(&self, event: LocationEvent) {
        match &self.tx {
            Some(tx) if tx.send(event.clone()).is_ok() => {}
            _ => debug!(?event, "no subscriber for location event"),
        }
    }
}

impl LocationService for SimulatedLocationService {
    fn services_enabled(&self) -> bool {
        self.enabled
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        self.status
    }

    /// A `grant` of `NotDetermined` models a dismissed dialog: nothing is sent.
    fn request_authorization(&mut self) {
        debug!(grant = %self.grant, "authorization requested");
        self.auth_requests += 1;
        self.set_status(self.grant);
    }

    fn start_updates(&mut self) {
        self.updating = true;
        self.emit(LocationEvent::LocationsUpdated(vec![self.fix]));
    }

    fn stop_updates(&mut self) {
        self.updating = false;
    }

    fn subscribe(&mut self) -> mpsc::UnboundedReceiver<LocationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.tx = Some(tx);
        rx
    }
}
