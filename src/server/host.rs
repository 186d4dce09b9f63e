//! Server host for transport-agnostic API exposure
//!
//! The host owns everything a request needs (booking service, session store,
//! supervisor credentials and clock) independently of how it is exposed.

use crate::bookings::AppState;
use crate::config::AppConfig;
use crate::core::auth::{SessionStore, SupervisorAuthenticator};
use crate::core::clock::Clock;
use crate::core::service::{BookingRepository, BookingService};
use anyhow::Result;
use std::sync::Arc;

/// Host context containing all application state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::from_builder_components(config, repository, clock)?;
/// let app = RestExposure::build_router(Arc::new(host))?;
/// ```
pub struct ServerHost {
    /// Validated configuration
    pub config: Arc<AppConfig>,

    /// Booking rules in front of the repository
    pub service: Arc<BookingService>,

    /// Live supervisor sessions
    pub sessions: Arc<SessionStore>,

    pub authenticator: Arc<SupervisorAuthenticator>,

    pub clock: Arc<dyn Clock>,
}

impl ServerHost {
    /// Build the host from builder components
    ///
    /// Fails when the configuration does not validate.
    pub fn from_builder_components(
        config: AppConfig,
        repository: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        let sessions = Arc::new(SessionStore::new(config.session_ttl()));
        let authenticator = Arc::new(SupervisorAuthenticator::new(
            config.auth.username.clone(),
            config.auth.password.clone(),
        ));
        let service = Arc::new(BookingService::new(repository, clock.clone()));

        Ok(Self {
            config: Arc::new(config),
            service,
            sessions,
            authenticator,
            clock,
        })
    }

    /// Handler state shared by every route
    pub fn app_state(&self) -> AppState {
        AppState {
            service: self.service.clone(),
            sessions: self.sessions.clone(),
            authenticator: self.authenticator.clone(),
            clock: self.clock.clone(),
        }
    }
}
