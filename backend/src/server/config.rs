//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use accounts::domain::SigningSecret;
use mockable::{Clock, DefaultClock};

/// Everything [`super::create_server`] needs beyond the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) signing_secret: Option<SigningSecret>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Configuration using the system clock.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, signing_secret: Option<SigningSecret>) -> Self {
        Self {
            bind_addr,
            signing_secret,
            clock: Arc::new(DefaultClock),
        }
    }

    /// Replace the clock used for token timestamps.
    #[cfg_attr(not(test), expect(dead_code, reason = "Used by server tests"))]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[cfg_attr(not(test), expect(dead_code, reason = "Used by server tests"))]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
