//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` so the token issuer, the signing
//! secret and the cookie writer arrive as explicit values rather than process
//! globals. Nothing in here is mutated after startup.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::{SigningSecret, TokenIssuer};
use crate::inbound::http::session::{CookieWriter, ResponseCookies};

/// Dependency bundle for the account handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Mints session tokens on login.
    pub issuer: TokenIssuer,
    /// Key handed to [`TokenIssuer::issue`]; `None` makes every login fail.
    pub signing_secret: Option<SigningSecret>,
    /// Puts session cookies on responses.
    pub cookies: Arc<dyn CookieWriter>,
}

impl HttpState {
    /// Build state from an issuer and an optional signing secret, writing
    /// cookies directly into response headers.
    pub fn new(issuer: TokenIssuer, signing_secret: Option<SigningSecret>) -> Self {
        Self {
            issuer,
            signing_secret,
            cookies: Arc::new(ResponseCookies),
        }
    }

    /// Convenience constructor reading time from `clock`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::SigningSecret;
    /// use accounts::inbound::http::state::HttpState;
    /// use mockable::DefaultClock;
    ///
    /// let state = HttpState::with_clock(Arc::new(DefaultClock), SigningSecret::new("s3cret"));
    /// assert!(state.signing_secret.is_some());
    /// ```
    pub fn with_clock(clock: Arc<dyn Clock>, signing_secret: Option<SigningSecret>) -> Self {
        Self::new(TokenIssuer::new(clock), signing_secret)
    }

    /// Replace the cookie writer.
    #[must_use]
    pub fn with_cookies(mut self, cookies: Arc<dyn CookieWriter>) -> Self {
        self.cookies = cookies;
        self
    }
}
