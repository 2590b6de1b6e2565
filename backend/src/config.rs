//! Process configuration.
//!
//! Listener settings come from OrthoConfig (`ACCOUNTS_*` environment
//! variables, CLI flags or a config file). The token signing secret is read
//! separately from `TOKEN_SECRET` through [`mockable::Env`] so it never
//! passes through a serialisable settings struct.

use std::net::{AddrParseError, IpAddr, SocketAddr};

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::SigningSecret;

/// Environment variable holding the token signing secret.
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";

const DEFAULT_HOST: &str = "0.0.0.0";

/// Listener settings.
///
/// `port` carries an OrthoConfig default so the defaults layer is never
/// empty and loading succeeds with no flags, variables or files present.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS")]
pub struct AccountsSettings {
    /// Interface address to bind. Must be an IP literal.
    pub host: Option<String>,
    /// TCP port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
}

/// Errors raised while turning settings into a listener address.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("ACCOUNTS_HOST `{host}` is not an IP address: {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: AddrParseError,
    },
}

impl AccountsSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolve the socket address the server binds to.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidHost`] when the host is not an IP
    /// literal.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host();
        let ip: IpAddr = host.parse().map_err(|source| SettingsError::InvalidHost {
            host: host.to_owned(),
            source,
        })?;
        Ok(SocketAddr::new(ip, self.port()))
    }
}

/// Read the signing secret from `TOKEN_SECRET`.
///
/// Unset and empty values both yield `None`. Startup carries on without a
/// secret; every login then fails with an internal error.
///
/// # Examples
/// ```
/// use accounts::config::signing_secret_from_env;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string()
///     .returning(|name| (name == "TOKEN_SECRET").then(|| "s3cret".to_owned()));
///
/// assert!(signing_secret_from_env(&env).is_some());
/// ```
pub fn signing_secret_from_env<E: Env>(env: &E) -> Option<SigningSecret> {
    match env.string(TOKEN_SECRET_ENV).and_then(SigningSecret::new) {
        Some(secret) => {
            info!(
                fingerprint = %secret.fingerprint(),
                "token signing secret loaded"
            );
            Some(secret)
        }
        None => {
            warn!("{TOKEN_SECRET_ENV} is not set; logins will fail until it is provided");
            None
        }
    }
}
