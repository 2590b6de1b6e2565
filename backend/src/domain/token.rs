//! Session token issuance.
//!
//! Tokens are HS256 JSON Web Tokens carrying the session [`Identity`], the
//! issuance time and an expiry [`TOKEN_TTL_SECONDS`] later. The signing
//! secret is handed in on every call; without one, issuance fails instead of
//! producing an unsigned token. Verification lives with whichever service
//! consumes the token.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{EncodingKey, Header, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, error};
use zeroize::Zeroizing;

use super::Identity;

/// Claim-level lifetime of a session token.
pub const TOKEN_TTL_SECONDS: i64 = 7200;

/// Bytes of the SHA-256 digest kept in a secret fingerprint.
const FINGERPRINT_BYTES: usize = 8;

/// Symmetric key used to sign session tokens. Zeroed on drop.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<String>);

impl SigningSecret {
    /// Wrap `raw`, treating an empty value as no secret at all.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Truncated SHA-256 of the secret as 16 lowercase hex characters.
    ///
    /// Safe to log; lets operators tell which secret a process loaded.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::SigningSecret;
    ///
    /// let secret = SigningSecret::new("s3cret").unwrap();
    /// let fp = secret.fingerprint();
    /// assert_eq!(fp.len(), 16);
    /// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.as_bytes());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret")
            .field(&self.fingerprint())
            .finish()
    }
}

/// Payload embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Session identity.
    pub id: Identity,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Signed, opaque session credential.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Encoded token text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Failures raised while minting a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No signing secret is configured. Fatal for the request.
    #[error("error generating token: signing secret is not configured")]
    MissingSecret,
    /// The JWT library refused to sign the claims.
    #[error("error generating token: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// Mints session tokens stamped with the injected clock's time.
#[derive(Clone)]
pub struct TokenIssuer {
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Build an issuer reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Sign a token for `identity`, valid for [`TOKEN_TTL_SECONDS`].
    ///
    /// # Errors
    /// [`TokenError::MissingSecret`] when `secret` is `None`;
    /// [`TokenError::Encoding`] if signing fails.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::{Identity, SigningSecret, TokenError, TokenIssuer};
    /// use mockable::DefaultClock;
    ///
    /// let issuer = TokenIssuer::new(Arc::new(DefaultClock));
    /// let secret = SigningSecret::new("s3cret");
    /// assert!(issuer.issue(secret.as_ref(), Identity::generate()).is_ok());
    /// assert!(matches!(
    ///     issuer.issue(None, Identity::generate()),
    ///     Err(TokenError::MissingSecret)
    /// ));
    /// ```
    pub fn issue(
        &self,
        secret: Option<&SigningSecret>,
        identity: Identity,
    ) -> Result<SessionToken, TokenError> {
        let Some(secret) = secret else {
            error!(%identity, "refusing to issue session token without a signing secret");
            return Err(TokenError::MissingSecret);
        };

        let iat = self.clock.utc().timestamp();
        let claims = SessionClaims {
            id: identity,
            iat,
            exp: iat + TOKEN_TTL_SECONDS,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        debug!(%identity, exp = claims.exp, "issued session token");
        Ok(SessionToken(token))
    }
}
