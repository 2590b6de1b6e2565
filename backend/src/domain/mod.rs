//! Account domain: field validation, per-endpoint orchestration and session
//! token issuance.
//!
//! Purpose: keep every decision the service makes free of HTTP types so the
//! rules can be exercised directly. Nothing in this layer performs I/O or
//! holds state between requests.
//!
//! Public surface:
//! - [`validation`]: `validate(kind, value)` over [`FieldKind`].
//! - [`accounts`]: fail-fast checks for register, update and login.
//! - [`token`]: [`TokenIssuer`] minting HS256 session tokens.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.

pub mod accounts;
pub mod error;
pub mod token;
pub mod trace_id;
pub mod validation;

pub use self::accounts::{FieldRejection, Identity, RawInput, RegisteredAccount};
pub use self::error::{Error, ErrorCode};
pub use self::token::{
    SessionClaims, SessionToken, SigningSecret, TOKEN_TTL_SECONDS, TokenError, TokenIssuer,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{FieldKind, Rejection, ValidationOutcome, validate};
