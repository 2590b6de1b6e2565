//! Per-endpoint validation of account payloads.
//!
//! Fields are checked in a fixed order (email, name, password) and the first
//! failure ends the request: later fields are never inspected. Nothing here is
//! persisted; successful calls mint a fresh [`Identity`] every time.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::validation::{FieldKind, Rejection, ValidationOutcome, validate};

static ABSENT: Value = Value::Null;

/// Untyped request body handed to the validators.
///
/// Anything other than a JSON object is treated as an object with no
/// fields, so every field reads as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput(Map<String, Value>);

impl RawInput {
    /// Value of `name`, or `null` when the field is absent.
    pub fn field(&self, name: &str) -> &Value {
        self.0.get(name).unwrap_or(&ABSENT)
    }
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }
}

/// First field that failed validation.
///
/// Renders as `"<field>:<reason>"`, the exact string clients receive.
///
/// # Examples
/// ```
/// use accounts::domain::accounts::FieldRejection;
/// use accounts::domain::validation::{FieldKind, Rejection};
///
/// let rejection = FieldRejection::new(FieldKind::Email, Rejection::WrongFormat);
/// assert_eq!(rejection.to_string(), "email:wrong format");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRejection {
    field: FieldKind,
    reason: Rejection,
}

impl FieldRejection {
    /// Pair a field with the reason it was refused.
    pub const fn new(field: FieldKind, reason: Rejection) -> Self {
        Self { field, reason }
    }

    /// Field that failed.
    pub const fn field(&self) -> FieldKind {
        self.field
    }

    /// Why it failed.
    pub const fn reason(&self) -> Rejection {
        self.reason
    }
}

impl fmt::Display for FieldRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.reason)
    }
}

/// Transient identifier minted per registration, update or login.
///
/// Never looked up and never reused; two calls always yield different
/// identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Uuid);

impl Identity {
    /// Mint a new random identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Echo returned by register and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredAccount {
    pub id: Identity,
    pub email: String,
    pub name: String,
}

const ACCOUNT_FIELDS: [FieldKind; 3] = [FieldKind::Email, FieldKind::Name, FieldKind::Password];
const LOGIN_FIELDS: [FieldKind; 2] = [FieldKind::Email, FieldKind::Password];

/// Validate `fields` in order, stopping at the first failure.
fn check(raw: &RawInput, fields: &[FieldKind]) -> Result<(), FieldRejection> {
    fields
        .iter()
        .try_for_each(|&kind| match validate(kind, raw.field(kind.field_name())) {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid(reason) => Err(FieldRejection::new(kind, reason)),
        })
}

fn text(raw: &RawInput, kind: FieldKind) -> String {
    raw.field(kind.field_name())
        .as_str()
        .unwrap_or_default()
        .to_owned()
}

fn echo_account(raw: &RawInput) -> Result<RegisteredAccount, FieldRejection> {
    check(raw, &ACCOUNT_FIELDS)?;
    Ok(RegisteredAccount {
        id: Identity::generate(),
        email: text(raw, FieldKind::Email),
        name: text(raw, FieldKind::Name),
    })
}

/// Validate a registration payload and echo it with a fresh identity.
///
/// # Examples
/// ```
/// use accounts::domain::accounts::{register, RawInput};
/// use serde_json::json;
///
/// let raw = RawInput::from(json!({
///     "email": "ada@mail.com",
///     "name": "ada lovelace",
///     "password": "engine42",
/// }));
/// let account = register(&raw).unwrap();
/// assert_eq!(account.email, "ada@mail.com");
///
/// let raw = RawInput::from(json!({ "email": "ada@mail", "name": 7 }));
/// assert_eq!(register(&raw).unwrap_err().to_string(), "email:wrong format");
/// ```
pub fn register(raw: &RawInput) -> Result<RegisteredAccount, FieldRejection> {
    echo_account(raw)
}

/// Validate an update payload. Same rules and echo as [`register`].
pub fn update(raw: &RawInput) -> Result<RegisteredAccount, FieldRejection> {
    echo_account(raw)
}

/// Validate login credentials and mint the identity for the new session.
///
/// Only the shape of the credentials is checked; there is no account store.
pub fn login(raw: &RawInput) -> Result<Identity, FieldRejection> {
    check(raw, &LOGIN_FIELDS)?;
    Ok(Identity::generate())
}
