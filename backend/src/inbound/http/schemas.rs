//! OpenAPI schema definitions for account payloads and domain types.
//!
//! Domain types do not derive `ToSchema`; the wrappers here mirror their
//! wire shape so the adapter layer owns every framework concern. Request
//! schemas document the expected body even though handlers accept untyped
//! JSON and let the validators decide.

use serde::Serialize;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The session could not be delivered.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// An unexpected or configuration failure.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "forbidden")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "Something went wrong")]
    message: String,
    /// Correlation identifier matching the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::RegisteredAccount`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RegisteredAccount)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct RegisteredAccountSchema {
    /// Identity minted for this call.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    /// Validated email.
    #[schema(example = "ada@mail.com")]
    email: String,
    /// Validated name.
    #[schema(example = "ada lovelace")]
    name: String,
}

/// Body accepted by register and update.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct AccountRequest {
    #[schema(example = "ada@mail.com")]
    email: String,
    #[schema(example = "ada lovelace")]
    name: String,
    #[schema(example = "engine42")]
    password: String,
}

/// Body accepted by login.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct LoginRequest {
    #[schema(example = "ada@mail.com")]
    email: String,
    #[schema(example = "engine42")]
    password: String,
}

/// Body returned by a successful login.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Session identity, also embedded in the token.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: crate::domain::Identity,
}

/// Body returned by logout.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    #[schema(example = "ok")]
    pub data: String,
}
