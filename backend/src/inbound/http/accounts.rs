//! Account API handlers.
//!
//! ```text
//! POST  /api/accounts        {"email":"ada@mail.com","name":"ada lovelace","password":"engine42"}
//! POST  /api/accounts/login  {"email":"ada@mail.com","password":"engine42"}
//! PATCH /api/accounts        {"email":"ada@mail.com","name":"ada lovelace","password":"engine42"}
//! POST  /api/accounts/logout
//! ```
//!
//! Bodies may be JSON or `application/x-www-form-urlencoded`. Validation
//! failures are answered with `200 OK` and a JSON string of the form
//! `"<field>:<reason>"`; clients depend on that shape.

use actix_web::{Either, HttpResponse, patch, post, web};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::domain::accounts::{self, FieldRejection};
use crate::domain::{Error, RawInput, RegisteredAccount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    AccountRequest, ErrorSchema, LoginRequest, LoginResponse, LogoutResponse,
    RegisteredAccountSchema,
};
use crate::inbound::http::session::{attach_session, expire_auth_flag};
use crate::inbound::http::state::HttpState;

/// Request body: a URL-encoded form when the content type says so, otherwise
/// raw bytes read as JSON.
pub type AccountBody = Either<web::Form<Vec<(String, String)>>, web::Bytes>;

/// Parse the request body into an untyped record.
fn raw_input(body: AccountBody) -> ApiResult<RawInput> {
    match body {
        Either::Left(web::Form(pairs)) => Ok(form_input(pairs)),
        Either::Right(bytes) => json_input(&bytes),
    }
}

/// Form values are always strings; a repeated key collects into an array.
fn form_input(pairs: Vec<(String, String)>) -> RawInput {
    let mut fields = Map::new();
    for (key, value) in pairs {
        let value = Value::String(value);
        match fields.get_mut(&key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                fields.insert(key, value);
            }
        }
    }
    RawInput::from(Value::Object(fields))
}

/// An empty body reads as a record without fields; anything else must be
/// JSON.
fn json_input(body: &[u8]) -> ApiResult<RawInput> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawInput::default());
    }
    serde_json::from_slice::<Value>(body)
        .map(RawInput::from)
        .map_err(|error| {
            Error::invalid_request("request body must be valid JSON")
                .with_details(json!({ "code": "invalid_json", "reason": error.to_string() }))
        })
}

fn rejected(rejection: FieldRejection) -> HttpResponse {
    debug!(
        field = %rejection.field(),
        reason = %rejection.reason(),
        "account payload rejected"
    );
    HttpResponse::Ok().json(rejection.to_string())
}

fn echo(result: Result<RegisteredAccount, FieldRejection>) -> HttpResponse {
    match result {
        Ok(account) => HttpResponse::Ok().json(account),
        Err(rejection) => rejected(rejection),
    }
}

/// Register an account.
///
/// Nothing is stored: the validated email and name are echoed back with a
/// freshly minted identity.
#[utoipa::path(
    post,
    path = "/api/accounts",
    request_body(
        content = AccountRequest,
        description = "JSON object, or the same fields URL-encoded"
    ),
    responses(
        (status = 200, description = "Echoed account, or a `\"field:reason\"` string when validation fails", body = RegisteredAccountSchema),
        (status = 400, description = "Body is not JSON", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "registerAccount"
)]
#[post("/accounts")]
pub async fn register(body: AccountBody) -> ApiResult<HttpResponse> {
    let raw = raw_input(body)?;
    Ok(echo(accounts::register(&raw)))
}

/// Update an account. Same validation and echo as [`register`].
#[utoipa::path(
    patch,
    path = "/api/accounts",
    request_body(
        content = AccountRequest,
        description = "JSON object, or the same fields URL-encoded"
    ),
    responses(
        (status = 200, description = "Echoed account, or a `\"field:reason\"` string when validation fails", body = RegisteredAccountSchema),
        (status = 400, description = "Body is not JSON", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "updateAccount"
)]
#[patch("/accounts")]
pub async fn update(body: AccountBody) -> ApiResult<HttpResponse> {
    let raw = raw_input(body)?;
    Ok(echo(accounts::update(&raw)))
}

/// Validate credentials and open a session.
///
/// On success the response carries the session identity and two cookies:
/// the HTTP-only `token` and the script-readable `auth` flag. A missing
/// signing secret is a configuration fault and surfaces as `500`; a cookie
/// that cannot be attached surfaces as `403`.
#[utoipa::path(
    post,
    path = "/api/accounts/login",
    request_body(
        content = LoginRequest,
        description = "JSON object, or the same fields URL-encoded"
    ),
    responses(
        (status = 200, description = "Session opened, or a `\"field:reason\"` string when validation fails", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "`token` (HttpOnly) and `auth` cookies"))),
        (status = 400, description = "Body is not JSON", body = ErrorSchema),
        (status = 403, description = "Session cookies could not be attached", body = ErrorSchema),
        (status = 500, description = "Signing secret missing or token signing failed", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login"
)]
#[post("/accounts/login")]
pub async fn login(state: web::Data<HttpState>, body: AccountBody) -> ApiResult<HttpResponse> {
    let raw = raw_input(body)?;
    let identity = match accounts::login(&raw) {
        Ok(identity) => identity,
        Err(rejection) => return Ok(rejected(rejection)),
    };

    let token = state
        .issuer
        .issue(state.signing_secret.as_ref(), identity)
        .map_err(|error| Error::internal(error.to_string()))?;

    let mut response = HttpResponse::Ok().json(LoginResponse { id: identity });
    attach_session(state.cookies.as_ref(), &mut response, &token)?;
    Ok(response)
}

/// Close the session from the browser's point of view.
///
/// Expires the `auth` flag only; the `token` cookie is not touched. A cookie
/// that cannot be attached surfaces as a redacted `500`.
#[utoipa::path(
    post,
    path = "/api/accounts/logout",
    responses(
        (status = 200, description = "Auth flag expired", body = LogoutResponse),
        (status = 500, description = "Cookie could not be attached", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/accounts/logout")]
pub async fn logout(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let mut response = HttpResponse::Ok().json(LogoutResponse {
        data: "ok".to_owned(),
    });
    expire_auth_flag(state.cookies.as_ref(), &mut response)?;
    Ok(response)
}
