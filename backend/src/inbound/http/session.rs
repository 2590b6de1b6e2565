//! Session delivery over cookies.
//!
//! Login attaches two cookies with the same lifetime: the HTTP-only `token`
//! cookie holding the signed session token, and a script-readable `auth`
//! flag so the browser can tell a session exists without reading the token.
//! Logout only expires the `auth` flag; the `token` cookie is left to lapse
//! on its own.
//!
//! Cookie lifetime (15 minutes) and token claim lifetime (2 hours) differ;
//! a verifier must honour whichever ends first.

use actix_web::HttpResponse;
use actix_web::cookie::{Cookie, time::Duration};
use actix_web::error::HttpError;
use tracing::warn;

use crate::domain::{Error, SessionToken};

/// Name of the HTTP-only cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";
/// Name of the script-readable session presence flag.
pub const AUTH_FLAG_COOKIE: &str = "auth";
/// Lifetime of both login cookies.
pub const SESSION_COOKIE_MAX_AGE_MS: i64 = 900_000;
/// Lifetime given to the `auth` flag on logout, expiring it almost at once.
pub const LOGOUT_FLAG_MAX_AGE_MS: i64 = 15;

/// Writes a cookie onto an outgoing response.
///
/// Handlers reach cookies only through this seam so a failing writer can
/// stand in for header encoding errors.
pub trait CookieWriter: Send + Sync {
    /// Append `cookie` as a `Set-Cookie` header.
    ///
    /// # Errors
    /// Returns the header encoding error.
    fn write(&self, response: &mut HttpResponse, cookie: &Cookie<'_>) -> Result<(), HttpError>;
}

/// Writes cookies straight into the response headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseCookies;

impl CookieWriter for ResponseCookies {
    fn write(&self, response: &mut HttpResponse, cookie: &Cookie<'_>) -> Result<(), HttpError> {
        response.add_cookie(cookie)
    }
}

fn session_cookie(
    name: &'static str,
    value: String,
    max_age_ms: i64,
    http_only: bool,
) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .max_age(Duration::milliseconds(max_age_ms))
        .http_only(http_only)
        .finish()
}

fn attach_cookies(
    writer: &dyn CookieWriter,
    response: &mut HttpResponse,
    token_value: &str,
) -> Result<(), Error> {
    let token = session_cookie(
        TOKEN_COOKIE,
        token_value.to_owned(),
        SESSION_COOKIE_MAX_AGE_MS,
        true,
    );
    let flag = session_cookie(
        AUTH_FLAG_COOKIE,
        true.to_string(),
        SESSION_COOKIE_MAX_AGE_MS,
        false,
    );
    writer
        .write(response, &token)
        .and_then(|()| writer.write(response, &flag))
        .map_err(|error| {
            warn!(%error, "failed to attach session cookies");
            Error::forbidden(error.to_string())
        })
}

/// Attach the `token` and `auth` cookies for a fresh session.
///
/// # Errors
/// Returns a [`crate::domain::ErrorCode::Forbidden`] error when a cookie
/// cannot be encoded into the response headers.
pub fn attach_session(
    writer: &dyn CookieWriter,
    response: &mut HttpResponse,
    token: &SessionToken,
) -> Result<(), Error> {
    attach_cookies(writer, response, token.as_str())
}

/// Expire the `auth` flag so client script sees the session as gone.
///
/// # Errors
/// Returns an internal error when the cookie cannot be encoded. Internal
/// errors reach the client as "Internal server error"; the encoding failure
/// itself is logged with the request's trace id.
pub fn expire_auth_flag(
    writer: &dyn CookieWriter,
    response: &mut HttpResponse,
) -> Result<(), Error> {
    let flag = session_cookie(
        AUTH_FLAG_COOKIE,
        false.to_string(),
        LOGOUT_FLAG_MAX_AGE_MS,
        false,
    );
    writer.write(response, &flag).map_err(|error| {
        warn!(%error, "failed to expire auth flag cookie");
        Error::internal(error.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::http::header::SET_COOKIE;
    use rstest::rstest;

    fn set_cookie_headers(response: &HttpResponse) -> Vec<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .filter_map(|value| value.to_str().ok())
            .map(str::to_owned)
            .collect()
    }

    fn cookie<'a>(response: &'a HttpResponse, name: &str) -> Cookie<'a> {
        response
            .cookies()
            .find(|cookie| cookie.name() == name)
            .unwrap_or_else(|| panic!("{name} cookie set"))
    }

    #[rstest]
    fn login_sets_exactly_two_cookies() {
        let mut response = HttpResponse::Ok().finish();
        attach_cookies(&ResponseCookies, &mut response, "header.payload.signature")
            .expect("cookies attach");
        assert_eq!(set_cookie_headers(&response).len(), 2);
    }

    #[rstest]
    fn token_cookie_is_http_only_for_fifteen_minutes() {
        let mut response = HttpResponse::Ok().finish();
        attach_cookies(&ResponseCookies, &mut response, "header.payload.signature")
            .expect("cookies attach");

        let token = cookie(&response, TOKEN_COOKIE);
        assert_eq!(token.value(), "header.payload.signature");
        assert_eq!(token.http_only(), Some(true));
        assert_eq!(token.max_age(), Some(Duration::minutes(15)));
    }

    #[rstest]
    fn auth_flag_is_script_readable() {
        let mut response = HttpResponse::Ok().finish();
        attach_cookies(&ResponseCookies, &mut response, "header.payload.signature")
            .expect("cookies attach");

        let flag = cookie(&response, AUTH_FLAG_COOKIE);
        assert_eq!(flag.value(), "true");
        assert_ne!(flag.http_only(), Some(true));
        assert_eq!(flag.max_age(), Some(Duration::milliseconds(900_000)));
    }

    #[rstest]
    fn unencodable_cookie_is_forbidden() {
        let mut response = HttpResponse::Ok().finish();
        let error = attach_cookies(&ResponseCookies, &mut response, "bad\nvalue")
            .expect_err("must fail");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    fn logout_expires_only_the_auth_flag() {
        let mut response = HttpResponse::Ok().finish();
        expire_auth_flag(&ResponseCookies, &mut response).expect("cookie attaches");

        let headers = set_cookie_headers(&response);
        assert_eq!(headers.len(), 1);
        assert!(headers.iter().all(|header| !header.starts_with("token=")));

        // Max-Age is written in whole seconds, so 15 ms goes out as zero.
        let flag = cookie(&response, AUTH_FLAG_COOKIE);
        assert_eq!(flag.value(), "false");
        assert_eq!(flag.max_age(), Some(Duration::ZERO));
    }
}
