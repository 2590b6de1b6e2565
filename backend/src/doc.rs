//! OpenAPI documentation.
//!
//! [`ApiDoc`] aggregates the account endpoints, the health probes and the
//! payload schemas. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it for external tooling.

use crate::inbound::http::schemas::{
    AccountRequest, ErrorCodeSchema, ErrorSchema, LoginRequest, LoginResponse, LogoutResponse,
    RegisteredAccountSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Accounts service API",
        description = "Account payload validation and cookie-delivered session tokens.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::update,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RegisteredAccountSchema,
        AccountRequest,
        LoginRequest,
        LoginResponse,
        LogoutResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "accounts", description = "Account validation and sessions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in aliased schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const ACCOUNT_SCHEMA_NAME: &str = "crate.domain.RegisteredAccount";

    fn object_fields(schema: &RefOr<Schema>) -> Vec<&str> {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().map(String::as_str).collect(),
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case::error(ERROR_SCHEMA_NAME, &["code", "message", "traceId", "details"])]
    #[case::account(ACCOUNT_SCHEMA_NAME, &["id", "email", "name"])]
    #[case::login("LoginResponse", &["id"])]
    #[case::logout("LogoutResponse", &["data"])]
    fn schema_exposes_wire_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas
            .get(name)
            .unwrap_or_else(|| panic!("{name} schema registered"));
        let present = object_fields(schema);
        for field in fields {
            assert!(present.contains(field), "{name} should have field '{field}'");
        }
    }

    #[rstest]
    fn account_paths_are_documented() {
        let doc = ApiDoc::openapi();
        let accounts = doc.paths.paths.get("/api/accounts").expect("accounts path");
        assert!(accounts.post.is_some());
        assert!(accounts.patch.is_some());
        for path in ["/api/accounts/login", "/api/accounts/logout"] {
            let item = doc.paths.paths.get(path).expect("path documented");
            assert!(item.post.is_some(), "{path} should be POST");
        }
    }

    #[rstest]
    #[case::register_ok("/api/accounts", "200", ACCOUNT_SCHEMA_NAME)]
    #[case::register_bad_json("/api/accounts", "400", ERROR_SCHEMA_NAME)]
    #[case::login_forbidden("/api/accounts/login", "403", ERROR_SCHEMA_NAME)]
    #[case::login_internal("/api/accounts/login", "500", ERROR_SCHEMA_NAME)]
    fn responses_reference_registered_schemas(
        #[case] path: &str,
        #[case] status: &str,
        #[case] schema: &str,
    ) {
        let doc = ApiDoc::openapi();
        let operation = doc
            .paths
            .paths
            .get(path)
            .and_then(|item| item.post.as_ref())
            .expect("POST operation documented");
        let Some(RefOr::T(response)) = operation.responses.responses.get(status) else {
            panic!("{path} documents a {status} response");
        };
        let content = response
            .content
            .get("application/json")
            .expect("JSON response content");
        let Some(RefOr::Ref(reference)) = content.schema.as_ref() else {
            panic!("{path} {status} body should be a schema reference");
        };
        assert_eq!(
            reference.ref_location,
            format!("#/components/schemas/{schema}")
        );
    }

    #[rstest]
    fn password_is_never_in_a_response_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let account = schemas.get(ACCOUNT_SCHEMA_NAME).expect("account schema");
        assert!(!object_fields(account).contains(&"password"));
    }
}
