//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use accounts::Trace;
#[cfg(debug_assertions)]
use accounts::doc::ApiDoc;
use accounts::inbound::http::accounts::{login, logout, register, update};
use accounts::inbound::http::health::{HealthState, live, ready};
use accounts::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .service(register)
        .service(update)
        .service(login)
        .service(logout);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the listener and return the running server.
///
/// Readiness is flagged once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        signing_secret,
        clock,
    } = config;
    let http_state = web::Data::new(HttpState::with_clock(clock, signing_secret));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accounts::domain::{SigningSecret, TRACE_ID_HEADER};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::sync::Arc;

    #[fixture]
    fn http_state() -> web::Data<HttpState> {
        web::Data::new(HttpState::with_clock(
            Arc::new(DefaultClock),
            SigningSecret::new("server-test-secret"),
        ))
    }

    #[rstest]
    #[actix_web::test]
    async fn login_is_routed_under_api_with_trace_header(http_state: web::Data<HttpState>) {
        let app = actix_test::init_service(build_app(
            web::Data::new(HealthState::new()),
            http_state,
        ))
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/api/accounts/login")
            .set_json(json!({"email": "ada@mail.com", "password": "engine42"}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(TRACE_ID_HEADER));
        assert_eq!(response.response().cookies().count(), 2);
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_reports_unavailable_until_marked(http_state: web::Data<HttpState>) {
        let health = web::Data::new(HealthState::new());
        let app = actix_test::init_service(build_app(health.clone(), http_state)).await;

        let probe = || actix_test::TestRequest::get().uri("/health/ready").to_request();
        let response = actix_test::call_service(&app, probe()).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        health.mark_ready();
        let response = actix_test::call_service(&app, probe()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_account_route_is_not_found(http_state: web::Data<HttpState>) {
        let app = actix_test::init_service(build_app(
            web::Data::new(HealthState::new()),
            http_state,
        ))
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/api/accounts")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    fn server_config_binds_requested_address() {
        let addr = "127.0.0.1:0".parse().expect("socket address");
        let config = ServerConfig::new(addr, None).with_clock(Arc::new(DefaultClock));
        assert_eq!(config.bind_addr(), addr);
        assert!(config.signing_secret.is_none());
    }
}
