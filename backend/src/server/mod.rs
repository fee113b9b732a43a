//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, BuildMode, ServerConfig};

use state_builders::{AppPorts, build_app_ports};

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use todo_backend::doc::ApiDoc;
use todo_backend::inbound::http::health::{HealthState, live, ready};
use todo_backend::inbound::http::routes;
use todo_backend::middleware::{
    CatchPanic, RateLimit, RequestTimeout, SessionIdentity, Trace,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::time::Duration;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    ports: AppPorts,
    rate_limit: RateLimit,
    request_timeout: Duration,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        ports,
        rate_limit,
        request_timeout,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(ports.http_state)
        .wrap(SessionIdentity::new(ports.session_tokens))
        .wrap(rate_limit)
        .wrap(RequestTimeout::new(request_timeout))
        .wrap(CatchPanic)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(routes::configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the listener is bound.
/// - `config`: pre-built [`ServerConfig`] carrying the pool, secret and limits.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Returns [`std::io::Error`] when no database pool was attached or binding
/// the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let pool = config
        .db_pool
        .as_ref()
        .ok_or_else(|| std::io::Error::other("database pool not configured"))?;
    let ports = build_app_ports(&config, pool);
    // One limiter shared by every worker.
    let rate_limit = RateLimit::new(config.rate_limit);
    let request_timeout = config.request_timeout;
    let bind_addr = config.bind_addr;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            ports: ports.clone(),
            rate_limit: rate_limit.clone(),
            request_timeout,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
