//! HTTP application wiring (axum router + middleware pipeline).
//!
//! Layout:
//! - `services.rs`: shared state handed to handlers
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response DTOs and JSON mapping
//! - `errors.rs`: consistent error responses
//! - `docs.rs`: OpenAPI document + Swagger UI

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use pessoas_auth::Hs256JwtValidator;
use pessoas_infra::settings::CorsSettings;
use pessoas_infra::{Environment, Settings, UserStore};

use crate::middleware;

pub mod docs;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// Registration happens in a fixed order: JWT validator, services, rate
/// limiter, routers, then the middleware pipeline. The environment decides
/// the base path (`/pessoas` locally, `/auth` deployed), where Swagger is
/// mounted, and whether error responses carry developer detail.
pub fn build_app(
    settings: &Settings,
    environment: Environment,
    jwt_secret: String,
    store: Arc<dyn UserStore>,
) -> Router {
    let jwt = Arc::new(Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState { jwt };

    let services = Arc::new(AppServices::new(store));
    let rate_limit = middleware::RateLimitState::new(settings.rate_limit.clone());
    let error_options = errors::ErrorOptions {
        include_detail: environment.is_local(),
    };

    // Protected routes: require a valid bearer token.
    let protected = routes::router()
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    let api = Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected);

    // Environment branch: local mounts everything (docs included) under
    // /pessoas; deployed moves the API to /auth and serves Swagger at the
    // root, mirroring the reverse-proxy layout in front of it.
    let app = if environment.is_local() {
        let api = api.merge(docs::router("/swagger", "/pessoas/swagger/v1/swagger.json"));
        Router::new().nest("/pessoas", api)
    } else {
        Router::new()
            .nest("/auth", api)
            .merge(docs::router("/swagger", "/swagger/v1/swagger.json"))
    };

    // ServiceBuilder applies top-down, so this reads in pipeline order:
    // compression, request tracing, rate limiting, CORS, then dispatch.
    // The limiter sits outside CORS so preflight OPTIONS requests are
    // counted like any other request.
    app
        .layer(
            ServiceBuilder::new()
                .layer(CompressionLayer::new())
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    middleware::rate_limit_middleware,
                ))
                .layer(cors_layer(&settings.cors))
                .layer(Extension(services))
                .layer(Extension(error_options)),
        )
}

fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    if settings.allowed_origins.is_empty() {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
