use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, Environment};
use crate::handlers;
use crate::middleware::{ADMIN_PASSWORD_HEADER, LOCKER_PASSWORD_HEADER};
use crate::state::AppState;

/// Build the full router over `state`.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .merge(auth_routes())
        .merge(resource_routes())
        .merge(locker_routes())
        .merge(private_resource_routes())
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(config));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/verify", get(auth::verify))
}

fn resource_routes() -> Router<AppState> {
    use handlers::resources;

    Router::new().route(
        "/resources",
        get(resources::get)
            .post(resources::post)
            .put(resources::put)
            .delete(resources::delete),
    )
}

fn locker_routes() -> Router<AppState> {
    use handlers::lockers;

    Router::new().route(
        "/lockers",
        get(lockers::get)
            .post(lockers::post)
            .put(lockers::put)
            .delete(lockers::delete),
    )
}

fn private_resource_routes() -> Router<AppState> {
    use handlers::private_resources;

    Router::new().route(
        "/private-resources",
        get(private_resources::get)
            .post(private_resources::post)
            .put(private_resources::put)
            .delete(private_resources::delete),
    )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.environment == Environment::Development && config.security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(ADMIN_PASSWORD_HEADER),
            HeaderName::from_static(LOCKER_PASSWORD_HEADER),
        ])
}
