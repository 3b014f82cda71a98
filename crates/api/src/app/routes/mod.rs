use axum::{routing::get, Router};

pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/realtime", get(system::realtime))
        .merge(users::router())
}
