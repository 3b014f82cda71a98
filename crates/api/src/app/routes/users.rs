use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use pessoas_core::UserId;

use crate::app::errors::{self, ErrorOptions};
use crate::app::services::AppServices;
use crate::app::dto;
use crate::context::OrganizationContext;

pub fn router() -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Profiles in the caller's organization", body = [dto::UserSummary]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(organization): Extension<OrganizationContext>,
    Extension(options): Extension<ErrorOptions>,
) -> axum::response::Response {
    match services
        .users()
        .list_by_organization(organization.organization_id())
        .await
    {
        Ok(profiles) => {
            let items: Vec<dto::UserSummary> =
                profiles.into_iter().map(dto::UserSummary::from).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e, options),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Full detail record", body = dto::UserDetail),
        (status = 400, description = "Malformed identifier"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such user in the caller's organization")
    )
)]
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(organization): Extension<OrganizationContext>,
    Extension(options): Extension<ErrorOptions>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "user id must be numeric")
        }
    };

    match services
        .users()
        .find_by_id(organization.organization_id(), id)
        .await
    {
        Ok(Some(profile)) => (StatusCode::OK, Json(dto::UserDetail::from(profile))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(e) => errors::store_error_to_response(e, options),
    }
}
