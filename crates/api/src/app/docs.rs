//! OpenAPI document and Swagger UI mount.
//!
//! The UI lives at the environment-specific prefix (`/pessoas/swagger`
//! locally, `/swagger` deployed); the JSON document always ends in
//! `swagger/v1/swagger.json`.

use axum::response::Html;
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pessoas.API",
        description = "Identity and user-profile service",
        version = "v1"
    ),
    paths(
        crate::app::routes::system::health,
        crate::app::routes::system::whoami,
        crate::app::routes::users::list_users,
        crate::app::routes::users::get_user,
    ),
    components(schemas(crate::app::dto::UserSummary, crate::app::dto::UserDetail)),
    tags((name = "system"), (name = "users"))
)]
pub struct ApiDoc;

/// Router serving the Swagger UI page and the OpenAPI JSON under `prefix`.
///
/// `public_json_url` is the externally visible JSON path the UI page points
/// at; it differs from the route path when this router is nested.
pub fn router(prefix: &str, public_json_url: &str) -> Router {
    let json_path = format!("{prefix}/v1/swagger.json");
    let ui = ui_page(public_json_url);

    Router::new()
        .route(prefix, get(move || async move { Html(ui) }))
        .route(&json_path, get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn ui_page(json_url: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Pessoas.API v1</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {{
      SwaggerUIBundle({{ url: "{json_url}", dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>
"##
    )
}
