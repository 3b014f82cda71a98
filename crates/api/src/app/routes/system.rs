use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::context::{OrganizationContext, PrincipalContext};

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> StatusCode {
    StatusCode::OK
}

#[utoipa::path(
    get,
    path = "/whoami",
    tag = "system",
    responses(
        (status = 200, description = "Identity derived from the bearer token"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn whoami(
    Extension(organization): Extension<OrganizationContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "user_id": principal.user_id(),
        "organization_id": organization.organization_id(),
        "roles": principal.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
}

/// WebSocket upgrade for lightweight realtime checks. Text frames are echoed
/// back; the connection closes when the client does.
pub async fn realtime(
    ws: WebSocketUpgrade,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    tracing::debug!(user_id = %principal.user_id(), "realtime session opened");
    ws.on_upgrade(realtime_session)
}

async fn realtime_session(mut socket: WebSocket) {
    while let Some(Ok(message)) = socket.recv().await {
        match message {
            Message::Text(text) => {
                if socket.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}
