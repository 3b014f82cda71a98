use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use pessoas_infra::StoreError;

/// Per-environment error rendering. Local includes the failure detail
/// (developer diagnostics); deployed responses stay generic.
#[derive(Debug, Copy, Clone)]
pub struct ErrorOptions {
    pub include_detail: bool,
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn store_error_to_response(err: StoreError, opts: ErrorOptions) -> axum::response::Response {
    tracing::error!(error = %err, "user store failure");

    if opts.include_detail {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({
                "error": "store_error",
                "message": "user store failure",
                "detail": err.to_string(),
            })),
        )
            .into_response()
    } else {
        json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            "internal error",
        )
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    fn corrupt() -> StoreError {
        StoreError::Corrupt {
            id: 1,
            reason: "unknown role \"pirate\"".into(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn local_responses_carry_detail() {
        let response = store_error_to_response(corrupt(), ErrorOptions { include_detail: true });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["detail"].as_str().unwrap().contains("pirate"));
    }

    #[tokio::test]
    async fn deployed_responses_stay_generic() {
        let response = store_error_to_response(corrupt(), ErrorOptions { include_detail: false });
        let body = body_json(response).await;
        assert!(body.get("detail").is_none());
        assert_eq!(body["message"], "internal error");
    }
}
