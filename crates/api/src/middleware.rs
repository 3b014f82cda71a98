//! Request middleware: bearer-token authentication and per-IP rate limiting.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use pessoas_auth::JwtValidator;
use pessoas_infra::settings::RateLimitSettings;

use crate::context::{OrganizationContext, PrincipalContext};

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .jwt
        .validate(token, Utc::now())
        .map_err(|_e| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut()
        .insert(OrganizationContext::new(claims.organization_id));
    req.extensions_mut()
        .insert(PrincipalContext::new(claims.sub, claims.roles.clone()));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window request counter, keyed by client IP.
///
/// In-process only; a deployment that needs a shared limiter puts one in
/// front of the service instead.
#[derive(Clone)]
pub struct RateLimitState {
    settings: RateLimitSettings,
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

impl RateLimitState {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            settings,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Count a request from `ip` at `now`. On rejection, returns the seconds
    /// until the current window resets.
    fn check(&self, ip: IpAddr, now: Instant) -> Result<(), u64> {
        let window_len = Duration::from_secs(self.settings.window_seconds);
        let mut windows = self.windows.lock().expect("rate limit mutex poisoned");

        let window = windows.entry(ip).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(window.started_at) >= window_len {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= self.settings.max_requests {
            let elapsed = now.duration_since(window.started_at);
            let retry_after = window_len.saturating_sub(elapsed).as_secs().max(1);
            return Err(retry_after);
        }

        window.count += 1;
        Ok(())
    }
}

pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    // Served with `into_make_service_with_connect_info`; a missing peer
    // address (e.g. router driven directly in tests) shares one bucket.
    let ip = req
        .extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::from([0, 0, 0, 0]));

    match state.check(ip, Instant::now()) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "rate_limited",
                    "message": "request quota exceeded, slow down",
                })),
            )
                .into_response();
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert("retry-after", value);
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(window_seconds: u64, max_requests: u32) -> RateLimitState {
        RateLimitState::new(RateLimitSettings {
            window_seconds,
            max_requests,
        })
    }

    #[test]
    fn allows_up_to_quota_then_rejects() {
        let state = state(60, 3);
        let ip = IpAddr::from([127, 0, 0, 1]);
        let now = Instant::now();

        for _ in 0..3 {
            assert!(state.check(ip, now).is_ok());
        }
        let retry_after = state.check(ip, now).unwrap_err();
        assert!(retry_after >= 1);
    }

    #[test]
    fn quota_resets_after_window() {
        let state = state(1, 1);
        let ip = IpAddr::from([127, 0, 0, 1]);
        let start = Instant::now();

        assert!(state.check(ip, start).is_ok());
        assert!(state.check(ip, start).is_err());

        let later = start + Duration::from_secs(2);
        assert!(state.check(ip, later).is_ok());
    }

    #[test]
    fn clients_are_counted_independently() {
        let state = state(60, 1);
        let now = Instant::now();

        assert!(state.check(IpAddr::from([10, 0, 0, 1]), now).is_ok());
        assert!(state.check(IpAddr::from([10, 0, 0, 2]), now).is_ok());
        assert!(state.check(IpAddr::from([10, 0, 0, 1]), now).is_err());
    }
}
