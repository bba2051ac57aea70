//! Session guard for the seller and order pages.
//!
//! One session lookup per request, never cached. A request without a live
//! session is redirected to the login page with the path it asked for, so
//! the login flow can send the user back afterwards.

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use url::form_urlencoded;

pub const LOGIN_PATH: &str = "/auth";

/// Let the request through with the `SessionUser` in its extensions, or
/// answer with a redirect to the login page.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let user = match session_token(request.headers(), &state.session_cookie) {
        Some(token) => match state.sessions.find_user(&token).await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!("session lookup failed for {}: {}", path, err);
                None
            }
        },
        None => None,
    };

    match user {
        Some(user) => {
            tracing::debug!("session user {} -> {}", user.id, path);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            tracing::debug!("no session for {}, redirecting to login", path);
            login_redirect(&path).into_response()
        }
    }
}

/// `/auth?redirect=<path>` with the path form-encoded.
pub fn login_redirect(path: &str) -> Redirect {
    let encoded: String = form_urlencoded::byte_serialize(path.as_bytes()).collect();
    Redirect::temporary(&format!("{}?redirect={}", LOGIN_PATH, encoded))
}

/// Pull the session token out of the `Cookie` headers.
///
/// Signed cookie values look like `<token>.<signature>`; only the token part
/// is looked up.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.split('.').next().unwrap_or(value).trim_matches('"'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    const COOKIE: &str = "better-auth.session_token";

    #[test]
    fn finds_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; better-auth.session_token=abc123.sig%3D; x=1"),
        );
        assert_eq!(session_token(&headers, COOKIE), Some("abc123".into()));
    }

    #[test]
    fn missing_or_empty_cookie_yields_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers, COOKIE), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("better-auth.session_token="),
        );
        assert_eq!(session_token(&headers, COOKIE), None);
    }

    #[test]
    fn redirect_carries_original_path() {
        let response = login_redirect("/seller/listings").into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/auth?redirect=%2Fseller%2Flistings"
        );
    }
}
