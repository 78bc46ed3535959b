//! Opaque session middleware.
//!
//! Visitors without a valid signed cookie get a fresh session and a
//! `Set-Cookie` header. Session failures never fail the request.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tagboard_core::constants::SESSION_COOKIE_NAME;

/// Id of the session attached to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

/// Find cookie `name` across every `Cookie` header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn session_cookie(signed: &str) -> String {
    format!("{SESSION_COOKIE_NAME}={signed}; Path=/; HttpOnly; SameSite=Lax")
}

/// Attach a [`SessionId`] to every request, issuing a session when needed.
pub async fn track_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(sessions) = state.sessions.as_ref() else {
        return next.run(request).await;
    };

    let presented = cookie_value(request.headers(), SESSION_COOKIE_NAME)
        .and_then(|value| sessions.signer.verify(&value));
    let known = match presented {
        Some(id) => match sessions.store.get(&id) {
            Ok(found) => found.map(|session| session.id),
            Err(err) => {
                tracing::warn!("Failed to load session {}: {}", id, err);
                None
            }
        },
        None => None,
    };

    if let Some(id) = known {
        request.extensions_mut().insert(SessionId(id));
        return next.run(request).await;
    }

    let session = match sessions.store.create() {
        Ok(session) => session,
        Err(err) => {
            tracing::error!("Failed to create session: {}", err);
            return next.run(request).await;
        }
    };
    let cookie = session_cookie(&sessions.signer.sign(&session.id));
    request
        .extensions_mut()
        .insert(SessionId(session.id.clone()));

    let mut response = next.run(request).await;
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(err) => tracing::error!("Invalid session cookie header: {}", err),
    }
    response
}
