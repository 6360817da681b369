//! Bearer-token authentication for the change request routes.
//!
//! `auth_middleware` resolves the token through the `SessionValidator` port
//! and stores the resulting `AuthenticatedUser` in request extensions.
//! Handlers that need an actor take `RequireAuth`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

pub type AuthState = Arc<dyn SessionValidator>;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn error_body(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "code": code, "message": message }))).into_response()
}

fn reject(error: &AuthError) -> Response {
    if error.is_transient() {
        tracing::error!(error = %error, "session validator unavailable");
        return error_body(
            StatusCode::SERVICE_UNAVAILABLE,
            "AUTH_UNAVAILABLE",
            "Authentication service unavailable",
        );
    }
    tracing::debug!(error = %error, "bearer token rejected");
    error_body(StatusCode::UNAUTHORIZED, "AUTH_ERROR", &error.to_string())
}

/// Resolves `Authorization: Bearer <token>`.
///
/// Requests without a bearer token continue anonymously. A token the
/// validator rejects ends the request with 401, or 503 when the validator
/// itself is down.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()).map(str::to_owned) else {
        return next.run(request).await;
    };

    match validator.validate(&token).await {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, role = %user.role, "request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(error) => reject(&error),
    }
}

/// The acting user; anonymous requests are turned away with 401.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthenticatedUser>() {
            Some(user) => Ok(RequireAuth(user.clone())),
            None => Err(AuthRejection),
        }
    }
}

/// No authenticated user on the request.
#[derive(Debug, Clone, Copy)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        error_body(
            StatusCode::UNAUTHORIZED,
            "UNAUTHENTICATED",
            "Authentication required",
        )
    }
}
