//! Auth Middleware
//!
//! Two stages composed in front of protected routes:
//!
//! 1. [`require_auth`] reads `Authorization: Bearer <token>`, validates it
//!    and binds an [`Identity`] into the request extensions.
//! 2. [`require_permission`] (attached per route with [`gate`]) checks the
//!    bound role against the route's permission list.
//!
//! `require_auth` is applied as an outer `route_layer`, so the permission
//! stage never runs before an identity is bound.

use axum::body::Body;
use axum::extract::{ConnectInfo, FromRequestParts, OptionalFromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use axum::routing::MethodRouter;
use platform::client::{ClientInfo, extract_client_info};
use platform::token::{Claims, TokenService};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::domain::value_object::permission::{Permission, has_any};
use crate::error::{AuthError, AuthResult};

/// Verified caller, bound by [`require_auth`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub user_name: String,
    pub role: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            user_name: claims.user_name,
            role: claims.role,
        }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

impl<S> OptionalFromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned())
    }
}

/// Caller IP and User-Agent
///
/// The socket address is only present when the server was started with
/// connect info; without it the IP comes from proxy headers or stays empty.
#[derive(Debug, Clone)]
pub struct ClientMeta(pub ClientInfo);

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        Ok(Self(extract_client_info(&parts.headers, direct_ip)))
    }
}

/// Middleware that requires a valid bearer token
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = {
        let token = bearer_token(req.headers())?;
        tokens.validate(token)?
    };

    req.extensions_mut().insert(Identity::from(claims));

    Ok(next.run(req).await)
}

/// Required permissions of one route; any one of them is enough
#[derive(Debug, Clone, Copy)]
pub struct PermissionGuard {
    pub required: &'static [Permission],
}

/// Middleware that checks the bound role against a [`PermissionGuard`]
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .ok_or(AuthError::Forbidden)?;

    if !has_any(&identity.role, guard.required) {
        tracing::debug!(
            user_id = identity.user_id,
            role = %identity.role,
            required = ?guard.required,
            "Role lacks required permission"
        );
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}

/// Attach a permission check to a method router
///
/// ```ignore
/// .route("/users", gate(post(create_user), &[Permission::UserManage]))
/// ```
pub fn gate<S>(route: MethodRouter<S>, required: &'static [Permission]) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(from_fn_with_state(
        PermissionGuard { required },
        require_permission,
    ))
}

/// Split `Bearer <token>`; the header must have exactly these two parts
fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedAuthorization)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedAuthorization),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn test_bearer_token_missing() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_bearer_token_malformed() {
        for value in ["Bearer", "Basic abc", "bearer abc", "Bearer a b", "Bearer ", "abc"] {
            assert!(
                matches!(
                    bearer_token(&headers(value)),
                    Err(AuthError::MalformedAuthorization)
                ),
                "{value:?} should be rejected"
            );
        }
    }
}
