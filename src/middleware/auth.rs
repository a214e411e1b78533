//! Bearer-token authorization guard.
//!
//! The guard is expressed as extractors so that every handler states its
//! access rule in its signature:
//!
//! - [`Authorized<P>`] rejects unless the caller holds a role allowed by `P`.
//! - [`MaybeAuthenticated`] never rejects; an absent or bad token means anonymous.
//!
//! On success the verified identity is also stored in the request extensions.

use std::marker::PhantomData;
use std::ops::Deref;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::auth::{TokenError, TokenService};
use crate::domain::Role;

/// Identity attached to a request once its token has been verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingHeader,
    MalformedHeader,
    InvalidToken,
    ExpiredToken,
    InsufficientRole,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingHeader => (StatusCode::UNAUTHORIZED, "Missing Authorization header"),
            AuthError::MalformedHeader => {
                (StatusCode::UNAUTHORIZED, "Authorization header must be 'Bearer <token>'")
            }
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::ExpiredToken => (StatusCode::UNAUTHORIZED, "Expired token"),
            AuthError::InsufficientRole => (StatusCode::FORBIDDEN, "Insufficient permissions"),
        };

        tracing::warn!("Authorization failed: {:?}", self);
        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

/// Extracts the token from `Authorization: Bearer <token>`. Any other shape is malformed.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

pub fn authenticate(tokens: &TokenService, headers: &HeaderMap) -> Result<CurrentUser, AuthError> {
    let token = bearer_token(headers)?;
    let claims = tokens.verify(token).map_err(|e| match e {
        TokenError::Expired => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    Ok(CurrentUser {
        user_id: claims.id,
        role: claims.role,
    })
}

pub fn authorize(user: CurrentUser, allowed: &[Role]) -> Result<CurrentUser, AuthError> {
    if allowed.contains(&user.role) {
        Ok(user)
    } else {
        Err(AuthError::InsufficientRole)
    }
}

/// The set of roles admitted by an [`Authorized`] extractor.
pub trait RolePolicy: Send + Sync + 'static {
    const ALLOWED: &'static [Role];
}

/// Admins only.
pub struct AdminOnly;

impl RolePolicy for AdminOnly {
    const ALLOWED: &'static [Role] = Role::ADMINS;
}

/// Editors and admins.
pub struct EditorOrAdmin;

impl RolePolicy for EditorOrAdmin {
    const ALLOWED: &'static [Role] = Role::EDITORS;
}

/// Any signed-in user.
pub struct AnyRole;

impl RolePolicy for AnyRole {
    const ALLOWED: &'static [Role] = Role::ALL;
}

pub struct Authorized<P: RolePolicy> {
    pub user: CurrentUser,
    _policy: PhantomData<P>,
}

impl<P: RolePolicy> Deref for Authorized<P> {
    type Target = CurrentUser;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

#[async_trait]
impl<S, P> FromRequestParts<S> for Authorized<P>
where
    S: Send + Sync,
    TokenService: FromRef<S>,
    P: RolePolicy,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = TokenService::from_ref(state);
        let user = authorize(authenticate(&tokens, &parts.headers)?, P::ALLOWED)?;
        parts.extensions.insert(user);

        Ok(Authorized {
            user,
            _policy: PhantomData,
        })
    }
}

/// Optional authentication for reads whose visibility depends on the caller.
pub struct MaybeAuthenticated(pub Option<CurrentUser>);

impl MaybeAuthenticated {
    pub fn role(&self) -> Option<Role> {
        self.0.map(|user| user.role)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthenticated
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = TokenService::from_ref(state);
        match authenticate(&tokens, &parts.headers) {
            Ok(user) => {
                parts.extensions.insert(user);
                Ok(MaybeAuthenticated(Some(user)))
            }
            Err(AuthError::MissingHeader) => Ok(MaybeAuthenticated(None)),
            Err(e) => {
                tracing::debug!("Treating caller as anonymous: {:?}", e);
                Ok(MaybeAuthenticated(None))
            }
        }
    }
}
