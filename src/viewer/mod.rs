//! Viewer Identity Module
//!
//! Carries the optional authenticated caller identity through a request.
//!
//! Identity is resolved once at extraction time and then passed explicitly
//! into whatever needs it - the ranking engine, permission checks - rather
//! than read from ambient request state. Token issuance and verification
//! live outside this crate; `SessionResolver` is the seam they plug into.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use dashmap::DashMap;

use crate::store::types::UserId;

/// Optional authenticated caller identity. Lifetime is one request.
///
/// Absence means "anonymous" and is never an error; handlers that require
/// identity reject on their own terms.
#[derive(Debug, Clone, Default)]
pub struct ViewerContext {
    user: Option<UserId>,
}

impl ViewerContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }
}

/// Resolves a bearer credential to a user id.
pub trait SessionResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Option<UserId>;
}

/// Plain token table for local runs and tests. A deployment substitutes a
/// real verifier behind the same trait.
#[derive(Default)]
pub struct TokenTable {
    tokens: DashMap<String, UserId>,
}

impl TokenTable {
    pub fn grant(&self, token: &str, user: UserId) {
        self.tokens.insert(token.to_string(), user);
    }
}

impl SessionResolver for TokenTable {
    fn resolve(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).map(|entry| entry.value().clone())
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for ViewerContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let resolver = parts.extensions.get::<Arc<dyn SessionResolver>>();
        let user = resolver.and_then(|resolver| {
            parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(bearer_token)
                .and_then(|token| resolver.resolve(token))
        });
        Ok(Self { user })
    }
}
