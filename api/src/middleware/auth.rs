//! JWT authentication middleware for protected endpoints.
//!
//! Extracts the `Authorization: Bearer` token, verifies it through the
//! [`TokenCodec`], and injects an [`AuthContext`] into request extensions;
//! handlers receive it through the [`FromRequest`] extractor. A guard built
//! with [`JwtAuth::require`] additionally checks the caller's roles against
//! the role hierarchy before letting the request through.

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use hg_core::domain::entities::subject::Role;
use hg_core::domain::entities::token::Claims;
use hg_core::services::TokenCodec;

use crate::handlers::error::ApiError;

/// Authenticated caller, built from verified access-token claims.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    /// Normalized phone number, the `sub` claim of access tokens
    pub phone: String,
    pub roles: Vec<Role>,
    /// Token version embedded at issuance
    pub token_version: i64,
    /// Token id, kept for audit correlation
    pub jti: String,
}

impl AuthContext {
    /// Build from claims the codec has already verified.
    ///
    /// Unknown role names are skipped rather than rejected; a token signed
    /// before a role was retired should still authenticate.
    pub fn from_claims(claims: &Claims) -> Self {
        let roles = claims
            .roles
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|name| Role::parse(name))
            .collect();
        Self {
            user_id: claims.uid,
            phone: claims.sub.clone(),
            roles,
            token_version: claims.ver,
            jti: claims.jti.clone(),
        }
    }

    /// Whether any held role satisfies `required`
    pub fn has_role(&self, required: Role) -> bool {
        self.roles.iter().any(|role| role.implies(required))
    }
}

/// JWT authentication middleware factory.
pub struct JwtAuth {
    codec: Arc<TokenCodec>,
    required_role: Option<Role>,
}

impl JwtAuth {
    /// Guard that only requires a valid access token.
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self {
            codec,
            required_role: None,
        }
    }

    /// Guard that additionally requires `role` or one that implies it.
    pub fn require(codec: Arc<TokenCodec>, role: Role) -> Self {
        Self {
            codec,
            required_role: Some(role),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            codec: self.codec.clone(),
            required_role: self.required_role,
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    codec: Arc<TokenCodec>,
    required_role: Option<Role>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let codec = self.codec.clone();
        let required_role = self.required_role;

        Box::pin(async move {
            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => return Err(ApiError::unauthorized().into()),
            };

            let claims = match codec.verify_access(&token) {
                Ok(claims) => claims,
                Err(error) => {
                    log::debug!("Access token rejected: {}", error);
                    return Err(ApiError::from(error).into());
                }
            };

            let context = AuthContext::from_claims(&claims);
            if let Some(required) = required_role {
                if !context.has_role(required) {
                    log::warn!(
                        "User {} denied access to {}: requires {:?}",
                        context.user_id,
                        req.path(),
                        required
                    );
                    return Err(ApiError::forbidden().into());
                }
            }

            req.extensions_mut().insert(context);
            service.call(req).await
        })
    }
}

/// Extracts the Bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized().into());
        ready(result)
    }
}
