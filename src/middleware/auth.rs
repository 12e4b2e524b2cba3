use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::services::{FirebaseClaims, TokenVerifier};

/// Which callers a protected route admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Any holder of a valid ID token
    Authenticated,
    Admin,
    Engineer,
}

impl Gate {
    fn admits(&self, claims: &FirebaseClaims) -> bool {
        match self {
            Gate::Authenticated => true,
            Gate::Admin => claims.admin,
            Gate::Engineer => claims.engineer,
        }
    }
}

/// Verifies `Authorization: Bearer <ID token>` and stores the claims in the
/// request extensions for `web::ReqData<FirebaseClaims>`.
pub struct AuthMiddleware {
    gate: Gate,
}

impl AuthMiddleware {
    pub fn authenticated() -> Self {
        Self { gate: Gate::Authenticated }
    }

    pub fn admin() -> Self {
        Self { gate: Gate::Admin }
    }

    pub fn engineer() -> Self {
        Self { gate: Gate::Engineer }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            gate: self.gate,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    gate: Gate,
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = self.gate;

        Box::pin(async move {
            let Some(token) = bearer_token(&req) else {
                return Err(actix_web::error::ErrorUnauthorized("Missing authorization token"));
            };

            let Some(verifier) = req.app_data::<web::Data<dyn TokenVerifier>>().cloned() else {
                log::error!("❌ No token verifier registered");
                return Err(actix_web::error::ErrorInternalServerError("Authentication unavailable"));
            };

            let claims = match verifier.verify(&token).await {
                Ok(claims) => claims,
                Err(e) => {
                    log::warn!("🔒 {} {} rejected: {}", req.method(), req.path(), e);
                    return Err(actix_web::error::ErrorUnauthorized("Invalid token"));
                }
            };

            if !gate.admits(&claims) {
                log::warn!("🔒 {} lacks {:?} access to {}", claims.uid(), gate, req.path());
                return Err(actix_web::error::ErrorUnauthorized("Insufficient permissions"));
            }

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
