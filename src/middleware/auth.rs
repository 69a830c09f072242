use crate::models::AuthenticatedIdentity;
use crate::services::provider::{AppState, IdentityProvider};
use crate::utils::error::AppError;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

pub const BEARER_PREFIX: &str = "Bearer ";
pub const TOKEN_MISSING: &str = "Token não fornecido";
pub const TOKEN_INVALID: &str = "Token inválido";

/// Resolve a identidade do chamador a partir do header `Authorization`.
///
/// Header ausente ou sem o prefixo literal `"Bearer "` falha com "Token não fornecido";
/// token que o provedor não reconhece (ou erro do provedor) falha com "Token inválido".
pub async fn resolve_bearer(
    provider: &dyn IdentityProvider,
    header: Option<&str>,
) -> Result<AuthenticatedIdentity, AppError> {
    let token = header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| AppError::Unauthenticated(TOKEN_MISSING.to_string()))?;

    match provider.verify_token(token).await {
        Ok(Some(identity)) if !identity.id.is_empty() => Ok(identity),
        Ok(_) => Err(AppError::Unauthenticated(TOKEN_INVALID.to_string())),
        Err(e) => {
            log::warn!("❌ Token verification failed: {}", e);
            Err(AppError::Unauthenticated(TOKEN_INVALID.to_string()))
        }
    }
}

/// Exige bearer token válido e deixa a `AuthenticatedIdentity` nas extensions da requisição
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let state = match req.app_data::<web::Data<AppState>>().cloned() {
                Some(state) => state,
                None => {
                    let err = AppError::ProviderUnavailable(
                        "Provedor de identidade não configurado".to_string(),
                    );
                    return Ok(req.error_response(err).map_into_right_body());
                }
            };

            // Header não-UTF8 conta como ausente
            let header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            // Falha vira resposta pronta, sem chegar ao handler
            let identity = match resolve_bearer(state.identity.as_ref(), header.as_deref()).await {
                Ok(identity) => identity,
                Err(err) => return Ok(req.error_response(err).map_into_right_body()),
            };
            log::debug!("🔑 Authenticated caller: {}", identity.id);

            req.extensions_mut().insert(identity);
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}
