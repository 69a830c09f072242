use actix_web::{web, HttpRequest, HttpResponse};
use crate::services::auth_service::{self, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::services::provider::AppState;
use crate::utils::error::{AppError, ErrorDetail, ValidationErrorResponse};
use crate::utils::validation::parse_body;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Provider rejected the registration", body = ErrorDetail),
        (status = 422, description = "Validation error", body = ValidationErrorResponse)
    )
)]
pub async fn register(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request: RegisterRequest = parse_body(&body, req.path())?;
    let email = request.email.clone();
    log::info!("📝 POST /auth/register - email: {}", email);

    match auth_service::register(&state, request).await {
        Ok(response) => {
            log::info!("✅ Registration successful: {} ({})", email, response.user.id);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials or unconfirmed account", body = ErrorDetail),
        (status = 422, description = "Validation error", body = ValidationErrorResponse)
    )
)]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request: LoginRequest = parse_body(&body, req.path())?;
    let email = request.email.clone();
    log::info!("🔐 POST /auth/login - email: {}", email);

    match auth_service::login(&state, request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", email);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            Err(e)
        }
    }
}
