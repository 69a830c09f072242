use actix_web::{web, HttpRequest, HttpResponse};
use crate::models::{AuthenticatedIdentity, UserRecord, UserStatus};
use crate::services::provider::AppState;
use crate::services::user_service::{self, StatusPatchRequest, UpdateUserRequest, UserMessageResponse};
use crate::utils::error::{AppError, ErrorDetail, ValidationErrorResponse};
use crate::utils::validation::parse_body;

// O corpo é lido como bytes e validado só depois das checagens de acesso,
// para que 403 não dependa do conteúdo enviado.

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id (must be the caller's own id)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserMessageResponse),
        (status = 400, description = "Empty update or provider error", body = ErrorDetail),
        (status = 401, description = "Missing or invalid token", body = ErrorDetail),
        (status = 403, description = "Caller is not the target user", body = ErrorDetail),
        (status = 422, description = "Validation error", body = ValidationErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user(
    req: HttpRequest,
    state: web::Data<AppState>,
    caller: web::ReqData<AuthenticatedIdentity>,
    id: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    log::info!("✏️ PUT /users/{} - caller: {}", id, caller.id);

    user_service::ensure_owner(&caller, &id)?;
    let request: UpdateUserRequest = parse_body(&body, req.path())?;

    match user_service::update_profile(&state, &id, request).await {
        Ok(response) => {
            log::info!("✅ User updated: {}", id);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Update failed for {}: {}", id, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Caller's own record", body = UserRecord),
        (status = 400, description = "Profile row not found", body = ErrorDetail),
        (status = 401, description = "Missing or invalid token", body = ErrorDetail)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    state: web::Data<AppState>,
    caller: web::ReqData<AuthenticatedIdentity>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /users/me - caller: {}", caller.id);

    let user = user_service::get_self(&state, &caller).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    patch,
    path = "/users/{id}/status",
    tag = "Users",
    params(("id" = String, Path, description = "Target user id")),
    request_body = StatusPatchRequest,
    responses(
        (status = 200, description = "Status updated", body = UserMessageResponse),
        (status = 400, description = "Provider error", body = ErrorDetail),
        (status = 401, description = "Missing or invalid token", body = ErrorDetail),
        (status = 403, description = "Caller is not admin", body = ErrorDetail),
        (status = 422, description = "Validation error", body = ValidationErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn patch_status(
    req: HttpRequest,
    state: web::Data<AppState>,
    caller: web::ReqData<AuthenticatedIdentity>,
    id: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();
    log::info!("🛡️ PATCH /users/{}/status - caller: {}", id, caller.id);

    user_service::ensure_admin(&state, &caller).await?;
    let request: StatusPatchRequest = parse_body(&body, req.path())?;
    let status: UserStatus = request
        .status
        .parse()
        .map_err(AppError::BadRequest)?;

    match user_service::patch_status(&state, &id, status).await {
        Ok(response) => {
            log::info!("✅ Status of {} set to {} by {}", id, status, caller.id);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Status update failed for {}: {}", id, e);
            Err(e)
        }
    }
}
