use crate::models::{AuthenticatedIdentity, UserPatch, UserRecord, UserStatus};
use crate::services::provider::AppState;
use crate::utils::error::AppError;
use crate::utils::validation::{validate_phone, validate_status};
use serde::{Deserialize, Serialize};
use validator::Validate;

const UPDATE_PROJECTION: &[&str] = &["id", "name", "email", "phone", "status", "updated_at"];
const ME_PROJECTION: &[&str] = &[
    "id",
    "name",
    "email",
    "phone",
    "status",
    "created_at",
    "updated_at",
    "role",
];
const ROLE_PROJECTION: &[&str] = &["id", "role"];
const STATUS_PROJECTION: &[&str] = &["id", "status"];

/// Atualização parcial: campos ausentes (ou `null`) não são validados nem enviados
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    pub name: Option<String>,
    #[validate(email(message = "E-mail inválido"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            name: self.name,
            email: self.email,
            phone: self.phone,
            status: None,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
#[serde(default)]
pub struct StatusPatchRequest {
    #[validate(custom(function = "validate_status"))]
    pub status: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserMessageResponse {
    pub message: String,
    pub user: UserRecord,
}

/// Só o próprio usuário altera o seu registro; não há exceção para admin
pub fn ensure_owner(caller: &AuthenticatedIdentity, target_id: &str) -> Result<(), AppError> {
    if caller.id.is_empty() || caller.id != target_id {
        return Err(AppError::Forbidden(
            "Você só pode atualizar seus próprios dados".to_string(),
        ));
    }
    Ok(())
}

/// Confere o papel gravado na tabela, não o do token
pub async fn ensure_admin(state: &AppState, caller: &AuthenticatedIdentity) -> Result<(), AppError> {
    let me = state.users.select_one("id", &caller.id, ROLE_PROJECTION).await?;
    if !me.is_admin() {
        log::warn!("⛔ Non-admin {} tried to change a status", caller.id);
        return Err(AppError::Forbidden("Acesso negado: requer role admin".to_string()));
    }
    Ok(())
}

pub async fn update_profile(
    state: &AppState,
    user_id: &str,
    request: UpdateUserRequest,
) -> Result<UserMessageResponse, AppError> {
    let patch = request.into_patch();
    if patch.is_empty() {
        return Err(AppError::BadRequest(
            "É necessário enviar pelo menos um campo para atualizar".to_string(),
        ));
    }

    state.users.update("id", user_id, &patch).await?;
    let user = state.users.select_one("id", user_id, UPDATE_PROJECTION).await?;

    Ok(UserMessageResponse {
        message: "Usuário atualizado com sucesso".to_string(),
        user,
    })
}

pub async fn get_self(state: &AppState, caller: &AuthenticatedIdentity) -> Result<UserRecord, AppError> {
    Ok(state.users.select_one("id", &caller.id, ME_PROJECTION).await?)
}

/// Altera o status do usuário alvo (id do path, não o do chamador).
/// A checagem de admin é feita antes, em `ensure_admin`.
pub async fn patch_status(
    state: &AppState,
    target_id: &str,
    status: UserStatus,
) -> Result<UserMessageResponse, AppError> {
    state
        .users
        .update("id", target_id, &UserPatch::status(status))
        .await?;
    let user = state.users.select_one("id", target_id, STATUS_PROJECTION).await?;

    Ok(UserMessageResponse {
        message: "Status atualizado com sucesso".to_string(),
        user,
    })
}
