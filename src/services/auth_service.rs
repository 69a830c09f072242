use crate::models::{NewUserRow, UserRecord, UserStatus};
use crate::services::provider::AppState;
use crate::utils::error::AppError;
use crate::utils::validation::{validate_password_strength, validate_phone};
use serde::{Deserialize, Serialize};
use validator::Validate;

const REGISTER_PROJECTION: &[&str] = &["id", "name", "email"];
const LOGIN_PROJECTION: &[&str] = &["id", "email", "name"];

// Request/Response structures
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,
    #[validate(
        length(min = 8, message = "A senha deve ter no mínimo 8 caracteres"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    pub name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(email(message = "E-mail inválido"))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres"))]
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserRecord,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: UserRecord,
}

/// Cadastro: conta no provedor de identidade e depois a linha de perfil.
/// Não é transacional: se o insert falhar, a conta fica sem perfil.
pub async fn register(state: &AppState, request: RegisterRequest) -> Result<RegisterResponse, AppError> {
    let identity = state
        .identity
        .sign_up(&request.email, &request.password)
        .await?
        .ok_or_else(|| AppError::BadRequest("Falha ao cadastrar usuário".to_string()))?;

    if identity.id.is_empty() {
        return Err(AppError::BadRequest("Falha ao obter ID do usuário".to_string()));
    }

    let row = NewUserRow {
        id: identity.id.clone(),
        name: request.name,
        email: request.email,
        phone: request.phone,
        status: UserStatus::Active,
    };
    state.users.insert(&row).await?;

    let user = state
        .users
        .select_one("id", &identity.id, REGISTER_PROJECTION)
        .await?;

    Ok(RegisterResponse {
        message: "Usuário cadastrado com sucesso".to_string(),
        user,
    })
}

/// Login por senha. Os tokens da sessão são repassados sem inspeção.
pub async fn login(state: &AppState, request: LoginRequest) -> Result<LoginResponse, AppError> {
    let session = state
        .identity
        .sign_in_with_password(&request.email, &request.password)
        .await?
        .ok_or_else(|| AppError::BadRequest("Login falhou: sessão não retornada".to_string()))?;

    let user = state
        .users
        .select_one("email", &request.email, LOGIN_PROJECTION)
        .await?;

    Ok(LoginResponse {
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        user,
    })
}
