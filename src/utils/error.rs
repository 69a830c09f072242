use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Validation error";

/// Falha vinda do provedor externo. `Display` repassa a mensagem original, sem prefixo.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Data(String),
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error on {path}")]
    Validation {
        path: String,
        errors: Vec<FieldViolation>,
    },
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    ProviderUnavailable(String),
}

// Qualquer erro do provedor aborta a requisição como 400, com a mensagem repassada
impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ValidationErrorResponse {
    pub message: String,
    pub errors: Vec<FieldViolation>,
    pub path: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation { path, errors } => {
                HttpResponse::build(self.status_code()).json(ValidationErrorResponse {
                    message: VALIDATION_MESSAGE.to_string(),
                    errors: errors.clone(),
                    path: path.clone(),
                })
            }
            other => HttpResponse::build(self.status_code()).json(ErrorDetail {
                detail: other.to_string(),
            }),
        }
    }
}
