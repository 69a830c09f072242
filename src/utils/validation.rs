use crate::models::UserStatus;
use crate::utils::error::{AppError, FieldViolation};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

lazy_static! {
    // E.164 básico, "+" opcional
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[1-9]\d{7,14}$").expect("phone pattern");
    static ref LOWERCASE_RE: Regex = Regex::new(r"[a-z]").expect("lowercase pattern");
    static ref UPPERCASE_RE: Regex = Regex::new(r"[A-Z]").expect("uppercase pattern");
    static ref DIGIT_RE: Regex = Regex::new(r"\d").expect("digit pattern");
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Senha de cadastro: ao menos uma minúscula, uma maiúscula e um dígito.
/// O tamanho mínimo fica no atributo `length` do DTO.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if LOWERCASE_RE.is_match(password)
        && UPPERCASE_RE.is_match(password)
        && DIGIT_RE.is_match(password)
    {
        Ok(())
    } else {
        Err(violation(
            "password_strength",
            "A senha deve conter ao menos uma letra minúscula, uma maiúscula e um dígito",
        ))
    }
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(violation("phone", "Telefone inválido: use o formato E.164 (ex: +5511999999999)"))
    }
}

pub fn validate_status(status: &str) -> Result<(), ValidationError> {
    status
        .parse::<UserStatus>()
        .map(|_| ())
        .map_err(|_| violation("status", "Status deve ser active, inactive ou blocked"))
}

/// Achata os erros do `validator` em pares (campo, mensagem), ordenados por campo
pub fn field_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                FieldViolation::new(field.clone(), message)
            })
        })
        .collect();
    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

/// Converte o corpo bruto da requisição no DTO e aplica as regras declaradas nele.
/// JSON malformado vira uma única violação no campo `body`.
pub fn parse_body<T>(body: &[u8], path: &str) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_slice(body).map_err(|e| AppError::Validation {
        path: path.to_string(),
        errors: vec![FieldViolation::new("body", e.to_string())],
    })?;

    value.validate().map_err(|e| AppError::Validation {
        path: path.to_string(),
        errors: field_violations(&e),
    })?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("Senha123").is_ok());
        // sem dígito e sem maiúscula
        assert!(validate_password_strength("abcdefg").is_err());
        // sem maiúscula
        assert!(validate_password_strength("senha123").is_err());
        assert!(validate_password_strength("SENHA123").is_err());
    }

    #[test]
    fn test_phone_pattern() {
        assert!(validate_phone("+5511999999999").is_ok());
        assert!(validate_phone("5511999999999").is_ok());
        assert!(validate_phone("1199-999-999").is_err());
        assert!(validate_phone("+0511999999999").is_err());
        // 7 dígitos após o primeiro é o mínimo
        assert!(validate_phone("12345678").is_ok());
        assert!(validate_phone("1234567").is_err());
        assert!(validate_phone("+1234567890123456").is_err());
    }

    #[test]
    fn test_status_enum() {
        for status in ["active", "inactive", "blocked"] {
            assert!(validate_status(status).is_ok());
        }
        assert!(validate_status("ACTIVE").is_err());
        assert!(validate_status("").is_err());
    }

    #[test]
    fn test_violation_carries_message() {
        let err = validate_phone("abc").unwrap_err();
        assert_eq!(err.code, "phone");
        assert!(err.message.unwrap().contains("E.164"));
    }
}
