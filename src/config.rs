use crate::utils::error::AppError;
use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub supabase_url: String,
    pub anon_key: String,
    /// Sem esta chave as operações de tabela usam a chave anônima
    pub service_role_key: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let (supabase_url, anon_key) = match (non_empty("SUPABASE_URL"), non_empty("SUPABASE_ANON_KEY")) {
            (Some(url), Some(key)) => (url, key),
            _ => {
                return Err(AppError::ProviderUnavailable(
                    "SUPABASE_URL e SUPABASE_ANON_KEY são obrigatórios no .env".to_string(),
                ))
            }
        };

        let port = match non_empty("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("⚠️ Invalid PORT '{}', using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            supabase_url,
            anon_key,
            service_role_key: non_empty("SUPABASE_SERVICE_ROLE_KEY"),
        })
    }
}
