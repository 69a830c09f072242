use crate::models::{AuthenticatedIdentity, NewUserRow, Session, UserPatch, UserRecord, USERS_TABLE};
use crate::services::provider::{IdentityProvider, TableStore};
use crate::utils::error::ProviderError;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

// PostgREST responde 406 se a consulta não casar exatamente uma linha
const SINGLE_OBJECT_ACCEPT: &str = "application/vnd.pgrst.object+json";

/// Cliente HTTP para o Supabase (GoTrue em `/auth/v1`, PostgREST em `/rest/v1`).
/// A mesma struct serve de cliente anônimo ou privilegiado; só muda a chave.
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, endpoint)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, USERS_TABLE)
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Reduz o corpo de erro do provedor à mensagem legível
fn extract_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["msg", "error_description", "message", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    extract_message(status, &body)
}

/// Sem confirmação de e-mail o GoTrue devolve o usuário no topo;
/// com auto-confirmação ele vem aninhado em `user`, junto da sessão.
fn identity_from_signup(body: &Value) -> Option<AuthenticatedIdentity> {
    match body.get("user") {
        Some(user) if user.is_object() => Some(AuthenticatedIdentity::from_user_json(user)),
        _ if body.get("id").is_some() => Some(AuthenticatedIdentity::from_user_json(body)),
        _ => None,
    }
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthenticatedIdentity>, ProviderError> {
        log::debug!("🔐 Supabase signup: {}", email);

        let response = self
            .with_key(self.http.post(self.auth_url("signup")))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Auth(error_message(response).await));
        }

        let body: Value = response.json().await?;
        Ok(identity_from_signup(&body))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Session>, ProviderError> {
        log::debug!("🔐 Supabase password login: {}", email);

        let response = self
            .with_key(self.http.post(self.auth_url("token")))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Auth(error_message(response).await));
        }

        let body: Value = response.json().await?;
        if body.get("access_token").and_then(Value::as_str).is_none() {
            return Ok(None);
        }

        serde_json::from_value(body)
            .map(Some)
            .map_err(|e| ProviderError::Auth(e.to_string()))
    }

    async fn verify_token(&self, token: &str) -> Result<Option<AuthenticatedIdentity>, ProviderError> {
        let response = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                return Ok(None);
            }
            status if !status.is_success() => {
                return Err(ProviderError::Auth(error_message(response).await));
            }
            _ => {}
        }

        let body: Value = response.json().await?;
        if body.get("id").and_then(Value::as_str).is_none() {
            return Ok(None);
        }
        Ok(Some(AuthenticatedIdentity::from_user_json(&body)))
    }
}

#[async_trait]
impl TableStore for SupabaseClient {
    async fn select_one(
        &self,
        column: &str,
        value: &str,
        columns: &[&str],
    ) -> Result<UserRecord, ProviderError> {
        let response = self
            .with_key(self.http.get(self.table_url()))
            .header("Accept", SINGLE_OBJECT_ACCEPT)
            .query(&[
                ("select", columns.join(",")),
                (column, format!("eq.{}", value)),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Data(error_message(response).await));
        }

        response
            .json::<UserRecord>()
            .await
            .map_err(|e| ProviderError::Data(e.to_string()))
    }

    async fn insert(&self, row: &NewUserRow) -> Result<(), ProviderError> {
        let response = self
            .with_key(self.http.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Data(error_message(response).await));
        }
        Ok(())
    }

    async fn update(&self, column: &str, value: &str, patch: &UserPatch) -> Result<(), ProviderError> {
        let response = self
            .with_key(self.http.patch(self.table_url()))
            .header("Prefer", "return=minimal")
            .query(&[(column, format!("eq.{}", value))])
            .json(patch)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Data(error_message(response).await));
        }
        Ok(())
    }
}
