use crate::models::{AuthenticatedIdentity, NewUserRow, Session, UserPatch, UserRecord};
use crate::services::supabase::SupabaseClient;
use crate::utils::error::ProviderError;
use async_trait::async_trait;
use std::sync::Arc;

/// Operações de autenticação delegadas ao provedor externo
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` quando o provedor aceita o cadastro mas não devolve usuário
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthenticatedIdentity>, ProviderError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Session>, ProviderError>;

    /// `Ok(None)` quando o token não corresponde a nenhum usuário
    async fn verify_token(&self, token: &str) -> Result<Option<AuthenticatedIdentity>, ProviderError>;
}

/// Acesso por igualdade de coluna à tabela `users`
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Exatamente uma linha; zero ou várias é erro
    async fn select_one(
        &self,
        column: &str,
        value: &str,
        columns: &[&str],
    ) -> Result<UserRecord, ProviderError>;

    async fn insert(&self, row: &NewUserRow) -> Result<(), ProviderError>;

    async fn update(&self, column: &str, value: &str, patch: &UserPatch) -> Result<(), ProviderError>;
}

/// Clientes do provedor, construídos uma vez no startup e compartilhados entre requisições
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn TableStore>,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityProvider>, users: Arc<dyn TableStore>) -> Self {
        Self { identity, users }
    }

    /// Auth sempre usa o cliente anônimo. A tabela usa o cliente privilegiado quando
    /// existe e cai para o anônimo caso contrário; nesse caso só o RLS do banco e as
    /// checagens dos handlers protegem as escritas.
    pub fn from_clients(anon: Arc<SupabaseClient>, service: Option<Arc<SupabaseClient>>) -> Self {
        let users: Arc<dyn TableStore> = match service {
            Some(service) => service as Arc<dyn TableStore>,
            None => anon.clone() as Arc<dyn TableStore>,
        };
        Self::new(anon, users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserStatus;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn row() -> NewUserRow {
        NewUserRow {
            id: "u-1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+5511999999999".to_string(),
            status: UserStatus::Active,
        }
    }

    async fn mount_insert(server: &MockServer, key: &str, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/rest/v1/users"))
            .and(header("apikey", key))
            .respond_with(ResponseTemplate::new(201))
            .expect(calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_table_uses_service_client_when_configured() {
        let server = MockServer::start().await;
        mount_insert(&server, "service", 1).await;
        mount_insert(&server, "anon", 0).await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("apikey", "anon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "u-1" })))
            .expect(1)
            .mount(&server)
            .await;

        let state = AppState::from_clients(
            Arc::new(SupabaseClient::new(&server.uri(), "anon")),
            Some(Arc::new(SupabaseClient::new(&server.uri(), "service"))),
        );
        state.users.insert(&row()).await.unwrap();

        // auth continua no cliente anônimo
        let identity = state.identity.verify_token("token-ana").await.unwrap();
        assert_eq!(identity.map(|i| i.id).as_deref(), Some("u-1"));
    }

    #[tokio::test]
    async fn test_table_falls_back_to_anon_client() {
        let server = MockServer::start().await;
        mount_insert(&server, "anon", 1).await;
        mount_insert(&server, "service", 0).await;

        let state = AppState::from_clients(Arc::new(SupabaseClient::new(&server.uri(), "anon")), None);
        state.users.insert(&row()).await.unwrap();
    }
}
