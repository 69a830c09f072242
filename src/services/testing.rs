//! Provedor em memória usado pelos testes de fluxo e de HTTP.

use crate::models::{AuthenticatedIdentity, NewUserRow, Session, UserPatch, UserRecord};
use crate::services::provider::{AppState, IdentityProvider, TableStore};
use crate::utils::error::ProviderError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const NO_SINGLE_ROW: &str = "JSON object requested, multiple (or no) rows returned";

#[derive(Default)]
pub struct FakeProvider {
    // email -> (senha, id)
    accounts: Mutex<HashMap<String, (String, String)>>,
    tokens: Mutex<HashMap<String, AuthenticatedIdentity>>,
    rows: Mutex<Vec<UserRecord>>,
    table_calls: AtomicUsize,
    clock: AtomicUsize,
    pub fail_insert: Mutex<Option<String>>,
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(self: &Arc<Self>) -> AppState {
        AppState::new(self.clone(), self.clone())
    }

    /// Cria conta, token e linha de perfil de uma vez
    pub fn seed_user(&self, id: &str, email: &str, role: Option<&str>, token: &str) {
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), ("Senha123".to_string(), id.to_string()));
        self.tokens.lock().unwrap().insert(
            token.to_string(),
            AuthenticatedIdentity {
                id: id.to_string(),
                email: Some(email.to_string()),
            },
        );
        self.rows.lock().unwrap().push(UserRecord {
            id: id.to_string(),
            email: Some(email.to_string()),
            name: Some(format!("User {}", id)),
            phone: Some("+5511999999999".to_string()),
            status: Some("active".to_string()),
            role: role.map(str::to_string),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            updated_at: Some("2024-01-01T00:00:00Z".to_string()),
        });
    }

    pub fn row(&self, id: &str) -> Option<UserRecord> {
        self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    pub fn table_calls(&self) -> usize {
        self.table_calls.load(Ordering::SeqCst)
    }

    fn tick(&self) -> String {
        let n = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        format!("2024-01-02T00:00:{:02}Z", n % 60)
    }
}

fn column_value(record: &UserRecord, column: &str) -> Option<String> {
    match column {
        "id" => Some(record.id.clone()),
        "email" => record.email.clone(),
        _ => None,
    }
}

fn project(record: &UserRecord, columns: &[&str]) -> UserRecord {
    let mut value = serde_json::to_value(record).unwrap();
    if let Value::Object(map) = &mut value {
        map.retain(|key, _| columns.contains(&key.as_str()));
    }
    serde_json::from_value(value).unwrap()
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthenticatedIdentity>, ProviderError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(ProviderError::Auth("User already registered".to_string()));
        }
        let id = format!("id-{}", accounts.len() + 1);
        accounts.insert(email.to_string(), (password.to_string(), id.clone()));
        Ok(Some(AuthenticatedIdentity {
            id,
            email: Some(email.to_string()),
        }))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Session>, ProviderError> {
        match self.accounts.lock().unwrap().get(email) {
            Some((stored, id)) if stored == password => Ok(Some(Session {
                access_token: format!("access-{}", id),
                refresh_token: Some(format!("refresh-{}", id)),
            })),
            _ => Err(ProviderError::Auth("Invalid login credentials".to_string())),
        }
    }

    async fn verify_token(&self, token: &str) -> Result<Option<AuthenticatedIdentity>, ProviderError> {
        if token == "explode" {
            return Err(ProviderError::Transport("connection reset".to_string()));
        }
        Ok(self.tokens.lock().unwrap().get(token).cloned())
    }
}

#[async_trait]
impl TableStore for FakeProvider {
    async fn select_one(
        &self,
        column: &str,
        value: &str,
        columns: &[&str],
    ) -> Result<UserRecord, ProviderError> {
        self.table_calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        let matches: Vec<&UserRecord> = rows
            .iter()
            .filter(|r| column_value(r, column).as_deref() == Some(value))
            .collect();
        match matches.as_slice() {
            [single] => Ok(project(single, columns)),
            _ => Err(ProviderError::Data(NO_SINGLE_ROW.to_string())),
        }
    }

    async fn insert(&self, row: &NewUserRow) -> Result<(), ProviderError> {
        self.table_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_insert.lock().unwrap().clone() {
            return Err(ProviderError::Data(message));
        }
        let now = self.tick();
        self.rows.lock().unwrap().push(UserRecord {
            id: row.id.clone(),
            email: Some(row.email.clone()),
            name: Some(row.name.clone()),
            phone: Some(row.phone.clone()),
            status: Some(row.status.to_string()),
            role: None,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        });
        Ok(())
    }

    async fn update(&self, column: &str, value: &str, patch: &UserPatch) -> Result<(), ProviderError> {
        self.table_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.tick();
        let mut rows = self.rows.lock().unwrap();
        for row in rows
            .iter_mut()
            .filter(|r| column_value(r, column).as_deref() == Some(value))
        {
            if let Some(name) = &patch.name {
                row.name = Some(name.clone());
            }
            if let Some(email) = &patch.email {
                row.email = Some(email.clone());
            }
            if let Some(phone) = &patch.phone {
                row.phone = Some(phone.clone());
            }
            if let Some(status) = patch.status {
                row.status = Some(status.to_string());
            }
            row.updated_at = Some(now.clone());
        }
        Ok(())
    }
}
