use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tabela de perfis mantida pelo provedor de dados
pub const USERS_TABLE: &str = "users";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Blocked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = String;

    // Match exato: "Active" ou " active" não são aceitos
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "blocked" => Ok(UserStatus::Blocked),
            other => Err(format!("Status inválido: {}", other)),
        }
    }
}

/// Linha da tabela `users`, sempre lida através de uma projeção de colunas.
/// Campos fora da projeção chegam como `None` e são serializados como `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    // Texto livre na leitura: valores fora do enum não quebram o GET
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}

/// Linha inserida no cadastro. `role` nunca é definido pela API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: UserStatus,
}

/// Patch parcial: apenas os campos presentes são enviados ao provedor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl UserPatch {
    pub fn status(status: UserStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.status.is_none()
    }
}

/// Identidade do chamador, derivada do bearer token a cada requisição
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub id: String,
    pub email: Option<String>,
}

impl AuthenticatedIdentity {
    /// Extrai `id` e `email` do objeto de usuário retornado pelo provedor.
    /// `id` ausente vira string vazia; quem chama decide se isso é falha.
    pub fn from_user_json(user: &serde_json::Value) -> Self {
        Self {
            id: user
                .get("id")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string(),
            email: user
                .get("email")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        }
    }
}

/// Sessão emitida pelo provedor de identidade. Os tokens são opacos.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}
