use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection "users" (nome pluralizado do modelo User)
pub const USERS_COLLECTION: &str = "users";

/// Documento armazenado no MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl UserDocument {
    /// Novo documento com timestamps de criação (id atribuído pelo store)
    pub fn new(fields: UserFields) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: None,
            name: fields.name,
            email: fields.email,
            address: fields.address,
            phone: fields.phone,
            created_at: now,
            updated_at: now,
        }
    }

    /// Substitui os quatro campos mutáveis e atualiza `updatedAt`
    pub fn replace_fields(&mut self, fields: UserFields) {
        self.name = fields.name;
        self.email = fields.email;
        self.address = fields.address;
        self.phone = fields.phone;
        self.updated_at = BsonDateTime::now();
    }
}

/// User record as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserDocument> for User {
    fn from(d: UserDocument) -> Self {
        User {
            id: d.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: d.name,
            email: d.email,
            address: d.address,
            phone: d.phone,
            created_at: to_chrono(d.created_at),
            updated_at: to_chrono(d.updated_at),
        }
    }
}

fn to_chrono(value: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

/// Record candidate: dados não validados enviados pelo cliente.
/// Campos ausentes (ou `null`) chegam como `None`; valores de outro tipo JSON
/// passam adiante para o schema reportar o erro no campo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserCandidate {
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub address: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub phone: Option<Value>,
}

impl UserCandidate {
    /// Candidato com os quatro campos como texto
    pub fn from_text(name: &str, email: &str, address: &str, phone: &str) -> Self {
        Self {
            name: Some(Value::from(name)),
            email: Some(Value::from(email)),
            address: Some(Value::from(address)),
            phone: Some(Value::from(phone)),
        }
    }
}

/// Campos mutáveis já validados
#[derive(Debug, Clone, PartialEq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}
