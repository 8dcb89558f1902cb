// ==================== USER STORE ====================
// Handle injetável para o banco de documentos dos usuários.
// Aberto uma vez na inicialização, compartilhado entre workers, fechado no shutdown.

pub mod memory;
pub mod mongo;

use crate::{
    config::{AppConfig, StoreBackend},
    models::{User, UserFields},
    utils::AppError,
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::error::Error;
use std::sync::Arc;

pub use memory::InMemoryUserStore;
pub use mongo::MongoUserStore;

/// Persistence operations on user records, addressed by id.
///
/// Ids that are not valid ObjectIds are treated as absent (`Ok(None)`).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insere um novo registro; o store gera `id` e timestamps
    async fn insert(&self, fields: UserFields) -> Result<User, AppError>;

    /// Todos os registros, em ordem de inserção
    async fn find_all(&self) -> Result<Vec<User>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Substitui os quatro campos mutáveis; retorna o registro atualizado
    async fn replace(&self, id: &str, fields: UserFields) -> Result<Option<User>, AppError>;

    /// Remove o registro; retorna o snapshot removido
    async fn delete(&self, id: &str) -> Result<Option<User>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;

    async fn close(&self);
}

/// Abre o store configurado em `DATABASE_URL`
pub async fn open(config: &AppConfig) -> Result<Arc<dyn UserStore>, Box<dyn Error>> {
    match config.backend {
        StoreBackend::Mongo => {
            let store = MongoUserStore::open(&config.database_url, &config.database_name).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            log::warn!("⚠️  Using in-memory user store - data is lost on shutdown");
            Ok(Arc::new(InMemoryUserStore::new()))
        }
    }
}

pub(crate) fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}
