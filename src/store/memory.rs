use super::{parse_object_id, UserStore};
use crate::{
    models::{User, UserDocument, UserFields, USERS_COLLECTION},
    utils::AppError,
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Store em memória com as mesmas regras do MongoDB: ids ObjectId,
/// ordem de inserção e email único.
#[derive(Default)]
pub struct InMemoryUserStore {
    documents: RwLock<Vec<UserDocument>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<UserDocument>>, AppError> {
        self.documents
            .read()
            .map_err(|_| AppError::DatabaseError("user store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<UserDocument>>, AppError> {
        self.documents
            .write()
            .map_err(|_| AppError::DatabaseError("user store lock poisoned".to_string()))
    }
}

fn same_id(document: &UserDocument, id: &ObjectId) -> bool {
    document.id.as_ref() == Some(id)
}

/// Mesmo formato da mensagem E11000 do MongoDB
fn duplicate_email(email: &str) -> AppError {
    AppError::DuplicateKey(format!(
        "E11000 duplicate key error collection: {} index: email_1 dup key: {{ email: \"{}\" }}",
        USERS_COLLECTION, email
    ))
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, fields: UserFields) -> Result<User, AppError> {
        let mut documents = self.write()?;

        if documents.iter().any(|d| d.email == fields.email) {
            return Err(duplicate_email(&fields.email));
        }

        let mut document = UserDocument::new(fields);
        document.id = Some(ObjectId::new());
        documents.push(document.clone());

        Ok(User::from(document))
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        let documents = self.read()?;
        Ok(documents.iter().cloned().map(User::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(None);
        };

        let documents = self.read()?;
        Ok(documents
            .iter()
            .find(|d| same_id(d, &object_id))
            .cloned()
            .map(User::from))
    }

    async fn replace(&self, id: &str, fields: UserFields) -> Result<Option<User>, AppError> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(None);
        };

        let mut documents = self.write()?;

        if documents
            .iter()
            .any(|d| d.email == fields.email && !same_id(d, &object_id))
        {
            return Err(duplicate_email(&fields.email));
        }

        match documents.iter_mut().find(|d| same_id(d, &object_id)) {
            Some(document) => {
                document.replace_fields(fields);
                Ok(Some(User::from(document.clone())))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<Option<User>, AppError> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(None);
        };

        let mut documents = self.write()?;
        let removed = documents
            .iter()
            .position(|d| same_id(d, &object_id))
            .map(|index| documents.remove(index));

        Ok(removed.map(User::from))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }

    async fn close(&self) {
        log::info!("🔌 Closing in-memory user store");
    }
}
