use super::{parse_object_id, UserStore};
use crate::{
    database::MongoDB,
    models::{User, UserDocument, UserFields, USERS_COLLECTION},
    utils::AppError,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, DateTime as BsonDateTime};
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use std::error::Error;

pub struct MongoUserStore {
    db: MongoDB,
}

impl MongoUserStore {
    pub async fn open(uri: &str, db_name: &str) -> Result<Self, Box<dyn Error>> {
        let db = MongoDB::new(uri, db_name).await?;
        log::info!("✅ MongoDB connected successfully ({})", db_name);
        Ok(Self { db })
    }

    fn users(&self) -> Collection<UserDocument> {
        self.db.collection::<UserDocument>(USERS_COLLECTION)
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, fields: UserFields) -> Result<User, AppError> {
        let mut document = UserDocument::new(fields);
        let result = self.users().insert_one(&document).await?;

        document.id = result.inserted_id.as_object_id();
        Ok(User::from(document))
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        let cursor = self.users().find(doc! {}).await?;
        let documents: Vec<UserDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(None);
        };

        let document = self.users().find_one(doc! { "_id": object_id }).await?;
        Ok(document.map(User::from))
    }

    async fn replace(&self, id: &str, fields: UserFields) -> Result<Option<User>, AppError> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(None);
        };

        let update = doc! {
            "$set": {
                "name": fields.name,
                "email": fields.email,
                "address": fields.address,
                "phone": fields.phone,
                "updatedAt": BsonDateTime::now(),
            }
        };

        let document = self
            .users()
            .find_one_and_update(doc! { "_id": object_id }, update)
            .return_document(ReturnDocument::After)
            .await?;

        Ok(document.map(User::from))
    }

    async fn delete(&self, id: &str) -> Result<Option<User>, AppError> {
        let Some(object_id) = parse_object_id(id) else {
            return Ok(None);
        };

        let document = self
            .users()
            .find_one_and_delete(doc! { "_id": object_id })
            .await?;

        Ok(document.map(User::from))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.ping().await?;
        Ok(())
    }

    async fn close(&self) {
        log::info!("🔌 Closing MongoDB connection pool");
        self.db.client().clone().shutdown().await;
    }
}
