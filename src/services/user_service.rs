// ==================== USER SERVICE ====================
// Validated mutation service: valida, executa uma operação no store e
// devolve sempre um ResultEnvelope. Nenhum erro escapa para o chamador.

use crate::{
    models::{ResultEnvelope, User, UserCandidate},
    services::user_schema::{self, validation_failure},
    store::UserStore,
    utils::{AppError, ListingRevision},
};
use std::sync::Arc;

pub const USER_NOT_FOUND: &str = "User not found";

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    revision: ListingRevision,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            revision: ListingRevision::new(),
        }
    }

    pub fn revision(&self) -> &ListingRevision {
        &self.revision
    }

    /// Add: 201 com o registro criado, 400 em falha de validação, 500 em erro do store
    pub async fn add_user(&self, candidate: UserCandidate) -> ResultEnvelope<User> {
        let fields = match user_schema::validate(&candidate) {
            Ok(fields) => fields,
            Err(issues) => {
                log::warn!("⚠️ Add user validation failed: {} issue(s)", issues.len());
                return validation_failure(&issues);
            }
        };

        match self.store.insert(fields).await {
            Ok(user) => {
                self.revision.bump();
                log::info!("✅ User added: {}", user.id);
                ResultEnvelope::ok(201, "User added successfully", user)
            }
            Err(e) => operation_failure("Add user error", e, "Internal server error"),
        }
    }

    /// Edit: o id é verificado antes da validação, então id inexistente é 404
    /// qualquer que seja a entrada.
    pub async fn edit_user(&self, id: &str, candidate: UserCandidate) -> ResultEnvelope<User> {
        match self.store.find_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return ResultEnvelope::failure(404, USER_NOT_FOUND),
            Err(e) => return operation_failure("Edit user error", e, "Internal server error"),
        }

        let fields = match user_schema::validate(&candidate) {
            Ok(fields) => fields,
            Err(issues) => {
                log::warn!("⚠️ Edit user {} validation failed: {} issue(s)", id, issues.len());
                return validation_failure(&issues);
            }
        };

        match self.store.replace(id, fields).await {
            Ok(Some(user)) => {
                self.revision.bump();
                log::info!("✅ User updated: {}", user.id);
                ResultEnvelope::ok(200, "User updated successfully", user)
            }
            // Removido entre a busca e o update
            Ok(None) => ResultEnvelope::failure(404, USER_NOT_FOUND),
            Err(e) => operation_failure("Edit user error", e, "Internal server error"),
        }
    }

    /// List: lista vazia é sucesso (200 com array vazio)
    pub async fn list_users(&self) -> ResultEnvelope<Vec<User>> {
        match self.store.find_all().await {
            Ok(users) => ResultEnvelope::ok(200, "Users fetched successfully", users),
            Err(e) => operation_failure("Fetch users error", e, "Error fetching users"),
        }
    }

    pub async fn delete_user(&self, id: &str) -> ResultEnvelope<User> {
        match self.store.delete(id).await {
            Ok(Some(user)) => {
                self.revision.bump();
                log::info!("🗑️  User deleted: {}", user.id);
                ResultEnvelope::ok(200, "User deleted successfully", user)
            }
            Ok(None) => ResultEnvelope::failure(404, USER_NOT_FOUND),
            Err(e) => operation_failure("Delete user error", e, "Error deleting user"),
        }
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }

    pub async fn close(&self) {
        self.store.close().await;
    }
}

/// Falha inesperada: 500 com o texto do erro, ou o fallback se vazio
fn operation_failure<T>(label: &str, err: AppError, fallback: &str) -> ResultEnvelope<T> {
    log::error!("❌ {}: {}", label, err);

    let message = if err.message().trim().is_empty() {
        fallback
    } else {
        err.message()
    };

    ResultEnvelope::failure(500, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserFields;
    use crate::store::InMemoryUserStore;
    use async_trait::async_trait;
    use serde_json::Value;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserStore::new()))
    }

    fn candidate(name: &str, email: &str) -> UserCandidate {
        UserCandidate::from_text(name, email, "221B Baker Street", "02079460000")
    }

    /// Store que sempre falha, para os caminhos de 500
    struct UnavailableStore {
        message: &'static str,
    }

    #[async_trait]
    impl UserStore for UnavailableStore {
        async fn insert(&self, _fields: UserFields) -> Result<User, AppError> {
            Err(AppError::DatabaseError(self.message.into()))
        }
        async fn find_all(&self) -> Result<Vec<User>, AppError> {
            Err(AppError::DatabaseError(self.message.into()))
        }
        async fn find_by_id(&self, _id: &str) -> Result<Option<User>, AppError> {
            Err(AppError::DatabaseError(self.message.into()))
        }
        async fn replace(&self, _id: &str, _fields: UserFields) -> Result<Option<User>, AppError> {
            Err(AppError::DatabaseError(self.message.into()))
        }
        async fn delete(&self, _id: &str) -> Result<Option<User>, AppError> {
            Err(AppError::DatabaseError(self.message.into()))
        }
        async fn ping(&self) -> Result<(), AppError> {
            Err(AppError::DatabaseError(self.message.into()))
        }
        async fn close(&self) {}
    }

    fn unavailable(message: &'static str) -> UserService {
        UserService::new(Arc::new(UnavailableStore { message }))
    }

    #[tokio::test]
    async fn add_returns_201_with_generated_id_and_timestamps() {
        let service = service();

        let result = service.add_user(candidate("Sherlock Holmes", "sherlock@example.com")).await;

        assert!(result.success);
        assert_eq!(result.status, 201);
        assert_eq!(result.message, "User added successfully");
        let user = result.data.unwrap();
        assert_eq!(user.id.len(), 24);
        assert!(user.updated_at >= user.created_at);
        assert!(result.errors.is_none());
    }

    #[tokio::test]
    async fn add_rejects_name_with_digit() {
        let service = service();

        let result = service.add_user(candidate("Sherlock 2", "sherlock@example.com")).await;

        assert!(!result.success);
        assert_eq!(result.status, 400);
        let errors = result.errors.unwrap();
        assert!(errors.iter().any(|e| e.path == "name"));
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn add_with_missing_fields_reports_each_one() {
        let service = service();
        let input = UserCandidate {
            name: Some("Irene Adler".into()),
            ..UserCandidate::default()
        };

        let result = service.add_user(input).await;

        assert_eq!(result.status, 400);
        let paths: Vec<String> = result.errors.unwrap().into_iter().map(|e| e.path).collect();
        assert_eq!(paths, vec!["email", "address", "phone"]);
        assert_eq!(result.message, "Required, Required, Required");
    }

    #[tokio::test]
    async fn add_with_numeric_phone_is_400_with_field_error() {
        let service = service();
        let mut input = candidate("Sherlock Holmes", "sherlock@example.com");
        input.phone = Some(Value::from(2079460000_u64));

        let result = service.add_user(input).await;

        assert!(!result.success);
        assert_eq!(result.status, 400);
        assert_eq!(result.message, "Expected string, received number");
        let errors = result.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "phone");
        assert!(service.list_users().await.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn numeric_name_is_reported_alongside_other_field_errors() {
        let service = service();
        let mut input = candidate("ignored", "not-an-email");
        input.name = Some(Value::from(42));

        let result = service.add_user(input).await;

        assert_eq!(result.status, 400);
        let errors = result.errors.unwrap();
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "email"]);
        assert_eq!(result.message, "Expected string, received number, Invalid email address");
    }

    #[tokio::test]
    async fn add_with_duplicate_email_is_a_500() {
        let service = service();
        service.add_user(candidate("Sherlock Holmes", "sherlock@example.com")).await;

        let result = service.add_user(candidate("Mycroft Holmes", "sherlock@example.com")).await;

        assert!(!result.success);
        assert_eq!(result.status, 500);
        assert!(result.message.contains("duplicate key"));
        assert!(result.errors.is_none());
    }

    #[tokio::test]
    async fn edit_unknown_id_is_404_even_with_invalid_input() {
        let service = service();
        let missing = mongodb::bson::oid::ObjectId::new().to_hex();

        let valid = service.edit_user(&missing, candidate("John Watson", "john@example.com")).await;
        let invalid = service.edit_user(&missing, UserCandidate::default()).await;
        let malformed = service.edit_user("nope", candidate("John Watson", "john@example.com")).await;

        for result in [valid, invalid, malformed] {
            assert_eq!(result.status, 404);
            assert_eq!(result.message, USER_NOT_FOUND);
            assert!(result.errors.is_none());
        }
    }

    #[tokio::test]
    async fn edit_replaces_every_mutable_field() {
        let service = service();
        let created = service
            .add_user(candidate("John Watson", "john@example.com"))
            .await
            .data
            .unwrap();
        let replacement =
            UserCandidate::from_text("Mary Morstan", "mary@example.com", "Paddington", "02071234567");

        let result = service.edit_user(&created.id, replacement).await;

        assert_eq!(result.status, 200);
        assert_eq!(result.message, "User updated successfully");
        let updated = result.data.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Mary Morstan");
        assert_eq!(updated.email, "mary@example.com");
        assert_eq!(updated.address, "Paddington");
        assert_eq!(updated.phone, "02071234567");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn edit_with_invalid_input_is_400_and_leaves_record_alone() {
        let service = service();
        let created = service
            .add_user(candidate("John Watson", "john@example.com"))
            .await
            .data
            .unwrap();

        let result = service.edit_user(&created.id, candidate("John Watson", "not-an-email")).await;

        assert_eq!(result.status, 400);
        assert_eq!(result.message, "Invalid email address");
        let listed = service.list_users().await.data.unwrap();
        assert_eq!(listed[0].email, "john@example.com");
    }

    #[tokio::test]
    async fn delete_twice_is_200_then_404() {
        let service = service();
        let created = service
            .add_user(candidate("James Moriarty", "moriarty@example.com"))
            .await
            .data
            .unwrap();

        let first = service.delete_user(&created.id).await;
        let second = service.delete_user(&created.id).await;

        assert_eq!(first.status, 200);
        assert_eq!(first.message, "User deleted successfully");
        assert_eq!(first.data, Some(created));
        assert_eq!(second.status, 404);
        assert_eq!(second.message, USER_NOT_FOUND);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_success() {
        let result = service().list_users().await;

        assert!(result.success);
        assert_eq!(result.status, 200);
        assert_eq!(result.data, Some(vec![]));
    }

    #[tokio::test]
    async fn added_record_appears_in_listing() {
        let service = service();
        let input = candidate("Irene Adler", "irene@example.com");
        service.add_user(input.clone()).await;

        let users = service.list_users().await.data.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(Some(Value::from(users[0].name.as_str())), input.name);
        assert_eq!(Some(Value::from(users[0].email.as_str())), input.email);
        assert_eq!(Some(Value::from(users[0].address.as_str())), input.address);
        assert_eq!(Some(Value::from(users[0].phone.as_str())), input.phone);
    }

    #[tokio::test]
    async fn only_successful_mutations_bump_the_revision() {
        let service = service();

        service.add_user(UserCandidate::default()).await;
        service.list_users().await;
        service.delete_user("nope").await;
        assert_eq!(service.revision().current(), 0);

        let created = service
            .add_user(candidate("Irene Adler", "irene@example.com"))
            .await
            .data
            .unwrap();
        service.edit_user(&created.id, candidate("Irene Norton", "irene@example.com")).await;
        service.delete_user(&created.id).await;

        assert_eq!(service.revision().current(), 3);
    }

    #[tokio::test]
    async fn store_failures_become_500_envelopes() {
        let service = unavailable("connection refused");

        let add = service.add_user(candidate("Irene Adler", "irene@example.com")).await;
        let edit = service.edit_user("abc", candidate("Irene Adler", "irene@example.com")).await;
        let list = service.list_users().await;
        let delete = service.delete_user("abc").await;

        assert_eq!((add.status, edit.status, list.status, delete.status), (500, 500, 500, 500));
        assert_eq!(list.message, "connection refused");
        assert!(!list.success);
        assert!(list.data.is_none());
    }

    #[tokio::test]
    async fn empty_store_errors_use_operation_fallbacks() {
        let service = unavailable("");

        assert_eq!(
            service.add_user(candidate("Irene Adler", "irene@example.com")).await.message,
            "Internal server error"
        );
        assert_eq!(service.list_users().await.message, "Error fetching users");
        assert_eq!(service.delete_user("abc").await.message, "Error deleting user");
    }
}
