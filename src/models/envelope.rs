use serde::{Deserialize, Serialize};

/// Uma violação do schema: `path` é a localização do campo unida por ".".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Result envelope devolvido por toda operação do serviço de usuários.
///
/// `data` só aparece em sucesso; `errors` só em falha de validação (400).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub success: bool,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ResultEnvelope<T> {
    pub fn ok(status: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status,
            message: message.into(),
            data: Some(data),
            errors: None,
        }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            message: message.into(),
            data: None,
            errors: None,
        }
    }

    pub fn invalid(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            status: 400,
            message: message.into(),
            data: None,
            errors: Some(errors),
        }
    }
}
