// ==================== USER SCHEMA ====================
// Regras de validação dos campos do usuário e serialização dos erros.
// Toda validação autoritativa acontece aqui; o cliente só checa campos vazios.

use crate::models::{FieldError, ResultEnvelope, UserCandidate, UserFields};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

pub const NAME_MAX_LEN: usize = 100;
pub const PHONE_MIN_LEN: usize = 10;

lazy_static! {
    static ref NAME_PATTERN: Regex =
        Regex::new(r"^[A-Za-z\s]+$").expect("name pattern is valid");

    // Sem lookahead no crate regex: ponto inicial e ".." são checados em is_email
    static ref EMAIL_PATTERN: Regex = Regex::new(
        r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$"
    )
    .expect("email pattern is valid");
}

/// A single rule violation, located by its field path.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaIssue {
    pub path: Vec<String>,
    pub message: String,
}

impl SchemaIssue {
    fn new(field: &str, message: &str) -> Self {
        Self {
            path: vec![field.to_string()],
            message: message.to_string(),
        }
    }
}

/// Valida o candidato. Reporta os issues na ordem name, email, address, phone;
/// dentro de um campo presente, todas as regras que falham são reportadas.
pub fn validate(candidate: &UserCandidate) -> Result<UserFields, Vec<SchemaIssue>> {
    let mut issues = Vec::new();

    let name = required("name", candidate.name.as_ref(), &mut issues, |value, issues| {
        let len = value.chars().count();
        if len < 1 {
            issues.push(SchemaIssue::new("name", "Name is required"));
        }
        if len > NAME_MAX_LEN {
            issues.push(SchemaIssue::new("name", "Name is too long"));
        }
        if !NAME_PATTERN.is_match(value) {
            issues.push(SchemaIssue::new("name", "Name should not contain special characters"));
        }
    });

    let email = required("email", candidate.email.as_ref(), &mut issues, |value, issues| {
        if !is_email(value) {
            issues.push(SchemaIssue::new("email", "Invalid email address"));
        }
    });

    let address = required("address", candidate.address.as_ref(), &mut issues, |value, issues| {
        if value.chars().count() < 1 {
            issues.push(SchemaIssue::new("address", "Address is required"));
        }
    });

    let phone = required("phone", candidate.phone.as_ref(), &mut issues, |value, issues| {
        if value.chars().count() < PHONE_MIN_LEN {
            issues.push(SchemaIssue::new("phone", "Phone number must be at least 10 digits"));
        }
    });

    match (name, email, address, phone) {
        (Some(name), Some(email), Some(address), Some(phone)) if issues.is_empty() => {
            Ok(UserFields { name, email, address, phone })
        }
        _ => Err(issues),
    }
}

/// Campo ausente vira um único issue "Required"; presente mas não string vira
/// um único issue de tipo. Só texto passa pelas regras do campo.
fn required<F>(
    field: &str,
    value: Option<&Value>,
    issues: &mut Vec<SchemaIssue>,
    rules: F,
) -> Option<String>
where
    F: FnOnce(&str, &mut Vec<SchemaIssue>),
{
    match value {
        Some(Value::String(value)) => {
            rules(value, issues);
            Some(value.clone())
        }
        None | Some(Value::Null) => {
            issues.push(SchemaIssue::new(field, "Required"));
            None
        }
        Some(other) => {
            let message = format!("Expected string, received {}", json_type(other));
            issues.push(SchemaIssue::new(field, &message));
            None
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL_PATTERN.is_match(value)
}

/// Converte os issues em `{path, message}` e junta as mensagens com ", ".
pub fn serialize_issues(issues: &[SchemaIssue]) -> (Vec<FieldError>, String) {
    let errors: Vec<FieldError> = issues
        .iter()
        .map(|issue| FieldError {
            path: issue.path.join("."),
            message: issue.message.clone(),
        })
        .collect();

    let summary = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    (errors, summary)
}

/// Envelope 400 compartilhado por todas as operações que validam entrada
pub fn validation_failure<T>(issues: &[SchemaIssue]) -> ResultEnvelope<T> {
    let (errors, summary) = serialize_issues(issues);
    ResultEnvelope::invalid(summary, errors)
}
