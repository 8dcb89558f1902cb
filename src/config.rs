use crate::utils::AppError;
use std::env;

const DEFAULT_DATABASE_NAME: &str = "user_directory";
const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Backend de persistência escolhido pelo esquema de `DATABASE_URL`
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Mongo,
    /// `memory://` - sem persistência, para desenvolvimento local
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub backend: StoreBackend,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Lê a configuração das variáveis de ambiente (após `dotenv`)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::InvalidRequest(format!("PORT must be a port number, got '{}'", raw)))?,
            None => 3002,
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::InvalidRequest("DATABASE_URL must be set".to_string()))?;

        let backend = if database_url.starts_with("memory://") {
            StoreBackend::Memory
        } else if database_url.starts_with("mongodb://") || database_url.starts_with("mongodb+srv://") {
            StoreBackend::Mongo
        } else {
            return Err(AppError::InvalidRequest(format!(
                "Unsupported DATABASE_URL scheme: {}",
                database_url
            )));
        };

        let database_name = lookup("DATABASE_NAME")
            .or_else(|| database_name_from_url(&database_url))
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());

        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            database_url,
            database_name,
            backend,
            allowed_origins,
        })
    }
}

/// Extrai o nome do banco do path da URI (`mongodb://host:27017/<db>?opts`)
fn database_name_from_url(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("://")?;
    let (_, path) = rest.split_once('/')?;
    let name = path.split('?').next().unwrap_or_default();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
