pub mod user_schema;
pub mod user_service;

pub use user_service::*;
