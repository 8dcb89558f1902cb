pub mod envelope;
pub mod user;

pub use envelope::*;
pub use user::*;
