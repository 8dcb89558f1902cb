// Utility functions
pub mod error;
pub mod refresh;

pub use error::*;
pub use refresh::*;
