pub mod classifier;
pub mod config;
pub mod error;
pub mod persona;
pub mod session;
pub mod transcript;

// Re-export common error type
pub use error::{JayError, Result};
