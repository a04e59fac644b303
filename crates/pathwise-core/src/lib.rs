pub mod config;
pub mod decision;
pub mod dialog;
pub mod error;
pub mod ethics;
pub mod intent;
pub mod memory;
pub mod planning;
pub mod reply;

// Re-export common error type
pub use error::{PathwiseError, Result};
