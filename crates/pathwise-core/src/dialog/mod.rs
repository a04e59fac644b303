//! Dialog phase state and its store abstraction.

pub mod model;
pub mod repository;

pub use model::{DialogSession, Phase, SLOT_EMAIL, SLOT_GOAL};
pub use repository::DialogSessionStore;
