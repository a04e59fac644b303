pub mod config_service;
pub mod dialog_store;
pub mod http_memory_service;
pub mod http_recommender;
mod http_support;
pub mod memory_store;
pub mod paths;
pub mod reply_templates;

pub use crate::config_service::ConfigService;
pub use crate::dialog_store::InMemoryDialogSessionStore;
pub use crate::http_memory_service::HttpMemoryService;
pub use crate::http_recommender::HttpDecisionRecommender;
pub use crate::http_support::DEFAULT_REQUEST_TIMEOUT;
pub use crate::memory_store::InMemoryMemoryService;
pub use crate::paths::PathwisePaths;
pub use crate::reply_templates::MiniJinjaReplyTemplates;
