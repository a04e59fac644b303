//! Reply text generation.
//!
//! The orchestrator only decides *which* reply to send; the wording comes from
//! a [`ReplyTemplates`] implementation that can be swapped independently.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The replies the dialog can emit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReplyKind {
    Greeting,
    TellMeMore,
    RequestEmail,
    InvalidEmail,
    AskGoal,
    Apology,
    RecommendationUnavailable,
}

impl ReplyKind {
    /// Built-in wording for the reply.
    pub fn default_text(self) -> &'static str {
        match self {
            ReplyKind::Greeting => {
                "Hello! I'm here to help you plan your next steps. Tell me what you'd like to achieve."
            }
            ReplyKind::TellMeMore => {
                "Could you tell me a bit more? A sentence or two about what you're after helps me plan."
            }
            ReplyKind::RequestEmail => "Before I continue, please share your email.",
            ReplyKind::InvalidEmail => "Please provide a valid email.",
            ReplyKind::AskGoal => "Thanks. What is your main goal?",
            ReplyKind::Apology => {
                "I apologize, but I encountered an error processing your message. Please try again."
            }
            ReplyKind::RecommendationUnavailable => {
                "I couldn't reach the recommendation service, so here is the plan on its own."
            }
        }
    }
}

/// Values a template may interpolate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplyContext {
    pub user_id: String,
    pub text: String,
}

impl ReplyContext {
    pub fn new(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            text: text.into(),
        }
    }
}

/// Renders reply text for a [`ReplyKind`].
///
/// Rendering never fails; implementations fall back to
/// [`ReplyKind::default_text`] when a custom template cannot be rendered.
pub trait ReplyTemplates: Send + Sync {
    fn render(&self, kind: ReplyKind, context: &ReplyContext) -> String;
}

/// Returns the built-in wording verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultReplies;

impl ReplyTemplates for DefaultReplies {
    fn render(&self, kind: ReplyKind, _context: &ReplyContext) -> String {
        kind.default_text().to_string()
    }
}
