//! minijinja-backed reply templates.

use minijinja::Environment;
use pathwise_core::error::{PathwiseError, Result};
use pathwise_core::reply::{ReplyContext, ReplyKind, ReplyTemplates};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Renders replies from minijinja templates.
///
/// Every [`ReplyKind`] starts with its built-in wording; entries of the
/// `[replies]` config table replace individual templates by kind name.
pub struct MiniJinjaReplyTemplates {
    env: Environment<'static>,
}

impl MiniJinjaReplyTemplates {
    /// Builds the template set, applying `overrides` on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns `PathwiseError::Config` for an unknown kind name or a template
    /// that does not parse.
    pub fn new(overrides: &BTreeMap<String, String>) -> Result<Self> {
        let mut env = Environment::new();

        for kind in all_kinds() {
            env.add_template_owned(template_name(kind), kind.default_text().to_string())
                .map_err(|e| PathwiseError::config(format!("default template {}: {}", kind, e)))?;
        }

        for (name, source) in overrides {
            let kind: ReplyKind = name
                .parse()
                .map_err(|_| PathwiseError::config(format!("unknown reply kind '{}'", name)))?;
            env.add_template_owned(template_name(kind), source.clone())
                .map_err(|e| PathwiseError::config(format!("reply template {}: {}", name, e)))?;
        }

        Ok(Self { env })
    }
}

impl Default for MiniJinjaReplyTemplates {
    fn default() -> Self {
        match Self::new(&BTreeMap::new()) {
            Ok(templates) => templates,
            Err(e) => {
                // render() falls back to the built-in text for missing templates
                tracing::error!(target: "pathwise::reply", error = %e, "Built-in reply templates failed to load");
                Self {
                    env: Environment::new(),
                }
            }
        }
    }
}

impl ReplyTemplates for MiniJinjaReplyTemplates {
    fn render(&self, kind: ReplyKind, context: &ReplyContext) -> String {
        let rendered = self
            .env
            .get_template(&template_name(kind))
            .and_then(|template| template.render(context));

        match rendered {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    target: "pathwise::reply",
                    %kind,
                    error = %e,
                    "Reply template failed to render, using built-in text"
                );
                kind.default_text().to_string()
            }
        }
    }
}

fn all_kinds() -> impl Iterator<Item = ReplyKind> {
    ReplyKind::iter()
}

fn template_name(kind: ReplyKind) -> String {
    format!("{}.txt", kind.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_match_builtin_text() {
        let templates = MiniJinjaReplyTemplates::default();
        let text = templates.render(ReplyKind::RequestEmail, &ReplyContext::default());
        assert_eq!(text, "Before I continue, please share your email.");

        for kind in all_kinds() {
            assert!(templates.env.get_template(&template_name(kind)).is_ok());
            assert_eq!(
                templates.render(kind, &ReplyContext::new("ada", "anything")),
                kind.default_text()
            );
        }
    }

    #[test]
    fn test_override_interpolates_context() {
        let templates =
            MiniJinjaReplyTemplates::new(&overrides(&[("ask_goal", "Thanks {{ user_id }}! Your goal?")]))
                .unwrap();
        let text = templates.render(ReplyKind::AskGoal, &ReplyContext::new("hana", "h@x.io"));
        assert_eq!(text, "Thanks hana! Your goal?");
        // Other kinds keep their defaults
        assert_eq!(
            templates.render(ReplyKind::InvalidEmail, &ReplyContext::default()),
            "Please provide a valid email."
        );
    }

    #[test]
    fn test_unknown_kind_is_config_error() {
        let err = MiniJinjaReplyTemplates::new(&overrides(&[("farewell", "bye")]))
            .err()
            .unwrap();
        assert!(matches!(err, PathwiseError::Config(_)));
    }

    #[test]
    fn test_syntax_error_is_config_error() {
        assert!(MiniJinjaReplyTemplates::new(&overrides(&[("greeting", "{{ oops")])).is_err());
    }

    #[test]
    fn test_render_failure_falls_back() {
        let templates = MiniJinjaReplyTemplates::new(&overrides(&[(
            "tell_me_more",
            "{% include 'missing.txt' %}",
        )]))
        .unwrap();
        assert_eq!(
            templates.render(ReplyKind::TellMeMore, &ReplyContext::default()),
            ReplyKind::TellMeMore.default_text()
        );
    }
}
