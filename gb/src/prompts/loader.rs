//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults, then renders them with Handlebars.

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::embedded;
use crate::domain::Language;

/// Errors raised while building a prompt
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Input text is empty")]
    EmptyInput,

    #[error("Prompt template not found: {0}")]
    TemplateNotFound(String),

    #[error("Failed to read prompt {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template {name}: {message}")]
    Render { name: String, message: String },
}

/// Context for rendering prompt templates
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext<'a> {
    /// Trimmed goal text (breakdown and guardrail prompts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<&'a str>,
    /// Trimmed step text (sub-breakdown prompt)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<&'a str>,
    /// Append the Amharic rendering instruction
    pub amharic: bool,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Override directory searched before the embedded templates
    override_dir: Option<PathBuf>,
}

impl Default for PromptLoader {
    fn default() -> Self {
        Self::embedded_only()
    }
}

impl PromptLoader {
    /// Create a loader that checks `dir` for `{name}.pmt` overrides first
    pub fn new(dir: Option<impl AsRef<Path>>) -> Self {
        let override_dir = dir.map(|d| d.as_ref().to_path_buf()).filter(|d| d.exists());
        debug!(?override_dir, "PromptLoader::new: called");
        Self {
            hbs: Self::engine(),
            override_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            override_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle quotes in goals
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Override: `{dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String, PromptError> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path).map_err(|source| PromptError::Read { path, source });
            }
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| PromptError::TemplateNotFound(name.to_string()))
    }

    /// Render a template with the given context
    pub fn render(&self, name: &str, context: &PromptContext<'_>) -> Result<String, PromptError> {
        debug!(%name, amharic = context.amharic, "PromptLoader::render: called");
        let template = self.load_template(name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| PromptError::Render {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Build the five-step breakdown prompt for a goal
    pub fn breakdown_prompt(&self, goal: &str, language: Language) -> Result<String, PromptError> {
        let goal = non_empty(goal)?;
        self.render(
            "breakdown",
            &PromptContext {
                goal: Some(goal),
                step: None,
                amharic: language == Language::Am,
            },
        )
    }

    /// Build the sub-breakdown prompt for a single step
    pub fn sub_breakdown_prompt(&self, step: &str, language: Language) -> Result<String, PromptError> {
        let step = non_empty(step)?;
        self.render(
            "sub-breakdown",
            &PromptContext {
                goal: None,
                step: Some(step),
                amharic: language == Language::Am,
            },
        )
    }

    /// Build the guardrail classification prompt
    pub fn guardrail_prompt(&self, goal: &str) -> Result<String, PromptError> {
        let goal = non_empty(goal)?;
        self.render(
            "guardrail",
            &PromptContext {
                goal: Some(goal),
                step: None,
                amharic: false,
            },
        )
    }
}

fn non_empty(text: &str) -> Result<&str, PromptError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        debug!("non_empty: rejecting blank input");
        Err(PromptError::EmptyInput)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_breakdown_prompt_embeds_trimmed_goal() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.breakdown_prompt("  Launch a podcast  ", Language::En).unwrap();

        assert!(prompt.contains("Goal: \"Launch a podcast\""));
        assert!(prompt.contains("\"steps\": [\"step1\", \"step2\", \"step3\", \"step4\", \"step5\"]"));
        assert!(!prompt.contains("Amharic"));
    }

    #[test]
    fn test_breakdown_prompt_is_deterministic() {
        let loader = PromptLoader::embedded_only();
        let a = loader.breakdown_prompt("Ship v2", Language::Am).unwrap();
        let b = loader.breakdown_prompt("Ship v2", Language::Am).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_amharic_instruction_appended() {
        let loader = PromptLoader::embedded_only();
        let en = loader.breakdown_prompt("Ship v2", Language::En).unwrap();
        let am = loader.breakdown_prompt("Ship v2", Language::Am).unwrap();

        assert!(am.contains("Amharic"));
        assert!(am.starts_with(en.trim_end()));

        let sub = loader.sub_breakdown_prompt("Hire a team", Language::Am).unwrap();
        assert!(sub.contains("Amharic"));
        assert!(sub.contains("Step: \"Hire a team\""));
    }

    #[test]
    fn test_quotes_not_html_escaped() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.breakdown_prompt("Build a \"smart\" <home> & garden", Language::En).unwrap();
        assert!(prompt.contains("Build a \"smart\" <home> & garden"));
    }

    #[test]
    fn test_empty_input_rejected() {
        let loader = PromptLoader::embedded_only();
        assert!(matches!(
            loader.breakdown_prompt("   \n\t", Language::En),
            Err(PromptError::EmptyInput)
        ));
        assert!(matches!(
            loader.sub_breakdown_prompt("", Language::En),
            Err(PromptError::EmptyInput)
        ));
        assert!(matches!(loader.guardrail_prompt(" "), Err(PromptError::EmptyInput)));
    }

    #[test]
    fn test_override_dir_takes_precedence() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("breakdown.pmt"), "CUSTOM {{goal}}").unwrap();

        let loader = PromptLoader::new(Some(dir.path()));
        assert_eq!(loader.breakdown_prompt("x", Language::En).unwrap(), "CUSTOM x");

        // Templates not overridden still come from the embedded set
        assert!(loader.guardrail_prompt("x").unwrap().contains("intake filter"));
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        let ctx = PromptContext {
            goal: None,
            step: None,
            amharic: false,
        };
        assert!(matches!(
            loader.render("nonexistent-template", &ctx),
            Err(PromptError::TemplateNotFound(_))
        ));
    }
}
