//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! configuration the `axis-chat` binary builds its widget from.

use std::time::Duration;

use arrrg_derive::CommandLine;
use utf8path::Path;

use crate::error::Result;
use crate::persona::Persona;
use crate::types::{GenerationConfig, Model};
use crate::widget::{DEFAULT_REPLY_TIMEOUT, WidgetConfig};

/// Command-line arguments for the axis-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-2.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// YAML file describing the persona.
    #[arrrg(optional, "Persona file (default: built-in Axis AI persona)", "FILE")]
    pub persona: Option<String>,

    /// Base URL of the Gemini API.
    #[arrrg(optional, "Gemini API base URL", "URL")]
    pub base_url: Option<String>,

    /// Reply timeout in seconds.
    #[arrrg(optional, "Seconds to wait for a reply, 0 waits forever (default: 60)", "SECS")]
    pub timeout: Option<u64>,

    /// Maximum tokens per reply.
    #[arrrg(optional, "Max tokens per reply (default: model limit)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Start with the chat window closed.
    #[arrrg(flag, "Start with the chat window closed")]
    pub closed: bool,

    /// Skip the model check when opening the session.
    #[arrrg(flag, "Do not verify the model when connecting")]
    pub no_verify: bool,
}

/// Configuration for the chat application.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to use for generating replies.
    pub model: Model,

    /// Override for the Gemini API base URL.
    pub base_url: Option<String>,

    /// The persona the widget speaks as.
    pub persona: Persona,

    /// Upper bound on a single reply; `None` waits forever.
    pub reply_timeout: Option<Duration>,

    /// Maximum tokens per reply.
    pub max_output_tokens: Option<u32>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether the chat window starts open.
    pub start_visible: bool,

    /// Whether to check the model is reachable when connecting.
    pub verify_model: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.5-flash
    /// - Persona: Axis AI
    /// - Reply timeout: 60 seconds
    /// - Color: enabled
    /// - Window: open
    /// - Model verification: enabled
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            base_url: None,
            persona: Persona::default(),
            reply_timeout: Some(DEFAULT_REPLY_TIMEOUT),
            max_output_tokens: None,
            use_color: true,
            start_visible: true,
            verify_model: true,
        }
    }

    /// Resolves command-line arguments, loading the persona file if one is
    /// named.
    pub fn from_args(args: ChatArgs) -> Result<Self> {
        let persona = match &args.persona {
            Some(path) => Persona::from_file(&Path::from(path.as_str()))?,
            None => Persona::default(),
        };
        let reply_timeout = match args.timeout {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_REPLY_TIMEOUT),
        };
        let model = args
            .model
            .map(|s| s.parse::<Model>().unwrap_or(Model::Custom(s)))
            .unwrap_or_default();

        Ok(ChatConfig {
            model,
            base_url: args.base_url,
            persona,
            reply_timeout,
            max_output_tokens: args.max_tokens,
            use_color: !args.no_color,
            start_visible: !args.closed,
            verify_model: !args.no_verify,
        })
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets the persona.
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Sets the reply timeout.
    pub fn with_reply_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Sets the maximum tokens per reply.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets whether the window starts open.
    pub fn with_start_visible(mut self, visible: bool) -> Self {
        self.start_visible = visible;
        self
    }

    /// Sets whether to verify the model when connecting.
    pub fn with_verify_model(mut self, verify: bool) -> Self {
        self.verify_model = verify;
        self
    }

    /// The widget configuration implied by this configuration.
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig::new()
            .with_persona(self.persona.clone())
            .with_reply_timeout(self.reply_timeout)
            .with_start_visible(self.start_visible)
    }

    /// The sampling options sent with every turn.
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig::default().with_max_output_tokens(self.max_output_tokens)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(config.persona, Persona::default());
        assert_eq!(config.reply_timeout, Some(Duration::from_secs(60)));
        assert!(config.base_url.is_none());
        assert!(config.max_output_tokens.is_none());
        assert!(config.use_color);
        assert!(config.start_visible);
        assert!(config.verify_model);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from_args(ChatArgs::default()).unwrap();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(config.reply_timeout, Some(DEFAULT_REPLY_TIMEOUT));
        assert!(config.use_color);
        assert!(config.start_visible);
        assert!(config.verify_model);
        assert!(config.generation_config().is_empty());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-pro".to_string()),
            persona: None,
            base_url: Some("http://localhost:8080/v1beta".to_string()),
            timeout: Some(0),
            max_tokens: Some(256),
            no_color: true,
            closed: true,
            no_verify: true,
        };
        let config = ChatConfig::from_args(args).unwrap();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(
            config.base_url.as_deref(),
            Some("http://localhost:8080/v1beta")
        );
        assert_eq!(config.reply_timeout, None);
        assert_eq!(config.max_output_tokens, Some(256));
        assert!(!config.use_color);
        assert!(!config.start_visible);
        assert!(!config.verify_model);
    }

    #[test]
    fn custom_model_name() {
        let args = ChatArgs {
            model: Some("tuned-model-7".to_string()),
            ..ChatArgs::default()
        };
        let config = ChatConfig::from_args(args).unwrap();
        assert_eq!(config.model, Model::Custom("tuned-model-7".to_string()));
    }

    #[test]
    fn missing_persona_file() {
        let args = ChatArgs {
            persona: Some("/nonexistent/persona.yaml".to_string()),
            ..ChatArgs::default()
        };
        assert!(ChatConfig::from_args(args).is_err());
    }

    #[test]
    fn widget_config_follows() {
        let config = ChatConfig::new()
            .with_persona(Persona::default().with_name("Cobalt"))
            .with_reply_timeout(Some(Duration::from_secs(5)))
            .with_start_visible(false);
        let widget = config.widget_config();
        assert_eq!(widget.persona.name, "Cobalt");
        assert_eq!(widget.reply_timeout, Some(Duration::from_secs(5)));
        assert!(!widget.start_visible);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model(Model::Known(KnownModel::Gemini20Flash))
            .with_base_url(Some("http://127.0.0.1:9000".to_string()))
            .with_max_output_tokens(Some(128))
            .with_verify_model(false)
            .without_color();
        assert_eq!(config.model.as_str(), "gemini-2.0-flash");
        assert_eq!(config.generation_config().max_output_tokens, Some(128));
        assert!(!config.verify_model);
        assert!(!config.use_color);
    }
}
