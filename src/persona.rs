//! The assistant persona: name, greeting, system preamble and apology.
//!
//! A persona is fixed configuration.  The preamble is handed to the
//! conversational service once, when the session is created, and never
//! changes afterwards.

use serde::{Deserialize, Serialize};
use utf8path::Path;

use crate::error::{Error, Result};

const DEFAULT_NAME: &str = "Axis AI";

const DEFAULT_GREETING: &str = "Hello! I'm Axis AI. How can I help you today?";

const DEFAULT_APOLOGY: &str = "Sorry, I'm having trouble connecting. Please try again later.";

const DEFAULT_PREAMBLE: &str = r#"You are Axis AI, the official, helpful, and friendly chatbot for CobaltAxis. Your purpose is to provide accurate, brand-focused replies based on the following rules and official information.

**About CobaltAxis:**
- We are a modern, future-focused digital agency based in India.
- We craft immersive web experiences by blending design, technology, and intelligence.
- Our mission is to make businesses smarter and bolder through innovative digital solutions.
- Our vision is about making businesses smarter, building bold digital solutions, and using AI for growth.
- Our leadership team is: Hari Vamshi (CEO), Mani Pratheek (Technical Lead), and Shashi Kumar (Operations Manager).

**Our Services:**
- Custom Websites: High-performance, scalable, modern web designs integrated with your brand.
- AI Receptionists: Intelligent, multilingual virtual assistants available 24/7 with analytics.
- AI Automation Agents: Custom automation for workflow optimization.
- Video Editing: Professional editing for brand and social content.
- Brand Strategy & Growth: Data-driven marketing to build your brand.
- AI-Powered Chatbots: Enhance customer engagement with custom chatbots.

**How to Reply:**
- Always introduce our services, company values, and team expertise using the information above.
- Only provide CobaltAxis-related business info. Never share or speculate about unrelated, external entities.
- Maintain a professional, welcoming, and solution-oriented tone.
- Respect privacy. Do not request sensitive information.
- When in doubt, refer users to our official website or suggest they book a free consultation for personalized help.
- Do not make any medical, legal, or financial claims."#;

/// Who the assistant is and what it says outside of generated replies.
///
/// Every field is optional in a persona file; missing fields take the Axis AI
/// defaults.
///
/// ```yaml
/// name: "Axis AI"
/// greeting: "Hi! Ask me anything about CobaltAxis."
/// preamble: |
///   You are Axis AI, the assistant for CobaltAxis.
/// apology: "Sorry, something went wrong. Please try again."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Persona {
    /// Display name of the assistant.
    pub name: String,

    /// The agent turn every transcript starts with.
    pub greeting: String,

    /// System-level instructions supplied when the session is created.
    pub preamble: String,

    /// The agent turn appended when a reply cannot be obtained.
    pub apology: String,
}

impl Persona {
    /// Parse a persona from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let persona: Self = serde_yaml::from_str(yaml)?;
        persona.validate()?;
        Ok(persona)
    }

    /// Load a persona from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|err| {
            Error::io(
                format!("failed to read persona file {}", path.as_str()),
                err,
            )
        })?;
        Self::from_yaml(&yaml)
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the greeting.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Sets the system preamble.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// Sets the apology.
    pub fn with_apology(mut self, apology: impl Into<String>) -> Self {
        self.apology = apology.into();
        self
    }

    /// Checks that the name, greeting and apology are not blank.
    ///
    /// Personas loaded from YAML are checked on load; the `with_*` builders
    /// do not check, and [`crate::ChatWidget::connect`] checks again.
    pub fn validate(&self) -> Result<()> {
        for (param, value) in [
            ("name", &self.name),
            ("greeting", &self.greeting),
            ("apology", &self.apology),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(
                    format!("persona {param} must not be empty"),
                    Some(param.to_string()),
                ));
            }
        }
        Ok(())
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            preamble: DEFAULT_PREAMBLE.to_string(),
            apology: DEFAULT_APOLOGY.to_string(),
        }
    }
}
