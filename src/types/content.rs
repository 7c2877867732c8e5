use serde::{Deserialize, Serialize};

/// The producer of a piece of content in a Gemini conversation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    /// Content written by the person chatting.
    User,

    /// Content generated by the model.
    Model,
}

/// A single part of a multi-part content message.
///
/// Only text parts are produced by this crate.  Parts of other kinds in a
/// response (inline data, function calls) deserialize with `text: None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Inline text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Set when the part is a model thought rather than reply text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    /// Create a new text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: None,
        }
    }

    /// Returns true if this part carries a model thought.
    pub fn is_thought(&self) -> bool {
        self.thought.unwrap_or(false)
    }
}

/// The base structured datatype containing multi-part content of a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// The producer of the content.  Absent for system instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ContentRole>,

    /// Ordered parts that constitute a single message.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a new `Content` with a single text part.
    pub fn new_with_text(role: Option<ContentRole>, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a new user `Content` with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new_with_text(Some(ContentRole::User), text)
    }

    /// Create a new model `Content` with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new_with_text(Some(ContentRole::Model), text)
    }

    /// Create a role-less `Content` suitable for a system instruction.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new_with_text(None, text)
    }

    /// Concatenated reply text of this content, excluding thoughts.
    ///
    /// Returns `None` when there is no non-empty text.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .parts
            .iter()
            .filter(|part| !part.is_thought())
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
