use std::fmt;

use serde::{Deserialize, Serialize};

/// Who wrote a turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// The person using the chat widget.
    User,

    /// The assistant, including the greeting and apology turns.
    Agent,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::User => write!(f, "user"),
            Author::Agent => write!(f, "agent"),
        }
    }
}

/// One message in the conversation.
///
/// Turns are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    author: Author,
    text: String,
}

impl Turn {
    /// Create a new turn.
    pub fn new(author: Author, text: impl Into<String>) -> Self {
        Self {
            author,
            text: text.into(),
        }
    }

    /// Create a new user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Author::User, text)
    }

    /// Create a new agent turn.
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Author::Agent, text)
    }

    /// Who wrote the turn.
    pub fn author(&self) -> Author {
        self.author
    }

    /// The turn's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if the user wrote this turn.
    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }

    /// Returns true if the agent wrote this turn.
    pub fn is_agent(&self) -> bool {
        self.author == Author::Agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_turn() {
        let turn = Turn::user("Hello");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json, serde_json::json!({"author": "user", "text": "Hello"}));
    }

    #[test]
    fn accessors() {
        let turn = Turn::agent("Hi there");
        assert_eq!(turn.author(), Author::Agent);
        assert_eq!(turn.text(), "Hi there");
        assert!(turn.is_agent());
        assert!(!turn.is_user());
    }
}
