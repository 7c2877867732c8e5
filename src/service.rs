//! The external conversational service.
//!
//! The chat widget talks to its service only through [`ConversationService`].
//! A session is an opaque handle: the widget creates it once, passes it by
//! mutable reference to every turn, and never looks inside.

use crate::client::Gemini;
use crate::error::{Error, Result};
use crate::observability::{SESSIONS_CREATED, SESSIONS_UNAVAILABLE};
use crate::types::{Content, GenerateContentRequest, GenerationConfig, Model};

/// A service that holds conversations and produces replies.
#[async_trait::async_trait]
pub trait ConversationService: Send + Sync {
    /// Conversation context carried between turns.
    type Session: Send;

    /// Opens a conversation governed by `preamble`.
    ///
    /// Fails with [`Error::ServiceUnavailable`] when the service cannot be
    /// reached.
    async fn create_session(&self, preamble: &str) -> Result<Self::Session>;

    /// Sends one user message and returns the reply text.
    ///
    /// A failed turn leaves the session as it was before the call.
    async fn send_turn(&self, session: &mut Self::Session, text: &str) -> Result<String>;
}

/// Conversation context for [`GeminiService`].
///
/// The Gemini API is stateless, so the history lives here and is replayed
/// with the system instruction on every request.
#[derive(Debug)]
pub struct GeminiSession {
    model: Model,
    system_instruction: Option<Content>,
    history: Vec<Content>,
}

impl GeminiSession {
    /// The number of contents (user and model) committed to the history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

/// [`ConversationService`] backed by the Gemini `generateContent` API.
#[derive(Debug, Clone)]
pub struct GeminiService {
    client: Gemini,
    model: Model,
    generation_config: GenerationConfig,
    verify_model: bool,
}

impl GeminiService {
    /// Creates a service that chats with `model`.
    pub fn new(client: Gemini, model: Model) -> Self {
        Self {
            client,
            model,
            generation_config: GenerationConfig::default(),
            verify_model: true,
        }
    }

    /// Sets the sampling options sent with every turn.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = config;
        self
    }

    /// Sets whether session creation checks that the model is reachable.
    ///
    /// Without the check, an unreachable service surfaces on the first turn
    /// instead.
    pub fn with_verify_model(mut self, verify: bool) -> Self {
        self.verify_model = verify;
        self
    }

    /// The model replies are generated with.
    pub fn model(&self) -> &Model {
        &self.model
    }

    async fn verify(&self) -> Result<()> {
        let info = self.client.get_model(&self.model).await?;
        if info.supports_generate_content() {
            Ok(())
        } else {
            Err(Error::bad_request(format!(
                "{} does not support generateContent",
                info.name
            )))
        }
    }
}

#[async_trait::async_trait]
impl ConversationService for GeminiService {
    type Session = GeminiSession;

    async fn create_session(&self, preamble: &str) -> Result<GeminiSession> {
        if self.verify_model
            && let Err(err) = self.verify().await
        {
            SESSIONS_UNAVAILABLE.click();
            return Err(match err {
                err @ Error::ServiceUnavailable { .. } => err,
                err => Error::service_unavailable(
                    format!("cannot open a session with {}: {err}", self.model),
                    None,
                ),
            });
        }
        SESSIONS_CREATED.click();
        let system_instruction = if preamble.trim().is_empty() {
            None
        } else {
            Some(Content::system(preamble))
        };
        Ok(GeminiSession {
            model: self.model.clone(),
            system_instruction,
            history: Vec::new(),
        })
    }

    async fn send_turn(&self, session: &mut GeminiSession, text: &str) -> Result<String> {
        let user = Content::user(text);
        let mut contents = session.history.clone();
        contents.push(user.clone());

        let mut request = GenerateContentRequest::new(contents)
            .with_generation_config(self.generation_config.clone());
        if let Some(instruction) = &session.system_instruction {
            request = request.with_system_instruction(instruction.clone());
        }

        let response = self.client.generate_content(&session.model, &request).await?;
        let reply = response.text()?;

        session.history.push(user);
        session.history.push(Content::model(reply.clone()));
        Ok(reply)
    }
}
