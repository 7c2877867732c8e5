//! The chat widget controller.
//!
//! [`ChatWidget`] owns the transcript, the input buffer, the visibility flag
//! and the conversation session.  A submission is split in three so that the
//! presentation layer keeps control while a reply is outstanding:
//!
//! 1. [`ChatWidget::submit_message`] validates the text, appends the user
//!    turn and returns an [`Exchange`].  The exchange takes the session with
//!    it, which is what makes the widget pending.
//! 2. [`Exchange::resolve`] performs the round trip.  It is the only await
//!    point and does not borrow the widget.
//! 3. [`ChatWidget::complete`] hands the session back, appends exactly one
//!    agent turn (the reply or the persona's apology) and clears pending.
//!
//! [`ChatWidget::send_message`] runs all three steps back to back.

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::observability::{
    WIDGET_ABANDONED, WIDGET_APOLOGIES, WIDGET_REJECTED_EMPTY, WIDGET_REJECTED_PENDING,
    WIDGET_REJECTED_UNAVAILABLE, WIDGET_REPLIES, WIDGET_SUBMISSIONS, WIDGET_TURN_DURATION,
};
use crate::persona::Persona;
use crate::service::ConversationService;
use crate::types::{Author, Transcript, Turn};

/// Default upper bound on a single reply.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(60);

/// Tickets are unique across every widget in the process.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Configuration for a [`ChatWidget`].
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// The persona supplying greeting, preamble and apology.
    pub persona: Persona,

    /// Replies that take longer than this are treated as failures.
    /// `None` waits indefinitely.
    pub reply_timeout: Option<Duration>,

    /// Whether the widget starts open.
    pub start_visible: bool,
}

impl WidgetConfig {
    /// Creates a configuration with the default persona, a 60 second reply
    /// timeout, and the widget initially closed.
    pub fn new() -> Self {
        Self {
            persona: Persona::default(),
            reply_timeout: Some(DEFAULT_REPLY_TIMEOUT),
            start_visible: false,
        }
    }

    /// Sets the persona.  It is validated by [`ChatWidget::connect`].
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Sets the reply timeout.
    pub fn with_reply_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Sets whether the widget starts open.
    pub fn with_start_visible(mut self, visible: bool) -> Self {
        self.start_visible = visible;
        self
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The exchange a pending widget is waiting on.
struct Outstanding {
    ticket: u64,
    // Dangles once the exchange (or its completion) is dropped unapplied.
    live: Weak<()>,
}

impl Outstanding {
    fn is_live(&self) -> bool {
        self.live.strong_count() > 0
    }
}

/// Where the session is.
enum SessionSlot<T> {
    /// Held by the widget; submissions are accepted.
    Ready(T),
    /// Checked out by an exchange.
    Awaiting(Outstanding),
    /// No session; chat is disabled until a reconnect.
    Unavailable(Error),
}

/// Aggregated stats for a chat widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetStats {
    /// The number of turns in the transcript, greeting included.
    pub turn_count: usize,
    /// The number of user turns.
    pub user_turns: usize,
    /// The number of agent turns, greeting and apologies included.
    pub agent_turns: usize,
    /// The number of replies that were replaced by the apology.
    pub apologies: u64,
    /// Whether a reply is outstanding.
    pub pending: bool,
    /// Whether the widget is open.
    pub visible: bool,
    /// Whether a session is established.
    pub available: bool,
}

/// The controller behind the chat window.
pub struct ChatWidget<S: ConversationService> {
    service: Arc<S>,
    persona: Persona,
    reply_timeout: Option<Duration>,
    transcript: Transcript,
    input: String,
    visible: bool,
    session: SessionSlot<S::Session>,
    apologies: u64,
}

impl<S: ConversationService> ChatWidget<S> {
    /// Mounts a widget and opens its session.
    ///
    /// Fails only if the persona has a blank name, greeting or apology.  The
    /// transcript starts with the persona's greeting.  If the session cannot
    /// be created the widget is still returned, in a degraded state where
    /// submissions are rejected; see [`ChatWidget::reconnect`].
    pub async fn connect(service: S, config: WidgetConfig) -> Result<Self> {
        config.persona.validate()?;
        let service = Arc::new(service);
        let session = match service.create_session(&config.persona.preamble).await {
            Ok(session) => SessionSlot::Ready(session),
            Err(err) => {
                tracing::warn!(error = %err, "chat session unavailable; chat disabled");
                SessionSlot::Unavailable(err)
            }
        };
        Ok(Self {
            service,
            transcript: Transcript::with_greeting(config.persona.greeting.clone()),
            persona: config.persona,
            reply_timeout: config.reply_timeout,
            input: String::new(),
            visible: config.start_visible,
            session,
            apologies: 0,
        })
    }

    /// Opens a new session when the widget has none.
    ///
    /// This recovers both from a failed [`ChatWidget::connect`] and from an
    /// exchange that was dropped before it was completed, whose session is
    /// lost.  Does nothing when a session already exists.  The transcript is
    /// kept.
    pub async fn reconnect(&mut self) -> Result<()> {
        self.reap_abandoned();
        match &self.session {
            SessionSlot::Ready(_) => Ok(()),
            SessionSlot::Awaiting(_) => Err(Error::concurrent_submission(
                "cannot reconnect while a reply is pending",
            )),
            SessionSlot::Unavailable(_) => {
                match self.service.create_session(&self.persona.preamble).await {
                    Ok(session) => {
                        tracing::info!("chat session re-established");
                        self.session = SessionSlot::Ready(session);
                        Ok(())
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "chat session still unavailable");
                        self.session = SessionSlot::Unavailable(err.clone());
                        Err(err)
                    }
                }
            }
        }
    }

    /// The conversation so far, oldest first.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The persona this widget speaks as.
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Returns true while a reply is outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(&self.session, SessionSlot::Awaiting(outstanding) if outstanding.is_live())
    }

    /// Returns true if the chat window is open.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns true while the widget has a session, checked out or not.
    pub fn is_available(&self) -> bool {
        match &self.session {
            SessionSlot::Ready(_) => true,
            SessionSlot::Awaiting(outstanding) => outstanding.is_live(),
            SessionSlot::Unavailable(_) => false,
        }
    }

    /// The error that left the widget without a session, if any.
    pub fn unavailable_reason(&self) -> Option<&Error> {
        match &self.session {
            SessionSlot::Unavailable(err) => Some(err),
            _ => None,
        }
    }

    /// Opens or closes the chat window.
    ///
    /// The transcript, session and any outstanding reply are unaffected.
    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    /// The text typed but not yet submitted.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the input buffer, as on every keystroke.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Submits the input buffer.
    pub fn submit_input(&mut self) -> Result<Exchange<S>> {
        let text = self.input.clone();
        self.submit_message(&text)
    }

    /// Starts a round trip for `text`.
    ///
    /// On success the user turn is appended, the input buffer is cleared and
    /// the widget is pending until the returned exchange is resolved and
    /// passed to [`ChatWidget::complete`].  A rejected submission adds no
    /// user turn and leaves the input alone:
    ///
    /// - [`Error::Validation`] if `text` is empty after trimming;
    /// - [`Error::ConcurrentSubmission`] if a reply is already pending;
    /// - [`Error::ServiceUnavailable`] if the widget has no session.
    pub fn submit_message(&mut self, text: &str) -> Result<Exchange<S>> {
        if text.trim().is_empty() {
            WIDGET_REJECTED_EMPTY.click();
            return Err(Error::validation(
                "message is empty",
                Some("text".to_string()),
            ));
        }
        self.reap_abandoned();
        let live = Arc::new(());
        let ticket = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);
        let outstanding = Outstanding {
            ticket,
            live: Arc::downgrade(&live),
        };
        let session = match mem::replace(&mut self.session, SessionSlot::Awaiting(outstanding)) {
            SessionSlot::Ready(session) => session,
            awaiting @ SessionSlot::Awaiting(_) => {
                self.session = awaiting;
                WIDGET_REJECTED_PENDING.click();
                return Err(Error::concurrent_submission(
                    "a reply is still pending",
                ));
            }
            SessionSlot::Unavailable(err) => {
                WIDGET_REJECTED_UNAVAILABLE.click();
                let rejection = Error::service_unavailable(
                    format!("chat is temporarily disabled: {err}"),
                    None,
                );
                self.session = SessionSlot::Unavailable(err);
                return Err(rejection);
            }
        };
        WIDGET_SUBMISSIONS.click();
        self.transcript.push(Turn::user(text));
        self.input.clear();
        Ok(Exchange {
            service: Arc::clone(&self.service),
            session,
            text: text.to_string(),
            reply_timeout: self.reply_timeout,
            ticket,
            live,
        })
    }

    /// Applies a resolved exchange: returns the session to the widget,
    /// appends the reply or the apology, and clears pending.
    ///
    /// Service errors are logged here and never returned.  A completion this
    /// widget is not waiting on is rejected with
    /// [`Error::UnexpectedCompletion`] and changes nothing; its session is
    /// dropped, and the widget that issued it recovers through
    /// [`ChatWidget::reconnect`].
    pub fn complete(&mut self, completion: Completion<S>) -> Result<&Turn> {
        match &self.session {
            SessionSlot::Awaiting(outstanding) if outstanding.ticket == completion.ticket => {}
            _ => {
                return Err(Error::unexpected_completion(
                    "the completion does not belong to this widget's outstanding exchange",
                ));
            }
        }
        WIDGET_TURN_DURATION.add(completion.elapsed.as_secs_f64());
        self.session = SessionSlot::Ready(completion.session);
        let text = match completion.outcome {
            Ok(reply) => {
                WIDGET_REPLIES.click();
                reply
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    timed_out = err.is_timeout(),
                    status_code = ?err.status_code(),
                    elapsed_ms = u64::try_from(completion.elapsed.as_millis()).unwrap_or(u64::MAX),
                    "conversational service failed; replying with apology"
                );
                self.record_apology()
            }
        };
        Ok(self.transcript.push(Turn::agent(text)))
    }

    /// Submits `text` and waits for the responding turn.
    ///
    /// If this future is dropped before it finishes, the session goes with
    /// it: the next submission appends the apology for the unanswered turn
    /// and fails until [`ChatWidget::reconnect`] opens a new session.
    pub async fn send_message(&mut self, text: &str) -> Result<&Turn> {
        let exchange = self.submit_message(text)?;
        let completion = exchange.resolve().await;
        self.complete(completion)
    }

    /// Returns the current widget statistics snapshot.
    pub fn stats(&self) -> WidgetStats {
        WidgetStats {
            turn_count: self.transcript.len(),
            user_turns: self.transcript.count_by(Author::User),
            agent_turns: self.transcript.count_by(Author::Agent),
            apologies: self.apologies,
            pending: self.is_pending(),
            visible: self.visible,
            available: self.is_available(),
        }
    }

    fn record_apology(&mut self) -> String {
        WIDGET_APOLOGIES.click();
        self.apologies += 1;
        self.persona.apology.clone()
    }

    /// Answers the user turn of an exchange that was dropped unapplied and
    /// marks the session as lost.
    fn reap_abandoned(&mut self) {
        if !matches!(&self.session, SessionSlot::Awaiting(outstanding) if !outstanding.is_live()) {
            return;
        }
        WIDGET_ABANDONED.click();
        tracing::warn!("reply abandoned before completion; session lost");
        let apology = self.record_apology();
        self.transcript.push(Turn::agent(apology));
        self.session = SessionSlot::Unavailable(Error::service_unavailable(
            "the session was lost with an abandoned reply",
            None,
        ));
    }
}

impl<S: ConversationService> fmt::Debug for ChatWidget<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatWidget")
            .field("transcript", &self.transcript)
            .field("input", &self.input)
            .field("visible", &self.visible)
            .field("pending", &self.is_pending())
            .field("available", &self.is_available())
            .finish_non_exhaustive()
    }
}

/// An outstanding request to the conversational service.
///
/// The exchange owns the widget's session until it is resolved and its
/// completion applied.  Cancellation is not supported: dropping either one
/// early loses the session, see [`ChatWidget::send_message`].
#[must_use = "the widget stays pending until the exchange is resolved and completed"]
pub struct Exchange<S: ConversationService> {
    service: Arc<S>,
    session: S::Session,
    text: String,
    reply_timeout: Option<Duration>,
    ticket: u64,
    live: Arc<()>,
}

impl<S: ConversationService> fmt::Debug for Exchange<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("text", &self.text)
            .field("reply_timeout", &self.reply_timeout)
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

impl<S: ConversationService> Exchange<S> {
    /// The submitted text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Performs the round trip.  Never fails: the outcome is carried in the
    /// completion for [`ChatWidget::complete`] to apply.
    pub async fn resolve(mut self) -> Completion<S> {
        let start = Instant::now();
        let request = self.service.send_turn(&mut self.session, &self.text);
        let outcome = match self.reply_timeout {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(outcome) => outcome,
                Err(_) => Err(Error::timeout(
                    "no reply from the conversational service",
                    Some(limit.as_secs_f64()),
                )),
            },
            None => request.await,
        };
        Completion {
            session: self.session,
            outcome,
            elapsed: start.elapsed(),
            ticket: self.ticket,
            _live: self.live,
        }
    }
}

/// The result of a resolved [`Exchange`], ready to be applied to the widget.
#[must_use = "apply the completion with ChatWidget::complete"]
pub struct Completion<S: ConversationService> {
    session: S::Session,
    outcome: Result<String>,
    elapsed: Duration,
    ticket: u64,
    _live: Arc<()>,
}

impl<S: ConversationService> Completion<S> {
    /// Returns true if the service produced a reply.
    pub fn is_reply(&self) -> bool {
        self.outcome.is_ok()
    }
}
