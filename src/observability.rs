use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("axis_chat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("axis_chat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("axis_chat.client.request_duration_seconds");

pub(crate) static SESSIONS_CREATED: Counter = Counter::new("axis_chat.session.created");
pub(crate) static SESSIONS_UNAVAILABLE: Counter = Counter::new("axis_chat.session.unavailable");

pub(crate) static WIDGET_SUBMISSIONS: Counter = Counter::new("axis_chat.widget.submissions");
pub(crate) static WIDGET_REJECTED_EMPTY: Counter =
    Counter::new("axis_chat.widget.rejected_empty");
pub(crate) static WIDGET_REJECTED_PENDING: Counter =
    Counter::new("axis_chat.widget.rejected_pending");
pub(crate) static WIDGET_REJECTED_UNAVAILABLE: Counter =
    Counter::new("axis_chat.widget.rejected_unavailable");
pub(crate) static WIDGET_REPLIES: Counter = Counter::new("axis_chat.widget.replies");
pub(crate) static WIDGET_APOLOGIES: Counter = Counter::new("axis_chat.widget.apologies");
pub(crate) static WIDGET_ABANDONED: Counter = Counter::new("axis_chat.widget.abandoned");
pub(crate) static WIDGET_TURN_DURATION: Moments =
    Moments::new("axis_chat.widget.turn_duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSIONS_CREATED);
    collector.register_counter(&SESSIONS_UNAVAILABLE);

    collector.register_counter(&WIDGET_SUBMISSIONS);
    collector.register_counter(&WIDGET_REJECTED_EMPTY);
    collector.register_counter(&WIDGET_REJECTED_PENDING);
    collector.register_counter(&WIDGET_REJECTED_UNAVAILABLE);
    collector.register_counter(&WIDGET_REPLIES);
    collector.register_counter(&WIDGET_APOLOGIES);
    collector.register_counter(&WIDGET_ABANDONED);
    collector.register_moments(&WIDGET_TURN_DURATION);
}
