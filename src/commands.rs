//! Slash command parsing for the chat application.
//!
//! Lines starting with `/` control the widget and are never sent to the
//! conversational service.

/// A parsed widget command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetCommand {
    /// Open the chat window.
    Open,

    /// Close the chat window.
    Close,

    /// Flip the chat window between open and closed.
    Toggle,

    /// Print the whole transcript.
    Transcript,

    /// Display widget statistics.
    Stats,

    /// Retry opening the session after it failed.
    Reconnect,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(WidgetCommand)` if the input is a command, or `None` if it
/// should be treated as a message.
///
/// # Examples
///
/// ```
/// # use axis_chat::commands::{parse_command, WidgetCommand};
/// assert_eq!(parse_command("/close"), Some(WidgetCommand::Close));
/// assert!(parse_command("What services do you offer?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<WidgetCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "open" | "show" => WidgetCommand::Open,
        "close" | "hide" => WidgetCommand::Close,
        "toggle" => WidgetCommand::Toggle,
        "transcript" | "history" => WidgetCommand::Transcript,
        "stats" | "status" => WidgetCommand::Stats,
        "reconnect" => WidgetCommand::Reconnect,
        "help" | "?" => WidgetCommand::Help,
        "quit" | "exit" | "q" => WidgetCommand::Quit,
        "" => WidgetCommand::Invalid("Empty command; type /help for commands".to_string()),
        _ => WidgetCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    match (argument, &result) {
        (Some(_), WidgetCommand::Invalid(_)) | (None, _) => Some(result),
        (Some(arg), _) => Some(WidgetCommand::Invalid(format!(
            "/{command} takes no argument (got '{arg}')"
        ))),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /open                  Open the chat window
  /close                 Close the chat window (pending replies still arrive)
  /toggle                Open or close the chat window
  /transcript            Show the conversation so far
  /stats                 Show widget statistics
  /reconnect             Retry connecting after the service was unavailable
  /help                  Show this help message
  /quit                  Exit the chat
Press Ctrl+C while a reply is pending to close the window."#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(WidgetCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(WidgetCommand::Quit));
        assert_eq!(parse_command("/q"), Some(WidgetCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(WidgetCommand::Quit));
    }

    #[test]
    fn parse_visibility() {
        assert_eq!(parse_command("/open"), Some(WidgetCommand::Open));
        assert_eq!(parse_command("/SHOW"), Some(WidgetCommand::Open));
        assert_eq!(parse_command("/close"), Some(WidgetCommand::Close));
        assert_eq!(parse_command("/hide"), Some(WidgetCommand::Close));
        assert_eq!(parse_command("/toggle"), Some(WidgetCommand::Toggle));
    }

    #[test]
    fn parse_other_commands() {
        assert_eq!(parse_command("/transcript"), Some(WidgetCommand::Transcript));
        assert_eq!(parse_command("/stats"), Some(WidgetCommand::Stats));
        assert_eq!(parse_command("/reconnect"), Some(WidgetCommand::Reconnect));
        assert_eq!(parse_command("/?"), Some(WidgetCommand::Help));
    }

    #[test]
    fn unexpected_argument() {
        assert!(matches!(
            parse_command("/close now"),
            Some(WidgetCommand::Invalid(msg)) if msg.contains("takes no argument")
        ));
    }

    #[test]
    fn unknown_commands() {
        assert_eq!(
            parse_command("/clear"),
            Some(WidgetCommand::Invalid("Unknown command: /clear".to_string()))
        );
        assert!(matches!(parse_command("/"), Some(WidgetCommand::Invalid(_))));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello, Axis!"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("what is 1/2?"), None);
    }

    #[test]
    fn help_text_lists_commands() {
        let help = help_text();
        for command in ["/open", "/close", "/toggle", "/transcript", "/stats", "/reconnect", "/quit"] {
            assert!(help.contains(command), "missing {command}");
        }
    }
}
